//! Mangler unit tests

use crate::backends::output::generate;
use crate::frontend::config::{MangleOptions, OutputOptions, ParseOptions, PropertyMangleOptions};
use crate::frontend::core::parser::parse;
use crate::middle::mangle::mangle;

fn mangle_with(
    source: &str,
    options: &MangleOptions,
) -> String {
    let mut program = parse(source, &ParseOptions::default()).unwrap();
    mangle(&mut program, options).unwrap();
    generate(&program, &OutputOptions::default())
}

fn mangled(source: &str) -> String {
    mangle_with(source, &MangleOptions::default())
}

const PARAM_SOURCE: &str = "function bar(foo) {return foo + 'bar'};";

const PROPERTY_SOURCE: &str = "var obj = {
  _hidden: false,
  \"quoted\": 'value'
};

alert(object.quoted);";

#[test]
fn test_arguments_mangled() {
    let out = mangled(PARAM_SOURCE);
    assert!(!out.contains("(foo)"), "{}", out);
    assert!(out.contains("bar("), "{}", out);
}

#[test]
fn test_toplevel() {
    let options = MangleOptions {
        toplevel: true,
        ..MangleOptions::default()
    };
    let out = mangle_with(PARAM_SOURCE, &options);
    assert!(!out.contains("bar("), "{}", out);
}

#[test]
fn test_reserved_names() {
    let options = MangleOptions {
        reserved: vec!["foo".into()],
        ..MangleOptions::default()
    };
    assert!(mangle_with(PARAM_SOURCE, &options).contains("(foo)"));
    assert!(mangled("function foo($super) {return $super}").contains("$super"));
}

#[test]
fn test_globals_untouched() {
    let out = mangled("function f(a) { return window.x + a + document; }");
    assert!(out.contains("window.x"), "{}", out);
    assert!(out.contains("document"), "{}", out);
}

#[test]
fn test_nested_names_do_not_collide() {
    let out = mangled("function f(first) { var second = 1; return function (third) { return first + second + third; }; }");
    let mut program = parse(&out, &ParseOptions::default()).unwrap();
    crate::middle::scope::resolve_scopes(&mut program).unwrap();
    let inner: Vec<&str> = program
        .scopes
        .symbols()
        .filter(|s| s.kind == crate::middle::scope::SymbolKind::Param || s.kind == crate::middle::scope::SymbolKind::Var)
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(inner.len(), 3);
    let mut unique = inner.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), 3, "{}", out);
    assert!(inner.iter().all(|name| name.len() == 1), "{}", out);
}

#[test]
fn test_unreferenced_outer_name_reused() {
    let out = mangled("function f(x) { g(x); return function (y) { return y; }; }");
    let params: Vec<&str> = out.match_indices("function(").map(|(i, _)| &out[i + 9..i + 10]).collect();
    assert_eq!(params.len(), 1);
    assert!(out.starts_with(&format!("function f({})", params[0])), "{}", out);
}

#[test]
fn test_global_shadowing_avoided() {
    let out = mangled("function f(x) { return a + x; }");
    assert!(!out.contains("f(a)"), "{}", out);
}

#[test]
fn test_eval_scope_kept() {
    let source = "function f(long) { eval('long'); return long; }";
    assert_eq!(mangled(source), "function f(long){eval(\"long\");return long}");
}

#[test]
fn test_keep_fnames() {
    let source = "(function() { function plus(a, b) { return a + b; } plus(1, 2); })();";
    assert!(!mangled(source).contains("plus"));
    let options = MangleOptions {
        keep_fnames: true,
        ..MangleOptions::default()
    };
    assert!(mangle_with(source, &options).contains("plus"));
}

#[test]
fn test_labels_renamed() {
    let out = mangled("outer: for (;;) { inner: for (;;) { if (x) break outer; continue inner; } }");
    assert!(!out.contains("outer"), "{}", out);
    assert!(!out.contains("inner"), "{}", out);
    let mut program = parse(&out, &ParseOptions::default()).unwrap();
    assert!(crate::middle::scope::resolve_scopes(&mut program).is_ok());
}

#[test]
fn test_properties_left_alone_by_default() {
    assert!(mangled(PROPERTY_SOURCE).contains("object.quoted"));
}

#[test]
fn test_property_mangling() {
    let with = |properties: PropertyMangleOptions| MangleOptions {
        properties: Some(properties),
        ..MangleOptions::default()
    };
    let out = mangle_with(PROPERTY_SOURCE, &with(PropertyMangleOptions::default()));
    assert!(!out.contains("object.quoted"), "{}", out);
    assert!(!out.contains("_hidden"), "{}", out);

    let regex = PropertyMangleOptions {
        regex: Some("^_".into()),
        ..PropertyMangleOptions::default()
    };
    let out = mangle_with(PROPERTY_SOURCE, &with(regex));
    assert!(out.contains("object.quoted"), "{}", out);
    assert!(!out.contains("_hidden"), "{}", out);

    let keep_quoted = PropertyMangleOptions {
        keep_quoted: true,
        ..PropertyMangleOptions::default()
    };
    assert!(mangle_with(PROPERTY_SOURCE, &with(keep_quoted)).contains("object.quoted"));

    let debug = PropertyMangleOptions {
        debug: true,
        ..PropertyMangleOptions::default()
    };
    assert!(mangle_with(PROPERTY_SOURCE, &with(debug)).contains("_$quoted$_"));
}

#[test]
fn test_builtin_properties_kept() {
    let options = MangleOptions {
        properties: Some(PropertyMangleOptions::default()),
        ..MangleOptions::default()
    };
    let out = mangle_with("x.push(y.length); z.custom = 1; w['custom'];", &options);
    assert!(out.contains("x.push(y.length)"), "{}", out);
    assert!(!out.contains("custom"), "{}", out);
}
