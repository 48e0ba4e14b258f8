//! Compressor behaviour on whole programs

use crate::backends::output::generate;
use crate::frontend::config::{CompressOptions, OutputOptions, ParseOptions};
use crate::frontend::core::parser::ast::{Label, Stmt};
use crate::frontend::core::parser::parse;
use crate::middle::compress::compress;
use crate::middle::scope::ScopeError;

fn squeeze_with(
    source: &str,
    options: &CompressOptions,
) -> String {
    let mut program = parse(source, &ParseOptions::default()).unwrap();
    compress(&mut program, options).unwrap();
    generate(&program, &OutputOptions::default())
}

fn squeeze(source: &str) -> String {
    squeeze_with(source, &CompressOptions::default())
}

const REDUCE_SOURCE: &str = "var a = 2;
(function () {
  console.log(a - 5);
  console.log(a - 1);
})();";

const TOPLEVEL_SOURCE: &str = "var a, b = 1, c = g;
function f(d) {
  return function() {
    c = 2;
  }
}
a = 2;
function g() {}
function h() {}
console.log(b = 3);";

#[test]
fn test_if_else_returns_become_conditional() {
    let out = squeeze("function a(a){if(a) { return 0; } else { return 1; }}");
    assert_eq!(out, "function a(a){return a?0:1}");
}

#[test]
fn test_if_else_expressions_become_conditional() {
    assert_eq!(squeeze("if (a) { b(); } else { c(); }"), "a?b():c();");
    assert_eq!(squeeze("if (a) { b(); }"), "a&&b();");
    assert_eq!(squeeze("if (!a) { b(); }"), "a||b();");
}

#[test]
fn test_sequence_callee_keeps_receiver() {
    assert_eq!(squeeze("y = (0, a.b)();"), "y=(0,a.b)();");
    assert_eq!(squeeze("(1, a[b])(c);"), "(0,a[b])(c);");
    assert_eq!(squeeze("(0, f)();"), "f();");
    let out = squeeze("function f(s){return (0,eval)(s)}");
    assert!(out.contains("(0,eval)(s)"), "{}", out);
}

#[test]
fn test_collapsed_method_keeps_receiver() {
    let out = squeeze("function g(){var f=a.b;return f()}");
    assert!(!out.contains("return a.b()"), "{}", out);
}

#[test]
fn test_failed_pass_leaves_program_untouched() {
    let mut program = parse("if (x) { y(); } for (;;) { z(); break; }", &ParseOptions::default()).unwrap();
    let Some(Stmt::For { body, .. }) = program.body.last_mut() else {
        panic!("expected a for loop");
    };
    let Stmt::Block { body, .. } = body.as_mut() else {
        panic!("expected a block");
    };
    let Some(Stmt::Break { label, span }) = body.last_mut() else {
        panic!("expected a break");
    };
    *label = Some(Label {
        name: "nowhere".to_string(),
        span: *span,
    });
    let before = generate(&program, &OutputOptions::default());

    let err = compress(&mut program, &CompressOptions::default()).unwrap_err();
    assert!(matches!(err, ScopeError::UndefinedLabel { .. }));
    assert_eq!(generate(&program, &OutputOptions::default()), before);
}

#[test]
fn test_negated_equality_flips_operator() {
    assert_eq!(squeeze("x = !(a == b);"), "x=a!=b;");
    assert_eq!(squeeze("x = !(a !== b);"), "x=a===b;");
    assert_eq!(squeeze("x = !(a < b);"), "x=!(a<b);");
}

#[test]
fn test_sequences_join_statements() {
    assert_eq!(squeeze("a(); b(); c();"), "a(),b(),c();");
}

#[test]
fn test_hoist_vars() {
    let options = CompressOptions {
        hoist_vars: true,
        ..CompressOptions::default()
    };
    let out = squeeze_with(
        "function something() { var a = foo(); a = bar(); var b = baz(); return a + b;}",
        &options,
    );
    assert!(out.contains("var a,b"), "{}", out);
}

#[test]
fn test_reduce_vars_with_toplevel() {
    let options = CompressOptions {
        reduce_vars: true,
        toplevel: true,
        ..CompressOptions::default()
    };
    let out = squeeze_with(REDUCE_SOURCE, &options);
    assert!(out.contains("console.log(-3)"), "{}", out);
    assert!(out.contains("console.log(1)"), "{}", out);
}

#[test]
fn test_reduce_vars_disabled() {
    let options = CompressOptions {
        reduce_vars: false,
        toplevel: true,
        ..CompressOptions::default()
    };
    let out = squeeze_with(REDUCE_SOURCE, &options);
    assert!(out.contains("console.log(a-5)"), "{}", out);
    assert_eq!(squeeze(REDUCE_SOURCE), out);
}

#[test]
fn test_reduce_vars_skips_reassigned() {
    let options = CompressOptions {
        reduce_vars: true,
        ..CompressOptions::default()
    };
    let out = squeeze_with(&format!("{}a=3", REDUCE_SOURCE), &options);
    assert!(out.contains("console.log(a-5)"), "{}", out);
}

#[test]
fn test_global_defs() {
    let mut options = CompressOptions::default();
    options.global_defs.insert("NUM".into(), serde_json::json!(1234));
    options.global_defs.insert("BOOL".into(), serde_json::json!(true));
    options.global_defs.insert("NULL".into(), serde_json::Value::Null);
    options.global_defs.insert("STR".into(), serde_json::json!("str"));
    let out = squeeze_with("if (BOOL) { var a = STR; var b = NULL; var c = NUM; }", &options);
    assert!(out.contains("a=\"str\""), "{}", out);
    assert!(out.contains("b=null"), "{}", out);
    assert!(out.contains("c=1234"), "{}", out);
    assert!(!out.contains("if"), "{}", out);
}

#[test]
fn test_negate_iife() {
    let source = "(function() { console.log('test')})();";
    let out = squeeze(source);
    assert!(out.starts_with("!function(){"), "{}", out);
    let options = CompressOptions {
        negate_iife: false,
        ..CompressOptions::default()
    };
    assert!(!squeeze_with(source, &options).contains('!'));
}

#[test]
fn test_drop_console() {
    let options = CompressOptions {
        drop_console: true,
        ..CompressOptions::default()
    };
    let out = squeeze_with("(function() { console.log('test')})();", &options);
    assert!(!out.contains("console"), "{}", out);
}

#[test]
fn test_console_kept_when_shadowed() {
    let options = CompressOptions {
        drop_console: true,
        ..CompressOptions::default()
    };
    let out = squeeze_with("function f(console) { console.log(1); }", &options);
    assert!(out.contains("console.log(1)"), "{}", out);
}

#[test]
fn test_drop_debugger() {
    assert_eq!(squeeze("a();debugger;b();"), "a(),b();");
}

#[test]
fn test_collapse_vars() {
    let source = "function a() { var win = window; return win.Handlebars; }";
    assert!(squeeze(source).contains("return window.Handlebars"));
    let options = CompressOptions {
        collapse_vars: false,
        ..CompressOptions::default()
    };
    assert!(!squeeze_with(source, &options).contains("return window.Handlebars"));
}

#[test]
fn test_keep_fargs() {
    let source = "function plus(a, b, c) { return a + b};\nplus(1, 2);";
    let options = |keep_fargs| CompressOptions {
        keep_fargs,
        unsafe_: true,
        ..CompressOptions::default()
    };
    assert!(!squeeze_with(source, &options(false)).contains("c)"));
    assert!(squeeze_with(source, &options(true)).contains("c)"));
}

#[test]
fn test_unused_toplevel() {
    let options = CompressOptions {
        toplevel: true,
        ..CompressOptions::default()
    };
    let out = squeeze_with(TOPLEVEL_SOURCE, &options);
    assert!(!out.contains("function h()"), "{}", out);
    assert!(!out.contains("var a"), "{}", out);

    let out = squeeze(TOPLEVEL_SOURCE);
    assert!(out.contains("var a"), "{}", out);
    assert!(out.contains("function h()"), "{}", out);
}

#[test]
fn test_top_retain() {
    let options = CompressOptions {
        toplevel: true,
        top_retain: vec!["a".into(), "h".into()],
        ..CompressOptions::default()
    };
    let out = squeeze_with(TOPLEVEL_SOURCE, &options);
    assert!(out.contains("var a"), "{}", out);
    assert!(out.contains("function h()"), "{}", out);
    assert!(!out.contains("function g"), "{}", out);
}

#[test]
fn test_unsafe_comps() {
    let source = "var obj1 = {
        valueOf: function() {triggeredFirst();}
    }
    var obj2 = 2;
    var result1 = obj1 <= obj2;";
    let options = CompressOptions {
        comparisons: true,
        reduce_vars: false,
        collapse_vars: false,
        ..CompressOptions::default()
    };
    assert!(squeeze_with(source, &options).contains("result1=obj1<=obj2"));
    let options = CompressOptions {
        unsafe_comps: true,
        ..options
    };
    let out = squeeze_with(source, &options);
    assert!(out.contains("result1=obj2>=obj1"), "{}", out);
}

#[test]
fn test_unsafe_proto() {
    let source = "Array.prototype.slice.call([1,2,3], 1)";
    assert!(squeeze(source).contains("Array.prototype.slice.call"));
    let options = CompressOptions {
        unsafe_proto: true,
        ..CompressOptions::default()
    };
    assert!(squeeze_with(source, &options).contains("[].slice.call"));
}

#[test]
fn test_constant_folding() {
    assert_eq!(squeeze("x = 1 + 2 * 3;"), "x=7;");
    assert_eq!(squeeze("x = 'a' + 'b';"), "x=\"ab\";");
    assert_eq!(squeeze("x = y + 'a' + 'b';"), "x=y+\"ab\";");
}

#[test]
fn test_booleans_shortened() {
    assert_eq!(squeeze("x = true; y = false;"), "x=!0,y=!1;");
}

#[test]
fn test_dead_branch_removed() {
    assert_eq!(squeeze("if (false) { a(); } else { b(); }"), "b();");
    assert_eq!(squeeze("if (1) a(); else { var x; }"), "a();var x;");
}

#[test]
fn test_while_becomes_for() {
    assert_eq!(squeeze("while (a) b();"), "for(;a;)b();");
    assert_eq!(squeeze("while (true) { if (a) break; b(); }"), "for(;!a;)b();");
}

#[test]
fn test_properties() {
    assert_eq!(squeeze("a['foo'] = 1;"), "a.foo=1;");
    assert_eq!(squeeze("a['switch'] = 1;"), "a[\"switch\"]=1;");
    assert_eq!(squeeze("a['1'] = 1;"), "a[1]=1;");
    let options = CompressOptions {
        screw_ie8: true,
        ..CompressOptions::default()
    };
    assert_eq!(squeeze_with("a['switch'] = 1;", &options), "a.switch=1;");
}

#[test]
fn test_undefined_becomes_void() {
    assert_eq!(squeeze("x = undefined;"), "x=void 0;");
    assert_eq!(squeeze("function f(undefined) { return undefined; }"), "function f(undefined){return undefined}");
}

#[test]
fn test_compound_assignment() {
    assert_eq!(squeeze("function f(a) { a = a + 1; return a; }"), "function f(a){return a+=1}");
}

#[test]
fn test_eval_blocks_unused_removal() {
    let out = squeeze("function f() { var a = 1; eval('a'); }");
    assert!(out.contains("var a=1"), "{}", out);
}

#[test]
fn test_passes_do_not_grow_output() {
    let source = "function f(a){var b=a.c;if(b){return b.d}else{return b.e}}";
    let one = squeeze(source);
    let options = CompressOptions {
        passes: 3,
        ..CompressOptions::default()
    };
    assert!(squeeze_with(source, &options).len() <= one.len());
}
