//! Whole-pipeline minification tests
//!
//! Options are given as JSON documents, the way a config file would.

use regex::Regex;
use squeeze::{minify, minify_code, MinifyOptions};

fn compile(
    source: &str,
    json: &str,
) -> String {
    let options = MinifyOptions::from_json(json).unwrap();
    minify_code(source, &options).unwrap()
}

fn compile_default(source: &str) -> String {
    minify_code(source, &MinifyOptions::default()).unwrap()
}

const ARGUMENT_SOURCE: &str = "function bar(foo) {return foo + 'bar'};";

const REDUCE_SOURCE: &str = "
var a = 2;
(function () {
  console.log(a - 5);
  console.log(a - 1);
})();
";

const TOPLEVEL_SOURCE: &str = "
var a, b = 1, c = g;
function f(d) {
  return function() {
    c = 2;
  }
}
a = 2;
function g() {}
function h() {}
console.log(b = 3);
";

const KEEP_FNAMES_SOURCE: &str = "
(function() {
  function plus(a, b) { return a + b; };
  plus(1, 2);
})();
";

#[test]
fn test_output_is_shorter() {
    let source = "
        function hello(name) {
            var greeting = 'Hello, ' + name;
            if (name) {
                return greeting;
            } else {
                return 'nobody';
            }
        }
    ";
    let minified = compile_default(source);
    assert!(minified.len() < source.len());
    assert!(squeeze::parse(&minified, &Default::default()).is_ok());
}

#[test]
fn test_trailing_semicolon() {
    let minified = compile_default("(function id(i) {return i;}());");
    assert!(minified.ends_with(';'), "{}", minified);
}

#[test]
fn test_null_character_kept() {
    assert!(compile_default("var foo=\"\\0bar\"").contains("\\0bar"));
}

#[test]
fn test_argument_mangling() {
    assert!(!compile_default(ARGUMENT_SOURCE).contains("(foo)"));
    assert!(compile(ARGUMENT_SOURCE, r#"{"mangle": null}"#).contains("(foo)"));
    assert!(compile(ARGUMENT_SOURCE, r#"{"mangle": {"reserved": ["foo"]}}"#).contains("(foo)"));
    assert!(compile_default("function foo($super) {return $super}").contains("$super"));
}

#[test]
fn test_toplevel_mangling() {
    assert!(compile(ARGUMENT_SOURCE, r#"{"mangle": {"toplevel": false}}"#).contains("bar("));
    assert!(!compile(ARGUMENT_SOURCE, r#"{"mangle": {"toplevel": true}}"#).contains("bar("));
}

#[test]
fn test_compression_shortens() {
    let code = "function a(a){if(a) { return 0; } else { return 1; }}";
    let plain = compile(code, r#"{"compress": null}"#);
    let squeezed = compile_default(code);
    assert!(plain.len() > squeezed.len(), "{} vs {}", plain, squeezed);
}

#[test]
fn test_if_return_becomes_conditional() {
    let out = compile("function f(a){if(a)return 1;else return 2;}", r#"{"mangle": null}"#);
    assert_eq!(out, "function f(a){return a?1:2}");
}

#[test]
fn test_dead_code_after_return() {
    let out = compile("function f(){return 2;return 1;}", r#"{"mangle": null}"#);
    assert_eq!(out, "function f(){return 2}");
}

#[test]
fn test_max_line_len() {
    let code = "var foo = 123;function bar() { return foo; }";
    let out = compile(code, r#"{"output": {"max_line_len": 20}, "compress": null}"#);
    assert!(out.split('\n').all(|line| line.len() < 28), "{}", out);
}

#[test]
fn test_hoist_vars() {
    let code = "function something() { var a = foo(); a = bar(); var b = baz(); return a + b;}";
    let out = compile(code, r#"{"compress": {"hoist_vars": true}}"#);
    assert!(Regex::new(r"var \w,\w").unwrap().is_match(&out), "{}", out);
}

#[test]
fn test_reduce_vars() {
    let reduced = compile(REDUCE_SOURCE, r#"{"compress": {"reduce_vars": true, "toplevel": true}}"#);
    assert!(reduced.contains("console.log(-3)"), "{}", reduced);

    let kept = compile(REDUCE_SOURCE, r#"{"compress": {"reduce_vars": false, "toplevel": true}}"#);
    assert!(Regex::new(r"console.log\(\w+-5\)").unwrap().is_match(&kept), "{}", kept);
    assert_eq!(compile_default(REDUCE_SOURCE), kept);

    let assigned = compile(
        &format!("{}a=3", REDUCE_SOURCE),
        r#"{"mangle": null, "compress": {"reduce_vars": true}}"#,
    );
    assert!(Regex::new(r"console.log\(\w+-5\)").unwrap().is_match(&assigned), "{}", assigned);
}

#[test]
fn test_ie8_safe_property_access() {
    let code = "function something() { return g['switch']; }";
    assert!(compile_default(code).contains("g[\"switch\"]"));
    let options = MinifyOptions::default().screw_ie8();
    assert!(minify_code(code, &options).unwrap().contains("g.switch"));
}

#[test]
fn test_reserved_keys_quoted() {
    let out = compile_default("var code = {\"class\": \"\", plain: 1}");
    assert!(out.contains("\"class\""), "{}", out);
    assert!(out.contains("plain:1"), "{}", out);
}

#[test]
fn test_lone_surrogates_survive() {
    let out = compile_default("var s = '\\ud800', t = '\\udc00';");
    assert!(out.contains("\\ud800"), "{}", out);
    assert!(out.contains("\\udc00"), "{}", out);

    let length = compile("var n = '\\ud800a'.length;", r#"{"compress": {"unsafe": true}}"#);
    assert!(length.contains("=2"), "{}", length);
}

#[test]
fn test_output_flags() {
    let emoji = compile(
        "function emoji() { return '\\ud83c\\ude01'; }",
        r#"{"output": {"ascii_only": true}}"#,
    );
    assert!(emoji.contains("\\ud83c\\ude01"), "{}", emoji);

    let script = compile("function test() { return '</script>';}", r#"{"output": {"inline_script": true}}"#);
    assert!(!script.contains("</script>"), "{}", script);

    let keys = compile("var a = {foo: 1}", r#"{"output": {"quote_keys": true}}"#);
    assert!(keys.contains("\"foo\""), "{}", keys);
}

#[test]
fn test_defines() {
    let code = "if (BOOL) { var a = STR; var b = NULL; var c = NUM; }";
    let out = compile(
        code,
        r#"{"compress": {"global_defs": {"NUM": 1234, "BOOL": true, "NULL": null, "STR": "str"}}}"#,
    );
    assert!(out.contains("a=\"str\""), "{}", out);
    assert!(!out.contains("if"), "{}", out);
    assert!(out.contains("b=null"), "{}", out);
    assert!(out.contains("c=1234"), "{}", out);
}

#[test]
fn test_iife_negation() {
    let code = "(function() { console.log('test')})();";
    assert!(!compile(code, r#"{"compress": {"negate_iife": false}}"#).contains('!'));
    assert!(compile(code, r#"{"compress": {"negate_iife": true}}"#).contains('!'));
}

#[test]
fn test_wrap_iife() {
    let code = "
        (function() {
          return function() {
            console.log('test')
          };
        })()();
    ";
    assert_eq!(
        compile_default(code),
        "!function(){return function(){console.log(\"test\")}}()();"
    );
    assert_eq!(
        compile(code, r#"{"output": {"wrap_iife": true}}"#),
        "(function(){return function(){console.log(\"test\")}})()();"
    );
}

#[test]
fn test_drop_console() {
    let code = "(function() { console.log('test')})();";
    assert!(!compile(code, r#"{"compress": {"drop_console": true}}"#).contains("console"));
}

#[test]
fn test_collapse_vars() {
    let code = "
        function a() {
          var win = window;
          return win.Handlebars;
        }
    ";
    assert!(compile(code, r#"{"compress": {"collapse_vars": true}}"#).contains("return window.Handlebars"));
    assert!(!compile(code, r#"{"compress": {"collapse_vars": false}}"#).contains("return window.Handlebars"));
    assert!(compile_default(code).contains("return window.Handlebars"));
}

#[test]
fn test_keep_fargs() {
    let code = "function plus(a, b, c) { return a + b};\nplus(1, 2);";
    let options = |keep_fargs: bool| {
        format!(
            r#"{{"mangle": null, "compress": {{"keep_fargs": {}, "unsafe": true}}}}"#,
            keep_fargs
        )
    };
    assert!(!compile(code, &options(false)).contains("c)"));
    assert!(compile(code, &options(true)).contains("c)"));
}

#[test]
fn test_keep_fnames() {
    assert!(!compile_default(KEEP_FNAMES_SOURCE).contains("plus"));

    let compress_only = compile(KEEP_FNAMES_SOURCE, r#"{"mangle": null, "compress": {"keep_fnames": true}}"#);
    assert!(compress_only.contains("plus"), "{}", compress_only);

    let mangle_only = compile(KEEP_FNAMES_SOURCE, r#"{"mangle": {"keep_fnames": true}}"#);
    assert!(mangle_only.contains("plus"), "{}", mangle_only);

    let both = minify_code(KEEP_FNAMES_SOURCE, &MinifyOptions::default().keep_fnames()).unwrap();
    assert!(both.contains("plus"), "{}", both);
}

#[test]
fn test_enclose() {
    let out = compile("$.foo()", r#"{"enclose": {"window.jQuery": "$"}}"#);
    assert!(out.contains("window.jQuery"), "{}", out);

    let out = compile("$.foo()", r#"{"enclose": {"lol": "lulz", "foo": "bar"}}"#);
    assert!(out.contains("lol,foo"), "{}", out);
    assert!(out.contains("lulz,bar"), "{}", out);

    let out = compile("$.foo()", r#"{"enclose": {}}"#);
    assert!(out.contains("function("), "{}", out);
}

#[test]
fn test_unused_toplevel() {
    let removed = compile(TOPLEVEL_SOURCE, r#"{"mangle": null, "compress": {"toplevel": true}}"#);
    assert!(!removed.contains("function h()"), "{}", removed);
    assert!(!removed.contains("var a"), "{}", removed);

    let kept = compile(TOPLEVEL_SOURCE, r#"{"mangle": null}"#);
    assert!(kept.contains("var a"), "{}", kept);
    assert!(kept.contains("function h()"), "{}", kept);

    let retained = compile(
        TOPLEVEL_SOURCE,
        r#"{"mangle": null, "compress": {"toplevel": true, "top_retain": ["a", "h"]}}"#,
    );
    assert!(retained.contains("var a"), "{}", retained);
    assert!(retained.contains("function h()"), "{}", retained);
    assert!(!retained.contains("function g"), "{}", retained);
}

#[test]
fn test_unsafe_comps() {
    let code = "
        var obj1 = {
            valueOf: function() {triggeredFirst();}
        }
        var obj2 = 2;
        var result1 = obj1 <= obj2;
    ";
    let safe = compile(
        code,
        r#"{"mangle": null, "compress": {"comparisons": true, "reduce_vars": false, "collapse_vars": false}}"#,
    );
    assert!(safe.contains("result1=obj1<=obj2"), "{}", safe);
    let unsafe_ = compile(
        code,
        r#"{"mangle": null, "compress": {"comparisons": true, "reduce_vars": false, "collapse_vars": false, "unsafe_comps": true}}"#,
    );
    assert!(unsafe_.contains("result1=obj2>=obj1"), "{}", unsafe_);
}

#[test]
fn test_unsafe_proto() {
    let code = "Array.prototype.slice.call([1,2,3], 1)";
    assert!(compile_default(code).contains("Array.prototype.slice.call"));
    assert!(compile(code, r#"{"compress": {"unsafe_proto": true}}"#).contains("[].slice.call"));
}

#[test]
fn test_passes() {
    let code = "
        function f(x) {
            var unused = 1;
            var y = x;
            if (y) { return y.a; } else { return y.b; }
        }
    ";
    let one = compile(code, r#"{"mangle": null, "compress": {"passes": 1}}"#);
    let two = compile(code, r#"{"mangle": null, "compress": {"passes": 2}}"#);
    assert!(two.len() <= one.len(), "{} vs {}", two, one);
}

#[test]
fn test_no_map_without_options() {
    let output = minify("var a = 1;", &MinifyOptions::default()).unwrap();
    assert!(output.map.is_none());
    assert_eq!(output.code, "var a=1;");
}

#[test]
fn test_var_inside_catch_assigns_the_exception() {
    for source in [
        "E.f=function(){try{a()}catch(e){var e=2;return b(e)}}",
        "try{a()}catch(e){var e=2;b(e)}",
    ] {
        let out = compile_default(source);
        assert!(out.contains("=2") || out.contains("b(2)"), "{}", out);
    }
}

#[test]
fn test_sequence_callees_keep_their_this() {
    assert_eq!(compile_default("y = (0, a.b)();"), "y=(0,a.b)();");
    let out = compile_default("function f(s){return (0,eval)(s)}");
    assert!(out.contains("(0,eval)("), "{}", out);
}
