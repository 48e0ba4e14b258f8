//! Code generator tests

use crate::backends::output::{generate, generate_with_mappings};
use crate::frontend::config::{CommentPolicy, OutputOptions, ParseOptions};
use crate::frontend::core::parser::parse;

fn print(source: &str) -> String {
    print_with(source, &OutputOptions::default())
}

fn print_with(
    source: &str,
    options: &OutputOptions,
) -> String {
    let program = parse(source, &ParseOptions::default()).unwrap();
    generate(&program, options)
}

#[test]
fn test_compact_statements() {
    assert_eq!(print("var a = 1, b;\nfoo(a, b);"), "var a=1,b;foo(a,b);");
    assert_eq!(print("function f(x) { return x + 1; }"), "function f(x){return x+1}");
    assert_eq!(print("if (a) { b(); } else { c(); }"), "if(a){b()}else{c()}");
    assert_eq!(print("for (;;) {}"), "for(;;){}");
    assert_eq!(print("for (var i = 0; i < n; i++) x();"), "for(var i=0;i<n;i++)x();");
    assert_eq!(print("while (x) ;"), "while(x);");
    assert_eq!(print("do x(); while (y)"), "do{x()}while(y);");
}

#[test]
fn test_trailing_semicolon_flushed() {
    assert_eq!(print("a()"), "a();");
    assert_eq!(print("function f() {}"), "function f(){}");
}

#[test]
fn test_required_spaces() {
    assert_eq!(print("a + +b"), "a+ +b;");
    assert_eq!(print("a - -b"), "a- -b;");
    assert_eq!(print("a - --b"), "a- --b;");
    assert_eq!(print("typeof x"), "typeof x;");
    assert_eq!(print("return_ = typeof \"x\""), "return_=typeof\"x\";");
    assert_eq!(print("x = a in b"), "x=a in b;");
    assert_eq!(print("a-- > b"), "a-- >b;");
    assert_eq!(print("a < !--b"), "a< !--b;");
}

#[test]
fn test_statement_leading_parens() {
    assert_eq!(print("(function () {})()"), "(function(){})();");
    assert_eq!(print("({}).toString()"), "({}).toString();");
    assert_eq!(print("({a: 1})"), "({a:1});");
    assert_eq!(print("x = function () {}()"), "x=function(){}();");
}

#[test]
fn test_precedence_parens() {
    assert_eq!(print("(a + b) * c"), "(a+b)*c;");
    assert_eq!(print("a + (b + c)"), "a+(b+c);");
    assert_eq!(print("(a, b) ? c : d"), "(a,b)?c:d;");
    assert_eq!(print("f((a, b))"), "f((a,b));");
    assert_eq!(print("(a = b).c"), "(a=b).c;");
    assert_eq!(print("(!a).b"), "(!a).b;");
    assert_eq!(print("a ? b : (c, d)"), "a?b:(c,d);");
}

#[test]
fn test_new_expressions() {
    assert_eq!(print("new Foo()"), "new Foo;");
    assert_eq!(print("new Foo(1)"), "new Foo(1);");
    assert_eq!(print("(new Date).getTime()"), "(new Date).getTime();");
    assert_eq!(print("new (a().b)()"), "new(a().b);");
    assert_eq!(print("new (foo())"), "new(foo());");
}

#[test]
fn test_for_in_head() {
    assert_eq!(print("for (var k in o) f(k);"), "for(var k in o)f(k);");
    assert_eq!(print("for (x = (a in b); x;) ;"), "for((x=a in b);x;);");
}

#[test]
fn test_number_literals() {
    assert_eq!(print("x = 1000"), "x=1e3;");
    assert_eq!(print("x = 0.5"), "x=.5;");
    assert_eq!(print("x = 0xff"), "x=255;");
    assert_eq!(print("1..toString()"), "1..toString();");
    assert_eq!(print("1.5.toFixed()"), "1.5.toFixed();");
}

#[test]
fn test_dangling_else() {
    assert_eq!(print("if (a) { if (b) c(); } else d();"), "if(a){if(b)c()}else d();");
    assert_eq!(print("if (a) b(); else if (c) d(); else e();"), "if(a)b();else if(c)d();else e();");
}

#[test]
fn test_object_keys() {
    assert_eq!(print("x = {a: 1, 'b-c': 2, 3: 4, \"d\": 5}"), "x={a:1,\"b-c\":2,3:4,d:5};");
    assert_eq!(print("x = {'class': 1}"), "x={\"class\":1};");
    assert_eq!(print("x = {get a() { return 1; }, set a(v) {}}"), "x={get a(){return 1},set a(v){}};");
}

#[test]
fn test_reserved_property_access() {
    assert_eq!(print("a['switch']"), "a[\"switch\"];");
    let options = OutputOptions {
        screw_ie8: true,
        ..OutputOptions::default()
    };
    assert_eq!(print_with("a.b", &options), "a.b;");
}

#[test]
fn test_escaped_keyword_identifiers() {
    let out = print("var \\u0061bc = 1; x = \\u0069f; \\u0069n: for (;;) break \\u0069n;");
    assert_eq!(out, "var abc=1;x=\\u0069f;\\u0069n:for(;;)break \\u0069n;");
    assert!(parse(&out, &ParseOptions::default()).is_ok());
}

#[test]
fn test_array_holes() {
    assert_eq!(print("x = [1,,2,]"), "x=[1,,2];");
    assert_eq!(print("x = [1,,]"), "x=[1,,];");
}

#[test]
fn test_switch_and_try() {
    assert_eq!(
        print("switch (x) { case 1: a(); break; default: b(); }"),
        "switch(x){case 1:a();break;default:b()}"
    );
    assert_eq!(
        print("try { a(); } catch (e) { b(e); } finally { c(); }"),
        "try{a()}catch(e){b(e)}finally{c()}"
    );
}

#[test]
fn test_directives() {
    assert_eq!(print("'use strict'; x();"), "\"use strict\";x();");
    assert_eq!(print("function f() { 'use strict'; }"), "function f(){\"use strict\"}");
}

#[test]
fn test_beautify() {
    let options = OutputOptions {
        beautify: true,
        ..OutputOptions::default()
    };
    let code = print_with("function f(a){if(a){return 1}return 2}", &options);
    assert_eq!(
        code,
        "function f(a) {\n    if (a) {\n        return 1;\n    }\n    return 2;\n}"
    );
}

#[test]
fn test_bracketize() {
    let options = OutputOptions {
        bracketize: true,
        ..OutputOptions::default()
    };
    assert_eq!(print_with("if (a) b();", &options), "if(a){b()}");
}

#[test]
fn test_wrap_iife() {
    let options = OutputOptions {
        wrap_iife: true,
        ..OutputOptions::default()
    };
    assert_eq!(print_with("x = function () {}()", &options), "x=(function(){})();");
}

#[test]
fn test_comment_policies() {
    let source = "/*! keep */\n// drop\nfunction f() {}";
    assert_eq!(print(source), "/*! keep */\nfunction f(){}");

    let all = OutputOptions {
        comments: CommentPolicy::All,
        ..OutputOptions::default()
    };
    assert_eq!(print_with(source, &all), "/*! keep */\n// drop\nfunction f(){}");

    let none = OutputOptions {
        comments: CommentPolicy::None,
        ..OutputOptions::default()
    };
    assert_eq!(print_with(source, &none), "function f(){}");
}

#[test]
fn test_semicolons_off() {
    let options = OutputOptions {
        semicolons: false,
        ..OutputOptions::default()
    };
    assert_eq!(
        print_with("a(); b(); (function () {})()", &options),
        "a()\nb();(function(){})()\n"
    );
}

#[test]
fn test_max_line_len() {
    let options = OutputOptions {
        max_line_len: 20,
        ..OutputOptions::default()
    };
    let code = print_with("var foo = 123; function bar() { return foo; }", &options);
    assert!(code.lines().count() > 1);
    assert!(code.lines().all(|line| line.len() < 28), "{}", code);
}

#[test]
fn test_mappings_point_at_identifiers() {
    let program = parse("var answer = 42;", &ParseOptions::default()).unwrap();
    let (code, mappings) = generate_with_mappings(&program, &OutputOptions::default());
    assert_eq!(code, "var answer=42;");
    let named: Vec<_> = mappings.iter().filter(|m| m.name.is_some()).collect();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].gen_col, 4);
    assert_eq!(named[0].original.column, 4);
}
