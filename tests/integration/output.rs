//! Printed code must parse back to a program that prints the same way

use squeeze::{generate, minify_code, parse, MinifyOptions, OutputOptions, ParseOptions};

const SNIPPETS: &[&str] = &[
    "var a = 1, b = 'two', c = /re[g]ex/gi;",
    "a = b ? c : d ? e : f;",
    "x = (a, b), y = -(-z), w = +(+v), u = - --t;",
    "new (foo())(); new foo.bar(); new (foo.bar()); (new foo).bar;",
    "for (var i = 0, n = ('x' in o); i < n; i++) continue;",
    "for (var k in o) if (o.hasOwnProperty(k)) delete o[k];",
    "label: for (;;) { break label; }",
    "switch (a) { case 1: b(); break; default: c(); }",
    "try { a(); } catch (e) { b(e); } finally { c(); }",
    "do x++; while (x < 10);",
    "if (a) { if (b) c(); } else d();",
    "var o = { get a() { return 1; }, set a(v) {}, 'b-c': 2, 3: 4, if: 5 };",
    "(function () { 'use strict'; return this; })();",
    "a = 1e21 + 0.5 + 1000000 + 0x10 + .25;",
    "a = typeof b === 'undefined' && void 0 === c;",
    "a = [1, , 2, ,];",
    "a = b in c, d = e instanceof F;",
    "throw new Error('x');",
    "with (o) { p = q; }",
    "a = '\\u2028' + \"it's\" + '\"quoted\"';",
];

fn reprint(
    source: &str,
    options: &OutputOptions,
) -> String {
    let program = parse(source, &ParseOptions::default()).unwrap();
    generate(&program, options)
}

#[test]
fn test_printing_is_stable() {
    let options = OutputOptions::default();
    for snippet in SNIPPETS {
        let once = reprint(snippet, &options);
        let twice = reprint(&once, &options);
        assert_eq!(once, twice, "unstable output for {}", snippet);
    }
}

#[test]
fn test_beautified_output_reparses() {
    let options = OutputOptions {
        beautify: true,
        ..OutputOptions::default()
    };
    for snippet in SNIPPETS {
        let pretty = reprint(snippet, &options);
        let compact = reprint(&pretty, &OutputOptions::default());
        assert_eq!(compact, reprint(snippet, &OutputOptions::default()), "{}", pretty);
    }
}

#[test]
fn test_minified_output_reparses() {
    let options = MinifyOptions::default();
    for snippet in SNIPPETS {
        let minified = minify_code(snippet, &options).unwrap();
        assert!(parse(&minified, &ParseOptions::default()).is_ok(), "{} -> {}", snippet, minified);
    }
}

#[test]
fn test_minification_reaches_fixed_point() {
    let options = MinifyOptions::default().without_mangle();
    for snippet in SNIPPETS {
        let once = minify_code(snippet, &options).unwrap();
        let twice = minify_code(&once, &options).unwrap();
        assert!(twice.len() <= once.len(), "{} grew to {}", once, twice);
    }
}
