//! Property tests over generated programs

use proptest::prelude::*;
use squeeze::{generate, minify_code, parse, MinifyOptions, OutputOptions, ParseOptions};

/// Identifiers that can never collide with a keyword
fn identifier_strategy() -> impl Strategy<Value = String> {
    "v_[a-z]{1,6}"
}

fn literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[1-9][0-9]{0,4}",
        "(0|[1-9][0-9]{0,2})\\.[0-9]{1,3}",
        "'[a-z ]{0,8}'",
        Just("true".to_string()),
        Just("null".to_string()),
    ]
}

fn bin_op_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("<"),
        Just("==="),
        Just("!=="),
        Just("&&"),
        Just("||"),
    ]
}

fn expr_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![identifier_strategy(), literal_strategy()];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), bin_op_strategy(), inner.clone()).prop_map(|(l, op, r)| format!("({} {} {})", l, op, r)),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(t, c, a)| format!("({} ? {} : {})", t, c, a)),
            inner.clone().prop_map(|e| format!("!{}", e)),
            (identifier_strategy(), inner.clone()).prop_map(|(f, a)| format!("{}({})", f, a)),
        ]
    })
}

/// A function with locals, a branch and a loop around generated expressions
fn program_strategy() -> impl Strategy<Value = String> {
    (
        identifier_strategy(),
        identifier_strategy(),
        expr_strategy(),
        expr_strategy(),
        expr_strategy(),
    )
        .prop_map(|(param, local, test, cons, alt)| {
            format!(
                "function run({param}) {{\n  var {local} = {cons};\n  if ({test}) {{ return {local} + {param}; }} else {{ {local} = {alt}; }}\n  for (var i = 0; i < 3; i++) {{ {local} = {local} + i; }}\n  return {local};\n}}\nrun(1);",
                param = param,
                local = local,
                test = test,
                cons = cons,
                alt = alt,
            )
        })
}

fn print_plain(source: &str) -> String {
    let program = parse(source, &ParseOptions::default()).unwrap();
    generate(&program, &OutputOptions::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_minified_output_parses(source in program_strategy()) {
        let minified = minify_code(&source, &MinifyOptions::default()).unwrap();
        prop_assert!(parse(&minified, &ParseOptions::default()).is_ok(), "{}", minified);
    }

    #[test]
    fn test_minified_output_not_longer(source in program_strategy()) {
        let minified = minify_code(&source, &MinifyOptions::default()).unwrap();
        let plain = print_plain(&source);
        prop_assert!(minified.len() <= plain.len(), "{} longer than {}", minified, plain);
    }

    #[test]
    fn test_compression_is_stable(source in program_strategy()) {
        let options = MinifyOptions::default().without_mangle();
        let once = minify_code(&source, &options).unwrap();
        let twice = minify_code(&once, &options).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn test_expressions_print_stably(expr in expr_strategy()) {
        let source = format!("x = {};", expr);
        let once = print_plain(&source);
        prop_assert_eq!(print_plain(&once), once);
    }
}
