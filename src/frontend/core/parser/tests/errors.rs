//! Rejected input

use super::*;

#[test]
fn test_unexpected_token_position() {
    let err = parse_err("var a = 1;\nvar b = ;");
    assert!(matches!(err, ParseError::UnexpectedToken { .. }), "{:?}", err);
    let position = err.position();
    assert_eq!((position.line, position.column), (2, 8));
}

#[test]
fn test_missing_semicolon_on_same_line() {
    assert!(matches!(parse_err("a = 1 b = 2"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_invalid_assignment_target() {
    assert!(matches!(parse_err("1 = a;"), ParseError::InvalidAssignment { .. }));
    assert!(matches!(parse_err("a() = 1;"), ParseError::InvalidAssignment { .. }));
    assert!(matches!(parse_err("++a();"), ParseError::InvalidAssignment { .. }));
}

#[test]
fn test_labels() {
    assert!(matches!(
        parse_err("while (a) { break nowhere; }"),
        ParseError::UndefinedLabel { name, .. } if name == "nowhere"
    ));
    assert!(matches!(
        parse_err("a: a: for (;;) {}"),
        ParseError::DuplicateLabel { name, .. } if name == "a"
    ));
    // a label may be reused once its statement ends
    parse_ok("a: for (;;) break a; a: for (;;) break a;");
}

#[test]
fn test_jumps_outside_loops() {
    assert!(matches!(parse_err("break;"), ParseError::Invalid { .. }));
    assert!(matches!(parse_err("switch (a) { case 1: continue; }"), ParseError::Invalid { .. }));
    assert!(matches!(parse_err("for (;;) { (function () { break; }); }"), ParseError::Invalid { .. }));
    parse_ok("switch (a) { case 1: break; }");
}

#[test]
fn test_return_outside_function() {
    match parse_err("return;") {
        ParseError::Invalid { message, .. } => assert!(message.contains("return"), "{}", message),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_newline_after_throw() {
    assert!(matches!(parse_err("throw\nerr;"), ParseError::Invalid { .. }));
}

#[test]
fn test_unsupported_syntax() {
    let sources = [
        "var f = (a) => a;",
        "x = () => 1;",
        "f(() => {});",
        "var s = `template`;",
        "var o = { a };",
        "var o = { [k]: 1 };",
        "var o = { m() {} };",
        "class A {}",
        "function* g() {}",
        "function f(a = 1) {}",
        "f(...args);",
    ];
    for source in sources {
        let err = parse_err(source);
        assert!(err.is_unsupported(), "{} gave {:?}", source, err);
    }
}

#[test]
fn test_plain_errors_are_not_unsupported() {
    assert!(!parse_err(")(").is_unsupported());
    assert!(!parse_err("var = 1;").is_unsupported());
    assert!(!parse_err("x = ();").is_unsupported());
}
