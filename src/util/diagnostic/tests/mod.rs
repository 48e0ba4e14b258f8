//! Error presenter tests

use crate::frontend::config::ParseOptions;
use crate::frontend::core::parser::parse;
use crate::util::diagnostic::{ErrorPresenter, MinifyError, UNSUPPORTED_HINT};
use crate::util::span::SourceFile;

fn parse_error(source: &str) -> MinifyError {
    parse(source, &ParseOptions::default()).unwrap_err().into()
}

fn source_file(source: &str) -> SourceFile {
    SourceFile::new("input.js".into(), source.into())
}

#[test]
fn test_header_carries_position() {
    let source = "function f() {\n  return );\n}";
    let error = parse_error(source);
    let position = error.position().unwrap();
    assert_eq!(position.line, 2);

    let report = ErrorPresenter::default().render(&error, &source_file(source));
    let header = report.lines().next().unwrap();
    assert!(header.ends_with(&format!("({}:{})", position.line, position.column)), "{}", header);
}

#[test]
fn test_context_marks_offending_line() {
    let source = "a();\nb();\nc(;\nd();\ne();";
    let error = parse_error(source);
    let report = ErrorPresenter::default().with_context_lines(1).render(&error, &source_file(source));
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[1], "   2 b();");
    assert_eq!(lines[2], "=> 3 c(;");
    assert_eq!(lines[3], "   4 d();");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_context_can_be_disabled() {
    let source = "var = 1;";
    let error = parse_error(source);
    let report = ErrorPresenter::default().with_context_lines(0).render(&error, &source_file(source));
    assert_eq!(report.lines().count(), 1);
}

#[test]
fn test_unsupported_syntax_hint() {
    let source = "var f = x => x;";
    let error = parse_error(source);
    assert!(error.is_unsupported());
    let report = ErrorPresenter::default().render(&error, &source_file(source));
    assert!(report.contains(UNSUPPORTED_HINT));

    let plain = parse_error("var = 1;");
    assert!(!plain.is_unsupported());
}

#[test]
fn test_colored_output() {
    let source = "c(;";
    let error = parse_error(source);
    let report = ErrorPresenter::default().with_colors(true).render(&error, &source_file(source));
    assert!(report.contains("\u{1b}["));
}
