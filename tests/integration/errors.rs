//! Failures surface as `MinifyError` with a position

use squeeze::util::span::SourceFile;
use squeeze::{minify, ErrorPresenter, MinifyError, MinifyOptions, SourceMapOptions};

#[test]
fn test_syntax_error() {
    let err = minify(")(", &MinifyOptions::default()).unwrap_err();
    assert!(matches!(err, MinifyError::Parse(_)));
    let position = err.position().unwrap();
    assert_eq!((position.line, position.column), (1, 0));
}

#[test]
fn test_newer_syntax_is_flagged() {
    let err = minify("const foo = () => bar();", &MinifyOptions::default().without_compress()).unwrap_err();
    assert!(err.is_unsupported(), "{}", err);
}

#[test]
fn test_undefined_label() {
    let err = minify("while (a) { break nowhere; }", &MinifyOptions::default()).unwrap_err();
    assert!(err.to_string().contains("nowhere"), "{}", err);
    assert!(err.position().is_some());
}

#[test]
fn test_invalid_options() {
    let mut options = MinifyOptions::default();
    options.output.comments = squeeze::CommentPolicy::Regex("(".into());
    let err = minify("a();", &options).unwrap_err();
    assert!(matches!(err, MinifyError::Config(_)));
    assert!(err.position().is_none());
}

#[test]
fn test_invalid_input_map() {
    let options = MinifyOptions::default().with_source_map(SourceMapOptions {
        input_map: Some("{\"version\": 2}".into()),
        ..SourceMapOptions::default()
    });
    let err = minify("a();", &options).unwrap_err();
    assert!(matches!(err, MinifyError::SourceMap(_)));
}

#[test]
fn test_report_shows_context() {
    let source = "var a = 1;\nvar b = ;\nvar c = 3;";
    let err = minify(source, &MinifyOptions::default()).unwrap_err();
    let report = ErrorPresenter::default().render(&err, &SourceFile::new("input.js".into(), source.into()));
    assert!(report.lines().next().unwrap().contains("(2:"), "{}", report);
    assert!(report.contains("=> 2 var b = ;"), "{}", report);
    assert!(report.contains("   1 var a = 1;"), "{}", report);
}
