//! Comment retention policies

use squeeze::{minify_code, CommentPolicy, MinifyOptions};

const SOURCE: &str = "
/* @preserve Copyright Notice */
/* (c) 2011 */
// INCLUDED
//! BANG
function identity(p) { return p; }
/* Another Copyright */
/*! Another Bang */
// A comment!
function add(a, b) { return a + b; }
";

fn compile(policy: CommentPolicy) -> String {
    let mut options = MinifyOptions::default();
    options.output.comments = policy;
    minify_code(SOURCE, &options).unwrap()
}

#[test]
fn test_copyright_policy() {
    let out = compile(CommentPolicy::Copyright);
    assert!(out.contains("Copyright Notice"), "{}", out);
    assert!(out.contains("Another Copyright"), "{}", out);
    assert!(out.contains("! BANG"), "{}", out);
    assert!(out.contains("! Another Bang"), "{}", out);
    assert!(!out.contains("INCLUDED"), "{}", out);
    assert!(!out.contains("A comment!"), "{}", out);
}

#[test]
fn test_copyright_is_default() {
    assert_eq!(minify_code(SOURCE, &MinifyOptions::default()).unwrap(), compile(CommentPolicy::Copyright));
}

#[test]
fn test_jsdoc_policy() {
    let out = compile(CommentPolicy::Jsdoc);
    assert!(out.contains("Copyright Notice"), "{}", out);
    assert!(!out.contains("Another Copyright"), "{}", out);
}

#[test]
fn test_all_policy() {
    let out = compile(CommentPolicy::All);
    assert!(out.contains("INCLUDED"), "{}", out);
    assert!(out.contains("2011"), "{}", out);
    assert!(out.contains("A comment!"), "{}", out);
}

#[test]
fn test_none_policy() {
    let out = compile(CommentPolicy::None);
    assert!(!out.contains("//"), "{}", out);
    assert!(!out.contains("/*"), "{}", out);
    assert!(!out.contains("Copyright"), "{}", out);
}

#[test]
fn test_regex_policy() {
    let out = compile(CommentPolicy::Regex("(?i)included".into()));
    assert!(out.contains("INCLUDED"), "{}", out);
    assert!(!out.contains("2011"), "{}", out);
}

#[test]
fn test_regex_policy_from_json() {
    let options = MinifyOptions::from_json(r#"{"output": {"comments": {"regex": "(?i)included"}}}"#).unwrap();
    assert_eq!(minify_code(SOURCE, &options).unwrap(), compile(CommentPolicy::Regex("(?i)included".into())));
}
