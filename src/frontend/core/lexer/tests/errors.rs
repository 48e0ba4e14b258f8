//! Error handling tests

use crate::frontend::core::lexer::{tokenize, LexError};

#[cfg(test)]
mod lexer_error_tests {
    use super::*;

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\"hello").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_newline_in_string() {
        let err = tokenize("'a\nb'").unwrap_err();
        assert!(matches!(err, LexError::Malformed { .. }));
        assert_eq!(err.position().line, 1);
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("a /* never closed").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedEof { .. }));
        assert_eq!(err.position().column, 2);
    }

    #[test]
    fn test_unterminated_regexp() {
        assert!(tokenize("x = /abc").is_err());
        assert!(matches!(tokenize("x = /ab\nc/").unwrap_err(), LexError::Malformed { .. }));
    }

    #[test]
    fn test_invalid_number() {
        let err = tokenize("var n = 1e;").unwrap_err();
        assert!(err.to_string().contains("Invalid syntax: 1e"));
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("a @ b").unwrap_err();
        assert!(matches!(err, LexError::Malformed { .. }));
        assert_eq!(err.position().column, 2);
    }

    #[test]
    fn test_unsupported_constructs() {
        for source in ["var f = x => x;", "var s = `t`;", "f(...args)"] {
            let err = tokenize(source).unwrap_err();
            assert!(err.is_unsupported(), "{} should be unsupported", source);
        }
    }

    #[test]
    fn test_bad_identifier_escape() {
        assert!(tokenize(r"a\x41").is_err());
        assert!(tokenize(r"a\ud800").is_err());
    }
}
