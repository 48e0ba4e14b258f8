//! Operator and punctuation tests

use crate::frontend::core::lexer::{tokenize, TokenKind};

#[cfg(test)]
mod lexer_operator_tests {
    use super::*;

    fn ops(source: &str) -> Vec<TokenKind> {
        let mut tokens: Vec<_> = tokenize(source).unwrap().into_iter().map(|t| t.kind).collect();
        tokens.pop();
        tokens
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(
            ops(">>>= === !== >>> ++ --"),
            vec![
                TokenKind::Operator(">>>="),
                TokenKind::Operator("==="),
                TokenKind::Operator("!=="),
                TokenKind::Operator(">>>"),
                TokenKind::Operator("++"),
                TokenKind::Operator("--"),
            ]
        );
    }

    #[test]
    fn test_adjacent_operators() {
        assert_eq!(
            ops("a+++b"),
            vec![
                TokenKind::Name("a".into()),
                TokenKind::Operator("++"),
                TokenKind::Operator("+"),
                TokenKind::Name("b".into()),
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            ops("[]{}(),;:."),
            "[]{}(),;:.".chars().map(TokenKind::Punc).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_conditional_operator() {
        let kinds = ops("a?b:c");
        assert_eq!(kinds[1], TokenKind::Operator("?"));
        assert_eq!(kinds[3], TokenKind::Punc(':'));
    }
}
