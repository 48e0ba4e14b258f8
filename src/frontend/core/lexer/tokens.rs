//! Token definitions and lexer errors

use crate::util::span::{Position, Span};
use std::fmt;

/// Lexer errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    /// Malformed input, such as a bad escape or an invalid number
    #[error("{message}")]
    Malformed { message: String, position: Position },
    /// Input ended inside a token
    #[error("Unexpected end of input: {message}")]
    UnexpectedEof { message: String, position: Position },
    /// Syntax from a later grammar revision
    #[error("Unsupported syntax: {message}")]
    Unsupported { message: String, position: Position },
}

impl LexError {
    /// Where the error was detected
    pub fn position(&self) -> Position {
        match self {
            LexError::Malformed { position, .. }
            | LexError::UnexpectedEof { position, .. }
            | LexError::Unsupported { position, .. } => *position,
        }
    }

    /// Whether the input used a construct outside the ES5 grammar
    pub fn is_unsupported(&self) -> bool {
        matches!(self, LexError::Unsupported { .. })
    }
}

/// Token kind
///
/// Keywords, atoms and operators are interned as static strings, so they can
/// be matched directly: `TokenKind::Keyword("return")`.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal
    Num(f64),
    /// String literal, escapes already decoded
    Str(String),
    /// Regular expression literal
    Regexp { pattern: String, flags: String },
    /// Identifier (also used for escaped keywords)
    Name(String),
    /// Reserved keyword such as `function` or `return`
    Keyword(&'static str),
    /// `true`, `false` or `null`
    Atom(&'static str),
    /// Operator, including the word operators `in`, `typeof`, `new` ...
    Operator(&'static str),
    /// Punctuation: `[ ] { } ( ) , ; : .`
    Punc(char),
    /// End of input
    Eof,
}

impl TokenKind {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Num(n) => format!("num ({})", n),
            TokenKind::Str(s) => format!("string ({})", s),
            TokenKind::Regexp { pattern, flags } => format!("regexp (/{}/{})", pattern, flags),
            TokenKind::Name(n) => format!("name ({})", n),
            TokenKind::Keyword(k) => format!("keyword ({})", k),
            TokenKind::Atom(a) => format!("atom ({})", a),
            TokenKind::Operator(o) => format!("operator ({})", o),
            TokenKind::Punc(c) => format!("punc ({})", c),
            TokenKind::Eof => "eof".to_string(),
        }
    }

    /// Identifier-like text usable as a property name after `.`
    pub fn word(&self) -> Option<&str> {
        match self {
            TokenKind::Name(n) => Some(n),
            TokenKind::Keyword(k) | TokenKind::Atom(k) => Some(k),
            TokenKind::Operator(o) if o.chars().all(|c| c.is_ascii_alphabetic()) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Comment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A comment retained from the source
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text between the delimiters
    pub value: String,
    pub span: Span,
    /// Whether a line terminator preceded the comment
    pub nlb: bool,
}

impl Comment {
    /// Source text of the comment, delimiters included
    pub fn text(&self) -> String {
        match self.kind {
            CommentKind::Line => format!("//{}", self.value),
            CommentKind::Block => format!("/*{}*/", self.value),
        }
    }
}

/// Token with location information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appeared between the previous token and this one
    pub nlb: bool,
    /// Comments between the previous token and this one
    pub comments_before: Vec<Comment>,
}

impl Token {
    pub fn is_punc(
        &self,
        c: char,
    ) -> bool {
        self.kind == TokenKind::Punc(c)
    }

    pub fn is_operator(
        &self,
        op: &str,
    ) -> bool {
        matches!(self.kind, TokenKind::Operator(o) if o == op)
    }

    pub fn is_keyword(
        &self,
        kw: &str,
    ) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == kw)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
