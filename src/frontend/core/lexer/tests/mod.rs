//! Lexer tests module
//!
//! Organized test modules:
//! - basic: names, keywords, whitespace and newline tracking
//! - literals: numbers, strings and regular expressions
//! - operators: operators and punctuation
//! - comments: comment retention and attachment
//! - errors: malformed and unsupported input

mod errors;
mod operators;
