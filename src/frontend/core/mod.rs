//! Tokenizer and parser for the ECMAScript 5 grammar

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, LexError};
pub use parser::{parse, parse_expression, ParseError, Program};
