//! Frontend: options, tokenizer and parser
//!
//! The frontend turns source text into a [`core::parser::ast::Program`].
//! Scopes are left empty; [`crate::middle::scope`] fills them in.

pub mod config;
pub mod core;

pub use config::{
    CommentPolicy, CompressOptions, ConfigError, MangleOptions, MinifyOptions, OutputOptions, ParseOptions,
    PropertyMangleOptions, SourceMapOptions,
};
pub use self::core::parser::{parse, parse_expression, ParseError};
