//! Aggregate error of the minification pipeline

use thiserror::Error;

use crate::backends::sourcemap::SourceMapError;
use crate::frontend::config::ConfigError;
use crate::frontend::core::lexer::LexError;
use crate::frontend::core::parser::ParseError;
use crate::middle::scope::ScopeError;
use crate::util::span::Position;

/// Anything [`crate::minify`] can fail with
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    SourceMap(#[from] SourceMapError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MinifyError {
    /// Source position the error points at, when it has one
    pub fn position(&self) -> Option<Position> {
        let position = match self {
            MinifyError::Lex(err) => err.position(),
            MinifyError::Parse(err) => err.position(),
            MinifyError::Scope(err) => err.span().start,
            MinifyError::SourceMap(_) | MinifyError::Config(_) => return None,
        };
        (position.line > 0).then_some(position)
    }

    /// Whether the input used syntax newer than ES5
    pub fn is_unsupported(&self) -> bool {
        match self {
            MinifyError::Lex(err) => err.is_unsupported(),
            MinifyError::Parse(err) => err.is_unsupported(),
            _ => false,
        }
    }
}
