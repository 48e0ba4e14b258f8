//! Parser module
//!
//! Recursive descent over statements with precedence climbing for binary
//! operators. Produces a [`Program`] carrying the comments the lexer saw.

pub mod ast;
pub mod parser_state;
pub mod pratt;
pub mod statements;
pub mod visit;
#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use ast::*;
pub use parser_state::{ParseError, ParseResult, ParserState};
pub use visit::{Visitor, VisitorMut};

use crate::frontend::config::ParseOptions;
use crate::util::span::{Position, Span};

/// Parse a complete program
///
/// # Example
/// ```
/// use squeeze::frontend::config::ParseOptions;
/// use squeeze::frontend::core::parser::parse;
///
/// let program = parse("var a = 1;", &ParseOptions::default()).unwrap();
/// assert_eq!(program.body.len(), 1);
/// ```
pub fn parse(
    source: &str,
    options: &ParseOptions,
) -> Result<Program, ParseError> {
    tracing::debug!("parsing {} bytes", source.len());

    let mut state = ParserState::new(source, options)?;
    let body = state.parse_toplevel()?;
    let end = state.current().span.end;
    let (comments, trailing_comments) = state.finish();

    let start = Position::with_offset(1, 0, 0);
    tracing::debug!("parsed {} top-level statements", body.len());
    Ok(Program {
        body,
        span: Span::new(start, end),
        source_name: options.source_name.clone(),
        comments,
        trailing_comments,
        scopes: Default::default(),
    })
}

/// Parse a single expression that must span the whole input
pub fn parse_expression(
    source: &str,
    options: &ParseOptions,
) -> Result<Expr, ParseError> {
    let mut state = ParserState::new(source, options)?;
    let expr = state.expression(true, false)?;
    if !state.is_eof() {
        return Err(state.unexpected(Some("end of input")));
    }
    Ok(expr)
}
