//! Lexer module
//! Split into token definitions, cursor state, literal scanners and the tokenizer loop

pub mod literals;
pub mod state;
pub mod tokenizer;
pub mod tokens;

#[cfg(test)]
mod tests;

// Re-export types
pub use tokenizer::Lexer;
pub use tokens::{Comment, CommentKind, LexError, Token, TokenKind};

/// Tokenize source code into a complete stream ending with `Eof`
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tracing::debug!("lexing {} bytes", source.len());

    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let done = token.is_eof();
        if !done {
            tracing::trace!("token {}", token.kind);
        }
        tokens.push(token);
        if done {
            break;
        }
    }

    tracing::debug!("lexing complete: {} tokens", tokens.len());
    Ok(tokens)
}
