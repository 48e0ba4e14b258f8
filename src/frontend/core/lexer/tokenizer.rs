//! Tokenizer implementation
//! Main lexer structure and token generation logic

use super::literals::{
    is_digit, is_identifier_start, is_newline, is_whitespace, scan_number, scan_regexp,
    scan_string, scan_word,
};
use super::state::{allows_regex_after, keyword_from_str, operator_str, LexerState, OPERATORS};
use crate::frontend::core::lexer::tokens::*;
use crate::util::span::{Position, Span};

/// Main lexer structure
///
/// Produces tokens lazily through [`Lexer::next_token`]. The cursor can be
/// saved with [`Lexer::snapshot`] and rewound with [`Lexer::restore`].
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    state: LexerState,
    start: Position,
    comments: Vec<Comment>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            state: LexerState::new(),
            start: Position::with_offset(1, 0, 0),
            comments: Vec::new(),
        }
    }

    /// The text being tokenized
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get current position
    pub fn cursor(&self) -> Position {
        Position::with_offset(self.state.line, self.state.column, self.state.pos)
    }

    /// Save the cursor
    pub fn snapshot(&self) -> LexerState {
        self.state
    }

    /// Rewind the cursor to a saved state
    pub fn restore(
        &mut self,
        state: LexerState,
    ) {
        self.state = state;
    }

    /// Peek at next character
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.state.pos).copied()
    }

    /// Peek `n` characters ahead
    pub fn peek_at(
        &self,
        n: usize,
    ) -> Option<char> {
        self.chars.get(self.state.pos + n).copied()
    }

    /// Advance to next character, folding `\r\n` into a single line break
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.state.pos += 1;
        if is_newline(c) {
            if c == '\r' && self.peek() == Some('\n') {
                self.state.pos += 1;
            }
            self.state.line += 1;
            self.state.column = 0;
        } else {
            self.state.column += c.len_utf16();
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if is_newline(c) {
                self.state.newline_before = true;
            } else if !is_whitespace(c) {
                break;
            }
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        let start = self.cursor();
        self.advance();
        self.advance();
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if is_newline(c) {
                break;
            }
            value.push(c);
            self.advance();
        }
        self.comments.push(Comment {
            kind: CommentKind::Line,
            value,
            span: Span::new(start, self.cursor()),
            nlb: self.state.newline_before,
        });
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.cursor();
        let nlb = self.state.newline_before;
        self.advance();
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::UnexpectedEof {
                        message: "Unterminated multiline comment".to_string(),
                        position: start,
                    })
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                Some(c) => {
                    if is_newline(c) {
                        self.state.newline_before = true;
                    }
                    value.push(c);
                    self.advance();
                }
            }
        }
        self.comments.push(Comment {
            kind: CommentKind::Block,
            value,
            span: Span::new(start, self.cursor()),
            nlb,
        });
        Ok(())
    }

    fn make_token(
        &mut self,
        kind: TokenKind,
    ) -> Token {
        self.state.regex_allowed = allows_regex_after(&kind);
        let token = Token {
            kind,
            span: Span::new(self.start, self.cursor()),
            nlb: self.state.newline_before,
            comments_before: std::mem::take(&mut self.comments),
        };
        self.state.newline_before = false;
        token
    }

    fn unsupported(
        &self,
        message: &str,
    ) -> LexError {
        LexError::Unsupported {
            message: message.to_string(),
            position: self.start,
        }
    }

    fn read_operator(&mut self) -> Result<TokenKind, LexError> {
        let mut op = String::new();
        while let Some(c) = self.peek() {
            let mut bigger = op.clone();
            bigger.push(c);
            if !OPERATORS.contains(&bigger.as_str()) {
                break;
            }
            op = bigger;
            self.advance();
        }
        if op == "=" && self.peek() == Some('>') {
            return Err(self.unsupported("arrow functions (=>)"));
        }
        operator_str(&op)
            .map(TokenKind::Operator)
            .ok_or_else(|| LexError::Malformed {
                message: format!("Unexpected character '{}'", op),
                position: self.start,
            })
    }

    /// Re-read a `/` or `/=` operator token starting at `at` as a regular expression
    ///
    /// Used by the parser when an operator token stands where an expression must begin.
    pub fn force_regexp(
        &mut self,
        at: Position,
        nlb: bool,
    ) -> Result<Token, LexError> {
        self.state.pos = at.offset;
        self.state.line = at.line;
        self.state.column = at.column;
        self.state.newline_before = nlb;
        self.start = at;
        self.advance();
        let kind = scan_regexp(self)?;
        Ok(self.make_token(kind))
    }

    /// Produce the next token; the stream ends with a single `Eof` token
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            self.skip_whitespace();
            match (self.peek(), self.peek_at(1)) {
                (Some('/'), Some('/')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => break,
            }
        }

        self.start = self.cursor();
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(self.make_token(TokenKind::Eof)),
        };

        let kind = match c {
            '"' | '\'' => {
                self.advance();
                scan_string(self, c)?
            }
            '`' => return Err(self.unsupported("template strings")),
            '.' => {
                if self.peek_at(1).is_some_and(is_digit) {
                    self.advance();
                    scan_number(self, ".")?
                } else if self.peek_at(1) == Some('.') && self.peek_at(2) == Some('.') {
                    return Err(self.unsupported("spread syntax (...)"));
                } else {
                    self.advance();
                    TokenKind::Punc('.')
                }
            }
            c if is_digit(c) => scan_number(self, "")?,
            '/' if self.state.regex_allowed => {
                self.advance();
                scan_regexp(self)?
            }
            '[' | ']' | '{' | '}' | '(' | ')' | ',' | ';' | ':' => {
                self.advance();
                TokenKind::Punc(c)
            }
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '=' | '<' | '>' | '!' | '~' | '?' => {
                self.read_operator()?
            }
            c if c == '\\' || is_identifier_start(c) => {
                let (word, escaped) = scan_word(self)?;
                if escaped {
                    TokenKind::Name(word)
                } else {
                    keyword_from_str(&word).unwrap_or(TokenKind::Name(word))
                }
            }
            other => {
                return Err(LexError::Malformed {
                    message: format!("Unexpected character '{}'", other),
                    position: self.start,
                })
            }
        };
        Ok(self.make_token(kind))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to (excluding) `Eof`
    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) if token.is_eof() => None,
            other => Some(other),
        }
    }
}
