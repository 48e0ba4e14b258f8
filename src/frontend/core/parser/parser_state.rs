//! Parser state and error handling

use std::collections::BTreeMap;

use crate::frontend::config::ParseOptions;
use crate::frontend::core::lexer::state::UNSUPPORTED_WORDS;
use crate::frontend::core::lexer::{Comment, LexError, Lexer, Token, TokenKind};
use crate::frontend::core::parser::ast::LeadingComments;
use crate::util::span::{Position, Span};

/// Parse error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The tokenizer rejected the input
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Unexpected token encountered
    #[error(
        "Unexpected token {found}{}",
        .expected.as_ref().map(|e| format!(", expected {}", e)).unwrap_or_default()
    )]
    UnexpectedToken {
        found: String,
        expected: Option<String>,
        position: Position,
    },
    /// Assignment or update of something that is not a reference
    #[error("{message}")]
    InvalidAssignment { message: String, position: Position },
    #[error("Label {name} defined twice")]
    DuplicateLabel { name: String, position: Position },
    #[error("Undefined label {name}")]
    UndefinedLabel { name: String, position: Position },
    /// Construct from a later grammar revision
    #[error("Unsupported syntax: {construct}")]
    Unsupported { construct: String, position: Position },
    /// Other grammar violations
    #[error("{message}")]
    Invalid { message: String, position: Position },
}

impl ParseError {
    /// Where the error was detected
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(err) => err.position(),
            ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidAssignment { position, .. }
            | ParseError::DuplicateLabel { position, .. }
            | ParseError::UndefinedLabel { position, .. }
            | ParseError::Unsupported { position, .. }
            | ParseError::Invalid { position, .. } => *position,
        }
    }

    /// Whether the input used syntax outside the supported grammar
    pub fn is_unsupported(&self) -> bool {
        match self {
            ParseError::Lex(err) => err.is_unsupported(),
            ParseError::Unsupported { .. } => true,
            _ => false,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

fn placeholder() -> Token {
    Token {
        kind: TokenKind::Eof,
        span: Span::dummy(),
        nlb: false,
        comments_before: Vec::new(),
    }
}

/// Parser state: token cursor plus the context flags of the grammar
pub struct ParserState<'a> {
    lexer: Lexer<'a>,
    token: Token,
    peeked: Option<Token>,
    prev_end: Position,
    strict_semicolons: bool,
    bare_returns: bool,
    pub(crate) in_function: usize,
    pub(crate) in_loop: usize,
    pub(crate) in_switch: usize,
    pub(crate) in_directives: bool,
    pub(crate) labels: Vec<String>,
    comments: BTreeMap<usize, LeadingComments>,
}

impl<'a> ParserState<'a> {
    pub fn new(
        source: &'a str,
        options: &ParseOptions,
    ) -> ParseResult<Self> {
        let mut lexer = Lexer::new(source);
        let token = lexer.next_token()?;
        let mut state = Self {
            lexer,
            token: placeholder(),
            peeked: None,
            prev_end: Position::with_offset(1, 0, 0),
            strict_semicolons: options.strict_semicolons,
            bare_returns: options.bare_returns,
            in_function: 0,
            in_loop: 0,
            in_switch: 0,
            in_directives: true,
            labels: Vec::new(),
            comments: BTreeMap::new(),
        };
        state.set_current(token);
        Ok(state)
    }

    fn set_current(
        &mut self,
        mut token: Token,
    ) {
        if !token.comments_before.is_empty() && !token.is_eof() {
            self.comments.insert(
                token.span.start.offset,
                LeadingComments {
                    comments: std::mem::take(&mut token.comments_before),
                    nlb: token.nlb,
                },
            );
        }
        self.token = token;
    }

    pub fn current(&self) -> &Token {
        &self.token
    }

    pub fn bare_returns(&self) -> bool {
        self.bare_returns
    }

    /// Advance and return the token that was current
    pub fn next(&mut self) -> ParseResult<Token> {
        let upcoming = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        self.prev_end = self.token.span.end;
        let previous = std::mem::replace(&mut self.token, placeholder());
        self.set_current(upcoming);
        Ok(previous)
    }

    pub fn peek(&mut self) -> ParseResult<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        match &self.peeked {
            Some(token) => Ok(token),
            None => Err(self.unexpected(None)),
        }
    }

    /// Re-lex a current `/` or `/=` operator as a regular expression
    pub fn handle_regexp(&mut self) -> ParseResult<()> {
        if self.is_op("/") || self.is_op("/=") {
            self.peeked = None;
            let token = self.lexer.force_regexp(self.token.span.start, self.token.nlb)?;
            self.token = token;
        }
        Ok(())
    }

    pub fn is_punc(
        &self,
        c: char,
    ) -> bool {
        self.token.is_punc(c)
    }

    pub fn is_op(
        &self,
        op: &str,
    ) -> bool {
        self.token.is_operator(op)
    }

    pub fn is_keyword(
        &self,
        kw: &str,
    ) -> bool {
        self.token.is_keyword(kw)
    }

    pub fn is_eof(&self) -> bool {
        self.token.is_eof()
    }

    /// Consume the punctuation `c` if present
    pub fn skip_punc(
        &mut self,
        c: char,
    ) -> ParseResult<bool> {
        if self.is_punc(c) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn expect_punc(
        &mut self,
        c: char,
    ) -> ParseResult<Token> {
        if self.is_punc(c) {
            self.next()
        } else {
            Err(self.unexpected(Some(&format!("punc ({})", c))))
        }
    }

    pub fn expect_op(
        &mut self,
        op: &str,
    ) -> ParseResult<Token> {
        if self.is_op(op) {
            self.next()
        } else {
            Err(self.unexpected(Some(&format!("operator ({})", op))))
        }
    }

    /// Start position of the current token
    pub fn start_pos(&self) -> Position {
        self.token.span.start
    }

    /// Span from `start` to the end of the last consumed token
    pub fn span_from(
        &self,
        start: Position,
    ) -> Span {
        Span::new(start, self.prev_end)
    }

    pub fn unexpected(
        &self,
        expected: Option<&str>,
    ) -> ParseError {
        if let TokenKind::Name(name) = &self.token.kind {
            if UNSUPPORTED_WORDS.contains(&name.as_str()) {
                return self.unsupported(&format!("'{}'", name));
            }
        }
        ParseError::UnexpectedToken {
            found: self.token.kind.describe(),
            expected: expected.map(str::to_string),
            position: self.token.span.start,
        }
    }

    pub fn unsupported(
        &self,
        construct: &str,
    ) -> ParseError {
        ParseError::Unsupported {
            construct: construct.to_string(),
            position: self.token.span.start,
        }
    }

    pub fn invalid(
        &self,
        message: &str,
    ) -> ParseError {
        ParseError::Invalid {
            message: message.to_string(),
            position: self.token.span.start,
        }
    }

    /// Automatic semicolon insertion is allowed before the current token
    pub fn can_insert_semicolon(&self) -> bool {
        !self.strict_semicolons && (self.token.nlb || self.is_eof() || self.is_punc('}'))
    }

    /// Consume a statement terminator, real or inserted
    pub fn semicolon(&mut self) -> ParseResult<()> {
        if self.is_punc(';') {
            self.next()?;
            Ok(())
        } else if self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected(None))
        }
    }

    /// Hand over collected comments; call once the `Eof` token is current
    pub fn finish(self) -> (BTreeMap<usize, LeadingComments>, Vec<Comment>) {
        (self.comments, self.token.comments_before)
    }
}
