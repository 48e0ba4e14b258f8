//! Lexer state management
//! Handles the restartable cursor state and keyword recognition

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::frontend::core::lexer::tokens::TokenKind;

/// Reserved keywords of the grammar
pub const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "const", "continue", "debugger", "default", "delete", "do",
    "else", "finally", "for", "function", "if", "in", "instanceof", "new", "return", "switch",
    "throw", "try", "typeof", "var", "void", "while", "with",
];

/// Literal keywords
pub const ATOMS: &[&str] = &["false", "null", "true"];

/// Keywords lexed as operators
pub const OPERATOR_WORDS: &[&str] = &["in", "instanceof", "typeof", "new", "void", "delete"];

/// Future reserved words; not valid as bare property names in old engines
pub const FUTURE_RESERVED: &[&str] = &[
    "abstract", "boolean", "byte", "char", "class", "double", "enum", "export", "extends",
    "final", "float", "goto", "implements", "import", "int", "interface", "let", "long",
    "native", "package", "private", "protected", "public", "short", "static", "super",
    "synchronized", "throws", "transient", "volatile", "yield",
];

/// Words that start a later-revision construct when seen in statement position
pub const UNSUPPORTED_WORDS: &[&str] = &["class", "import", "export", "super"];

/// Punctuation after which a `/` starts a regular expression
pub const PUNC_BEFORE_EXPRESSION: &str = "[{(,;:";

/// Keywords after which a `/` starts a regular expression
pub const KEYWORDS_BEFORE_EXPRESSION: &[&str] =
    &["return", "new", "delete", "throw", "else", "case", "typeof", "void", "in", "instanceof", "do"];

/// All operators, longest first within each prefix group
pub const OPERATORS: &[&str] = &[
    ">>>=", "===", "!==", ">>>", "<<=", ">>=", "==", "!=", "<=", ">=", "&&", "||", "++", "--",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "=", "<", ">", "+", "-", "*",
    "/", "%", "&", "|", "^", "!", "~", "?",
];

static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .chain(ATOMS)
        .chain(FUTURE_RESERVED)
        .copied()
        .collect()
});

/// Whether `word` may not be used as a bare identifier
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED.contains(word)
}

/// Interned operator text
pub fn operator_str(op: &str) -> Option<&'static str> {
    OPERATORS
        .iter()
        .chain(OPERATOR_WORDS)
        .find(|candidate| **candidate == op)
        .copied()
}

/// Classify an identifier-like word
pub fn keyword_from_str(word: &str) -> Option<TokenKind> {
    if let Some(op) = OPERATOR_WORDS.iter().find(|w| **w == word) {
        return Some(TokenKind::Operator(op));
    }
    if let Some(atom) = ATOMS.iter().find(|w| **w == word) {
        return Some(TokenKind::Atom(atom));
    }
    KEYWORDS
        .iter()
        .find(|w| **w == word)
        .map(|kw| TokenKind::Keyword(kw))
}

/// Whether a token leaves the lexer in a state where `/` opens a regex
pub fn allows_regex_after(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Operator(op) => !matches!(*op, "++" | "--"),
        TokenKind::Keyword(kw) => KEYWORDS_BEFORE_EXPRESSION.contains(kw),
        TokenKind::Punc(c) => PUNC_BEFORE_EXPRESSION.contains(*c),
        _ => false,
    }
}

/// Restartable cursor state of the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    pub pos: usize,
    pub line: usize,
    pub column: usize,
    pub regex_allowed: bool,
    pub newline_before: bool,
}

impl LexerState {
    /// State at the start of input
    pub fn new() -> Self {
        Self {
            pos: 0,
            line: 1,
            column: 0,
            regex_allowed: true,
            newline_before: false,
        }
    }
}

impl Default for LexerState {
    fn default() -> Self {
        Self::new()
    }
}
