//! Literal scanning implementations
//! Handles number, string and regular expression literals plus character classes

use super::tokenizer::Lexer;
use crate::frontend::core::lexer::tokens::*;

/// Line terminators of the grammar
#[inline]
pub fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace other than line terminators
#[inline]
pub fn is_whitespace(c: char) -> bool {
    !is_newline(c) && (c.is_whitespace() || c == '\u{feff}')
}

#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// First character of an identifier
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_ascii_alphabetic() || (!c.is_ascii() && unicode_ident::is_xid_start(c))
}

/// Any later character of an identifier
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c)
        || c.is_ascii_digit()
        || c == '\u{200c}'
        || c == '\u{200d}'
        || (!c.is_ascii() && unicode_ident::is_xid_continue(c))
}

/// Whether `name` is lexically an identifier (reserved words included)
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_char),
        _ => false,
    }
}

/// Parse the text of a numeric literal
///
/// Accepts hex (`0x1F`), legacy octal (`017`) and decimal forms.
pub fn parse_js_number(text: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return parse_radix(hex, 16);
    }
    if lower.len() > 1 && lower.starts_with('0') && lower.chars().all(|c| ('0'..='7').contains(&c)) {
        return parse_radix(&lower[1..], 8);
    }
    let well_formed = lower
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.')
        && lower.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | '+' | '-'));
    if !well_formed {
        return None;
    }
    lower.parse::<f64>().ok()
}

fn parse_radix(
    digits: &str,
    radix: u32,
) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for c in digits.chars() {
        let d = c.to_digit(radix)?;
        value = value * radix as f64 + d as f64;
    }
    Some(value)
}

fn malformed(
    lexer: &Lexer<'_>,
    message: impl Into<String>,
) -> LexError {
    LexError::Malformed {
        message: message.into(),
        position: lexer.cursor(),
    }
}

fn eof(
    lexer: &Lexer<'_>,
    message: impl Into<String>,
) -> LexError {
    LexError::UnexpectedEof {
        message: message.into(),
        position: lexer.cursor(),
    }
}

/// Scan a number literal; `prefix` is `"."` when the literal started with a dot
pub fn scan_number(
    lexer: &mut Lexer<'_>,
    prefix: &str,
) -> Result<TokenKind, LexError> {
    let mut text = prefix.to_string();
    let mut has_e = false;
    let mut after_e = false;
    let mut has_x = false;
    let mut has_dot = prefix == ".";
    let mut index = 0;

    while let Some(c) = lexer.peek() {
        let accept = match c {
            'x' | 'X' => {
                if has_x {
                    false
                } else {
                    has_x = true;
                    true
                }
            }
            'e' | 'E' => {
                if has_x {
                    true
                } else if has_e {
                    false
                } else {
                    has_e = true;
                    after_e = true;
                    true
                }
            }
            '-' => after_e || (index == 0 && prefix.is_empty()),
            '+' => after_e,
            '.' => {
                after_e = false;
                if !has_dot && !has_x && !has_e {
                    has_dot = true;
                    true
                } else {
                    false
                }
            }
            other => {
                after_e = false;
                other.is_ascii_alphanumeric()
            }
        };
        if !accept {
            break;
        }
        text.push(c);
        lexer.advance();
        index += 1;
    }

    match parse_js_number(&text) {
        Some(value) => Ok(TokenKind::Num(value)),
        None => Err(malformed(lexer, format!("Invalid syntax: {}", text))),
    }
}

fn read_hex_digits(
    lexer: &mut Lexer<'_>,
    count: usize,
) -> Result<u32, LexError> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = lexer
            .peek()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| malformed(lexer, "Invalid hex-character pattern in string"))?;
        lexer.advance();
        value = value * 16 + digit;
    }
    Ok(value)
}

/// First scalar of the range that carries lone UTF-16 surrogates through a `String`
const LONE_SURROGATE_BASE: u32 = 0x10_F800;

/// The stand-in scalar for a lone surrogate code unit
pub fn lone_surrogate_char(unit: u32) -> Option<char> {
    if (0xD800..0xE000).contains(&unit) {
        char::from_u32(LONE_SURROGATE_BASE + (unit - 0xD800))
    } else {
        None
    }
}

/// The surrogate code unit a stand-in scalar carries
pub fn lone_surrogate_unit(c: char) -> Option<u32> {
    let code = c as u32;
    (LONE_SURROGATE_BASE..=LONE_SURROGATE_BASE + 0x7FF)
        .contains(&code)
        .then(|| code - LONE_SURROGATE_BASE + 0xD800)
}

/// The UTF-16 code units a string value stands for
pub fn utf16_units(value: &str) -> Vec<u16> {
    let mut units = Vec::with_capacity(value.len());
    let mut buf = [0u16; 2];
    for c in value.chars() {
        match lone_surrogate_unit(c) {
            Some(unit) => units.push(unit as u16),
            None => units.extend_from_slice(c.encode_utf16(&mut buf)),
        }
    }
    units
}

/// Decode a `\uXXXX` escape whose `\u` has been consumed, joining surrogate
/// pairs; an unpaired surrogate comes back as its bare code unit
fn read_unicode_escape(lexer: &mut Lexer<'_>) -> Result<u32, LexError> {
    let code = read_hex_digits(lexer, 4)?;
    if (0xD800..0xDC00).contains(&code) && lexer.peek() == Some('\\') && lexer.peek_at(1) == Some('u') {
        let snapshot = lexer.snapshot();
        lexer.advance();
        lexer.advance();
        let low = read_hex_digits(lexer, 4)?;
        if (0xDC00..0xE000).contains(&low) {
            return Ok(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00));
        }
        lexer.restore(snapshot);
    }
    Ok(code)
}

/// Decode the escape after a backslash inside a string; `None` is a line continuation
fn read_escape(lexer: &mut Lexer<'_>) -> Result<Option<char>, LexError> {
    let c = lexer
        .advance()
        .ok_or_else(|| eof(lexer, "Unterminated string constant"))?;
    let decoded = match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        'v' => '\u{b}',
        'f' => '\u{c}',
        'x' => {
            let code = read_hex_digits(lexer, 2)?;
            char::from_u32(code).unwrap_or('\u{fffd}')
        }
        'u' => {
            let code = read_unicode_escape(lexer)?;
            char::from_u32(code)
                .or_else(|| lone_surrogate_char(code))
                .unwrap_or('\u{fffd}')
        }
        '\r' | '\n' | '\u{2028}' | '\u{2029}' => return Ok(None),
        '0'..='7' => {
            let mut value = c.to_digit(8).unwrap_or(0);
            let max_digits = if c <= '3' { 2 } else { 1 };
            for _ in 0..max_digits {
                match lexer.peek().and_then(|d| d.to_digit(8)) {
                    Some(d) => {
                        value = value * 8 + d;
                        lexer.advance();
                    }
                    None => break,
                }
            }
            char::from_u32(value).unwrap_or('\0')
        }
        other => other,
    };
    Ok(Some(decoded))
}

/// Scan a string literal; the opening quote has been consumed
pub fn scan_string(
    lexer: &mut Lexer<'_>,
    quote: char,
) -> Result<TokenKind, LexError> {
    let mut value = String::new();
    loop {
        let c = lexer
            .peek()
            .ok_or_else(|| eof(lexer, "Unterminated string constant"))?;
        if is_newline(c) {
            return Err(malformed(lexer, "Unterminated string constant"));
        }
        lexer.advance();
        if c == quote {
            break;
        }
        if c == '\\' {
            if let Some(decoded) = read_escape(lexer)? {
                value.push(decoded);
            }
        } else {
            value.push(c);
        }
    }
    Ok(TokenKind::Str(value))
}

/// Scan a regular expression literal; the opening `/` has been consumed
pub fn scan_regexp(lexer: &mut Lexer<'_>) -> Result<TokenKind, LexError> {
    let mut pattern = String::new();
    let mut escaped = false;
    let mut in_class = false;
    loop {
        let c = lexer
            .advance()
            .ok_or_else(|| eof(lexer, "Unterminated regular expression"))?;
        if is_newline(c) {
            return Err(malformed(lexer, "Unexpected line terminator"));
        }
        if escaped {
            pattern.push(c);
            escaped = false;
            continue;
        }
        match c {
            '[' => in_class = true,
            ']' if in_class => in_class = false,
            '/' if !in_class => break,
            '\\' => escaped = true,
            _ => {}
        }
        pattern.push(c);
    }

    let mut flags = String::new();
    while let Some(c) = lexer.peek() {
        if !is_identifier_char(c) {
            break;
        }
        flags.push(c);
        lexer.advance();
    }
    Ok(TokenKind::Regexp { pattern, flags })
}

/// Read an identifier, decoding `\uXXXX` escapes; the flag reports whether any occurred
pub fn scan_word(lexer: &mut Lexer<'_>) -> Result<(String, bool), LexError> {
    let mut name = String::new();
    let mut escaped = false;
    while let Some(c) = lexer.peek() {
        if c == '\\' {
            lexer.advance();
            if lexer.advance() != Some('u') {
                return Err(malformed(lexer, "Expecting UnicodeEscapeSequence -- uXXXX"));
            }
            let decoded = char::from_u32(read_unicode_escape(lexer)?)
                .ok_or_else(|| malformed(lexer, "Invalid escape in identifier"))?;
            let valid = if name.is_empty() {
                is_identifier_start(decoded)
            } else {
                is_identifier_char(decoded)
            };
            if !valid {
                return Err(malformed(lexer, "Unicode escape is not a valid identifier character"));
            }
            name.push(decoded);
            escaped = true;
        } else if is_identifier_char(c) {
            name.push(c);
            lexer.advance();
        } else {
            break;
        }
    }
    Ok((name, escaped))
}
