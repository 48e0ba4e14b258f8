//! Literal formatting
//!
//! Numbers, strings, names and object keys in their shortest printable form.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::frontend::config::{OutputOptions, QuoteStyle};
use crate::frontend::core::lexer::literals::is_identifier_name;
use crate::frontend::core::lexer::literals::lone_surrogate_unit;
use crate::frontend::core::lexer::state::{is_reserved_word, keyword_from_str};
use crate::middle::compress::evaluate::number_to_string;

static SCRIPT_CLOSE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)</script([>/\t\n\x0C\r ])").ok());

/// Shortest source text for a non-negative finite number
///
/// Candidates are the canonical decimal form (with a leading `0.` shortened
/// to `.`), hex for integers and exponent forms. Ties keep the decimal form.
pub fn format_number(value: f64) -> String {
    if value < 0.0 {
        return format!("-{}", format_number(-value));
    }
    let decimal = number_to_string(value);
    let mut candidates = vec![shorten_fraction(&decimal).replace("e+", "e")];

    if value.fract() == 0.0 && value.is_finite() {
        if value < 9_007_199_254_740_992.0 {
            candidates.push(format!("0x{:x}", value as u64));
        }
        let trimmed = decimal.trim_end_matches('0');
        let zeros = decimal.len() - trimmed.len();
        if zeros > 0 && !decimal.contains('e') {
            candidates.push(format!("{}e{}", trimmed, zeros));
        }
    } else if let Some(rest) = decimal.strip_prefix("0.") {
        let digits = rest.trim_start_matches('0');
        let leading = rest.len() - digits.len();
        if leading > 0 {
            candidates.push(format!("{}e-{}", digits, leading + digits.len()));
        }
    }

    best_of(candidates)
}

fn shorten_fraction(decimal: &str) -> String {
    match decimal.strip_prefix("0.") {
        Some(rest) => format!(".{}", rest),
        None => decimal.to_string(),
    }
}

fn best_of(candidates: Vec<String>) -> String {
    let mut best = String::new();
    for candidate in candidates {
        if best.is_empty() || candidate.len() < best.len() {
            best = candidate;
        }
    }
    best
}

/// The printed number is a bare decimal integer, so a following `.` would be
/// read as a decimal point
pub fn needs_extra_dot(printed: &str) -> bool {
    !printed.is_empty() && printed.chars().all(|c| c.is_ascii_digit())
}

/// Quote and escape a string literal
pub fn quote_string(
    value: &str,
    options: &OutputOptions,
) -> String {
    let mut body = String::with_capacity(value.len() + 2);
    let mut single = 0usize;
    let mut double = 0usize;
    let chars: Vec<char> = value.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\\' => body.push_str("\\\\"),
            '\u{8}' => body.push_str("\\b"),
            '\u{c}' => body.push_str("\\f"),
            '\n' => body.push_str("\\n"),
            '\r' => body.push_str("\\r"),
            '\t' => body.push_str("\\t"),
            '\u{b}' => body.push_str(if options.screw_ie8 { "\\v" } else { "\\x0B" }),
            '\u{2028}' => body.push_str("\\u2028"),
            '\u{2029}' => body.push_str("\\u2029"),
            '\u{feff}' => body.push_str("\\ufeff"),
            '\0' => {
                let next_is_digit = chars.get(i + 1).map_or(false, |n| n.is_ascii_digit());
                body.push_str(if next_is_digit { "\\x00" } else { "\\0" });
            }
            '"' => {
                double += 1;
                body.push('"');
            }
            '\'' => {
                single += 1;
                body.push('\'');
            }
            other => match lone_surrogate_unit(other) {
                Some(unit) => body.push_str(&format!("\\u{:04x}", unit)),
                None => body.push(other),
            },
        }
    }

    if options.ascii_only {
        body = to_ascii(&body, false);
    }

    let quote = match options.quote_style {
        QuoteStyle::Single => '\'',
        QuoteStyle::Double => '"',
        QuoteStyle::Auto if double > single => '\'',
        QuoteStyle::Auto => '"',
    };
    let mut quoted = String::with_capacity(body.len() + 2);
    quoted.push(quote);
    for c in body.chars() {
        if c == quote {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push(quote);

    if options.inline_script {
        if let Some(re) = SCRIPT_CLOSE.as_ref() {
            return re.replace_all(&quoted, "<\\/script$1").into_owned();
        }
    }
    quoted
}

/// Escape every non-ASCII character
///
/// Strings may use `\xHH`; identifiers only allow `\uHHHH`. Characters outside
/// the basic plane become a surrogate pair.
pub fn to_ascii(
    text: &str,
    identifier: bool,
) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code < 0x80 {
            out.push(c);
        } else if code <= 0xff && !identifier {
            out.push_str(&format!("\\x{:02x}", code));
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Identifier text as it must appear in the output
pub fn format_name(
    name: &str,
    options: &OutputOptions,
) -> String {
    if options.ascii_only {
        to_ascii(name, true)
    } else {
        name.to_string()
    }
}

/// Binding or reference name; a keyword spelling keeps its first letter escaped
pub fn format_binding_name(
    name: &str,
    options: &OutputOptions,
) -> String {
    let text = format_name(name, options);
    if keyword_from_str(name).is_none() {
        return text;
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("\\u{:04x}{}", first as u32, chars.as_str()),
        None => text,
    }
}

/// How an object literal key is written
#[derive(Debug, Clone, PartialEq)]
pub enum KeyForm {
    Name(String),
    Number(String),
    Quoted(String),
}

/// Pick the shortest valid spelling of a property key
pub fn property_key(
    key: &str,
    quoted: bool,
    options: &OutputOptions,
) -> KeyForm {
    if options.quote_keys {
        return KeyForm::Quoted(quote_string(key, options));
    }
    if let Some(number) = canonical_number(key) {
        return KeyForm::Number(format_number(number));
    }
    let bare = if is_reserved_word(key) {
        options.screw_ie8
    } else {
        is_identifier_name(key)
    };
    if bare && !(quoted && options.keep_quoted_props) {
        KeyForm::Name(format_name(key, options))
    } else {
        KeyForm::Quoted(quote_string(key, options))
    }
}

/// The key is the canonical text of a non-negative number
fn canonical_number(key: &str) -> Option<f64> {
    if key.is_empty() || !key.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        return None;
    }
    let value: f64 = key.parse().ok()?;
    (value >= 0.0 && value.is_finite() && number_to_string(value) == key).then_some(value)
}
