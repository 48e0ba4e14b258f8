//! Base64 VLQ
//!
//! Each value is split into 5-bit groups, least significant first, with the
//! sign in the lowest bit of the first group and a continuation bit (32) on
//! every group but the last.

use super::SourceMapError;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const SHIFT: u32 = 5;
const CONTINUATION: i64 = 1 << SHIFT;
const MASK: i64 = CONTINUATION - 1;

/// Append the encoding of `value` to `out`
pub fn encode(
    value: i64,
    out: &mut String,
) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    loop {
        let mut digit = vlq & MASK;
        vlq >>= SHIFT;
        if vlq > 0 {
            digit |= CONTINUATION;
        }
        out.push(ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

fn digit_value(c: char) -> Option<i64> {
    ALPHABET.iter().position(|&b| b as char == c).map(|p| p as i64)
}

/// Decode one segment of the `mappings` field into its values
pub fn decode(segment: &str) -> Result<Vec<i64>, SourceMapError> {
    let mut values = Vec::new();
    let mut value: i64 = 0;
    let mut shift = 0u32;
    let mut pending = false;

    for c in segment.chars() {
        let digit = digit_value(c).ok_or_else(|| SourceMapError::Mappings {
            message: format!("invalid base64 digit '{}'", c),
        })?;
        if shift > 60 {
            return Err(SourceMapError::Mappings {
                message: "value overflows".to_string(),
            });
        }
        value = (digit & MASK)
            .checked_mul(1 << shift)
            .and_then(|part| value.checked_add(part))
            .ok_or_else(|| SourceMapError::Mappings {
                message: "value overflows".to_string(),
            })?;
        if digit & CONTINUATION != 0 {
            shift += SHIFT;
            pending = true;
            continue;
        }
        let negative = value & 1 == 1;
        let magnitude = value >> 1;
        values.push(if negative { -magnitude } else { magnitude });
        value = 0;
        shift = 0;
        pending = false;
    }

    if pending {
        return Err(SourceMapError::Mappings {
            message: format!("truncated segment '{}'", segment),
        });
    }
    Ok(values)
}
