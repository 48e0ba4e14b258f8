//! Input maps embedded as `sourceMappingURL` data URIs

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

use super::SourceMapConsumer;
use crate::frontend::core::lexer::tokens::Comment;

static SOURCE_MAPPING_URL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*(?://\s*)?[#@]\s?sourceMappingURL=\s*(\S+?)\s*$").ok());

static OTHER_ANNOTATION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*(?://\s*)?[#@]\s?[a-zA-Z]+=").ok());

/// URL of the `sourceMappingURL` annotation ending the file
///
/// Only the trailing comments count; other `//# name=value` annotations
/// after it are skipped, anything else ends the search.
pub fn source_mapping_url(trailing: &[Comment]) -> Option<String> {
    let url_pattern = SOURCE_MAPPING_URL.as_ref()?;
    let other = OTHER_ANNOTATION.as_ref()?;
    for comment in trailing.iter().rev() {
        if let Some(caps) = url_pattern.captures(&comment.value) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
        if !other.is_match(&comment.value) {
            return None;
        }
    }
    None
}

/// Decode a map inlined as a base64 `data:` URI at the end of the file
///
/// A malformed URI or map is ignored rather than reported.
pub fn inline_map_from_comments(trailing: &[Comment]) -> Option<SourceMapConsumer> {
    let url = source_mapping_url(trailing)?;
    let data = url.strip_prefix("data:")?;
    let (_, payload) = data.split_once(',')?;
    let decoded = match STANDARD.decode(payload) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!("ignoring inline source map: {}", err);
            return None;
        }
    };
    let json = String::from_utf8(decoded).ok()?;
    match SourceMapConsumer::from_json(&json) {
        Ok(map) => Some(map),
        Err(err) => {
            tracing::debug!("ignoring inline source map: {}", err);
            None
        }
    }
}
