//! Comment retention

use once_cell::sync::Lazy;
use regex::Regex;

use crate::frontend::config::CommentPolicy;
use crate::frontend::core::lexer::tokens::{Comment, CommentKind};

static COPYRIGHT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)^!|copyright").ok());
static JSDOC: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"@preserve|@license|@cc_on").ok());
static ANNOTATION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*[#@]\s*source(Mapping)?URL=").ok());

/// Compiled form of a [`CommentPolicy`]
#[derive(Debug, Clone)]
pub enum CommentFilter {
    All,
    None,
    Jsdoc,
    Pattern(Option<Regex>),
}

impl CommentFilter {
    pub fn new(policy: &CommentPolicy) -> Self {
        match policy {
            CommentPolicy::All => CommentFilter::All,
            CommentPolicy::None => CommentFilter::None,
            CommentPolicy::Jsdoc => CommentFilter::Jsdoc,
            CommentPolicy::Copyright => CommentFilter::Pattern(COPYRIGHT.clone()),
            // Invalid patterns are rejected when options are validated
            CommentPolicy::Regex(pattern) => CommentFilter::Pattern(Regex::new(pattern).ok()),
        }
    }

    pub fn keeps(
        &self,
        comment: &Comment,
    ) -> bool {
        match self {
            CommentFilter::All => true,
            CommentFilter::None => false,
            CommentFilter::Jsdoc => {
                comment.kind == CommentKind::Block
                    && JSDOC.as_ref().map_or(false, |re| re.is_match(&comment.value))
            }
            CommentFilter::Pattern(re) => re.as_ref().map_or(false, |re| re.is_match(&comment.value)),
        }
    }

    /// Trailing comments are kept unless they are source map annotations
    pub fn keeps_trailing(
        &self,
        comment: &Comment,
    ) -> bool {
        let annotation = ANNOTATION.as_ref().map_or(false, |re| re.is_match(&comment.value));
        !annotation && self.keeps(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::span::Span;

    fn comment(
        kind: CommentKind,
        value: &str,
    ) -> Comment {
        Comment {
            kind,
            value: value.to_string(),
            span: Span::dummy(),
            nlb: true,
        }
    }

    #[test]
    fn test_copyright_policy() {
        let filter = CommentFilter::new(&CommentPolicy::Copyright);
        assert!(filter.keeps(&comment(CommentKind::Block, " (c) Copyright 2011 ")));
        assert!(filter.keeps(&comment(CommentKind::Line, "! BANG")));
        assert!(!filter.keeps(&comment(CommentKind::Line, " plain note")));
    }

    #[test]
    fn test_jsdoc_policy_needs_block() {
        let filter = CommentFilter::new(&CommentPolicy::Jsdoc);
        assert!(filter.keeps(&comment(CommentKind::Block, " @preserve keep ")));
        assert!(filter.keeps(&comment(CommentKind::Block, "* @license MIT ")));
        assert!(!filter.keeps(&comment(CommentKind::Line, " @preserve")));
        assert!(!filter.keeps(&comment(CommentKind::Block, " Another Copyright ")));
    }

    #[test]
    fn test_custom_pattern() {
        let filter = CommentFilter::new(&CommentPolicy::Regex("keep".into()));
        assert!(filter.keeps(&comment(CommentKind::Line, " keep me")));
        assert!(!filter.keeps(&comment(CommentKind::Line, " drop me")));
    }

    #[test]
    fn test_annotations_are_not_trailing_output() {
        let filter = CommentFilter::new(&CommentPolicy::All);
        assert!(!filter.keeps_trailing(&comment(
            CommentKind::Line,
            "# sourceMappingURL=data:application/json;base64,e30="
        )));
        assert!(filter.keeps_trailing(&comment(CommentKind::Line, " end")));
    }
}
