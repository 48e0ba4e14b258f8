//! Minifier configuration
//!
//! Options for every stage of the pipeline. All structs deserialize from
//! JSON with per-field defaults, so a partial document only overrides what it
//! names.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid regular expression for {field}: {source}")]
    Regex {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

fn default_true() -> bool {
    true
}

/// Parser options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParseOptions {
    /// Disable automatic semicolon insertion
    pub strict_semicolons: bool,
    /// Allow `return` outside of functions
    pub bare_returns: bool,
    /// File name recorded in source maps
    pub source_name: Option<String>,
}

/// Compressor switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    /// Join consecutive statements with the comma operator
    pub sequences: bool,
    /// Rewrite `a["b"]` as `a.b`
    pub properties: bool,
    /// Remove unreachable code
    pub dead_code: bool,
    pub drop_debugger: bool,
    /// Transformations that assume builtins are not redefined
    #[serde(rename = "unsafe")]
    pub unsafe_: bool,
    /// Reverse `<` and `<=` to put the shorter operand first
    pub unsafe_comps: bool,
    /// Fold arithmetic that may lose floating point precision
    pub unsafe_math: bool,
    /// `Array.prototype.x` as `[].x`
    pub unsafe_proto: bool,
    pub conditionals: bool,
    pub comparisons: bool,
    /// Fold constant expressions
    pub evaluate: bool,
    pub booleans: bool,
    pub loops: bool,
    /// Drop unreferenced functions and variables
    pub unused: bool,
    /// Drop unreferenced top-level bindings too
    pub toplevel: bool,
    /// Top-level names kept when `toplevel` is set
    pub top_retain: Vec<String>,
    pub hoist_funs: bool,
    pub hoist_vars: bool,
    pub if_return: bool,
    pub join_vars: bool,
    /// Simplify sequences whose elements feed each other
    pub cascade: bool,
    /// Inline single-use variables into the statement that consumes them
    pub collapse_vars: bool,
    /// Propagate constant top-level and local variable values
    pub reduce_vars: bool,
    /// Drop expressions without side effects
    pub side_effects: bool,
    /// Negate statement-level immediately invoked functions
    pub negate_iife: bool,
    pub drop_console: bool,
    /// Keep unused trailing parameters
    pub keep_fargs: bool,
    /// Keep names of function expressions
    pub keep_fnames: bool,
    /// Assume no legacy engine quirks
    pub screw_ie8: bool,
    /// Minimum number of passes; more run while output keeps shrinking
    pub passes: usize,
    /// Undeclared names replaced by constants
    pub global_defs: IndexMap<String, serde_json::Value>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            sequences: true,
            properties: true,
            dead_code: true,
            drop_debugger: true,
            unsafe_: false,
            unsafe_comps: false,
            unsafe_math: false,
            unsafe_proto: false,
            conditionals: true,
            comparisons: true,
            evaluate: true,
            booleans: true,
            loops: true,
            unused: true,
            toplevel: false,
            top_retain: Vec::new(),
            hoist_funs: true,
            hoist_vars: false,
            if_return: true,
            join_vars: true,
            cascade: true,
            collapse_vars: true,
            reduce_vars: false,
            side_effects: true,
            negate_iife: true,
            drop_console: false,
            keep_fargs: true,
            keep_fnames: false,
            screw_ie8: false,
            passes: 1,
            global_defs: IndexMap::new(),
        }
    }
}

/// Property renaming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PropertyMangleOptions {
    /// Only properties matching this pattern are renamed
    pub regex: Option<String>,
    /// Never rename properties written as quoted keys
    pub keep_quoted: bool,
    /// Property names that are never renamed
    pub reserved: Vec<String>,
    /// Readable `_$name$_` renames
    pub debug: bool,
}

/// Local name mangling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MangleOptions {
    /// Names that are never mangled
    pub reserved: Vec<String>,
    /// Mangle top-level declarations
    pub toplevel: bool,
    pub keep_fnames: bool,
    pub screw_ie8: bool,
    /// Also rename properties; `None` leaves them alone
    #[serde(deserialize_with = "deserialize_properties")]
    pub properties: Option<PropertyMangleOptions>,
}

impl Default for MangleOptions {
    fn default() -> Self {
        Self {
            reserved: vec!["$super".to_string()],
            toplevel: false,
            keep_fnames: false,
            screw_ie8: false,
            properties: None,
        }
    }
}

/// Accept `true`/`false` as shorthand for default/absent property options
fn deserialize_properties<'de, D>(deserializer: D) -> Result<Option<PropertyMangleOptions>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Toggle {
        Flag(bool),
        Options(PropertyMangleOptions),
    }

    Ok(match Option::<Toggle>::deserialize(deserializer)? {
        None | Some(Toggle::Flag(false)) => None,
        Some(Toggle::Flag(true)) => Some(PropertyMangleOptions::default()),
        Some(Toggle::Options(options)) => Some(options),
    })
}

/// Which source comments survive into the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentPolicy {
    All,
    None,
    /// Block comments with `@preserve`, `@license` or `@cc_on`
    Jsdoc,
    /// Comments starting with `!` or mentioning "copyright"
    #[default]
    Copyright,
    /// Comments whose text matches the pattern
    Regex(String),
}

/// Quote preference for string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Whichever quote needs fewer escapes, double on ties
    #[default]
    Auto,
    Single,
    Double,
}

/// Code generator options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Escape every non-ASCII character
    pub ascii_only: bool,
    pub comments: CommentPolicy,
    /// Escape `</script` inside strings
    pub inline_script: bool,
    /// Quote every object literal key
    pub quote_keys: bool,
    /// Keep quotes on keys that were quoted in the source
    pub keep_quoted_props: bool,
    /// Break compact output once a line exceeds this length; 0 disables
    pub max_line_len: usize,
    /// Braces around every single statement body
    pub bracketize: bool,
    /// Separate statements with `;` rather than newlines
    #[serde(default = "default_true")]
    pub semicolons: bool,
    pub beautify: bool,
    pub indent_level: usize,
    pub indent_start: usize,
    /// Space after `:` in beautified object literals
    pub space_colon: bool,
    pub screw_ie8: bool,
    pub quote_style: QuoteStyle,
    /// Keep parentheses around immediately invoked functions
    pub wrap_iife: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            ascii_only: false,
            comments: CommentPolicy::Copyright,
            inline_script: false,
            quote_keys: false,
            keep_quoted_props: false,
            max_line_len: 32 * 1024,
            bracketize: false,
            semicolons: true,
            beautify: false,
            indent_level: 4,
            indent_start: 0,
            space_colon: false,
            screw_ie8: false,
            quote_style: QuoteStyle::Auto,
            wrap_iife: false,
        }
    }
}

/// Source map generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourceMapOptions {
    /// `file` field: name of the generated output
    pub file: Option<String>,
    /// `sourceRoot` field
    pub root: Option<String>,
    /// Map describing the input, as JSON text
    pub input_map: Option<String>,
    /// Embed the original source text
    pub sources_content: bool,
    /// Append `//# sourceMappingURL=` with this URL
    pub map_url: Option<String>,
    /// Append `//# sourceURL=` with this URL
    pub url: Option<String>,
    /// Append the map itself as a base64 data URI
    pub inline: bool,
}

/// Options for the whole pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyOptions {
    pub parse: ParseOptions,
    /// `None` skips compression
    pub compress: Option<CompressOptions>,
    /// `None` skips mangling
    pub mangle: Option<MangleOptions>,
    pub output: OutputOptions,
    /// `None` produces no map
    pub source_map: Option<SourceMapOptions>,
    /// Wrap the output in a function: argument expression → parameter name
    pub enclose: Option<IndexMap<String, String>>,
    /// Lines of source shown around a reported error
    pub error_context_lines: usize,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            compress: Some(CompressOptions::default()),
            mangle: Some(MangleOptions::default()),
            output: OutputOptions::default(),
            source_map: None,
            enclose: None,
            error_context_lines: 8,
        }
    }
}

impl MinifyOptions {
    /// Create default options
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: MinifyOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the fields serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let CommentPolicy::Regex(pattern) = &self.output.comments {
            regex::Regex::new(pattern).map_err(|source| ConfigError::Regex {
                field: "output.comments",
                source,
            })?;
        }
        if let Some(pattern) = self
            .mangle
            .as_ref()
            .and_then(|m| m.properties.as_ref())
            .and_then(|p| p.regex.as_ref())
        {
            regex::Regex::new(pattern).map_err(|source| ConfigError::Regex {
                field: "mangle.properties.regex",
                source,
            })?;
        }
        if self.output.beautify && self.output.indent_level > 16 {
            return Err(ConfigError::Invalid {
                field: "output.indent_level",
                message: format!("{} exceeds the maximum of 16", self.output.indent_level),
            });
        }
        Ok(())
    }

    /// Skip compression
    #[inline]
    pub fn without_compress(mut self) -> Self {
        self.compress = None;
        self
    }

    /// Skip mangling
    #[inline]
    pub fn without_mangle(mut self) -> Self {
        self.mangle = None;
        self
    }

    #[inline]
    pub fn with_output(
        mut self,
        output: OutputOptions,
    ) -> Self {
        self.output = output;
        self
    }

    #[inline]
    pub fn with_source_map(
        mut self,
        source_map: SourceMapOptions,
    ) -> Self {
        self.source_map = Some(source_map);
        self
    }

    /// Mangle and compress top-level bindings too
    pub fn toplevel(mut self) -> Self {
        if let Some(compress) = &mut self.compress {
            compress.toplevel = true;
        }
        if let Some(mangle) = &mut self.mangle {
            mangle.toplevel = true;
        }
        self
    }

    /// Keep function names in both compressor and mangler
    pub fn keep_fnames(mut self) -> Self {
        if let Some(compress) = &mut self.compress {
            compress.keep_fnames = true;
        }
        if let Some(mangle) = &mut self.mangle {
            mangle.keep_fnames = true;
        }
        self
    }

    /// Drop legacy engine workarounds in every stage
    pub fn screw_ie8(mut self) -> Self {
        if let Some(compress) = &mut self.compress {
            compress.screw_ie8 = true;
        }
        if let Some(mangle) = &mut self.mangle {
            mangle.screw_ie8 = true;
        }
        self.output.screw_ie8 = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MinifyOptions::default();
        assert_eq!(options.output.max_line_len, 32768);
        assert_eq!(options.output.comments, CommentPolicy::Copyright);
        assert_eq!(options.mangle.unwrap().reserved, vec!["$super".to_string()]);
        let compress = options.compress.unwrap();
        assert!(compress.keep_fargs);
        assert!(!compress.hoist_vars);
        assert!(!compress.unsafe_);
        assert_eq!(compress.passes, 1);
    }

    #[test]
    fn test_partial_json() {
        let options = MinifyOptions::from_json(
            r#"{"compress": {"unsafe": true, "passes": 3}, "output": {"beautify": true}}"#,
        )
        .unwrap();
        let compress = options.compress.unwrap();
        assert!(compress.unsafe_);
        assert_eq!(compress.passes, 3);
        assert!(compress.sequences);
        assert!(options.output.beautify);
        assert!(options.output.semicolons);
    }

    #[test]
    fn test_disable_stages() {
        let options = MinifyOptions::from_json(r#"{"compress": null, "mangle": null}"#).unwrap();
        assert!(options.compress.is_none());
        assert!(options.mangle.is_none());
    }

    #[test]
    fn test_comment_policies() {
        let options = MinifyOptions::from_json(r#"{"output": {"comments": "all"}}"#).unwrap();
        assert_eq!(options.output.comments, CommentPolicy::All);
        let options =
            MinifyOptions::from_json(r#"{"output": {"comments": {"regex": "(?i)included"}}}"#)
                .unwrap();
        assert_eq!(
            options.output.comments,
            CommentPolicy::Regex("(?i)included".to_string())
        );
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = MinifyOptions::from_json(r#"{"output": {"comments": {"regex": "("}}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Regex { field: "output.comments", .. }));
    }

    #[test]
    fn test_property_toggle() {
        let options =
            MinifyOptions::from_json(r#"{"mangle": {"properties": true}}"#).unwrap();
        assert_eq!(
            options.mangle.unwrap().properties,
            Some(PropertyMangleOptions::default())
        );
        let options =
            MinifyOptions::from_json(r#"{"mangle": {"properties": {"keep_quoted": true}}}"#)
                .unwrap();
        assert!(options.mangle.unwrap().properties.unwrap().keep_quoted);
    }

    #[test]
    fn test_global_defs_keep_order() {
        let options = MinifyOptions::from_json(
            r#"{"compress": {"global_defs": {"NUM": 1234, "BOOL": true, "NULL": null, "STR": "str"}}}"#,
        )
        .unwrap();
        let keys: Vec<_> = options.compress.unwrap().global_defs.keys().cloned().collect();
        assert_eq!(keys, vec!["NUM", "BOOL", "NULL", "STR"]);
    }

    #[test]
    fn test_builders() {
        let options = MinifyOptions::new().toplevel().keep_fnames();
        assert!(options.compress.as_ref().unwrap().toplevel);
        assert!(options.mangle.as_ref().unwrap().keep_fnames);
        let options = MinifyOptions::new().without_mangle().without_compress();
        assert!(options.compress.is_none() && options.mangle.is_none());
    }

    #[test]
    fn test_wrong_type_is_error() {
        assert!(MinifyOptions::from_json(r#"{"output": {"ascii_only": "yes"}}"#).is_err());
    }
}
