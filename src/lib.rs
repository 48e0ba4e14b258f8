//! Squeeze: a minifier for ECMAScript 5
//!
//! Parses a program, simplifies it, renames local bindings to short names and
//! prints it back as compact source, optionally with a version 3 source map.
//!
//! # Example
//!
//! ```
//! use squeeze::{minify, MinifyOptions};
//!
//! let out = minify("function add(first, second) { return first + second; }", &MinifyOptions::default()).unwrap();
//! assert!(out.code.starts_with("function add("));
//! assert!(!out.code.contains("first"));
//! assert!(out.map.is_none());
//! ```

#![doc(html_root_url = "https://docs.rs/squeeze")]
#![warn(rust_2018_idioms)]

pub mod backends;
pub mod frontend;
pub mod middle;

// Utility modules
pub mod util;

// Re-exports
pub use backends::output::generate;
pub use backends::sourcemap::{generate_with_map, SourceMapError};
pub use frontend::config::{
    CommentPolicy, CompressOptions, ConfigError, MangleOptions, MinifyOptions, OutputOptions, ParseOptions,
    PropertyMangleOptions, SourceMapOptions,
};
pub use frontend::core::parser::{parse, ParseError, Program};
pub use middle::{compress, mangle, resolve_scopes, wrap_enclose, ScopeError};
pub use util::diagnostic::{ErrorPresenter, MinifyError};

use backends::sourcemap::{generate_with_input, inline_map_from_comments, SourceMapConsumer};
use tracing::debug;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const NAME: &str = "squeeze";

/// Minified code and, when requested, its source map as JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyOutput {
    pub code: String,
    pub map: Option<String>,
}

/// Run the whole pipeline over `source`
///
/// parse, resolve scopes, compress, mangle, enclose, then print. A source map
/// is produced when `options.source_map` is set; without an explicit input
/// map, one inlined at the end of `source` is picked up.
pub fn minify(
    source: &str,
    options: &MinifyOptions,
) -> Result<MinifyOutput, MinifyError> {
    options.validate()?;
    debug!("minifying {} bytes", source.len());

    let mut program = parse(source, &options.parse)?;
    resolve_scopes(&mut program)?;

    if let Some(compress_options) = &options.compress {
        let mut compress_options = compress_options.clone();
        // A negated IIFE would lose the parentheses the output asks for
        if options.output.wrap_iife {
            compress_options.negate_iife = false;
        }
        compress(&mut program, &compress_options)?;
    }

    if let Some(mangle_options) = &options.mangle {
        mangle(&mut program, mangle_options)?;
    }

    if let Some(pairs) = &options.enclose {
        wrap_enclose(&mut program, pairs)?;
    }

    let Some(map_options) = &options.source_map else {
        let code = generate(&program, &options.output);
        debug!("minified to {} bytes", code.len());
        return Ok(MinifyOutput { code, map: None });
    };

    let input = match &map_options.input_map {
        Some(json) => Some(SourceMapConsumer::from_json(json)?),
        None => inline_map_from_comments(&program.trailing_comments),
    };
    let (code, map) = generate_with_input(&program, &options.output, map_options, input, Some(source))?;
    debug!("minified to {} bytes with a {} byte map", code.len(), map.len());
    Ok(MinifyOutput { code, map: Some(map) })
}

/// Run the pipeline, returning only the code
pub fn minify_code(
    source: &str,
    options: &MinifyOptions,
) -> Result<String, MinifyError> {
    minify(source, options).map(|output| output.code)
}
