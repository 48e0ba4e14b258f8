//! Source map generation
//!
//! Builds version 3 source maps from the mappings the code generator
//! records, optionally composed with a map describing the input.

pub mod consumer;
pub mod inline;
pub mod vlq;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backends::output::generate_with_mappings;
use crate::frontend::config::{OutputOptions, SourceMapOptions};
use crate::frontend::core::parser::ast::Program;

pub use consumer::{GeneratedPosition, OriginalPosition, SourceMapConsumer};
pub use inline::inline_map_from_comments;

/// Source name recorded when the program has none
pub const DEFAULT_SOURCE: &str = "?";

#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("invalid source map: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported source map version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid source map mappings: {message}")]
    Mappings { message: String },
}

/// Serialized form of a version 3 map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub mappings: String,
}

/// Prefix `source` with a map's `sourceRoot`
pub fn join_source_root(
    root: &str,
    source: &str,
) -> String {
    if root.is_empty() || source.contains("://") || source.starts_with('/') {
        source.to_string()
    } else if root.ends_with('/') {
        format!("{}{}", root, source)
    } else {
        format!("{}/{}", root, source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mapping {
    gen_line: usize,
    gen_col: usize,
    source: usize,
    orig_line: usize,
    orig_col: usize,
    name: Option<usize>,
}

/// Accumulates mappings and serializes them as a v3 map
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    file: Option<String>,
    root: Option<String>,
    input: Option<SourceMapConsumer>,
    sources: IndexSet<String>,
    names: IndexSet<String>,
    contents: IndexMap<String, String>,
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    pub fn new(
        file: Option<String>,
        root: Option<String>,
    ) -> Self {
        Self {
            file,
            root,
            ..Self::default()
        }
    }

    /// Translate every added mapping through `input`
    pub fn with_input(
        mut self,
        input: SourceMapConsumer,
    ) -> Self {
        self.input = Some(input);
        self
    }

    pub fn input(&self) -> Option<&SourceMapConsumer> {
        self.input.as_ref()
    }

    /// Record that `generated` (1-based line, 0-based column) came from
    /// `original` in `source`
    pub fn add(
        &mut self,
        source: &str,
        generated: (usize, usize),
        original: (usize, usize),
        name: Option<&str>,
    ) {
        let (source, original, name) = match &self.input {
            Some(input) => match input.original_position_for(original.0, original.1) {
                Some(pos) => (pos.source, (pos.line, pos.column), pos.name.or_else(|| name.map(str::to_string))),
                None => return,
            },
            None => (source.to_string(), original, name.map(str::to_string)),
        };
        let (source, _) = self.sources.insert_full(source);
        let name = name.map(|name| self.names.insert_full(name).0);
        self.mappings.push(Mapping {
            gen_line: generated.0,
            gen_col: generated.1,
            source,
            orig_line: original.0,
            orig_col: original.1,
            name,
        });
    }

    pub fn set_source_content(
        &mut self,
        source: &str,
        content: &str,
    ) {
        self.contents.insert(source.to_string(), content.to_string());
    }

    /// Copy embedded sources from the input map for every source in use
    pub fn copy_input_contents(&mut self) {
        let Some(input) = &self.input else {
            return;
        };
        let copied: Vec<(String, String)> = self
            .sources
            .iter()
            .filter_map(|source| input.source_content(source).map(|c| (source.clone(), c.to_string())))
            .collect();
        self.contents.extend(copied);
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    fn encode_mappings(&self) -> String {
        let mut sorted = self.mappings.clone();
        sorted.sort_by_key(|m| (m.gen_line, m.gen_col));

        let mut out = String::new();
        let mut line = 1;
        let mut first_in_line = true;
        let mut prev_col = 0i64;
        let mut prev_source = 0i64;
        let mut prev_orig_line = 0i64;
        let mut prev_orig_col = 0i64;
        let mut prev_name = 0i64;

        for mapping in &sorted {
            while line < mapping.gen_line {
                out.push(';');
                line += 1;
                prev_col = 0;
                first_in_line = true;
            }
            if !first_in_line {
                out.push(',');
            }
            first_in_line = false;

            let col = mapping.gen_col as i64;
            vlq::encode(col - prev_col, &mut out);
            prev_col = col;

            let source = mapping.source as i64;
            vlq::encode(source - prev_source, &mut out);
            prev_source = source;

            let orig_line = mapping.orig_line.saturating_sub(1) as i64;
            vlq::encode(orig_line - prev_orig_line, &mut out);
            prev_orig_line = orig_line;

            let orig_col = mapping.orig_col as i64;
            vlq::encode(orig_col - prev_orig_col, &mut out);
            prev_orig_col = orig_col;

            if let Some(name) = mapping.name {
                let name = name as i64;
                vlq::encode(name - prev_name, &mut out);
                prev_name = name;
            }
        }
        out
    }

    pub fn to_raw(&self) -> RawSourceMap {
        let sources_content = (!self.contents.is_empty()).then(|| {
            self.sources
                .iter()
                .map(|source| self.contents.get(source).cloned())
                .collect()
        });
        RawSourceMap {
            version: 3,
            file: self.file.clone(),
            source_root: self.root.clone(),
            sources: self.sources.iter().cloned().collect(),
            sources_content,
            names: self.names.iter().cloned().collect(),
            mappings: self.encode_mappings(),
        }
    }

    pub fn to_json(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }
}

/// Print `program` together with its source map
///
/// The input map, when given in `options`, must parse.
pub fn generate_with_map(
    program: &Program,
    output: &OutputOptions,
    options: &SourceMapOptions,
) -> Result<(String, String), SourceMapError> {
    let input = match &options.input_map {
        Some(json) => Some(SourceMapConsumer::from_json(json)?),
        None => None,
    };
    generate_with_input(program, output, options, input, None)
}

/// Print `program` with a map composed over `input`, embedding
/// `source_text` when `sources_content` is set
pub fn generate_with_input(
    program: &Program,
    output: &OutputOptions,
    options: &SourceMapOptions,
    input: Option<SourceMapConsumer>,
    source_text: Option<&str>,
) -> Result<(String, String), SourceMapError> {
    let (mut code, mappings) = generate_with_mappings(program, output);
    let source = program.source_name.as_deref().unwrap_or(DEFAULT_SOURCE);

    let mut builder = SourceMapBuilder::new(options.file.clone(), options.root.clone());
    let composed = input.is_some();
    if let Some(input) = input {
        builder = builder.with_input(input);
    }
    for mapping in &mappings {
        builder.add(
            source,
            (mapping.gen_line, mapping.gen_col),
            (mapping.original.line, mapping.original.column),
            mapping.name.as_deref(),
        );
    }
    if options.sources_content {
        if composed {
            builder.copy_input_contents();
        } else if let Some(text) = source_text {
            builder.set_source_content(source, text);
        }
    }
    tracing::debug!("source map with {} mappings", builder.mapping_count());

    let map = builder.to_json()?;
    append_annotations(&mut code, &map, options);
    Ok((code, map))
}

fn append_annotations(
    code: &mut String,
    map: &str,
    options: &SourceMapOptions,
) {
    if options.inline {
        code.push_str("\n//# sourceMappingURL=data:application/json;charset=utf-8;base64,");
        code.push_str(&STANDARD.encode(map));
    } else if let Some(url) = &options.map_url {
        code.push_str("\n//# sourceMappingURL=");
        code.push_str(url);
    }
    if let Some(url) = &options.url {
        code.push_str("\n//# sourceURL=");
        code.push_str(url);
    }
}
