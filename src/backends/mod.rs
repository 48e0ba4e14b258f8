//! Output backends
//!
//! ```text
//! Program (compressed, mangled)
//!         |
//!         v
//!    CodeGenerator ----> RawMapping*
//!         |                  |
//!         v                  v
//!       code         SourceMapBuilder --> map JSON
//! ```

pub mod output;
pub mod sourcemap;

pub use output::{generate, generate_with_mappings, CodeGenerator, RawMapping};
pub use sourcemap::{generate_with_map, SourceMapConsumer, SourceMapError};
