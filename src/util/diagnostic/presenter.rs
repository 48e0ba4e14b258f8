//! Human readable error reports
//!
//! ```text
//! Unexpected token punc «)», expected expression (2:8)
//!      1 function f() {
//! =>   2   return );
//!      3 }
//! ```

use owo_colors::OwoColorize;

use super::MinifyError;
use crate::util::span::SourceFile;

/// Appended to errors caused by syntax the grammar does not cover
pub const UNSUPPORTED_HINT: &str = "Only ECMAScript 5 is supported; transpile newer syntax before minifying.";

/// Presenter configuration
#[derive(Debug, Clone)]
pub struct PresenterConfig {
    /// Lines of source shown on each side of the offending line
    pub context_lines: usize,
    /// Color the marker and message
    pub use_colors: bool,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            context_lines: 8,
            use_colors: false,
        }
    }
}

/// Renders a [`MinifyError`] against the source it came from
#[derive(Debug, Clone, Default)]
pub struct ErrorPresenter {
    config: PresenterConfig,
}

impl ErrorPresenter {
    pub fn new(config: PresenterConfig) -> Self {
        Self { config }
    }

    pub fn with_context_lines(
        mut self,
        lines: usize,
    ) -> Self {
        self.config.context_lines = lines;
        self
    }

    pub fn with_colors(
        mut self,
        use_colors: bool,
    ) -> Self {
        self.config.use_colors = use_colors;
        self
    }

    /// Header line, hint and source excerpt
    pub fn render(
        &self,
        error: &MinifyError,
        source: &SourceFile,
    ) -> String {
        let mut output = self.render_header(error);
        output.push('\n');
        if error.is_unsupported() {
            output.push_str("--\n");
            output.push_str(UNSUPPORTED_HINT);
            output.push('\n');
        }
        if let Some(position) = error.position() {
            output.push_str(&self.render_context(source, position.line));
        }
        output
    }

    fn render_header(
        &self,
        error: &MinifyError,
    ) -> String {
        let message = error.to_string();
        let header = match error.position() {
            Some(position) => format!("{} ({}:{})", message, position.line, position.column),
            None => message,
        };
        if self.config.use_colors {
            header.red().bold().to_string()
        } else {
            header
        }
    }

    /// Lines around `line`, numbered, the offending one marked with `=>`
    fn render_context(
        &self,
        source: &SourceFile,
        line: usize,
    ) -> String {
        if self.config.context_lines == 0 || source.line(line).is_none() {
            return String::new();
        }
        let first = line.saturating_sub(self.config.context_lines).max(1);
        let last = (line + self.config.context_lines).min(source.line_count());
        let width = last.to_string().len();

        let mut output = String::new();
        for number in first..=last {
            let Some(text) = source.line(number) else {
                break;
            };
            let row = format!("{:>width$} {}", number, text, width = width);
            if number == line {
                if self.config.use_colors {
                    output.push_str(&format!("{} {}\n", "=>".red().bold(), row.bold()));
                } else {
                    output.push_str(&format!("=> {}\n", row));
                }
            } else {
                output.push_str(&format!("   {}\n", row));
            }
        }
        output
    }
}
