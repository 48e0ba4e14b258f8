//! Output buffer
//!
//! Spaces and semicolons are decided lazily: `space()` and `semicolon()` only
//! record that one may be needed, and the next `print()` resolves it against
//! the first character it is about to write.

use crate::frontend::config::OutputOptions;
use crate::frontend::core::lexer::literals::is_identifier_char;
use crate::util::span::Position;

/// A generated position paired with the original one
#[derive(Debug, Clone, PartialEq)]
pub struct RawMapping {
    /// 1-based generated line
    pub gen_line: usize,
    /// 0-based generated column
    pub gen_col: usize,
    pub original: Position,
    pub name: Option<String>,
}

/// Break point recorded after `; , { }` when `max_line_len` is set
#[derive(Debug, Clone, Copy)]
struct BreakPoint {
    byte: usize,
    line: usize,
    col: usize,
}

pub struct OutputStream<'o> {
    options: &'o OutputOptions,
    out: String,
    line: usize,
    col: usize,
    indentation: usize,
    last_char: Option<char>,
    last_was_regexp: bool,
    might_need_space: bool,
    might_need_semicolon: bool,
    break_requested: bool,
    break_point: Option<BreakPoint>,
    pending_mapping: Option<(Position, Option<String>)>,
    mappings: Option<Vec<RawMapping>>,
}

/// Characters that would continue a statement if a semicolon became a newline
fn requires_semicolon(c: char) -> bool {
    matches!(c, '(' | '[' | '+' | '*' | '/' | '-' | ',' | '.')
}

impl<'o> OutputStream<'o> {
    pub fn new(
        options: &'o OutputOptions,
        track_mappings: bool,
    ) -> Self {
        Self {
            options,
            out: String::new(),
            line: 1,
            col: 0,
            indentation: options.indent_start,
            last_char: None,
            last_was_regexp: false,
            might_need_space: false,
            might_need_semicolon: false,
            break_requested: false,
            break_point: None,
            pending_mapping: None,
            mappings: track_mappings.then(Vec::new),
        }
    }

    pub fn options(&self) -> &OutputOptions {
        self.options
    }

    pub fn beautify(&self) -> bool {
        self.options.beautify
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn last_char(&self) -> Option<char> {
        self.last_char
    }

    pub fn print(
        &mut self,
        text: &str,
    ) {
        let first = text.chars().next();

        if self.might_need_semicolon {
            self.might_need_semicolon = false;
            let closes = matches!(first, Some(';') | Some('}'));
            if !closes && self.last_char != Some(';') {
                if self.options.semicolons || first.map_or(false, requires_semicolon) {
                    self.push(";");
                } else {
                    self.push("\n");
                }
                if !self.options.beautify {
                    self.might_need_space = false;
                }
            }
        }

        if self.break_requested {
            self.break_requested = false;
            self.ensure_line_len();
            self.break_point = Some(BreakPoint {
                byte: self.out.len(),
                line: self.line,
                col: self.col,
            });
        }

        if let (Some(first), Some(prev)) = (first, self.last_char) {
            let needs_space = if self.might_need_space {
                (is_identifier_char(prev) && (is_identifier_char(first) || first == '\\'))
                    || (matches!(first, '+' | '-' | '/') && first == prev)
            } else {
                false
            };
            // `/re/in x` would read `in` as flags
            let after_regexp = self.last_was_regexp && (is_identifier_char(first) || first == '\\');
            if needs_space || after_regexp {
                self.push(" ");
            }
        }
        if first.is_some() {
            self.might_need_space = false;
            self.last_was_regexp = false;
        }

        if let Some((original, name)) = self.pending_mapping.take() {
            if let Some(mappings) = &mut self.mappings {
                mappings.push(RawMapping {
                    gen_line: self.line,
                    gen_col: self.col,
                    original,
                    name,
                });
            }
        }

        self.push(text);
    }

    fn push(
        &mut self,
        text: &str,
    ) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += c.len_utf16();
            }
        }
        if let Some(c) = text.chars().last() {
            self.last_char = Some(c);
        }
        self.out.push_str(text);
    }

    /// Print a regular expression literal
    pub fn print_regexp(
        &mut self,
        text: &str,
    ) {
        self.print(text);
        self.last_was_regexp = true;
    }

    pub fn space(&mut self) {
        if self.options.beautify {
            self.print(" ");
        } else {
            self.might_need_space = true;
        }
    }

    pub fn semicolon(&mut self) {
        if self.options.beautify {
            self.print(";");
        } else {
            self.might_need_semicolon = true;
        }
    }

    pub fn force_semicolon(&mut self) {
        self.print(";");
    }

    pub fn comma(&mut self) {
        self.print(",");
        self.space();
        self.request_break();
    }

    pub fn colon(&mut self) {
        self.print(":");
        if self.options.beautify && self.options.space_colon {
            self.space();
        }
    }

    /// Line break in beautified output, a break opportunity otherwise
    pub fn newline(&mut self) {
        if self.options.beautify {
            self.print("\n");
        } else {
            self.request_break();
        }
    }

    fn request_break(&mut self) {
        if !self.options.beautify && self.options.max_line_len > 0 {
            self.break_requested = true;
        }
    }

    pub fn indent(&mut self) {
        if self.options.beautify {
            let pad = " ".repeat(self.indentation);
            self.print(&pad);
        }
    }

    pub fn increase_indent(&mut self) {
        self.indentation += self.options.indent_level;
    }

    pub fn decrease_indent(&mut self) {
        self.indentation = self.indentation.saturating_sub(self.options.indent_level);
    }

    /// Break opportunity after a closing brace
    pub fn after_block(&mut self) {
        self.request_break();
    }

    /// Map the next printed token back to `original`
    pub fn add_mapping(
        &mut self,
        original: Position,
        name: Option<&str>,
    ) {
        if self.mappings.is_some() && original.line > 0 {
            self.pending_mapping = Some((original, name.map(str::to_string)));
        }
    }

    /// Move the text after the last break point onto a new line once the
    /// current line is too long
    fn ensure_line_len(&mut self) {
        let max = self.options.max_line_len;
        if max == 0 || self.col <= max {
            return;
        }
        let Some(point) = self.break_point.take() else {
            tracing::trace!("line {} exceeds {} columns", self.line, max);
            return;
        };
        if point.line != self.line || point.byte >= self.out.len() {
            return;
        }
        self.out.insert(point.byte, '\n');
        self.line += 1;
        self.col -= point.col;
        if let Some(mappings) = &mut self.mappings {
            for mapping in mappings
                .iter_mut()
                .filter(|m| m.gen_line == point.line && m.gen_col >= point.col)
            {
                mapping.gen_line += 1;
                mapping.gen_col -= point.col;
            }
        }
    }

    /// Flush a pending semicolon and apply the last line-length check
    pub fn finish(mut self) -> (String, Vec<RawMapping>) {
        self.print("");
        self.ensure_line_len();
        (self.out, self.mappings.unwrap_or_default())
    }
}
