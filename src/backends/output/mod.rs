//! Code generation
//!
//! Prints a [`Program`] back to source text. Identifiers print their mangled
//! names through the scope arena, parentheses are inserted on demand and
//! retained comments are emitted before the statement owning them.

pub mod comments;
pub mod expr;
pub mod literals;
pub mod parens;
pub mod stmt;
pub mod stream;
#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::frontend::config::OutputOptions;
use crate::frontend::core::lexer::tokens::CommentKind;
use crate::frontend::core::parser::ast::{Expr, Ident, Program, Stmt};
use crate::frontend::core::parser::pratt::precedence::BP_SEQUENCE;
use comments::CommentFilter;
use literals::format_binding_name;

pub use stream::{OutputStream, RawMapping};

/// Print `program` as compact or beautified source
///
/// # Example
/// ```
/// use squeeze::frontend::config::{OutputOptions, ParseOptions};
/// use squeeze::frontend::core::parser::parse;
/// use squeeze::backends::output::generate;
///
/// let program = parse("var  a = 1 ;", &ParseOptions::default()).unwrap();
/// assert_eq!(generate(&program, &OutputOptions::default()), "var a=1;");
/// ```
pub fn generate(
    program: &Program,
    options: &OutputOptions,
) -> String {
    CodeGenerator::new(program, options, false).generate().0
}

/// Print `program` and collect a mapping for every token with a known origin
pub fn generate_with_mappings(
    program: &Program,
    options: &OutputOptions,
) -> (String, Vec<RawMapping>) {
    CodeGenerator::new(program, options, true).generate()
}

/// Compact text of a detached expression, used for size comparisons
pub fn expr_to_string(
    expr: &Expr,
    options: &OutputOptions,
) -> String {
    let program = Program::default();
    let mut generator = CodeGenerator::new(&program, options, false);
    generator.generate_expr(expr, BP_SEQUENCE, false);
    generator.out.finish().0
}

/// Compact text of detached statements
pub fn stmts_to_string(
    body: &[Stmt],
    options: &OutputOptions,
) -> String {
    let program = Program::default();
    let mut generator = CodeGenerator::new(&program, options, false);
    generator.generate_body(body, false, false);
    generator.out.finish().0
}

/// Printing state for one program
pub struct CodeGenerator<'a> {
    program: &'a Program,
    out: OutputStream<'a>,
    filter: CommentFilter,
    /// Token offsets whose comments were already printed
    printed_comments: HashSet<usize>,
    /// Still inside a directive prologue
    in_directives: bool,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(
        program: &'a Program,
        options: &'a OutputOptions,
        track_mappings: bool,
    ) -> Self {
        Self {
            program,
            out: OutputStream::new(options, track_mappings),
            filter: CommentFilter::new(&options.comments),
            printed_comments: HashSet::new(),
            in_directives: false,
        }
    }

    pub fn generate(mut self) -> (String, Vec<RawMapping>) {
        tracing::debug!("generating code for {} statements", self.program.body.len());
        let program = self.program;
        self.generate_body(&program.body, true, true);
        self.generate_trailing_comments();
        self.out.finish()
    }

    fn generate_trailing_comments(&mut self) {
        let program = self.program;
        for comment in &program.trailing_comments {
            if !self.filter.keeps_trailing(comment) {
                continue;
            }
            if self.out.col() != 0 {
                self.out.print("\n");
            }
            self.out.print(&comment.text());
            if comment.kind == CommentKind::Line {
                self.out.print("\n");
            }
        }
    }

    /// Print an identifier under its output name
    fn print_ident(
        &mut self,
        ident: &Ident,
    ) {
        let program = self.program;
        let name = match ident.def.and_then(|id| program.scopes.get_symbol(id)) {
            Some(def) if def.name == ident.name => def.output_name(),
            _ => ident.name.as_str(),
        };
        let text = format_binding_name(name, self.out.options());
        self.out.add_mapping(ident.span.start, Some(&ident.name));
        self.out.print(&text);
    }

    fn with_parens(
        &mut self,
        f: impl FnOnce(&mut Self),
    ) {
        self.out.print("(");
        f(self);
        self.out.print(")");
    }

    /// `{`, an indented body, `}`
    fn with_block(
        &mut self,
        f: impl FnOnce(&mut Self),
    ) {
        self.out.print("{");
        self.out.newline();
        self.out.increase_indent();
        f(self);
        self.out.decrease_indent();
        self.out.indent();
        self.out.print("}");
        self.out.after_block();
    }
}
