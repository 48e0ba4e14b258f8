//! Statement printing

use super::literals::{format_binding_name, quote_string};
use super::parens::contains_in;
use super::CodeGenerator;
use crate::frontend::core::lexer::tokens::CommentKind;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::pratt::precedence::{BP_ASSIGN, BP_POSTFIX, BP_SEQUENCE};
use crate::util::span::Span;

impl CodeGenerator<'_> {
    /// Print a statement list
    ///
    /// Empty statements are skipped. Top-level statements are separated by
    /// a blank line in beautified output.
    pub fn generate_body(
        &mut self,
        body: &[Stmt],
        toplevel: bool,
        allow_directives: bool,
    ) {
        let saved = std::mem::replace(&mut self.in_directives, allow_directives);
        let printed: Vec<&Stmt> = body.iter().filter(|stmt| !matches!(stmt, Stmt::Empty(_))).collect();
        let last = printed.len().saturating_sub(1);
        for (i, stmt) in printed.into_iter().enumerate() {
            let string_stmt = matches!(
                stmt,
                Stmt::Expr {
                    expr: Expr::Str { .. },
                    ..
                }
            );
            if !matches!(stmt, Stmt::Directive { .. }) && !string_stmt {
                self.in_directives = false;
            }
            self.out.indent();
            self.generate_stmt(stmt);
            if string_stmt {
                self.in_directives = false;
            }
            self.separate(i, last, toplevel);
        }
        self.in_directives = saved;
    }

    fn separate(
        &mut self,
        i: usize,
        last: usize,
        toplevel: bool,
    ) {
        if !(i == last && toplevel) {
            self.out.newline();
            if toplevel {
                self.out.newline();
            }
        }
    }

    pub fn generate_stmt(
        &mut self,
        stmt: &Stmt,
    ) {
        self.print_comments(stmt.span());
        self.out.add_mapping(stmt.span().start, None);

        match stmt {
            Stmt::Directive { value, .. } => {
                let text = quote_string(value, self.out.options());
                self.out.print(&text);
                self.out.semicolon();
            }
            Stmt::Expr { expr, .. } => {
                if self.in_directives && matches!(expr, Expr::Str { .. }) {
                    self.with_parens(|this| this.generate_expr(expr, BP_SEQUENCE, false));
                } else {
                    self.generate_expr(expr, BP_SEQUENCE, true);
                }
                self.out.semicolon();
            }
            Stmt::Block { body, .. } => self.print_braced(body, false),
            Stmt::Empty(_) => self.out.semicolon(),
            Stmt::Debugger(_) => {
                self.out.print("debugger");
                self.out.semicolon();
            }
            Stmt::Labeled { label, body, .. } => {
                let text = format_binding_name(&label.name, self.out.options());
                self.out.print(&text);
                self.out.colon();
                self.force_statement(body);
            }
            Stmt::If { test, cons, alt, .. } => {
                self.out.print("if");
                self.out.space();
                self.with_parens(|this| this.generate_expr(test, BP_SEQUENCE, false));
                self.out.space();
                match alt {
                    Some(alt) => {
                        self.make_then(cons);
                        self.out.space();
                        self.out.print("else");
                        self.out.space();
                        match alt.as_ref() {
                            Stmt::If { .. } => self.generate_stmt(alt),
                            other => self.force_statement(other),
                        }
                    }
                    None => self.force_statement(cons),
                }
            }
            Stmt::While { test, body, .. } => {
                self.out.print("while");
                self.out.space();
                self.with_parens(|this| this.generate_expr(test, BP_SEQUENCE, false));
                self.out.space();
                self.force_statement(body);
            }
            Stmt::DoWhile { body, test, .. } => {
                self.out.print("do");
                self.out.space();
                self.make_block(body);
                self.out.space();
                self.out.print("while");
                self.out.space();
                self.with_parens(|this| this.generate_expr(test, BP_SEQUENCE, false));
                self.out.semicolon();
            }
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                self.out.print("for");
                self.out.space();
                self.with_parens(|this| {
                    match init {
                        Some(ForInit::Var(decl)) => {
                            this.generate_var_decl(decl, true);
                            this.out.print(";");
                            this.out.space();
                        }
                        Some(ForInit::Expr(expr)) => {
                            this.generate_no_in(expr, BP_SEQUENCE);
                            this.out.print(";");
                            this.out.space();
                        }
                        None => this.out.print(";"),
                    }
                    match test {
                        Some(test) => {
                            this.generate_expr(test, BP_SEQUENCE, false);
                            this.out.print(";");
                            this.out.space();
                        }
                        None => this.out.print(";"),
                    }
                    if let Some(update) = update {
                        this.generate_expr(update, BP_SEQUENCE, false);
                    }
                });
                self.out.space();
                self.force_statement(body);
            }
            Stmt::ForIn {
                left, object, body, ..
            } => {
                self.out.print("for");
                self.out.space();
                self.with_parens(|this| {
                    match left {
                        ForInLeft::Var(decl) => this.generate_var_decl(decl, true),
                        ForInLeft::Expr(expr) => this.generate_expr(expr, BP_POSTFIX, false),
                    }
                    this.out.space();
                    this.out.print("in");
                    this.out.space();
                    this.generate_expr(object, BP_SEQUENCE, false);
                });
                self.out.space();
                self.force_statement(body);
            }
            Stmt::With { object, body, .. } => {
                self.out.print("with");
                self.out.space();
                self.with_parens(|this| this.generate_expr(object, BP_SEQUENCE, false));
                self.out.space();
                self.force_statement(body);
            }
            Stmt::Switch {
                discriminant, cases, ..
            } => {
                self.out.print("switch");
                self.out.space();
                self.with_parens(|this| this.generate_expr(discriminant, BP_SEQUENCE, false));
                self.out.space();
                if cases.is_empty() {
                    self.out.print("{}");
                } else {
                    self.with_block(|this| this.generate_cases(cases));
                }
            }
            Stmt::Return { value, .. } => {
                self.out.print("return");
                if let Some(value) = value {
                    self.out.space();
                    self.generate_expr(value, BP_SEQUENCE, false);
                }
                self.out.semicolon();
            }
            Stmt::Throw { value, .. } => {
                self.out.print("throw");
                self.out.space();
                self.generate_expr(value, BP_SEQUENCE, false);
                self.out.semicolon();
            }
            Stmt::Break { label, .. } | Stmt::Continue { label, .. } => {
                let keyword = if matches!(stmt, Stmt::Break { .. }) {
                    "break"
                } else {
                    "continue"
                };
                self.out.print(keyword);
                if let Some(label) = label {
                    self.out.space();
                    let text = format_binding_name(&label.name, self.out.options());
                    self.out.print(&text);
                }
                self.out.semicolon();
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.out.print("try");
                self.out.space();
                self.print_braced(block, false);
                if let Some(handler) = handler {
                    self.out.space();
                    self.out.add_mapping(handler.span.start, None);
                    self.out.print("catch");
                    self.out.space();
                    self.with_parens(|this| this.print_ident(&handler.param));
                    self.out.space();
                    self.print_braced(&handler.body, false);
                }
                if let Some(finalizer) = finalizer {
                    self.out.space();
                    self.out.print("finally");
                    self.out.space();
                    self.print_braced(finalizer, false);
                }
            }
            Stmt::Var(decl) => {
                self.generate_var_decl(decl, false);
                self.out.semicolon();
            }
            Stmt::Function(func) => self.generate_function(func, true),
        }
    }

    fn generate_cases(
        &mut self,
        cases: &[SwitchCase],
    ) {
        let last = cases.len() - 1;
        for (i, case) in cases.iter().enumerate() {
            self.out.indent();
            self.out.add_mapping(case.span.start, None);
            match &case.test {
                Some(test) => {
                    self.out.print("case");
                    self.out.space();
                    self.generate_expr(test, BP_SEQUENCE, false);
                    self.out.print(":");
                }
                None => self.out.print("default:"),
            }
            self.out.newline();
            self.out.increase_indent();
            for stmt in case.body.iter().filter(|stmt| !matches!(stmt, Stmt::Empty(_))) {
                self.out.indent();
                self.generate_stmt(stmt);
                self.out.newline();
            }
            self.out.decrease_indent();
            if i < last && !case.body.is_empty() {
                self.out.newline();
            }
        }
    }

    /// `var a = 1, b`; inside a `for` head, initializers holding a bare `in`
    /// are parenthesized
    pub fn generate_var_decl(
        &mut self,
        decl: &VarDecl,
        in_for: bool,
    ) {
        self.out.print(decl.kind.as_str());
        self.out.space();
        for (i, def) in decl.defs.iter().enumerate() {
            if i > 0 {
                self.out.comma();
            }
            self.print_ident(&def.name);
            if let Some(value) = &def.value {
                self.out.space();
                self.out.print("=");
                self.out.space();
                if in_for {
                    self.generate_no_in(value, BP_ASSIGN);
                } else {
                    self.generate_expr(value, BP_ASSIGN, false);
                }
            }
        }
    }

    fn generate_no_in(
        &mut self,
        expr: &Expr,
        min_prec: u8,
    ) {
        if contains_in(expr) {
            self.with_parens(|this| this.generate_expr(expr, BP_SEQUENCE, false));
        } else {
            self.generate_expr(expr, min_prec, false);
        }
    }

    /// `function name(params) { body }`; accessors omit the keyword and name
    pub fn generate_function(
        &mut self,
        func: &Function,
        keyword: bool,
    ) {
        self.out.add_mapping(func.span.start, None);
        if keyword {
            self.out.print("function");
            if let Some(name) = &func.name {
                self.out.space();
                self.print_ident(name);
            }
        }
        self.out.print("(");
        for (i, param) in func.params.iter().enumerate() {
            if i > 0 {
                self.out.comma();
            }
            self.print_ident(param);
        }
        self.out.print(")");
        self.out.space();
        self.print_braced(&func.body, true);
    }

    fn print_braced(
        &mut self,
        body: &[Stmt],
        allow_directives: bool,
    ) {
        if body.iter().all(|stmt| matches!(stmt, Stmt::Empty(_))) {
            self.out.print("{}");
            self.out.after_block();
        } else {
            self.with_block(|this| this.generate_body(body, false, allow_directives));
        }
    }

    /// A loop or branch body: `;` for an empty one, braces when bracketizing
    fn force_statement(
        &mut self,
        stmt: &Stmt,
    ) {
        if self.out.options().bracketize {
            self.make_block(stmt);
        } else if matches!(stmt, Stmt::Empty(_)) {
            self.out.force_semicolon();
        } else {
            self.generate_stmt(stmt);
        }
    }

    fn make_block(
        &mut self,
        stmt: &Stmt,
    ) {
        match stmt {
            Stmt::Block { body, .. } => self.print_braced(body, false),
            Stmt::Empty(_) => self.print_braced(&[], false),
            other => self.with_block(|this| {
                this.out.indent();
                this.generate_stmt(other);
                this.out.newline();
            }),
        }
    }

    /// The `then` branch of an `if` with an `else`
    ///
    /// Braces are required when the branch ends in an `if` without `else`,
    /// which would otherwise capture the outer `else`.
    fn make_then(
        &mut self,
        cons: &Stmt,
    ) {
        let options = self.out.options();
        if options.bracketize || (!options.screw_ie8 && matches!(cons, Stmt::DoWhile { .. })) {
            self.make_block(cons);
            return;
        }
        let mut tail = cons;
        loop {
            tail = match tail {
                Stmt::If { alt: None, .. } => {
                    self.make_block(cons);
                    return;
                }
                Stmt::If { alt: Some(alt), .. } => alt,
                Stmt::Labeled { body, .. }
                | Stmt::While { body, .. }
                | Stmt::For { body, .. }
                | Stmt::ForIn { body, .. }
                | Stmt::With { body, .. } => body,
                _ => break,
            };
        }
        self.force_statement(cons);
    }

    /// Retained comments owned by the first token of a statement
    fn print_comments(
        &mut self,
        span: Span,
    ) {
        if span.start.line == 0 || !self.printed_comments.insert(span.start.offset) {
            return;
        }
        let program = self.program;
        let Some(leading) = program.comments.get(&span.start.offset) else {
            return;
        };
        let kept: Vec<_> = leading.comments.iter().filter(|c| self.filter.keeps(c)).collect();
        let Some(first) = kept.first() else {
            return;
        };

        if !self.out.beautify() && first.kind == CommentKind::Line && first.nlb && self.out.col() != 0 {
            self.out.print("\n");
            self.out.indent();
        }
        for comment in kept {
            match comment.kind {
                CommentKind::Line => {
                    self.out.print(&format!("//{}\n", comment.value));
                    self.out.indent();
                }
                CommentKind::Block => {
                    self.out.print(&format!("/*{}*/", comment.value));
                    if leading.nlb {
                        self.out.print("\n");
                        self.out.indent();
                    } else {
                        self.out.space();
                    }
                }
            }
        }
    }
}
