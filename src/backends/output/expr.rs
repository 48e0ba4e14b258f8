//! Expression printing

use super::literals::{
    format_name, format_number, needs_extra_dot, property_key, quote_string, to_ascii, KeyForm,
};
use super::parens::{
    callee_has_call, expr_precedence, left_operand_precedence, needs_statement_parens,
    right_operand_precedence,
};
use super::CodeGenerator;
use crate::frontend::core::lexer::state::is_reserved_word;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::pratt::precedence::*;

impl CodeGenerator<'_> {
    /// Print `expr` in a position requiring at least `min_prec`
    ///
    /// `first` is set when the expression's first token also starts the
    /// enclosing statement.
    pub fn generate_expr(
        &mut self,
        expr: &Expr,
        min_prec: u8,
        first: bool,
    ) {
        let prec = expr_precedence(expr, self.out.beautify());
        if prec < min_prec || (first && needs_statement_parens(expr)) {
            self.with_parens(|this| this.print_expr(expr, false));
        } else {
            self.print_expr(expr, first);
        }
    }

    fn print_expr(
        &mut self,
        expr: &Expr,
        first: bool,
    ) {
        match expr {
            Expr::Num { value, span } => {
                self.out.add_mapping(span.start, None);
                self.print_number(*value);
            }
            Expr::Str { value, span } => {
                self.out.add_mapping(span.start, None);
                let text = quote_string(value, self.out.options());
                self.out.print(&text);
            }
            Expr::Regexp {
                pattern,
                flags,
                span,
            } => {
                self.out.add_mapping(span.start, None);
                let pattern = if self.out.options().ascii_only {
                    to_ascii(pattern, false)
                } else {
                    pattern.clone()
                };
                self.out.print_regexp(&format!("/{}/{}", pattern, flags));
            }
            Expr::Bool { value, span } => {
                self.out.add_mapping(span.start, None);
                self.out.print(if *value { "true" } else { "false" });
            }
            Expr::Null(span) => {
                self.out.add_mapping(span.start, None);
                self.out.print("null");
            }
            Expr::This(span) => {
                self.out.add_mapping(span.start, None);
                self.out.print("this");
            }
            Expr::Hole(_) => {}
            Expr::Ident(ident) => self.print_ident(ident),
            Expr::Array { elements, span } => {
                self.out.add_mapping(span.start, None);
                self.out.print("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.out.comma();
                    }
                    self.generate_expr(element, BP_ASSIGN, false);
                }
                // A trailing hole needs its own comma
                if matches!(elements.last(), Some(Expr::Hole(_))) {
                    self.out.comma();
                }
                self.out.print("]");
            }
            Expr::Object { props, span } => {
                self.out.add_mapping(span.start, None);
                if props.is_empty() {
                    self.out.print("{}");
                    return;
                }
                self.with_block(|this| {
                    for (i, prop) in props.iter().enumerate() {
                        if i > 0 {
                            this.out.print(",");
                            this.out.newline();
                        }
                        this.out.indent();
                        this.print_prop(prop);
                    }
                    this.out.newline();
                });
            }
            Expr::Function(func) => self.generate_function(func, true),
            Expr::Unary {
                op,
                prefix: true,
                expr: inner,
                span,
            } => {
                self.out.add_mapping(span.start, None);
                self.out.print(op.as_str());
                let word = op.as_str().starts_with(|c: char| c.is_ascii_alphabetic());
                if word || matches!(op, UnaryOp::Neg | UnaryOp::Plus) {
                    self.out.space();
                }
                self.generate_expr(inner, BP_UNARY, false);
            }
            Expr::Unary {
                op,
                prefix: false,
                expr: inner,
                ..
            } => {
                self.generate_expr(inner, BP_POSTFIX, first);
                self.out.print(op.as_str());
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                self.generate_expr(left, left_operand_precedence(*op), first);
                let closes_comment = op.as_str().starts_with('>')
                    && matches!(
                        left.as_ref(),
                        Expr::Unary {
                            op: UnaryOp::Dec,
                            prefix: false,
                            ..
                        }
                    );
                if closes_comment {
                    // `-->` would start an HTML comment
                    self.out.print(" ");
                } else {
                    self.out.space();
                }
                self.out.print(op.as_str());
                let opens_comment = matches!(op, BinaryOp::Lt | BinaryOp::Shl)
                    && matches!(
                        right.as_ref(),
                        Expr::Unary {
                            op: UnaryOp::Not,
                            prefix: true,
                            expr,
                            ..
                        } if matches!(expr.as_ref(), Expr::Unary { op: UnaryOp::Dec, prefix: true, .. })
                    );
                if opens_comment {
                    // `<!--` would start an HTML comment
                    self.out.print(" ");
                } else {
                    self.out.space();
                }
                self.generate_expr(right, right_operand_precedence(*op), false);
            }
            Expr::Assign {
                op, target, value, ..
            } => {
                self.generate_expr(target, BP_POSTFIX, first);
                self.out.space();
                match op {
                    Some(op) => self.out.print(&format!("{}=", op.as_str())),
                    None => self.out.print("="),
                }
                self.out.space();
                self.generate_expr(value, BP_ASSIGN, false);
            }
            Expr::Conditional { test, cons, alt, .. } => {
                self.generate_expr(test, BP_LOGICAL_OR, first);
                self.out.space();
                self.out.print("?");
                self.out.space();
                self.generate_expr(cons, BP_ASSIGN, false);
                self.out.space();
                self.out.print(":");
                self.out.space();
                self.generate_expr(alt, BP_ASSIGN, false);
            }
            Expr::Call { callee, args, .. } => {
                let wrap_iife =
                    self.out.options().wrap_iife && matches!(callee.as_ref(), Expr::Function(_));
                if wrap_iife {
                    self.with_parens(|this| this.print_expr(callee, false));
                } else {
                    self.generate_expr(callee, BP_CALL, first);
                }
                self.print_args(args);
            }
            Expr::New { callee, args, span } => {
                self.out.add_mapping(span.start, None);
                self.out.print("new");
                self.out.space();
                let prec = expr_precedence(callee, self.out.beautify());
                if prec < BP_CALL || callee_has_call(callee) {
                    self.with_parens(|this| this.print_expr(callee, false));
                } else {
                    self.print_expr(callee, false);
                }
                if !args.is_empty() || self.out.beautify() {
                    self.print_args(args);
                }
            }
            Expr::Dot { object, prop, .. } => {
                self.generate_expr(object, BP_CALL, first);
                if is_reserved_word(prop) && !self.out.options().screw_ie8 {
                    self.out.print("[");
                    let text = quote_string(prop, self.out.options());
                    self.out.print(&text);
                    self.out.print("]");
                    return;
                }
                if let Expr::Num { value, .. } = object.as_ref() {
                    if value.is_finite() && *value >= 0.0 && needs_extra_dot(&format_number(*value)) {
                        self.out.print(".");
                    }
                }
                self.out.print(".");
                let text = format_name(prop, self.out.options());
                self.out.print(&text);
            }
            Expr::Sub { object, prop, .. } => {
                self.generate_expr(object, BP_CALL, first);
                self.out.print("[");
                self.generate_expr(prop, BP_SEQUENCE, false);
                self.out.print("]");
            }
            Expr::Seq { exprs, .. } => {
                for (i, item) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.out.comma();
                    }
                    self.generate_expr(item, BP_ASSIGN, first && i == 0);
                }
            }
        }
    }

    fn print_args(
        &mut self,
        args: &[Expr],
    ) {
        self.out.print("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.comma();
            }
            self.generate_expr(arg, BP_ASSIGN, false);
        }
        self.out.print(")");
    }

    /// NaN and infinities have no literal form
    fn print_number(
        &mut self,
        value: f64,
    ) {
        let text = if value.is_nan() {
            "0/0".to_string()
        } else if value.is_infinite() {
            if value > 0.0 {
                "1/0".to_string()
            } else {
                "-1/0".to_string()
            }
        } else if value == 0.0 && value.is_sign_negative() {
            "-0".to_string()
        } else {
            format_number(value)
        };
        self.out.print(&text);
    }

    fn print_prop(
        &mut self,
        prop: &Prop,
    ) {
        self.out.add_mapping(prop.span.start, Some(&prop.key));
        match &prop.kind {
            PropKind::Init(value) => {
                self.print_key(prop);
                self.out.colon();
                self.generate_expr(value, BP_ASSIGN, false);
            }
            PropKind::Get(func) | PropKind::Set(func) => {
                let keyword = if matches!(prop.kind, PropKind::Get(_)) {
                    "get"
                } else {
                    "set"
                };
                self.out.print(keyword);
                self.out.space();
                self.print_key(prop);
                self.generate_function(func, false);
            }
        }
    }

    fn print_key(
        &mut self,
        prop: &Prop,
    ) {
        let text = match property_key(&prop.key, prop.quoted, self.out.options()) {
            KeyForm::Name(text) | KeyForm::Number(text) | KeyForm::Quoted(text) => text,
        };
        self.out.print(&text);
    }
}
