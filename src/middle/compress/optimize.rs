//! Per-node rewrites
//!
//! Children are optimized before their parent. A node produced by a
//! rewrite is not visited again in the same pass; the next pass picks it
//! up.

use super::evaluate::{number_to_string, ConstValue};
use super::helpers::{
    access_root, contains_loop_control, detach_callee, drop_side_effect_free, extract_declarations,
    is_boolean, is_detached_callee, is_number, is_string, is_undeclared_global, same_text,
};
use super::hoist::{hoist_functions, hoist_vars};
use super::Compressor;
use crate::frontend::core::lexer::literals::is_identifier_name;
use crate::frontend::core::lexer::state::is_reserved_word;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::pratt::precedence::binary_precedence;
use crate::util::span::Span;

/// A single statement in a body position: blocks of one statement unwrap
fn simplify_body(stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::Block { mut body, span } => {
            body.retain(|s| !s.is_empty());
            match body.len() {
                0 => Stmt::Empty(span),
                1 if !matches!(body[0], Stmt::Function(_)) => body.remove(0),
                _ => Stmt::Block { body, span },
            }
        }
        other => other,
    }
}

fn take_expr(expr: &mut Expr) -> Expr {
    std::mem::replace(expr, Expr::Hole(Span::dummy()))
}

fn take_stmt(stmt: &mut Stmt) -> Stmt {
    std::mem::replace(stmt, Stmt::Empty(Span::dummy()))
}

/// `!0` or `!1`
fn boolean_literal(
    value: bool,
    span: Span,
) -> Expr {
    Expr::not(Expr::num(if value { 0.0 } else { 1.0 }, span))
}

impl Compressor<'_> {
    pub(super) fn optimize_toplevel(
        &mut self,
        body: &mut Vec<Stmt>,
    ) {
        if self.options.hoist_funs {
            hoist_functions(body);
        }
        self.optimize_stmts(body, false);
    }

    fn optimize_stmts(
        &mut self,
        body: &mut Vec<Stmt>,
        function_body: bool,
    ) {
        for stmt in body.iter_mut() {
            self.optimize_stmt(stmt);
        }
        self.tighten_body(body, function_body);
    }

    fn optimize_function(
        &mut self,
        func: &mut Function,
    ) {
        let tainted = func.scope.map_or(true, |scope| self.scopes.scope(scope).is_tainted());
        if self.options.hoist_funs {
            hoist_functions(&mut func.body);
        }
        if self.options.hoist_vars && !tainted {
            hoist_vars(func);
        }
        self.optimize_stmts(&mut func.body, true);
    }

    fn optimize_stmt(
        &mut self,
        stmt: &mut Stmt,
    ) {
        match stmt {
            Stmt::Expr { expr, .. } => self.optimize_expr(expr),
            Stmt::Block { body, .. } => self.optimize_stmts(body, false),
            Stmt::Labeled { body, .. } => self.optimize_stmt(body),
            Stmt::If { test, cons, alt, .. } => {
                self.optimize_expr(test);
                self.optimize_stmt(cons);
                if let Some(alt) = alt {
                    self.optimize_stmt(alt);
                }
            }
            Stmt::While { test, body, .. } | Stmt::DoWhile { body, test, .. } => {
                self.optimize_expr(test);
                self.optimize_stmt(body);
            }
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                match init {
                    Some(ForInit::Var(decl)) => self.optimize_var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.optimize_expr(expr),
                    None => {}
                }
                if let Some(test) = test {
                    self.optimize_expr(test);
                }
                if let Some(update) = update {
                    self.optimize_expr(update);
                }
                self.optimize_stmt(body);
            }
            Stmt::ForIn {
                left, object, body, ..
            } => {
                match left {
                    ForInLeft::Var(decl) => self.optimize_var_decl(decl),
                    ForInLeft::Expr(target) => self.optimize_target(target),
                }
                self.optimize_expr(object);
                self.optimize_stmt(body);
            }
            Stmt::With { object, body, .. } => {
                self.optimize_expr(object);
                self.optimize_stmt(body);
            }
            Stmt::Switch {
                discriminant,
                cases,
                ..
            } => {
                self.optimize_expr(discriminant);
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.optimize_expr(test);
                    }
                    self.optimize_stmts(&mut case.body, false);
                }
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.optimize_expr(value);
                }
            }
            Stmt::Throw { value, .. } => self.optimize_expr(value),
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.optimize_stmts(block, false);
                if let Some(handler) = handler {
                    self.optimize_stmts(&mut handler.body, false);
                }
                if let Some(finalizer) = finalizer {
                    self.optimize_stmts(finalizer, false);
                }
            }
            Stmt::Var(decl) => self.optimize_var_decl(decl),
            Stmt::Function(func) => self.optimize_function(func),
            Stmt::Directive { .. }
            | Stmt::Empty(_)
            | Stmt::Debugger(_)
            | Stmt::Break { .. }
            | Stmt::Continue { .. } => {}
        }
        let taken = take_stmt(stmt);
        *stmt = self.simplify_stmt(taken);
    }

    fn optimize_var_decl(
        &mut self,
        decl: &mut VarDecl,
    ) {
        for def in &mut decl.defs {
            if let Some(value) = &mut def.value {
                self.optimize_expr(value);
            }
        }
    }

    /// Subexpressions of an assignment target; the target itself stays
    fn optimize_target(
        &mut self,
        target: &mut Expr,
    ) {
        match target {
            Expr::Dot { object, .. } => self.optimize_expr(object),
            Expr::Sub { object, prop, .. } => {
                self.optimize_expr(object);
                self.optimize_expr(prop);
                if let Expr::Sub { object, prop, span } = take_expr(target) {
                    *target = self.simplify_sub(*object, *prop, span);
                }
            }
            Expr::Ident(_) => {}
            other => self.optimize_expr(other),
        }
    }

    fn optimize_expr(
        &mut self,
        expr: &mut Expr,
    ) {
        match expr {
            Expr::Function(func) => self.optimize_function(func),
            Expr::Array { elements, .. } => {
                for element in elements {
                    self.optimize_expr(element);
                }
            }
            Expr::Object { props, .. } => {
                for prop in props {
                    match &mut prop.kind {
                        PropKind::Init(value) => self.optimize_expr(value),
                        PropKind::Get(func) | PropKind::Set(func) => self.optimize_function(func),
                    }
                }
            }
            Expr::Unary { op, expr: inner, .. } => {
                if op.is_update() || *op == UnaryOp::Delete {
                    self.optimize_target(inner);
                } else {
                    self.optimize_expr(inner);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.optimize_expr(left);
                self.optimize_expr(right);
            }
            Expr::Assign { target, value, .. } => {
                self.optimize_target(target);
                self.optimize_expr(value);
            }
            Expr::Conditional { test, cons, alt, .. } => {
                self.optimize_expr(test);
                self.optimize_expr(cons);
                self.optimize_expr(alt);
            }
            Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
                let detached = matches!(&**callee, Expr::Seq { exprs, .. } if exprs.last().map_or(false, is_detached_callee));
                self.optimize_expr(callee);
                if detached {
                    detach_callee(callee);
                }
                for arg in args {
                    self.optimize_expr(arg);
                }
            }
            Expr::Dot { object, .. } => self.optimize_expr(object),
            Expr::Sub { object, prop, .. } => {
                self.optimize_expr(object);
                self.optimize_expr(prop);
            }
            Expr::Seq { exprs, .. } => {
                for expr in exprs {
                    self.optimize_expr(expr);
                }
            }
            Expr::Num { .. }
            | Expr::Str { .. }
            | Expr::Regexp { .. }
            | Expr::Bool { .. }
            | Expr::Null(_)
            | Expr::This(_)
            | Expr::Hole(_)
            | Expr::Ident(_) => {}
        }
        let taken = take_expr(expr);
        *expr = self.simplify_expr(taken);
    }

    // Statements

    fn simplify_stmt(
        &mut self,
        stmt: Stmt,
    ) -> Stmt {
        match stmt {
            Stmt::Debugger(span) if self.options.drop_debugger => Stmt::Empty(span),
            Stmt::Expr { expr, span } => self.simplify_expr_stmt(expr, span),
            Stmt::If {
                test,
                cons,
                alt,
                span,
            } => self.simplify_if(test, *cons, alt.map(|alt| *alt), span),
            Stmt::While { test, body, span } => {
                if self.options.loops {
                    self.simplify_for(None, Some(test), None, *body, span)
                } else {
                    Stmt::While {
                        test,
                        body: Box::new(simplify_body(*body)),
                        span,
                    }
                }
            }
            Stmt::For {
                init,
                test,
                update,
                body,
                span,
            } => {
                if self.options.loops {
                    self.simplify_for(init, test, update, *body, span)
                } else {
                    Stmt::For {
                        init,
                        test,
                        update,
                        body: Box::new(simplify_body(*body)),
                        span,
                    }
                }
            }
            Stmt::DoWhile { body, test, span } => self.simplify_do_while(*body, test, span),
            Stmt::ForIn {
                left,
                object,
                body,
                span,
            } => Stmt::ForIn {
                left,
                object,
                body: Box::new(simplify_body(*body)),
                span,
            },
            Stmt::With { object, body, span } => Stmt::With {
                object,
                body: Box::new(simplify_body(*body)),
                span,
            },
            Stmt::Labeled { label, body, span } => Stmt::Labeled {
                label,
                body: Box::new(simplify_body(*body)),
                span,
            },
            Stmt::Return {
                value: Some(value),
                span,
            } => {
                let returns_undefined = matches!(self.eval(&value), Some(ConstValue::Undefined)) && self.is_pure(&value);
                Stmt::Return {
                    value: (!returns_undefined).then_some(value),
                    span,
                }
            }
            other => other,
        }
    }

    fn simplify_expr_stmt(
        &mut self,
        expr: Expr,
        span: Span,
    ) -> Stmt {
        let expr = if self.options.side_effects {
            match drop_side_effect_free(expr, &self.scopes) {
                Some(expr) => expr,
                None => return Stmt::Empty(span),
            }
        } else {
            expr
        };
        if self.options.negate_iife && is_iife_call(&expr) {
            return Stmt::Expr {
                expr: Expr::not(expr),
                span,
            };
        }
        Stmt::Expr { expr, span }
    }

    fn simplify_if(
        &mut self,
        test: Expr,
        cons: Stmt,
        alt: Option<Stmt>,
        span: Span,
    ) -> Stmt {
        let mut cons = simplify_body(cons);
        let mut alt = alt.map(simplify_body).filter(|alt| !alt.is_empty());
        if !self.options.conditionals && !self.options.dead_code {
            return Stmt::If {
                test,
                cons: Box::new(cons),
                alt: alt.map(Box::new),
                span,
            };
        }
        let mut test = self.condition(test);

        if self.options.dead_code && self.is_pure(&test) {
            if let Some(value) = self.eval(&test) {
                tracing::trace!("condition at {} is always {}", span, value.truthy());
                let (taken, dropped) = if value.truthy() {
                    (Some(cons), alt)
                } else {
                    (alt, Some(cons))
                };
                let mut body: Vec<Stmt> = taken.into_iter().collect();
                if let Some(dropped) = dropped {
                    body.extend(extract_declarations(&dropped));
                }
                return Stmt::block(body, span);
            }
        }
        if !self.options.conditionals {
            return Stmt::If {
                test,
                cons: Box::new(cons),
                alt: alt.map(Box::new),
                span,
            };
        }

        if cons.is_empty() {
            match alt.take() {
                None => return Stmt::Expr { expr: test, span },
                Some(other) => {
                    test = self.negate(test);
                    cons = other;
                }
            }
        }

        if alt.is_some() {
            let negated = self.negate(test.clone());
            if self.printed_len(&negated) < self.printed_len(&test) {
                test = negated;
                if let Some(other) = alt.take() {
                    alt = Some(std::mem::replace(&mut cons, other));
                }
            }
        }

        match (cons, alt) {
            (Stmt::Expr { expr: a, .. }, Some(Stmt::Expr { expr: b, .. })) => Stmt::Expr {
                expr: Expr::Conditional {
                    test: Box::new(test),
                    cons: Box::new(a),
                    alt: Box::new(b),
                    span,
                },
                span,
            },
            (Stmt::Expr { expr: a, .. }, None) => {
                let negated = self.negate(test.clone());
                let expr = if self.printed_len(&negated) < self.printed_len(&test) {
                    Expr::binary(BinaryOp::Or, negated, a, span)
                } else {
                    Expr::binary(BinaryOp::And, test, a, span)
                };
                Stmt::Expr { expr, span }
            }
            (
                Stmt::Return { value: Some(a), .. },
                Some(Stmt::Return { value: Some(b), .. }),
            ) => Stmt::Return {
                value: Some(Expr::Conditional {
                    test: Box::new(test),
                    cons: Box::new(a),
                    alt: Box::new(b),
                    span,
                }),
                span,
            },
            (Stmt::Throw { value: a, .. }, Some(Stmt::Throw { value: b, .. })) => Stmt::Throw {
                value: Expr::Conditional {
                    test: Box::new(test),
                    cons: Box::new(a),
                    alt: Box::new(b),
                    span,
                },
                span,
            },
            (
                Stmt::If {
                    test: inner,
                    cons: inner_cons,
                    alt: None,
                    ..
                },
                None,
            ) => Stmt::If {
                test: Expr::binary(BinaryOp::And, test, inner, span),
                cons: inner_cons,
                alt: None,
                span,
            },
            (cons, alt) => Stmt::If {
                test,
                cons: Box::new(cons),
                alt: alt.map(Box::new),
                span,
            },
        }
    }

    fn simplify_for(
        &mut self,
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Stmt,
        span: Span,
    ) -> Stmt {
        let mut body = simplify_body(body);
        let mut test = test.map(|test| self.condition(test));

        if let Some(value) = test.as_ref().filter(|t| self.is_pure(t)).and_then(|t| self.eval(t)) {
            if value.truthy() {
                test = None;
            } else if self.options.dead_code {
                let mut out = Vec::new();
                match init {
                    Some(ForInit::Var(decl)) => out.push(Stmt::Var(decl)),
                    Some(ForInit::Expr(expr)) => out.push(Stmt::expr(expr)),
                    None => {}
                }
                out.extend(extract_declarations(&body));
                return Stmt::block(out, span);
            }
        }

        // for (;;) { if (x) break; rest }  =>  for (; !x;) rest
        let leading_break = |stmt: &Stmt| {
            matches!(stmt, Stmt::If { cons, alt: None, .. } if matches!(**cons, Stmt::Break { label: None, .. }))
        };
        let exit = match &mut body {
            stmt if leading_break(stmt) => Some(take_stmt(stmt)),
            Stmt::Block { body: stmts, .. } if stmts.first().map_or(false, leading_break) => Some(stmts.remove(0)),
            _ => None,
        };
        if let Some(Stmt::If { test: exit, .. }) = exit {
            let proceed = self.negate(exit);
            test = Some(match test {
                Some(test) => Expr::binary(BinaryOp::And, test, proceed, span),
                None => proceed,
            });
            body = simplify_body(body);
        }

        Stmt::For {
            init,
            test,
            update,
            body: Box::new(body),
            span,
        }
    }

    fn simplify_do_while(
        &mut self,
        body: Stmt,
        test: Expr,
        span: Span,
    ) -> Stmt {
        let test = self.condition(test);
        if self.options.loops && self.options.dead_code && !contains_loop_control(&body) && self.is_pure(&test) {
            if let Some(value) = self.eval(&test) {
                if !value.truthy() {
                    return Stmt::block(body.into_body(), span);
                }
            }
        }
        Stmt::DoWhile {
            body: Box::new(body),
            test,
            span,
        }
    }

    /// Rewrite `expr` where only its truthiness is observed
    pub(super) fn condition(
        &self,
        expr: Expr,
    ) -> Expr {
        if !self.options.booleans {
            return expr;
        }
        match expr {
            Expr::Unary {
                op: UnaryOp::Not,
                prefix: true,
                expr: inner,
                span,
            } => match *inner {
                Expr::Unary {
                    op: UnaryOp::Not,
                    prefix: true,
                    expr: value,
                    ..
                } => self.condition(*value),
                other => Expr::unary(UnaryOp::Not, other, span),
            },
            Expr::Binary {
                op,
                left,
                right,
                span,
            } if op.is_logical() => Expr::binary(op, self.condition(*left), self.condition(*right), span),
            Expr::Conditional {
                test,
                cons,
                alt,
                span,
            } => Expr::Conditional {
                test,
                cons: Box::new(self.condition(*cons)),
                alt: Box::new(self.condition(*alt)),
                span,
            },
            Expr::Seq { mut exprs, span } => {
                if let Some(last) = exprs.pop() {
                    exprs.push(self.condition(last));
                }
                Expr::Seq { exprs, span }
            }
            other => match self.eval(&other).filter(|_| self.is_pure(&other)) {
                Some(value) => {
                    let span = other.span();
                    self.best_of(other, boolean_literal(value.truthy(), span))
                }
                None => other,
            },
        }
    }

    // Expressions

    fn simplify_expr(
        &mut self,
        expr: Expr,
    ) -> Expr {
        match expr {
            Expr::Ident(ident) => self.simplify_ident(ident),
            Expr::Bool { value, span } if self.options.booleans => boolean_literal(value, span),
            Expr::Unary {
                op,
                prefix: true,
                expr: inner,
                span,
            } => self.simplify_unary(op, *inner, span),
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => self.simplify_binary(op, *left, *right, span),
            Expr::Assign {
                op,
                target,
                value,
                span,
            } => simplify_assign(op, *target, *value, span),
            Expr::Conditional {
                test,
                cons,
                alt,
                span,
            } => self.simplify_conditional(*test, *cons, *alt, span),
            Expr::Call { callee, args, span } => self.simplify_call(*callee, args, span, false),
            Expr::New { callee, args, span } => self.simplify_call(*callee, args, span, true),
            Expr::Dot { object, prop, span } => self.simplify_dot(*object, prop, span),
            Expr::Sub { object, prop, span } => self.simplify_sub(*object, *prop, span),
            Expr::Seq { exprs, span } => self.simplify_seq(exprs, span),
            other => other,
        }
    }

    /// Fold `expr` to a literal when it evaluates to something shorter
    fn fold(
        &self,
        expr: Expr,
    ) -> Expr {
        match self.eval(&expr) {
            Some(value) => {
                let span = expr.span();
                self.best_of(expr, value.to_expr(span))
            }
            None => expr,
        }
    }

    fn simplify_ident(
        &mut self,
        ident: Ident,
    ) -> Expr {
        let Some(def) = ident.def else {
            return Expr::Ident(ident);
        };
        let Some(symbol) = self.scopes.get_symbol(def) else {
            return Expr::Ident(ident);
        };
        if symbol.undeclared {
            if let Some(value) = self.global_defs.get(&ident.name) {
                return value.to_expr(ident.span);
            }
            if self.options.evaluate {
                match ident.name.as_str() {
                    "undefined" => return Expr::undefined(ident.span),
                    "Infinity" => return Expr::num(f64::INFINITY, ident.span),
                    _ => {}
                }
            }
        } else if let Some(value) = self.fixed.get(&def) {
            let candidate = value.to_expr(ident.span);
            return self.best_of(Expr::Ident(ident), candidate);
        }
        Expr::Ident(ident)
    }

    fn simplify_unary(
        &mut self,
        op: UnaryOp,
        inner: Expr,
        span: Span,
    ) -> Expr {
        match (op, inner) {
            // !!x  =>  x  when x is already a boolean
            (
                UnaryOp::Not,
                Expr::Unary {
                    op: UnaryOp::Not,
                    prefix: true,
                    expr: value,
                    ..
                },
            ) if is_boolean(&value) => *value,
            // !(a == b)  =>  a != b
            (
                UnaryOp::Not,
                inner @ Expr::Binary {
                    op: BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq,
                    ..
                },
            ) if self.options.comparisons && self.eval(&inner).is_none() => {
                let original = Expr::unary(UnaryOp::Not, inner.clone(), span);
                self.best_of(original, self.negate(inner))
            }
            (UnaryOp::Void, inner) if !matches!(inner, Expr::Num { value, .. } if value == 0.0) && self.is_pure(&inner) => {
                Expr::undefined(span)
            }
            (op, inner) => {
                let expr = Expr::unary(op, inner, span);
                if op.is_update() || op == UnaryOp::Delete {
                    expr
                } else {
                    self.fold(expr)
                }
            }
        }
    }

    fn simplify_binary(
        &mut self,
        mut op: BinaryOp,
        mut left: Expr,
        mut right: Expr,
        span: Span,
    ) -> Expr {
        if self.options.comparisons {
            if matches!(op, BinaryOp::StrictEq | BinaryOp::StrictNotEq)
                && ((is_string(&left) && is_string(&right))
                    || (is_number(&left) && is_number(&right))
                    || (is_boolean(&left) && is_boolean(&right)))
            {
                op = if op == BinaryOp::StrictEq {
                    BinaryOp::Eq
                } else {
                    BinaryOp::NotEq
                };
            }
            if self.options.unsafe_comps
                && matches!(op, BinaryOp::Lt | BinaryOp::LtE)
                && self.is_pure(&left)
                && self.is_pure(&right)
            {
                op = if op == BinaryOp::Lt { BinaryOp::Gt } else { BinaryOp::GtE };
                std::mem::swap(&mut left, &mut right);
            }
        }
        // Constant operand first, unless that would need parentheses
        if op.is_commutative()
            && right.is_constant()
            && !left.is_constant()
            && !matches!(&left, Expr::Binary { op: inner, .. } if binary_precedence(*inner) >= binary_precedence(op))
        {
            std::mem::swap(&mut left, &mut right);
        }

        if self.options.evaluate {
            if op.is_logical() && self.is_pure(&left) {
                if let Some(value) = self.eval(&left) {
                    let keep_left = (op == BinaryOp::And) != value.truthy();
                    return if keep_left { left } else { right };
                }
            }

            // x + "a" + "b"  =>  x + "ab"
            if op == BinaryOp::Add {
                if let (
                    Expr::Binary {
                        op: BinaryOp::Add,
                        left: inner_left,
                        right: inner_right,
                        ..
                    },
                    Expr::Str { value: tail, .. },
                ) = (&mut left, &right)
                {
                    if let Expr::Str { value: head, .. } = inner_right.as_mut() {
                        head.push_str(tail);
                        let combined = take_expr(inner_right);
                        let base = take_expr(inner_left);
                        return Expr::binary(BinaryOp::Add, base, combined, span);
                    }
                }
            }

            if self.options.unsafe_math {
                if let Some(expr) = self.reassociate(op, &mut left, &right, span) {
                    return expr;
                }
            }
        }

        self.fold(Expr::binary(op, left, right, span))
    }

    /// (x * 2) * 3  =>  x * 6, and the same for `+` over numbers
    fn reassociate(
        &self,
        op: BinaryOp,
        left: &mut Expr,
        right: &Expr,
        span: Span,
    ) -> Option<Expr> {
        if !matches!(op, BinaryOp::Mul | BinaryOp::Add) {
            return None;
        }
        let Expr::Num { value: outer, .. } = right else {
            return None;
        };
        let Expr::Binary {
            op: inner_op,
            left: base,
            right: inner,
            ..
        } = left
        else {
            return None;
        };
        let Expr::Num { value: inner, .. } = inner.as_ref() else {
            return None;
        };
        if *inner_op != op || (op == BinaryOp::Add && !is_number(base)) {
            return None;
        }
        let folded = if op == BinaryOp::Mul {
            inner * outer
        } else {
            inner + outer
        };
        Some(Expr::binary(op, take_expr(base), Expr::num(folded, span), span))
    }

    fn simplify_conditional(
        &mut self,
        test: Expr,
        cons: Expr,
        alt: Expr,
        span: Span,
    ) -> Expr {
        if !self.options.conditionals {
            return Expr::Conditional {
                test: Box::new(test),
                cons: Box::new(cons),
                alt: Box::new(alt),
                span,
            };
        }
        let mut test = self.condition(test);
        let (mut cons, mut alt) = (cons, alt);

        if self.is_pure(&test) {
            if let Some(value) = self.eval(&test) {
                return if value.truthy() { cons } else { alt };
            }
        }
        if let Expr::Unary {
            op: UnaryOp::Not,
            prefix: true,
            expr: inner,
            ..
        } = test
        {
            test = *inner;
            std::mem::swap(&mut cons, &mut alt);
        }

        // a ? b : b  =>  (a, b)
        if same_text(&cons, &alt, &self.measure) {
            return match drop_side_effect_free(test, &self.scopes) {
                Some(test) => Expr::seq(vec![test, cons], span),
                None => cons,
            };
        }

        // a ? x = b : x = c  =>  x = a ? b : c
        if let (
            Expr::Assign {
                op: None,
                target: t1,
                value: v1,
                ..
            },
            Expr::Assign {
                op: None,
                target: t2,
                value: v2,
                ..
            },
        ) = (&mut cons, &mut alt)
        {
            if matches!(**t1, Expr::Ident(_)) && same_text(t1, t2, &self.measure) {
                return Expr::Assign {
                    op: None,
                    target: Box::new(take_expr(t1)),
                    value: Box::new(Expr::Conditional {
                        test: Box::new(test),
                        cons: Box::new(take_expr(v1)),
                        alt: Box::new(take_expr(v2)),
                        span,
                    }),
                    span,
                };
            }
        }

        if self.options.booleans {
            let branch = |expr: &Expr| match self.eval(expr) {
                Some(ConstValue::Bool(value)) if self.is_pure(expr) => Some(value),
                _ => None,
            };
            match (branch(&cons), branch(&alt)) {
                (Some(true), Some(false)) => {
                    return if is_boolean(&test) {
                        test
                    } else {
                        Expr::not(Expr::not(test))
                    };
                }
                (Some(false), Some(true)) => return Expr::not(test),
                _ => {}
            }
        }

        Expr::Conditional {
            test: Box::new(test),
            cons: Box::new(cons),
            alt: Box::new(alt),
            span,
        }
    }

    fn simplify_call(
        &mut self,
        callee: Expr,
        args: Vec<Expr>,
        span: Span,
        is_new: bool,
    ) -> Expr {
        if self.options.drop_console
            && !is_new
            && matches!(callee, Expr::Dot { .. } | Expr::Sub { .. })
            && is_undeclared_global(access_root(&callee), "console", &self.scopes)
        {
            return Expr::undefined(span);
        }
        if self.options.unsafe_ {
            if let Expr::Ident(ident) = &callee {
                let undeclared = is_undeclared_global(&callee, &ident.name, &self.scopes);
                match ident.name.as_str() {
                    "Array" if undeclared && args.len() != 1 => {
                        return Expr::Array { elements: args, span };
                    }
                    "Object" if undeclared && args.is_empty() => {
                        return Expr::Object {
                            props: Vec::new(),
                            span,
                        };
                    }
                    "String" if undeclared && !is_new && args.len() == 1 => {
                        let mut args = args;
                        return Expr::binary(BinaryOp::Add, Expr::str("", span), args.remove(0), span);
                    }
                    "Boolean" if undeclared && !is_new && args.len() == 1 => {
                        let mut args = args;
                        return Expr::not(Expr::not(args.remove(0)));
                    }
                    _ => {}
                }
            }
        }
        let callee = Box::new(callee);
        if is_new {
            Expr::New { callee, args, span }
        } else {
            Expr::Call { callee, args, span }
        }
    }

    fn simplify_dot(
        &mut self,
        object: Expr,
        prop: String,
        span: Span,
    ) -> Expr {
        let mut object = object;
        if self.options.unsafe_proto {
            if let Expr::Dot {
                object: ctor,
                prop: proto,
                span: proto_span,
            } = &object
            {
                if proto == "prototype" {
                    let replacement = match ctor.ident_name() {
                        Some("Array") if is_undeclared_global(ctor, "Array", &self.scopes) => Some(Expr::Array {
                            elements: Vec::new(),
                            span: *proto_span,
                        }),
                        Some("Object") if is_undeclared_global(ctor, "Object", &self.scopes) => Some(Expr::Object {
                            props: Vec::new(),
                            span: *proto_span,
                        }),
                        Some("String") if is_undeclared_global(ctor, "String", &self.scopes) => {
                            Some(Expr::str("", *proto_span))
                        }
                        _ => None,
                    };
                    if let Some(replacement) = replacement {
                        object = replacement;
                    }
                }
            }
        }
        let expr = Expr::Dot {
            object: Box::new(object),
            prop,
            span,
        };
        if self.options.evaluate && self.options.unsafe_ {
            self.fold(expr)
        } else {
            expr
        }
    }

    fn simplify_sub(
        &mut self,
        object: Expr,
        prop: Expr,
        span: Span,
    ) -> Expr {
        if self.options.properties {
            if let Expr::Str { value, .. } = &prop {
                if is_identifier_name(value) && (self.options.screw_ie8 || !is_reserved_word(value)) {
                    return Expr::Dot {
                        object: Box::new(object),
                        prop: value.clone(),
                        span,
                    };
                }
                let number = value.parse::<f64>().ok().filter(|n| n.is_finite() && *n >= 0.0);
                if let Some(number) = number.filter(|n| number_to_string(*n) == *value) {
                    return Expr::Sub {
                        object: Box::new(object),
                        prop: Box::new(Expr::num(number, prop.span())),
                        span,
                    };
                }
            }
        }
        Expr::Sub {
            object: Box::new(object),
            prop: Box::new(prop),
            span,
        }
    }

    fn simplify_seq(
        &mut self,
        exprs: Vec<Expr>,
        span: Span,
    ) -> Expr {
        let last = exprs.len().saturating_sub(1);
        let mut out: Vec<Expr> = Vec::with_capacity(exprs.len());
        for (i, expr) in exprs.into_iter().enumerate() {
            if i < last && self.options.side_effects {
                out.extend(drop_side_effect_free(expr, &self.scopes));
            } else {
                out.push(expr);
            }
        }
        // x = v, x  =>  x = v
        if self.options.cascade && out.len() >= 2 {
            let redundant = match (&out[out.len() - 2], &out[out.len() - 1]) {
                (Expr::Assign { target, .. }, Expr::Ident(read)) => {
                    matches!(&**target, Expr::Ident(written) if written.def.is_some() && written.def == read.def)
                }
                _ => false,
            };
            if redundant {
                out.pop();
            }
        }
        Expr::seq(out, span)
    }
}

/// A call whose callee chain bottoms out in a function expression
fn is_iife_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call { callee, .. } => matches!(**callee, Expr::Function(_)) || is_iife_call(callee),
        _ => false,
    }
}

/// x = x + y  =>  x += y
fn simplify_assign(
    op: Option<BinaryOp>,
    target: Expr,
    value: Expr,
    span: Span,
) -> Expr {
    if op.is_none() {
        let compound = match (&target, &value) {
            (Expr::Ident(written), Expr::Binary { op: bin, left, .. }) if bin.is_assignable() => {
                matches!(&**left, Expr::Ident(read) if read.def.is_some() && read.def == written.def).then_some(*bin)
            }
            _ => None,
        };
        if let (Some(bin), Expr::Binary { right, .. }) = (compound, &value) {
            let right = right.clone();
            return Expr::Assign {
                op: Some(bin),
                target: Box::new(target),
                value: right,
                span,
            };
        }
    }
    Expr::Assign {
        op,
        target: Box::new(target),
        value: Box::new(value),
        span,
    }
}

