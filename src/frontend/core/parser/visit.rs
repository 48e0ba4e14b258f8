//! Tree walkers
//!
//! `Visitor` walks a tree by reference, `VisitorMut` by mutable reference.
//! Override a `visit_*` method and call the matching `walk_*` function to
//! keep descending.

use super::ast::*;

pub trait Visitor {
    fn visit_stmt(
        &mut self,
        stmt: &Stmt,
    ) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(
        &mut self,
        expr: &Expr,
    ) {
        walk_expr(self, expr);
    }

    fn visit_function(
        &mut self,
        func: &Function,
    ) {
        walk_function(self, func);
    }

    /// Declared names: variables, parameters, function and catch names
    fn visit_binding(
        &mut self,
        _ident: &Ident,
    ) {
    }

    fn visit_label(
        &mut self,
        _label: &Label,
    ) {
    }
}

pub fn walk_stmts<V: Visitor + ?Sized>(
    v: &mut V,
    stmts: &[Stmt],
) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_var_decl<V: Visitor + ?Sized>(
    v: &mut V,
    decl: &VarDecl,
) {
    for def in &decl.defs {
        v.visit_binding(&def.name);
        if let Some(value) = &def.value {
            v.visit_expr(value);
        }
    }
}

pub fn walk_function<V: Visitor + ?Sized>(
    v: &mut V,
    func: &Function,
) {
    if let Some(name) = &func.name {
        v.visit_binding(name);
    }
    for param in &func.params {
        v.visit_binding(param);
    }
    walk_stmts(v, &func.body);
}

pub fn walk_stmt<V: Visitor + ?Sized>(
    v: &mut V,
    stmt: &Stmt,
) {
    match stmt {
        Stmt::Directive { .. } | Stmt::Empty(_) | Stmt::Debugger(_) => {}
        Stmt::Expr { expr, .. } => v.visit_expr(expr),
        Stmt::Block { body, .. } => walk_stmts(v, body),
        Stmt::Labeled { label, body, .. } => {
            v.visit_label(label);
            v.visit_stmt(body);
        }
        Stmt::If { test, cons, alt, .. } => {
            v.visit_expr(test);
            v.visit_stmt(cons);
            if let Some(alt) = alt {
                v.visit_stmt(alt);
            }
        }
        Stmt::While { test, body, .. } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        Stmt::DoWhile { body, test, .. } => {
            v.visit_stmt(body);
            v.visit_expr(test);
        }
        Stmt::For {
            init,
            test,
            update,
            body,
            ..
        } => {
            match init {
                Some(ForInit::Var(decl)) => walk_var_decl(v, decl),
                Some(ForInit::Expr(expr)) => v.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                v.visit_expr(test);
            }
            if let Some(update) = update {
                v.visit_expr(update);
            }
            v.visit_stmt(body);
        }
        Stmt::ForIn {
            left, object, body, ..
        } => {
            match left {
                ForInLeft::Var(decl) => walk_var_decl(v, decl),
                ForInLeft::Expr(expr) => v.visit_expr(expr),
            }
            v.visit_expr(object);
            v.visit_stmt(body);
        }
        Stmt::With { object, body, .. } => {
            v.visit_expr(object);
            v.visit_stmt(body);
        }
        Stmt::Switch {
            discriminant,
            cases,
            ..
        } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    v.visit_expr(test);
                }
                walk_stmts(v, &case.body);
            }
        }
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::Throw { value, .. } => v.visit_expr(value),
        Stmt::Break { label, .. } | Stmt::Continue { label, .. } => {
            if let Some(label) = label {
                v.visit_label(label);
            }
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
            ..
        } => {
            walk_stmts(v, block);
            if let Some(handler) = handler {
                v.visit_binding(&handler.param);
                walk_stmts(v, &handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_stmts(v, finalizer);
            }
        }
        Stmt::Var(decl) => walk_var_decl(v, decl),
        Stmt::Function(func) => v.visit_function(func),
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(
    v: &mut V,
    expr: &Expr,
) {
    match expr {
        Expr::Num { .. }
        | Expr::Str { .. }
        | Expr::Regexp { .. }
        | Expr::Bool { .. }
        | Expr::Null(_)
        | Expr::This(_)
        | Expr::Hole(_)
        | Expr::Ident(_) => {}
        Expr::Array { elements, .. } => {
            for element in elements {
                v.visit_expr(element);
            }
        }
        Expr::Object { props, .. } => {
            for prop in props {
                match &prop.kind {
                    PropKind::Init(value) => v.visit_expr(value),
                    PropKind::Get(func) | PropKind::Set(func) => v.visit_function(func),
                }
            }
        }
        Expr::Function(func) => v.visit_function(func),
        Expr::Unary { expr, .. } => v.visit_expr(expr),
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::Conditional {
            test, cons, alt, ..
        } => {
            v.visit_expr(test);
            v.visit_expr(cons);
            v.visit_expr(alt);
        }
        Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Dot { object, .. } => v.visit_expr(object),
        Expr::Sub { object, prop, .. } => {
            v.visit_expr(object);
            v.visit_expr(prop);
        }
        Expr::Seq { exprs, .. } => {
            for expr in exprs {
                v.visit_expr(expr);
            }
        }
    }
}

pub trait VisitorMut {
    fn visit_stmt_mut(
        &mut self,
        stmt: &mut Stmt,
    ) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(
        &mut self,
        expr: &mut Expr,
    ) {
        walk_expr_mut(self, expr);
    }

    fn visit_function_mut(
        &mut self,
        func: &mut Function,
    ) {
        walk_function_mut(self, func);
    }

    fn visit_binding_mut(
        &mut self,
        _ident: &mut Ident,
    ) {
    }

    fn visit_label_mut(
        &mut self,
        _label: &mut Label,
    ) {
    }

    fn visit_prop_mut(
        &mut self,
        prop: &mut Prop,
    ) {
        match &mut prop.kind {
            PropKind::Init(value) => self.visit_expr_mut(value),
            PropKind::Get(func) | PropKind::Set(func) => self.visit_function_mut(func),
        }
    }
}

pub fn walk_stmts_mut<V: VisitorMut + ?Sized>(
    v: &mut V,
    stmts: &mut [Stmt],
) {
    for stmt in stmts {
        v.visit_stmt_mut(stmt);
    }
}

pub fn walk_var_decl_mut<V: VisitorMut + ?Sized>(
    v: &mut V,
    decl: &mut VarDecl,
) {
    for def in &mut decl.defs {
        v.visit_binding_mut(&mut def.name);
        if let Some(value) = &mut def.value {
            v.visit_expr_mut(value);
        }
    }
}

pub fn walk_function_mut<V: VisitorMut + ?Sized>(
    v: &mut V,
    func: &mut Function,
) {
    if let Some(name) = &mut func.name {
        v.visit_binding_mut(name);
    }
    for param in &mut func.params {
        v.visit_binding_mut(param);
    }
    walk_stmts_mut(v, &mut func.body);
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(
    v: &mut V,
    stmt: &mut Stmt,
) {
    match stmt {
        Stmt::Directive { .. } | Stmt::Empty(_) | Stmt::Debugger(_) => {}
        Stmt::Expr { expr, .. } => v.visit_expr_mut(expr),
        Stmt::Block { body, .. } => walk_stmts_mut(v, body),
        Stmt::Labeled { label, body, .. } => {
            v.visit_label_mut(label);
            v.visit_stmt_mut(body);
        }
        Stmt::If { test, cons, alt, .. } => {
            v.visit_expr_mut(test);
            v.visit_stmt_mut(cons);
            if let Some(alt) = alt {
                v.visit_stmt_mut(alt);
            }
        }
        Stmt::While { test, body, .. } => {
            v.visit_expr_mut(test);
            v.visit_stmt_mut(body);
        }
        Stmt::DoWhile { body, test, .. } => {
            v.visit_stmt_mut(body);
            v.visit_expr_mut(test);
        }
        Stmt::For {
            init,
            test,
            update,
            body,
            ..
        } => {
            match init {
                Some(ForInit::Var(decl)) => walk_var_decl_mut(v, decl),
                Some(ForInit::Expr(expr)) => v.visit_expr_mut(expr),
                None => {}
            }
            if let Some(test) = test {
                v.visit_expr_mut(test);
            }
            if let Some(update) = update {
                v.visit_expr_mut(update);
            }
            v.visit_stmt_mut(body);
        }
        Stmt::ForIn {
            left, object, body, ..
        } => {
            match left {
                ForInLeft::Var(decl) => walk_var_decl_mut(v, decl),
                ForInLeft::Expr(expr) => v.visit_expr_mut(expr),
            }
            v.visit_expr_mut(object);
            v.visit_stmt_mut(body);
        }
        Stmt::With { object, body, .. } => {
            v.visit_expr_mut(object);
            v.visit_stmt_mut(body);
        }
        Stmt::Switch {
            discriminant,
            cases,
            ..
        } => {
            v.visit_expr_mut(discriminant);
            for case in cases {
                if let Some(test) = &mut case.test {
                    v.visit_expr_mut(test);
                }
                walk_stmts_mut(v, &mut case.body);
            }
        }
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                v.visit_expr_mut(value);
            }
        }
        Stmt::Throw { value, .. } => v.visit_expr_mut(value),
        Stmt::Break { label, .. } | Stmt::Continue { label, .. } => {
            if let Some(label) = label {
                v.visit_label_mut(label);
            }
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
            ..
        } => {
            walk_stmts_mut(v, block);
            if let Some(handler) = handler {
                v.visit_binding_mut(&mut handler.param);
                walk_stmts_mut(v, &mut handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_stmts_mut(v, finalizer);
            }
        }
        Stmt::Var(decl) => walk_var_decl_mut(v, decl),
        Stmt::Function(func) => v.visit_function_mut(func),
    }
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(
    v: &mut V,
    expr: &mut Expr,
) {
    match expr {
        Expr::Num { .. }
        | Expr::Str { .. }
        | Expr::Regexp { .. }
        | Expr::Bool { .. }
        | Expr::Null(_)
        | Expr::This(_)
        | Expr::Hole(_)
        | Expr::Ident(_) => {}
        Expr::Array { elements, .. } => {
            for element in elements {
                v.visit_expr_mut(element);
            }
        }
        Expr::Object { props, .. } => {
            for prop in props {
                v.visit_prop_mut(prop);
            }
        }
        Expr::Function(func) => v.visit_function_mut(func),
        Expr::Unary { expr, .. } => v.visit_expr_mut(expr),
        Expr::Binary { left, right, .. } => {
            v.visit_expr_mut(left);
            v.visit_expr_mut(right);
        }
        Expr::Assign { target, value, .. } => {
            v.visit_expr_mut(target);
            v.visit_expr_mut(value);
        }
        Expr::Conditional {
            test, cons, alt, ..
        } => {
            v.visit_expr_mut(test);
            v.visit_expr_mut(cons);
            v.visit_expr_mut(alt);
        }
        Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
            v.visit_expr_mut(callee);
            for arg in args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::Dot { object, .. } => v.visit_expr_mut(object),
        Expr::Sub { object, prop, .. } => {
            v.visit_expr_mut(object);
            v.visit_expr_mut(prop);
        }
        Expr::Seq { exprs, .. } => {
            for expr in exprs {
                v.visit_expr_mut(expr);
            }
        }
    }
}
