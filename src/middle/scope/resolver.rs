//! Two-pass scope resolution
//!
//! The declaration pass creates scopes and binds every declared name, so
//! hoisted declarations are known before any reference is resolved. The
//! reference pass then links every identifier to its definition.

use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::visit::{
    walk_expr_mut, walk_stmt_mut, walk_stmts_mut, walk_var_decl_mut, VisitorMut,
};
use crate::middle::scope::{ScopeError, ScopeId, ScopeKind, ScopeTree, SymbolKind};

/// Rebuild the scope tree of `program` and link every identifier into it
pub fn resolve_scopes(program: &mut Program) -> Result<(), ScopeError> {
    tracing::debug!("resolving scopes");
    let mut tree = ScopeTree::new(program.span);
    let root = tree.root();

    let mut declarer = Declarer {
        tree: &mut tree,
        stack: vec![root],
        labels: vec![Vec::new()],
        in_const: false,
        error: None,
    };
    walk_stmts_mut(&mut declarer, &mut program.body);
    if let Some(err) = declarer.error {
        return Err(err);
    }

    let mut referencer = Referencer {
        tree: &mut tree,
        stack: vec![root],
    };
    walk_stmts_mut(&mut referencer, &mut program.body);

    tree.propagate_taint();
    tracing::debug!(
        "scopes resolved: {} scopes, {} symbols",
        tree.scope_ids().count(),
        tree.symbol_ids().count()
    );
    program.scopes = tree;
    Ok(())
}

/// First pass: scopes and declarations
struct Declarer<'t> {
    tree: &'t mut ScopeTree,
    stack: Vec<ScopeId>,
    /// Label names per function
    labels: Vec<Vec<String>>,
    in_const: bool,
    error: Option<ScopeError>,
}

impl Declarer<'_> {
    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn fail(
        &mut self,
        err: ScopeError,
    ) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn labels(&mut self) -> &mut Vec<String> {
        if self.labels.is_empty() {
            self.labels.push(Vec::new());
        }
        let last = self.labels.len() - 1;
        &mut self.labels[last]
    }

    fn check_label_target(
        &mut self,
        label: &Option<Label>,
    ) {
        if let Some(label) = label {
            if !self.labels().contains(&label.name) {
                self.fail(ScopeError::UndefinedLabel {
                    name: label.name.clone(),
                    span: label.span,
                });
            }
        }
    }
}

impl VisitorMut for Declarer<'_> {
    fn visit_stmt_mut(
        &mut self,
        stmt: &mut Stmt,
    ) {
        match stmt {
            Stmt::Var(decl) => {
                let saved = std::mem::replace(&mut self.in_const, decl.kind == VarKind::Const);
                walk_stmt_mut(self, stmt);
                self.in_const = saved;
            }
            Stmt::For {
                init: Some(ForInit::Var(decl)),
                ..
            }
            | Stmt::ForIn {
                left: ForInLeft::Var(decl),
                ..
            } => {
                let saved = std::mem::replace(&mut self.in_const, decl.kind == VarKind::Const);
                walk_stmt_mut(self, stmt);
                self.in_const = saved;
            }
            Stmt::Labeled { label, body, .. } => {
                if self.labels().contains(&label.name) {
                    self.fail(ScopeError::DuplicateLabel {
                        name: label.name.clone(),
                        span: label.span,
                    });
                }
                let name = label.name.clone();
                self.labels().push(name);
                self.visit_stmt_mut(body);
                self.labels().pop();
            }
            Stmt::Break { label, .. } | Stmt::Continue { label, .. } => {
                let label = label.clone();
                self.check_label_target(&label);
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                walk_stmts_mut(self, block);
                if let Some(handler) = handler {
                    let scope = self.tree.add_scope(ScopeKind::Catch, self.current(), handler.span);
                    handler.scope = Some(scope);
                    let def = self.tree.declare(
                        scope,
                        &handler.param.name,
                        SymbolKind::CatchParam,
                        handler.param.span,
                    );
                    handler.param.def = Some(def);
                    self.stack.push(scope);
                    walk_stmts_mut(self, &mut handler.body);
                    self.stack.pop();
                }
                if let Some(finalizer) = finalizer {
                    walk_stmts_mut(self, finalizer);
                }
            }
            Stmt::Function(func) => {
                if let Some(name) = &mut func.name {
                    let var_scope = self.tree.var_scope(self.current());
                    let def = self.tree.declare(var_scope, &name.name, SymbolKind::Defun, name.span);
                    name.def = Some(def);
                }
                self.function(func, false);
            }
            _ => walk_stmt_mut(self, stmt),
        }
    }

    fn visit_function_mut(
        &mut self,
        func: &mut Function,
    ) {
        // Function expressions, getters and setters
        self.function(func, true);
    }

    fn visit_binding_mut(
        &mut self,
        ident: &mut Ident,
    ) {
        // Reached only for `var`/`const` names
        let kind = if self.in_const {
            SymbolKind::Const
        } else {
            SymbolKind::Var
        };
        let scope = self.tree.var_scope(self.current());
        let declared = self.tree.declare(scope, &ident.name, kind, ident.span);
        // `var e = v` inside `catch (e)` writes the catch parameter
        let caught = self
            .tree
            .ancestors(self.current())
            .take_while(|id| *id != scope)
            .find_map(|id| self.tree.scope(id).variables.get(&ident.name).copied());
        match caught {
            Some(param) => {
                for id in [param, declared] {
                    self.tree.symbol_mut(id).pinned = true;
                }
                self.tree.symbol_mut(param).assignments += 1;
                ident.def = Some(param);
            }
            None => ident.def = Some(declared),
        }
    }
}

impl Declarer<'_> {
    fn function(
        &mut self,
        func: &mut Function,
        is_expression: bool,
    ) {
        let scope = self.tree.add_scope(ScopeKind::Function, self.current(), func.span);
        func.scope = Some(scope);
        if is_expression {
            if let Some(name) = &mut func.name {
                name.def = Some(self.tree.declare(scope, &name.name, SymbolKind::Lambda, name.span));
            }
        }
        self.tree.declare(scope, "arguments", SymbolKind::Arguments, func.span);
        for param in &mut func.params {
            param.def = Some(self.tree.declare(scope, &param.name, SymbolKind::Param, param.span));
        }

        self.stack.push(scope);
        self.labels.push(Vec::new());
        let saved_const = std::mem::replace(&mut self.in_const, false);
        walk_stmts_mut(self, &mut func.body);
        self.in_const = saved_const;
        self.labels.pop();
        self.stack.pop();
    }
}

/// Second pass: references
struct Referencer<'t> {
    tree: &'t mut ScopeTree,
    stack: Vec<ScopeId>,
}

impl Referencer<'_> {
    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn reference(
        &mut self,
        ident: &mut Ident,
        assigns: bool,
    ) {
        let scope = self.current();
        let symbol = match self.tree.lookup(scope, &ident.name) {
            Some(symbol) => symbol,
            None => self.tree.global(&ident.name),
        };
        ident.def = Some(symbol);

        let def = self.tree.symbol_mut(symbol);
        def.references.push(ident.span);
        if assigns {
            def.assignments += 1;
        }
        let kind = def.kind;
        let undeclared = def.undeclared;
        let def_scope = def.scope;

        if undeclared && ident.name == "eval" {
            self.tree.scope_mut(scope).uses_eval = true;
        }
        if kind == SymbolKind::Arguments {
            self.tree.scope_mut(def_scope).uses_arguments = true;
        }
        self.tree.add_enclosed(scope, symbol);
    }

    fn scoped(
        &mut self,
        scope: Option<ScopeId>,
        f: impl FnOnce(&mut Self),
    ) {
        match scope {
            Some(scope) => {
                self.stack.push(scope);
                f(self);
                self.stack.pop();
            }
            None => f(self),
        }
    }
}

impl VisitorMut for Referencer<'_> {
    fn visit_stmt_mut(
        &mut self,
        stmt: &mut Stmt,
    ) {
        match stmt {
            Stmt::With { .. } => {
                let scope = self.current();
                self.tree.scope_mut(scope).uses_with = true;
                walk_stmt_mut(self, stmt);
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                walk_stmts_mut(self, block);
                if let Some(handler) = handler {
                    let body = &mut handler.body;
                    self.scoped(handler.scope, |this| walk_stmts_mut(this, body));
                }
                if let Some(finalizer) = finalizer {
                    walk_stmts_mut(self, finalizer);
                }
            }
            Stmt::ForIn {
                left, object, body, ..
            } => {
                match left {
                    ForInLeft::Var(decl) => {
                        // The loop assigns the declared name on every iteration
                        for def in &decl.defs {
                            if let Some(symbol) = def.name.def {
                                self.tree.symbol_mut(symbol).assignments += 1;
                            }
                        }
                        walk_var_decl_mut(self, decl);
                    }
                    ForInLeft::Expr(Expr::Ident(ident)) => self.reference(ident, true),
                    ForInLeft::Expr(expr) => self.visit_expr_mut(expr),
                }
                self.visit_expr_mut(object);
                self.visit_stmt_mut(body);
            }
            Stmt::Function(func) => self.visit_function_mut(func),
            _ => walk_stmt_mut(self, stmt),
        }
    }

    fn visit_function_mut(
        &mut self,
        func: &mut Function,
    ) {
        let body = &mut func.body;
        self.scoped(func.scope, |this| walk_stmts_mut(this, body));
    }

    fn visit_expr_mut(
        &mut self,
        expr: &mut Expr,
    ) {
        match expr {
            Expr::Ident(ident) => self.reference(ident, false),
            Expr::Assign { target, value, .. } => {
                match target.as_mut() {
                    Expr::Ident(ident) => self.reference(ident, true),
                    other => self.visit_expr_mut(other),
                }
                self.visit_expr_mut(value);
            }
            Expr::Unary { op, expr: inner, .. } if op.is_update() => match inner.as_mut() {
                Expr::Ident(ident) => self.reference(ident, true),
                other => self.visit_expr_mut(other),
            },
            _ => walk_expr_mut(self, expr),
        }
    }
}
