//! Unreferenced declaration removal
//!
//! Liveness is computed over a graph: code inside a function declaration
//! or a side-effect-free initializer belongs to the declared name, so a
//! name referenced only from dead code is dead too. Plain assignments to
//! a variable do not keep it alive.

use std::collections::{HashMap, HashSet};

use super::helpers::{drop_side_effect_free, has_side_effects};
use crate::frontend::config::CompressOptions;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::visit::{self, Visitor, VisitorMut};
use crate::middle::scope::{ScopeTree, SymbolId, SymbolKind};

/// Symbols whose declarations may be deleted when nothing uses them
fn droppable_symbols(
    scopes: &ScopeTree,
    options: &CompressOptions,
) -> HashSet<SymbolId> {
    scopes
        .symbol_ids()
        .filter(|id| {
            let symbol = scopes.symbol(*id);
            if !matches!(symbol.kind, SymbolKind::Var | SymbolKind::Const | SymbolKind::Defun) {
                return false;
            }
            if scopes.is_tainted(*id) {
                return false;
            }
            if symbol.scope == scopes.root() {
                options.toplevel && !options.top_retain.iter().any(|name| *name == symbol.name)
            } else {
                true
            }
        })
        .collect()
}

struct Liveness<'s> {
    scopes: &'s ScopeTree,
    droppable: &'s HashSet<SymbolId>,
    /// Declaration the code being walked belongs to
    owner: Option<SymbolId>,
    roots: HashSet<SymbolId>,
    edges: HashMap<SymbolId, Vec<SymbolId>>,
}

impl Liveness<'_> {
    fn droppable_def(
        &self,
        ident: &Ident,
    ) -> Option<SymbolId> {
        ident.def.filter(|id| self.droppable.contains(id))
    }

    fn use_symbol(
        &mut self,
        symbol: SymbolId,
    ) {
        if !self.droppable.contains(&symbol) {
            return;
        }
        match self.owner {
            Some(owner) if owner != symbol => self.edges.entry(owner).or_default().push(symbol),
            Some(_) => {}
            None => {
                self.roots.insert(symbol);
            }
        }
    }

    fn owned_by(
        &mut self,
        owner: Option<SymbolId>,
        f: impl FnOnce(&mut Self),
    ) {
        let current = self.owner;
        let previous = std::mem::replace(&mut self.owner, owner.or(current));
        f(self);
        self.owner = previous;
    }

    fn visit_decl(
        &mut self,
        decl: &VarDecl,
    ) {
        for def in &decl.defs {
            let Some(value) = &def.value else {
                continue;
            };
            let owner = self
                .droppable_def(&def.name)
                .filter(|_| !has_side_effects(value, self.scopes));
            self.owned_by(owner, |this| this.visit_expr(value));
        }
    }

    fn live_set(self) -> HashSet<SymbolId> {
        let mut live = self.roots.clone();
        let mut pending: Vec<SymbolId> = live.iter().copied().collect();
        while let Some(symbol) = pending.pop() {
            for next in self.edges.get(&symbol).into_iter().flatten() {
                if live.insert(*next) {
                    pending.push(*next);
                }
            }
        }
        live
    }
}

impl Visitor for Liveness<'_> {
    fn visit_stmt(
        &mut self,
        stmt: &Stmt,
    ) {
        match stmt {
            Stmt::Var(decl) => self.visit_decl(decl),
            Stmt::For { init: Some(ForInit::Var(decl)), test, update, body, .. } => {
                self.visit_decl(decl);
                if let Some(test) = test {
                    self.visit_expr(test);
                }
                if let Some(update) = update {
                    self.visit_expr(update);
                }
                self.visit_stmt(body);
            }
            Stmt::ForIn { left: ForInLeft::Var(decl), object, body, .. } => {
                // The loop itself writes the variable on every iteration
                for def in &decl.defs {
                    if let Some(symbol) = def.name.def {
                        self.use_symbol(symbol);
                    }
                }
                self.visit_expr(object);
                self.visit_stmt(body);
            }
            Stmt::Function(func) => {
                let owner = func.name.as_ref().and_then(|name| self.droppable_def(name));
                self.owned_by(owner, |this| visit::walk_function(this, func));
            }
            _ => visit::walk_stmt(self, stmt),
        }
    }

    fn visit_expr(
        &mut self,
        expr: &Expr,
    ) {
        match expr {
            Expr::Ident(ident) => {
                if let Some(symbol) = ident.def {
                    self.use_symbol(symbol);
                }
            }
            Expr::Assign { op: None, target, value, .. }
                if matches!(&**target, Expr::Ident(ident) if self.droppable_def(ident).is_some()) =>
            {
                self.visit_expr(value);
            }
            _ => visit::walk_expr(self, expr),
        }
    }
}

/// Rewrites the tree once liveness is known
struct Sweeper<'s> {
    scopes: &'s ScopeTree,
    options: &'s CompressOptions,
    droppable: &'s HashSet<SymbolId>,
    live: HashSet<SymbolId>,
    dropped: usize,
}

impl Sweeper<'_> {
    fn is_dead(
        &self,
        ident: &Ident,
    ) -> bool {
        ident
            .def
            .map_or(false, |id| self.droppable.contains(&id) && !self.live.contains(&id))
    }

    fn sweep_body(
        &mut self,
        body: &mut Vec<Stmt>,
    ) {
        let old = std::mem::take(body);
        for stmt in old {
            self.sweep_stmt(stmt, body);
        }
    }

    /// Remove dead definitions of a declaration
    ///
    /// Effects of dead initializers move into the next surviving
    /// initializer; those with nothing after them are returned.
    fn sweep_decl(
        &mut self,
        decl: &mut VarDecl,
    ) -> Vec<Expr> {
        let mut pending = Vec::new();
        let defs = std::mem::take(&mut decl.defs);
        for mut def in defs {
            if let Some(value) = &mut def.value {
                self.visit_expr_mut(value);
            }
            if !self.is_dead(&def.name) {
                if let Some(value) = def.value.take() {
                    pending.push(value);
                    def.value = Some(Expr::seq(std::mem::take(&mut pending), def.span));
                }
                decl.defs.push(def);
                continue;
            }
            tracing::trace!("dropping unused variable {} at {}", def.name.name, def.span);
            self.dropped += 1;
            if let Some(value) = def.value {
                pending.extend(drop_side_effect_free(value, self.scopes));
            }
        }
        pending
    }

    fn sweep_stmt(
        &mut self,
        stmt: Stmt,
        out: &mut Vec<Stmt>,
    ) {
        match stmt {
            Stmt::Function(func) if func.name.as_ref().map_or(false, |name| self.is_dead(name)) => {
                tracing::trace!("dropping unused function at {}", func.span);
                self.dropped += 1;
            }
            Stmt::Var(mut decl) => {
                let span = decl.span;
                let effects = self.sweep_decl(&mut decl);
                if !decl.defs.is_empty() {
                    out.push(Stmt::Var(decl));
                }
                if !effects.is_empty() {
                    out.push(Stmt::Expr {
                        expr: Expr::seq(effects, span),
                        span,
                    });
                }
            }
            Stmt::Expr { mut expr, span } => {
                self.visit_expr_mut(&mut expr);
                if !self.options.side_effects {
                    out.push(Stmt::Expr { expr, span });
                } else if let Some(expr) = drop_side_effect_free(expr, self.scopes) {
                    out.push(Stmt::Expr { expr, span });
                }
            }
            Stmt::Block { mut body, span } => {
                self.sweep_body(&mut body);
                out.push(Stmt::Block { body, span });
            }
            Stmt::For {
                init,
                mut test,
                mut update,
                body,
                span,
            } => {
                let init = match init {
                    Some(ForInit::Var(mut decl)) => {
                        let effects = self.sweep_decl(&mut decl);
                        let decl_span = decl.span;
                        match (decl.defs.is_empty(), effects.is_empty()) {
                            (false, true) => Some(ForInit::Var(decl)),
                            (true, false) => Some(ForInit::Expr(Expr::seq(effects, decl_span))),
                            (true, true) => None,
                            (false, false) => {
                                out.push(Stmt::Var(decl));
                                Some(ForInit::Expr(Expr::seq(effects, decl_span)))
                            }
                        }
                    }
                    Some(ForInit::Expr(mut expr)) => {
                        self.visit_expr_mut(&mut expr);
                        Some(ForInit::Expr(expr))
                    }
                    None => None,
                };
                if let Some(test) = &mut test {
                    self.visit_expr_mut(test);
                }
                if let Some(update) = &mut update {
                    self.visit_expr_mut(update);
                }
                out.push(Stmt::For {
                    init,
                    test,
                    update,
                    body: Box::new(self.sweep_nested(*body)),
                    span,
                });
            }
            mut other => {
                self.visit_stmt_mut(&mut other);
                out.push(other);
            }
        }
    }

    /// Sweep a statement in a single-statement position
    fn sweep_nested(
        &mut self,
        stmt: Stmt,
    ) -> Stmt {
        let span = stmt.span();
        let mut out = Vec::new();
        self.sweep_stmt(stmt, &mut out);
        if out.len() == 1 {
            out.remove(0)
        } else {
            Stmt::block(out, span)
        }
    }

    fn sweep_boxed(
        &mut self,
        stmt: &mut Box<Stmt>,
    ) {
        let span = stmt.span();
        let inner = std::mem::replace(stmt.as_mut(), Stmt::Empty(span));
        **stmt = self.sweep_nested(inner);
    }

    fn trim_params(
        &self,
        func: &mut Function,
        setter: bool,
    ) {
        if self.options.keep_fargs || setter {
            return;
        }
        let uses_arguments = func.scope.map_or(true, |scope| {
            let scope = self.scopes.scope(scope);
            scope.uses_arguments || scope.is_tainted()
        });
        if uses_arguments {
            return;
        }
        while let Some(param) = func.params.last() {
            let unused = param
                .def
                .map_or(false, |id| self.scopes.symbol(id).references.is_empty());
            if !unused {
                break;
            }
            func.params.pop();
        }
    }
}

impl VisitorMut for Sweeper<'_> {
    fn visit_stmt_mut(
        &mut self,
        stmt: &mut Stmt,
    ) {
        match stmt {
            Stmt::Block { body, .. } => self.sweep_body(body),
            Stmt::Labeled { body, .. } => self.sweep_boxed(body),
            Stmt::If { test, cons, alt, .. } => {
                self.visit_expr_mut(test);
                self.sweep_boxed(cons);
                if let Some(alt) = alt {
                    self.sweep_boxed(alt);
                }
            }
            Stmt::While { test, body, .. } | Stmt::DoWhile { test, body, .. } => {
                self.visit_expr_mut(test);
                self.sweep_boxed(body);
            }
            Stmt::ForIn { left, object, body, .. } => {
                if let ForInLeft::Expr(target) = left {
                    self.visit_expr_mut(target);
                }
                self.visit_expr_mut(object);
                self.sweep_boxed(body);
            }
            Stmt::With { object, body, .. } => {
                self.visit_expr_mut(object);
                self.sweep_boxed(body);
            }
            Stmt::Switch { discriminant, cases, .. } => {
                self.visit_expr_mut(discriminant);
                for case in cases {
                    if let Some(test) = &mut case.test {
                        self.visit_expr_mut(test);
                    }
                    self.sweep_body(&mut case.body);
                }
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.sweep_body(block);
                if let Some(handler) = handler {
                    self.sweep_body(&mut handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.sweep_body(finalizer);
                }
            }
            other => visit::walk_stmt_mut(self, other),
        }
    }

    fn visit_function_mut(
        &mut self,
        func: &mut Function,
    ) {
        self.trim_params(func, false);
        self.sweep_body(&mut func.body);
    }

    fn visit_prop_mut(
        &mut self,
        prop: &mut Prop,
    ) {
        match &mut prop.kind {
            PropKind::Init(value) => self.visit_expr_mut(value),
            PropKind::Get(func) => self.visit_function_mut(func),
            PropKind::Set(func) => {
                self.trim_params(func, true);
                self.sweep_body(&mut func.body);
            }
        }
    }

    fn visit_expr_mut(
        &mut self,
        expr: &mut Expr,
    ) {
        visit::walk_expr_mut(self, expr);
        match expr {
            // A write to a dead variable keeps only its value
            Expr::Assign { op: None, target, value, .. } if matches!(&**target, Expr::Ident(ident) if self.is_dead(ident)) => {
                let hole = Expr::Hole(value.span());
                let value = std::mem::replace(value.as_mut(), hole);
                *expr = value;
            }
            Expr::Function(func) if !self.options.keep_fnames => {
                let unreferenced = func.name.as_ref().map_or(false, |name| {
                    name.def.map_or(false, |id| {
                        let symbol = self.scopes.symbol(id);
                        symbol.kind == SymbolKind::Lambda && symbol.references.is_empty()
                    })
                });
                if unreferenced && !func.scope.map_or(true, |scope| self.scopes.scope(scope).is_tainted()) {
                    func.name = None;
                }
            }
            _ => {}
        }
    }
}

/// Delete declarations nothing can observe; returns how many went
///
/// Expects `program.scopes` to describe the current tree.
pub fn drop_unused(
    program: &mut Program,
    options: &CompressOptions,
) -> usize {
    let scopes = std::mem::take(&mut program.scopes);
    let droppable = droppable_symbols(&scopes, options);

    let mut liveness = Liveness {
        scopes: &scopes,
        droppable: &droppable,
        owner: None,
        roots: HashSet::new(),
        edges: HashMap::new(),
    };
    visit::walk_stmts(&mut liveness, &program.body);
    let live = liveness.live_set();

    let mut sweeper = Sweeper {
        scopes: &scopes,
        options,
        droppable: &droppable,
        live,
        dropped: 0,
    };
    sweeper.sweep_body(&mut program.body);
    let dropped = sweeper.dropped;
    program.scopes = scopes;
    tracing::debug!("dropped {} unused declarations", dropped);
    dropped
}
