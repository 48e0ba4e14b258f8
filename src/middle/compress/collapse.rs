//! Inline single-use variables into the statement that follows them
//!
//! `var a = x; return a.b` becomes `return x.b` when `a` is read once,
//! never written, and nothing evaluated before the read could observe
//! the moved initializer running later.

use super::helpers::{detach_callee, has_side_effects};
use crate::frontend::core::parser::ast::*;
use crate::middle::scope::{ScopeTree, SymbolId, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The reference was replaced
    Found,
    /// Evaluation may continue past this point
    Continue,
    /// Moving the value past this point would reorder effects
    Stop,
}

struct Collapser {
    symbol: SymbolId,
    value: Option<Expr>,
    /// Reads may move across the value when it has no side effects
    value_pure: bool,
}

impl Collapser {
    fn each<'e>(
        &mut self,
        exprs: impl IntoIterator<Item = &'e mut Expr>,
    ) -> Step {
        for expr in exprs {
            match self.visit(expr) {
                Step::Continue => {}
                step => return step,
            }
        }
        Step::Continue
    }

    /// A read that may run user code through a getter
    fn after_read(
        &self,
        step: Step,
    ) -> Step {
        match step {
            Step::Continue if !self.value_pure => Step::Stop,
            step => step,
        }
    }

    fn target(
        &mut self,
        target: &mut Expr,
    ) -> Step {
        match target {
            Expr::Ident(_) => Step::Continue,
            Expr::Dot { object, .. } => self.visit(object),
            Expr::Sub { object, prop, .. } => self.each([object.as_mut(), prop.as_mut()]),
            _ => Step::Stop,
        }
    }

    fn visit(
        &mut self,
        expr: &mut Expr,
    ) -> Step {
        match expr {
            Expr::Ident(ident) if ident.def == Some(self.symbol) => {
                if let Some(value) = self.value.take() {
                    *expr = value;
                }
                Step::Found
            }
            Expr::Ident(_) => {
                if self.value_pure {
                    Step::Continue
                } else {
                    Step::Stop
                }
            }
            Expr::Num { .. }
            | Expr::Str { .. }
            | Expr::Regexp { .. }
            | Expr::Bool { .. }
            | Expr::Null(_)
            | Expr::This(_)
            | Expr::Hole(_)
            | Expr::Function(_) => Step::Continue,
            Expr::Array { elements, .. } => self.each(elements.iter_mut()),
            Expr::Object { props, .. } => self.each(props.iter_mut().filter_map(|prop| match &mut prop.kind {
                PropKind::Init(value) => Some(value),
                PropKind::Get(_) | PropKind::Set(_) => None,
            })),
            Expr::Unary { op, expr: inner, .. } => {
                if op.is_update() || *op == UnaryOp::Delete {
                    match self.target(inner) {
                        Step::Continue => Step::Stop,
                        step => step,
                    }
                } else {
                    self.visit(inner)
                }
            }
            Expr::Binary { op, left, right, .. } => {
                if op.is_logical() {
                    match self.visit(left) {
                        Step::Continue => Step::Stop,
                        step => step,
                    }
                } else {
                    self.each([left.as_mut(), right.as_mut()])
                }
            }
            Expr::Conditional { test, .. } => match self.visit(test) {
                Step::Continue => Step::Stop,
                step => step,
            },
            Expr::Assign { target, value, .. } => {
                let step = match self.target(target) {
                    Step::Continue => self.visit(value),
                    step => step,
                };
                match step {
                    Step::Continue => Step::Stop,
                    step => step,
                }
            }
            Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
                let step = match callee.as_mut() {
                    Expr::Dot { object, .. } => self.visit(object),
                    Expr::Sub { object, prop, .. } => self.each([object.as_mut(), prop.as_mut()]),
                    other @ Expr::Ident(_) => {
                        let step = self.visit(other);
                        if step == Step::Found {
                            detach_callee(other);
                        }
                        step
                    }
                    other => self.visit(other),
                };
                let step = match step {
                    Step::Continue => self.each(args.iter_mut()),
                    step => step,
                };
                match step {
                    Step::Continue => Step::Stop,
                    step => step,
                }
            }
            Expr::Dot { object, .. } => {
                let step = self.visit(object);
                self.after_read(step)
            }
            Expr::Sub { object, prop, .. } => {
                let step = self.each([object.as_mut(), prop.as_mut()]);
                self.after_read(step)
            }
            Expr::Seq { exprs, .. } => self.each(exprs.iter_mut()),
        }
    }

    fn visit_decl(
        &mut self,
        decl: &mut VarDecl,
    ) -> Step {
        self.each(decl.defs.iter_mut().filter_map(|def| def.value.as_mut()))
    }

    /// Expressions of `stmt` evaluated before anything else it does
    fn visit_stmt(
        &mut self,
        stmt: &mut Stmt,
    ) -> Step {
        match stmt {
            Stmt::Expr { expr, .. } => self.visit(expr),
            Stmt::Return { value: Some(value), .. } | Stmt::Throw { value, .. } => self.visit(value),
            Stmt::If { test, .. } => self.visit(test),
            Stmt::Switch { discriminant, .. } => self.visit(discriminant),
            Stmt::Var(decl) => self.visit_decl(decl),
            Stmt::For {
                init: Some(ForInit::Expr(expr)),
                ..
            } => self.visit(expr),
            Stmt::For {
                init: Some(ForInit::Var(decl)),
                ..
            } => self.visit_decl(decl),
            Stmt::ForIn { object, .. } => self.visit(object),
            _ => Step::Stop,
        }
    }
}

/// The last definition of a `var` statement when it may be inlined
fn candidate(
    stmt: &Stmt,
    scopes: &ScopeTree,
    toplevel: bool,
) -> Option<SymbolId> {
    let Stmt::Var(decl) = stmt else {
        return None;
    };
    if decl.kind != VarKind::Var {
        return None;
    }
    let def = decl.defs.last()?;
    def.value.as_ref()?;
    let id = def.name.def?;
    let symbol = scopes.get_symbol(id)?;
    let eligible = symbol.kind == SymbolKind::Var
        && symbol.orig.len() == 1
        && symbol.references.len() == 1
        && symbol.assignments == 0
        && (!symbol.global || toplevel)
        && !scopes.is_tainted(id);
    eligible.then_some(id)
}

/// Inline single-use variables of `body` into their consumers
pub fn collapse_vars(
    body: &mut Vec<Stmt>,
    scopes: &ScopeTree,
    toplevel: bool,
) -> bool {
    let mut changed = false;
    let mut i = 0;
    while i + 1 < body.len() {
        let Some(symbol) = candidate(&body[i], scopes, toplevel) else {
            i += 1;
            continue;
        };
        let (head, tail) = body.split_at_mut(i + 1);
        let Stmt::Var(decl) = &mut head[i] else {
            i += 1;
            continue;
        };
        let Some(value) = decl.defs.last().and_then(|def| def.value.clone()) else {
            i += 1;
            continue;
        };
        let mut collapser = Collapser {
            symbol,
            value_pure: !has_side_effects(&value, scopes),
            value: Some(value),
        };
        let mut next = tail[0].clone();
        if collapser.visit_stmt(&mut next) != Step::Found {
            i += 1;
            continue;
        }
        tail[0] = next;
        decl.defs.pop();
        changed = true;
        if decl.defs.is_empty() {
            body.remove(i);
        }
    }
    changed
}
