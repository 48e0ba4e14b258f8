//! Declaration hoisting

use crate::frontend::core::parser::ast::*;

fn prologue_len(body: &[Stmt]) -> usize {
    body.iter()
        .take_while(|stmt| matches!(stmt, Stmt::Directive { .. }))
        .count()
}

/// Move function declarations of a scope body ahead of its other statements
pub fn hoist_functions(body: &mut Vec<Stmt>) -> bool {
    let start = prologue_len(body);
    let first_other = body[start..]
        .iter()
        .position(|stmt| !matches!(stmt, Stmt::Function(_)))
        .map_or(body.len(), |i| i + start);
    if !body[first_other..].iter().any(|stmt| matches!(stmt, Stmt::Function(_))) {
        return false;
    }
    let rest: Vec<Stmt> = body.drain(start..).collect();
    let (funcs, others): (Vec<Stmt>, Vec<Stmt>) =
        rest.into_iter().partition(|stmt| matches!(stmt, Stmt::Function(_)));
    body.extend(funcs);
    body.extend(others);
    true
}

/// Assignments performing the initializers of a declaration
fn initializers(decl: VarDecl) -> Option<Expr> {
    let span = decl.span;
    let assigns: Vec<Expr> = decl
        .defs
        .into_iter()
        .filter_map(|def| {
            let value = def.value?;
            Some(Expr::Assign {
                op: None,
                target: Box::new(Expr::Ident(def.name)),
                value: Box::new(value),
                span: def.span,
            })
        })
        .collect();
    if assigns.is_empty() {
        None
    } else {
        Some(Expr::seq(assigns, span))
    }
}

struct VarHoister<'p> {
    params: &'p [Ident],
    names: Vec<Ident>,
}

impl VarHoister<'_> {
    fn declare(
        &mut self,
        decl: &VarDecl,
    ) {
        for def in &decl.defs {
            let name = &def.name.name;
            if self.params.iter().any(|p| &p.name == name) || self.names.iter().any(|n| &n.name == name) {
                continue;
            }
            self.names.push(def.name.clone());
        }
    }

    fn strip_body(
        &mut self,
        body: &mut Vec<Stmt>,
    ) {
        for stmt in body.iter_mut() {
            self.strip(stmt);
        }
        body.retain(|stmt| !matches!(stmt, Stmt::Empty(_)));
    }

    fn strip(
        &mut self,
        stmt: &mut Stmt,
    ) {
        match stmt {
            Stmt::Var(decl) if decl.kind == VarKind::Var => {
                self.declare(decl);
                let span = decl.span;
                let decl = std::mem::replace(
                    decl,
                    VarDecl {
                        kind: VarKind::Var,
                        defs: Vec::new(),
                        span,
                    },
                );
                *stmt = match initializers(decl) {
                    Some(expr) => Stmt::Expr { expr, span },
                    None => Stmt::Empty(span),
                };
            }
            Stmt::For { init, body, .. } => {
                if let Some(ForInit::Var(decl)) = init {
                    if decl.kind == VarKind::Var {
                        self.declare(decl);
                        *init = initializers(decl.clone()).map(ForInit::Expr);
                    }
                }
                self.strip(body);
            }
            Stmt::ForIn { left, body, .. } => {
                if let ForInLeft::Var(decl) = left {
                    let single = match decl.defs.as_slice() {
                        [def] if decl.kind == VarKind::Var && def.value.is_none() => Some(def.name.clone()),
                        _ => None,
                    };
                    if let Some(name) = single {
                        self.declare(decl);
                        *left = ForInLeft::Expr(Expr::Ident(name));
                    }
                }
                self.strip(body);
            }
            Stmt::Block { body, .. } => self.strip_body(body),
            Stmt::Labeled { body, .. }
            | Stmt::While { body, .. }
            | Stmt::DoWhile { body, .. }
            | Stmt::With { body, .. } => self.strip(body),
            Stmt::If { cons, alt, .. } => {
                self.strip(cons);
                if let Some(alt) = alt {
                    self.strip(alt);
                }
            }
            Stmt::Switch { cases, .. } => {
                for case in cases {
                    self.strip_body(&mut case.body);
                }
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
                ..
            } => {
                self.strip_body(block);
                if let Some(handler) = handler {
                    self.strip_body(&mut handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.strip_body(finalizer);
                }
            }
            _ => {}
        }
    }
}

fn count_var_defs(stmt: &Stmt) -> (usize, bool) {
    let mut defs = 0;
    let mut statements = 0;
    let mut initialized = false;
    visit_var_defs(stmt, &mut |decl| {
        statements += 1;
        defs += decl.defs.len();
        initialized |= decl.defs.iter().any(|d| d.value.is_some());
    });
    (defs, statements > 1 || initialized)
}

fn visit_var_defs(
    stmt: &Stmt,
    f: &mut dyn FnMut(&VarDecl),
) {
    match stmt {
        Stmt::Var(decl) if decl.kind == VarKind::Var => f(decl),
        Stmt::For { init, body, .. } => {
            if let Some(ForInit::Var(decl)) = init {
                f(decl);
            }
            visit_var_defs(body, f);
        }
        Stmt::ForIn { left, body, .. } => {
            if let ForInLeft::Var(decl) = left {
                f(decl);
            }
            visit_var_defs(body, f);
        }
        Stmt::Block { body, .. } => body.iter().for_each(|s| visit_var_defs(s, f)),
        Stmt::Labeled { body, .. }
        | Stmt::While { body, .. }
        | Stmt::DoWhile { body, .. }
        | Stmt::With { body, .. } => visit_var_defs(body, f),
        Stmt::If { cons, alt, .. } => {
            visit_var_defs(cons, f);
            if let Some(alt) = alt {
                visit_var_defs(alt, f);
            }
        }
        Stmt::Switch { cases, .. } => {
            for case in cases {
                case.body.iter().for_each(|s| visit_var_defs(s, f));
            }
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
            ..
        } => {
            block.iter().for_each(|s| visit_var_defs(s, f));
            if let Some(handler) = handler {
                handler.body.iter().for_each(|s| visit_var_defs(s, f));
            }
            if let Some(finalizer) = finalizer {
                finalizer.iter().for_each(|s| visit_var_defs(s, f));
            }
        }
        _ => {}
    }
}

/// Gather every `var` of a function into one declaration at its top,
/// turning the originals into assignments
///
/// Nothing happens with fewer than two names, or when the body already
/// has a single initializer-free declaration.
pub fn hoist_vars(func: &mut Function) -> bool {
    let mut defs = 0;
    let mut needs_work = false;
    for stmt in &func.body {
        let (count, work) = count_var_defs(stmt);
        if count > 0 && defs > 0 {
            needs_work = true;
        }
        defs += count;
        needs_work |= work;
    }
    if defs < 2 || !needs_work {
        return false;
    }

    let mut hoister = VarHoister {
        params: &func.params,
        names: Vec::new(),
    };
    let mut body = std::mem::take(&mut func.body);
    hoister.strip_body(&mut body);
    let names = hoister.names;

    if !names.is_empty() {
        let at = prologue_len(&body)
            + body[prologue_len(&body)..]
                .iter()
                .take_while(|stmt| matches!(stmt, Stmt::Function(_)))
                .count();
        let span = names[0].span;
        body.insert(
            at,
            Stmt::Var(VarDecl {
                kind: VarKind::Var,
                defs: names
                    .into_iter()
                    .map(|name| VarDef {
                        span: name.span,
                        name,
                        value: None,
                    })
                    .collect(),
                span,
            }),
        );
    }
    func.body = body;
    true
}
