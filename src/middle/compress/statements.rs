//! Statement list rewrites
//!
//! Each step works on a whole list: the toplevel, a function body, a block
//! or a `switch` case. The steps repeat until none of them changes the
//! list.

use super::collapse::collapse_vars;
use super::helpers::{aborts, extract_declarations, is_declaration_only};
use super::Compressor;
use crate::frontend::core::parser::ast::*;
use crate::util::span::Span;

/// Upper bound on rounds over one list
const MAX_ROUNDS: usize = 32;

impl Compressor<'_> {
    /// Rewrite a statement list until it stops changing
    ///
    /// `function_body` is set for the outermost list of a function, where
    /// falling off the end means returning `undefined`.
    pub(super) fn tighten_body(
        &mut self,
        body: &mut Vec<Stmt>,
        function_body: bool,
    ) {
        for _ in 0..MAX_ROUNDS {
            let mut changed = eliminate_spurious_blocks(body);
            if self.options.dead_code {
                changed |= eliminate_dead_code(body);
            }
            if self.options.if_return {
                changed |= self.handle_if_return(body, function_body);
            }
            if self.options.sequences {
                changed |= sequencesize(body);
            }
            if self.options.join_vars {
                changed |= join_consecutive_vars(body);
            }
            if self.options.collapse_vars {
                changed |= collapse_vars(body, &self.scopes, self.options.toplevel);
            }
            if !changed {
                return;
            }
        }
        tracing::trace!("statement list still changing after {} rounds", MAX_ROUNDS);
    }

    fn handle_if_return(
        &mut self,
        body: &mut Vec<Stmt>,
        function_body: bool,
    ) -> bool {
        let mut changed = false;

        if function_body && matches!(body.last(), Some(Stmt::Return { value: None, .. })) {
            body.pop();
            changed = true;
        }

        let mut i = 0;
        while i < body.len() {
            let stmt = std::mem::replace(&mut body[i], Stmt::Empty(Span::dummy()));
            let Stmt::If {
                test,
                cons,
                alt,
                span,
            } = stmt
            else {
                body[i] = stmt;
                i += 1;
                continue;
            };

            match (*cons, alt) {
                // if (a) return x; return y  =>  return a ? x : y
                (
                    Stmt::Return {
                        value: Some(cons_value),
                        span: cons_span,
                    },
                    None,
                ) => {
                    let next = match body.get_mut(i + 1) {
                        Some(Stmt::Return { value, span }) => value.take().map(|v| (v, *span)),
                        _ => None,
                    };
                    body[i] = match next {
                        Some((alt_value, ret_span)) => {
                            body.remove(i + 1);
                            changed = true;
                            let span = span.merge(&ret_span);
                            Stmt::Return {
                                value: Some(Expr::Conditional {
                                    test: Box::new(test),
                                    cons: Box::new(cons_value),
                                    alt: Box::new(alt_value),
                                    span,
                                }),
                                span,
                            }
                        }
                        None => Stmt::If {
                            test,
                            cons: Box::new(Stmt::Return {
                                value: Some(cons_value),
                                span: cons_span,
                            }),
                            alt: None,
                            span,
                        },
                    };
                }
                // if (a) return; rest  =>  if (!a) { rest }
                (cons @ Stmt::Return { value: None, .. }, None)
                    if function_body
                        && i + 1 < body.len()
                        && !body[i + 1..].iter().any(|s| matches!(s, Stmt::Function(_))) =>
                {
                    let rest: Vec<Stmt> = body.drain(i + 1..).collect();
                    let rest_span = rest
                        .iter()
                        .fold(Span::dummy(), |acc, stmt| acc.merge(&stmt.span()));
                    tracing::trace!("inverting early return at {}", cons.span());
                    body[i] = Stmt::If {
                        test: self.negate(test),
                        cons: Box::new(Stmt::Block {
                            body: rest,
                            span: rest_span,
                        }),
                        alt: None,
                        span,
                    };
                    changed = true;
                }
                // if (a) return; else b  =>  if (a) return; b
                (cons, Some(alt)) if aborts(&cons) => {
                    body[i] = Stmt::If {
                        test,
                        cons: Box::new(cons),
                        alt: None,
                        span,
                    };
                    body.splice(i + 1..i + 1, alt.into_body());
                    changed = true;
                }
                // if (a) b; else return  =>  if (!a) return; b
                (cons, Some(alt)) if aborts(&alt) => {
                    body[i] = Stmt::If {
                        test: self.negate(test),
                        cons: alt,
                        alt: None,
                        span,
                    };
                    body.splice(i + 1..i + 1, cons.into_body());
                    changed = true;
                }
                (cons, alt) => {
                    body[i] = Stmt::If {
                        test,
                        cons: Box::new(cons),
                        alt,
                        span,
                    };
                }
            }
            i += 1;
        }
        changed
    }
}

/// Flatten nested blocks and drop empty statements
fn eliminate_spurious_blocks(body: &mut Vec<Stmt>) -> bool {
    if !body.iter().any(|s| matches!(s, Stmt::Block { .. } | Stmt::Empty(_))) {
        return false;
    }
    let stmts = std::mem::take(body);
    for stmt in stmts {
        match stmt {
            Stmt::Empty(_) => {}
            Stmt::Block { body: inner, .. } => body.extend(inner),
            other => body.push(other),
        }
    }
    true
}

/// Replace statements after an unconditional jump with their declarations
fn eliminate_dead_code(body: &mut Vec<Stmt>) -> bool {
    let jump = body.iter().position(|s| {
        matches!(
            s,
            Stmt::Return { .. } | Stmt::Throw { .. } | Stmt::Break { .. } | Stmt::Continue { .. }
        )
    });
    let Some(jump) = jump else {
        return false;
    };
    if body[jump + 1..].iter().all(is_declaration_only) {
        return false;
    }
    let dead: Vec<Stmt> = body.drain(jump + 1..).collect();
    tracing::trace!("dropping {} unreachable statements", dead.len());
    for stmt in &dead {
        body.extend(extract_declarations(stmt));
    }
    true
}

/// Whether `stmt` can take a preceding expression into its head
fn absorbs_expression(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Expr { .. }
            | Stmt::If { .. }
            | Stmt::Return { value: Some(_), .. }
            | Stmt::Throw { .. }
            | Stmt::Switch { .. }
            | Stmt::ForIn { .. }
            | Stmt::For {
                init: None | Some(ForInit::Expr(_)),
                ..
            }
    )
}

/// Join consecutive expression statements with the comma operator and
/// fold them into the head of a following statement
fn sequencesize(body: &mut Vec<Stmt>) -> bool {
    let mut changed = false;
    let stmts = std::mem::take(body);
    for stmt in stmts {
        let prev = match body.last() {
            Some(Stmt::Expr { .. }) if absorbs_expression(&stmt) => body.pop(),
            _ => None,
        };
        let Some(Stmt::Expr { expr: prev, span: prev_span }) = prev else {
            body.push(stmt);
            continue;
        };
        changed = true;
        let merged = match stmt {
            Stmt::Expr { expr, span } => Stmt::Expr {
                expr: join(prev, prev_span, expr),
                span: prev_span.merge(&span),
            },
            Stmt::If {
                test,
                cons,
                alt,
                span,
            } => Stmt::If {
                test: join(prev, prev_span, test),
                cons,
                alt,
                span,
            },
            Stmt::Return {
                value: Some(value),
                span,
            } => Stmt::Return {
                value: Some(join(prev, prev_span, value)),
                span,
            },
            Stmt::Throw { value, span } => Stmt::Throw {
                value: join(prev, prev_span, value),
                span,
            },
            Stmt::Switch {
                discriminant,
                cases,
                span,
            } => Stmt::Switch {
                discriminant: join(prev, prev_span, discriminant),
                cases,
                span,
            },
            Stmt::ForIn {
                left,
                object,
                body: loop_body,
                span,
            } => Stmt::ForIn {
                left,
                object: join(prev, prev_span, object),
                body: loop_body,
                span,
            },
            Stmt::For {
                init: Some(ForInit::Expr(init)),
                test,
                update,
                body: loop_body,
                span,
            } => Stmt::For {
                init: Some(ForInit::Expr(join(prev, prev_span, init))),
                test,
                update,
                body: loop_body,
                span,
            },
            Stmt::For {
                init: None,
                test,
                update,
                body: loop_body,
                span,
            } => Stmt::For {
                init: Some(ForInit::Expr(prev)),
                test,
                update,
                body: loop_body,
                span,
            },
            other => {
                body.push(Stmt::Expr {
                    expr: prev,
                    span: prev_span,
                });
                other
            }
        };
        body.push(merged);
    }
    changed
}

fn join(
    prev: Expr,
    prev_span: Span,
    next: Expr,
) -> Expr {
    let span = prev_span.merge(&next.span());
    Expr::seq(vec![prev, next], span)
}

/// Merge adjacent declarations of the same kind, including into a
/// following `for` initializer
fn join_consecutive_vars(body: &mut Vec<Stmt>) -> bool {
    let mut changed = false;
    let stmts = std::mem::take(body);
    for stmt in stmts {
        match stmt {
            Stmt::Var(decl) => {
                if let Some(Stmt::Var(prev)) = body.last_mut() {
                    if prev.kind == decl.kind {
                        prev.span = prev.span.merge(&decl.span);
                        prev.defs.extend(decl.defs);
                        changed = true;
                        continue;
                    }
                }
                body.push(Stmt::Var(decl));
            }
            Stmt::For {
                init,
                test,
                update,
                body: loop_body,
                span,
            } => {
                let init = match (body.last(), init) {
                    (Some(Stmt::Var(prev)), None) if prev.kind == VarKind::Var => match body.pop() {
                        Some(Stmt::Var(prev)) => {
                            changed = true;
                            Some(ForInit::Var(prev))
                        }
                        _ => None,
                    },
                    (Some(Stmt::Var(prev)), Some(ForInit::Var(decl))) if prev.kind == decl.kind => {
                        match body.pop() {
                            Some(Stmt::Var(mut prev)) => {
                                changed = true;
                                prev.defs.extend(decl.defs);
                                Some(ForInit::Var(prev))
                            }
                            _ => Some(ForInit::Var(decl)),
                        }
                    }
                    (_, init) => init,
                };
                body.push(Stmt::For {
                    init,
                    test,
                    update,
                    body: loop_body,
                    span,
                });
            }
            other => body.push(other),
        }
    }
    changed
}
