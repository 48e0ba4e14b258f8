//! Queries and small rewrites shared by the compressor passes

use crate::backends::output::expr_to_string;
use crate::frontend::config::OutputOptions;
use crate::frontend::core::parser::ast::*;
use crate::middle::scope::ScopeTree;
use crate::util::span::Span;

/// Globals that are always defined and never throw on read
const SAFE_GLOBALS: &[&str] = &["undefined", "NaN", "Infinity"];

/// Whether reading `ident` may throw a `ReferenceError`
fn may_throw(
    ident: &Ident,
    scopes: &ScopeTree,
) -> bool {
    match ident.def.and_then(|def| scopes.get_symbol(def)) {
        Some(symbol) => symbol.undeclared && !SAFE_GLOBALS.contains(&symbol.name.as_str()),
        None => true,
    }
}

/// The declared-nowhere global `name`, as opposed to a local shadowing it
pub fn is_undeclared_global(
    expr: &Expr,
    name: &str,
    scopes: &ScopeTree,
) -> bool {
    match expr {
        Expr::Ident(ident) if ident.name == name => ident
            .def
            .and_then(|def| scopes.get_symbol(def))
            .map_or(false, |symbol| symbol.undeclared),
        _ => false,
    }
}

/// Whether evaluating `expr` can be observed beyond its value
///
/// Property reads count as side effects since getters may run.
pub fn has_side_effects(
    expr: &Expr,
    scopes: &ScopeTree,
) -> bool {
    match expr {
        Expr::Num { .. }
        | Expr::Str { .. }
        | Expr::Regexp { .. }
        | Expr::Bool { .. }
        | Expr::Null(_)
        | Expr::This(_)
        | Expr::Hole(_)
        | Expr::Function(_) => false,
        Expr::Ident(ident) => may_throw(ident, scopes),
        Expr::Array { elements, .. } => elements.iter().any(|e| has_side_effects(e, scopes)),
        Expr::Object { props, .. } => props
            .iter()
            .any(|prop| matches!(&prop.kind, PropKind::Init(value) if has_side_effects(value, scopes))),
        Expr::Unary { op, expr: inner, .. } => match op {
            UnaryOp::Delete | UnaryOp::Inc | UnaryOp::Dec => true,
            UnaryOp::Typeof if matches!(**inner, Expr::Ident(_)) => false,
            _ => has_side_effects(inner, scopes),
        },
        Expr::Binary { op, left, right, .. } => {
            matches!(op, BinaryOp::In | BinaryOp::InstanceOf)
                || has_side_effects(left, scopes)
                || has_side_effects(right, scopes)
        }
        Expr::Conditional { test, cons, alt, .. } => {
            has_side_effects(test, scopes) || has_side_effects(cons, scopes) || has_side_effects(alt, scopes)
        }
        Expr::Seq { exprs, .. } => exprs.iter().any(|e| has_side_effects(e, scopes)),
        Expr::Assign { .. }
        | Expr::Call { .. }
        | Expr::New { .. }
        | Expr::Dot { .. }
        | Expr::Sub { .. } => true,
    }
}

fn seq_of(
    parts: Vec<Expr>,
    span: Span,
) -> Option<Expr> {
    if parts.is_empty() {
        None
    } else {
        Some(Expr::seq(parts, span))
    }
}

/// What remains of `expr` when its value is discarded; `None` when nothing does
pub fn drop_side_effect_free(
    expr: Expr,
    scopes: &ScopeTree,
) -> Option<Expr> {
    if !has_side_effects(&expr, scopes) {
        return None;
    }
    match expr {
        Expr::Unary {
            op: UnaryOp::Not | UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot | UnaryOp::Void | UnaryOp::Typeof,
            prefix: true,
            expr: inner,
            ..
        } => drop_side_effect_free(*inner, scopes),
        Expr::Binary {
            op,
            left,
            right,
            span,
        } if op.is_logical() => match drop_side_effect_free(*right, scopes) {
            None => drop_side_effect_free(*left, scopes),
            Some(right) => Some(Expr::binary(op, *left, right, span)),
        },
        Expr::Binary {
            op,
            left,
            right,
            span,
        } if !matches!(op, BinaryOp::In | BinaryOp::InstanceOf) => {
            let parts = [*left, *right]
                .into_iter()
                .filter_map(|e| drop_side_effect_free(e, scopes))
                .collect();
            seq_of(parts, span)
        }
        Expr::Conditional {
            test,
            cons,
            alt,
            span,
        } => match (drop_side_effect_free(*cons, scopes), drop_side_effect_free(*alt, scopes)) {
            (None, None) => drop_side_effect_free(*test, scopes),
            (Some(cons), None) => Some(Expr::binary(BinaryOp::And, *test, cons, span)),
            (None, Some(alt)) => Some(Expr::binary(BinaryOp::Or, *test, alt, span)),
            (Some(cons), Some(alt)) => Some(Expr::Conditional {
                test,
                cons: Box::new(cons),
                alt: Box::new(alt),
                span,
            }),
        },
        Expr::Seq { exprs, span } => {
            let parts = exprs
                .into_iter()
                .filter_map(|e| drop_side_effect_free(e, scopes))
                .collect();
            seq_of(parts, span)
        }
        Expr::Array { elements, span } => {
            let parts = elements
                .into_iter()
                .filter_map(|e| drop_side_effect_free(e, scopes))
                .collect();
            seq_of(parts, span)
        }
        Expr::Object { props, span } => {
            let parts = props
                .into_iter()
                .filter_map(|prop| match prop.kind {
                    PropKind::Init(value) => drop_side_effect_free(value, scopes),
                    PropKind::Get(_) | PropKind::Set(_) => None,
                })
                .collect();
            seq_of(parts, span)
        }
        other => Some(other),
    }
}

pub fn is_boolean(expr: &Expr) -> bool {
    match expr {
        Expr::Bool { .. } => true,
        Expr::Unary {
            op: UnaryOp::Not | UnaryOp::Delete,
            prefix: true,
            ..
        } => true,
        Expr::Binary { op, left, right, .. } => {
            if op.is_logical() {
                is_boolean(left) && is_boolean(right)
            } else {
                op.is_comparison() || matches!(op, BinaryOp::In | BinaryOp::InstanceOf)
            }
        }
        Expr::Conditional { cons, alt, .. } => is_boolean(cons) && is_boolean(alt),
        Expr::Seq { exprs, .. } => exprs.last().map_or(false, is_boolean),
        Expr::Assign { op: None, value, .. } => is_boolean(value),
        _ => false,
    }
}

pub fn is_number(expr: &Expr) -> bool {
    match expr {
        Expr::Num { .. } => true,
        Expr::Unary { op, .. } => matches!(
            op,
            UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot | UnaryOp::Inc | UnaryOp::Dec
        ),
        Expr::Binary { op: BinaryOp::Add, left, right, .. } => is_number(left) && is_number(right),
        Expr::Binary { op, .. } => matches!(
            op,
            BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::BitAnd
                | BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::UShr
        ),
        Expr::Conditional { cons, alt, .. } => is_number(cons) && is_number(alt),
        Expr::Seq { exprs, .. } => exprs.last().map_or(false, is_number),
        Expr::Assign { op: None, value, .. } => is_number(value),
        Expr::Assign { op: Some(op), .. } => *op != BinaryOp::Add,
        _ => false,
    }
}

pub fn is_string(expr: &Expr) -> bool {
    match expr {
        Expr::Str { .. } => true,
        Expr::Unary {
            op: UnaryOp::Typeof, ..
        } => true,
        Expr::Binary {
            op: BinaryOp::Add,
            left,
            right,
            ..
        } => is_string(left) || is_string(right),
        Expr::Conditional { cons, alt, .. } => is_string(cons) && is_string(alt),
        Expr::Seq { exprs, .. } => exprs.last().map_or(false, is_string),
        Expr::Assign { op: None, value, .. } => is_string(value),
        Expr::Assign {
            op: Some(BinaryOp::Add),
            value,
            ..
        } => is_string(value),
        _ => false,
    }
}

/// Control never falls through the end of `stmt`
pub fn aborts(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return { .. } | Stmt::Throw { .. } | Stmt::Break { .. } | Stmt::Continue { .. } => true,
        Stmt::Block { body, .. } => body.last().map_or(false, aborts),
        Stmt::If { cons, alt: Some(alt), .. } => aborts(cons) && aborts(alt),
        _ => false,
    }
}

/// A `break` or `continue` somewhere in `stmt`, outside nested functions
pub fn contains_loop_control(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Break { .. } | Stmt::Continue { .. } => true,
        Stmt::Block { body, .. } => body.iter().any(contains_loop_control),
        Stmt::Labeled { body, .. }
        | Stmt::While { body, .. }
        | Stmt::DoWhile { body, .. }
        | Stmt::For { body, .. }
        | Stmt::ForIn { body, .. }
        | Stmt::With { body, .. } => contains_loop_control(body),
        Stmt::If { cons, alt, .. } => {
            contains_loop_control(cons) || alt.as_deref().map_or(false, contains_loop_control)
        }
        Stmt::Switch { cases, .. } => cases.iter().any(|c| c.body.iter().any(contains_loop_control)),
        Stmt::Try {
            block,
            handler,
            finalizer,
            ..
        } => {
            block.iter().any(contains_loop_control)
                || handler.as_ref().map_or(false, |h| h.body.iter().any(contains_loop_control))
                || finalizer.as_ref().map_or(false, |f| f.iter().any(contains_loop_control))
        }
        _ => false,
    }
}

fn add_vars(
    decl: &VarDecl,
    vars: &mut Vec<Ident>,
) {
    for def in &decl.defs {
        if !vars.iter().any(|v| v.name == def.name.name) {
            vars.push(def.name.clone());
        }
    }
}

fn collect_declarations(
    stmt: &Stmt,
    vars: &mut Vec<Ident>,
    funcs: &mut Vec<Stmt>,
) {
    match stmt {
        Stmt::Var(decl) => add_vars(decl, vars),
        Stmt::Function(_) => funcs.push(stmt.clone()),
        Stmt::Block { body, .. } => body.iter().for_each(|s| collect_declarations(s, vars, funcs)),
        Stmt::Labeled { body, .. }
        | Stmt::While { body, .. }
        | Stmt::DoWhile { body, .. }
        | Stmt::With { body, .. } => collect_declarations(body, vars, funcs),
        Stmt::If { cons, alt, .. } => {
            collect_declarations(cons, vars, funcs);
            if let Some(alt) = alt {
                collect_declarations(alt, vars, funcs);
            }
        }
        Stmt::For { init, body, .. } => {
            if let Some(ForInit::Var(decl)) = init {
                add_vars(decl, vars);
            }
            collect_declarations(body, vars, funcs);
        }
        Stmt::ForIn { left, body, .. } => {
            if let ForInLeft::Var(decl) = left {
                add_vars(decl, vars);
            }
            collect_declarations(body, vars, funcs);
        }
        Stmt::Switch { cases, .. } => {
            for case in cases {
                case.body.iter().for_each(|s| collect_declarations(s, vars, funcs));
            }
        }
        Stmt::Try {
            block,
            handler,
            finalizer,
            ..
        } => {
            block.iter().for_each(|s| collect_declarations(s, vars, funcs));
            if let Some(handler) = handler {
                handler.body.iter().for_each(|s| collect_declarations(s, vars, funcs));
            }
            if let Some(finalizer) = finalizer {
                finalizer.iter().for_each(|s| collect_declarations(s, vars, funcs));
            }
        }
        _ => {}
    }
}

/// Declarations in unreachable `stmt` that still bind names in the scope:
/// function declarations and bare `var` names
pub fn extract_declarations(stmt: &Stmt) -> Vec<Stmt> {
    let mut vars = Vec::new();
    let mut out = Vec::new();
    collect_declarations(stmt, &mut vars, &mut out);
    if !vars.is_empty() {
        let span = stmt.span();
        out.push(Stmt::Var(VarDecl {
            kind: VarKind::Var,
            defs: vars
                .into_iter()
                .map(|name| VarDef {
                    span: name.span,
                    name,
                    value: None,
                })
                .collect(),
            span,
        }));
    }
    out
}

/// Only function declarations and initializer-free `var`s
pub fn is_declaration_only(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Function(_) => true,
        Stmt::Var(decl) => decl.kind == VarKind::Var && decl.defs.iter().all(|d| d.value.is_none()),
        _ => false,
    }
}

/// Printed length of a detached expression
pub fn printed_len(
    expr: &Expr,
    measure: &OutputOptions,
) -> usize {
    expr_to_string(expr, measure).len()
}

/// Two expressions print identically, so they denote the same computation
pub fn same_text(
    a: &Expr,
    b: &Expr,
    measure: &OutputOptions,
) -> bool {
    expr_to_string(a, measure) == expr_to_string(b, measure)
}

/// The shorter of two equivalent expressions; ties keep `original`
pub fn best_of(
    original: Expr,
    candidate: Expr,
    measure: &OutputOptions,
) -> Expr {
    if printed_len(&candidate, measure) < printed_len(&original, measure) {
        candidate
    } else {
        original
    }
}

/// Logical negation of `expr` for use where only its truthiness matters
pub fn negate(
    expr: Expr,
    unsafe_comps: bool,
    measure: &OutputOptions,
) -> Expr {
    let alternative = match expr.clone() {
        Expr::Unary {
            op: UnaryOp::Not,
            prefix: true,
            expr: inner,
            ..
        } => return *inner,
        Expr::Bool { value, span } => Expr::Bool { value: !value, span },
        Expr::Binary {
            op,
            left,
            right,
            span,
        } => {
            let inverted = match op {
                BinaryOp::Eq => BinaryOp::NotEq,
                BinaryOp::NotEq => BinaryOp::Eq,
                BinaryOp::StrictEq => BinaryOp::StrictNotEq,
                BinaryOp::StrictNotEq => BinaryOp::StrictEq,
                BinaryOp::Lt if unsafe_comps => BinaryOp::GtE,
                BinaryOp::LtE if unsafe_comps => BinaryOp::Gt,
                BinaryOp::Gt if unsafe_comps => BinaryOp::LtE,
                BinaryOp::GtE if unsafe_comps => BinaryOp::Lt,
                BinaryOp::And | BinaryOp::Or => {
                    let flipped = if op == BinaryOp::And {
                        BinaryOp::Or
                    } else {
                        BinaryOp::And
                    };
                    let left = negate(*left, unsafe_comps, measure);
                    let right = negate(*right, unsafe_comps, measure);
                    return best_of(Expr::not(expr), Expr::binary(flipped, left, right, span), measure);
                }
                _ => return Expr::not(expr),
            };
            Expr::Binary {
                op: inverted,
                left,
                right,
                span,
            }
        }
        Expr::Conditional {
            test,
            cons,
            alt,
            span,
        } => Expr::Conditional {
            test,
            cons: Box::new(negate(*cons, unsafe_comps, measure)),
            alt: Box::new(negate(*alt, unsafe_comps, measure)),
            span,
        },
        Expr::Seq { mut exprs, span } => match exprs.pop() {
            Some(last) => {
                exprs.push(negate(last, unsafe_comps, measure));
                Expr::Seq { exprs, span }
            }
            None => return Expr::not(expr),
        },
        _ => return Expr::not(expr),
    };
    best_of(Expr::not(expr), alternative, measure)
}

/// A callee that must not be called as a plain reference: a method would
/// receive a different `this` and `eval` would become a direct eval
pub fn is_detached_callee(expr: &Expr) -> bool {
    match expr {
        Expr::Dot { .. } | Expr::Sub { .. } => true,
        Expr::Ident(ident) => ident.name == "eval",
        _ => false,
    }
}

/// Keep `(0, a.b)` and `(0, eval)` callees from turning into `a.b` or `eval`
pub fn detach_callee(callee: &mut Expr) {
    if is_detached_callee(callee) {
        let span = callee.span();
        let inner = std::mem::replace(callee, Expr::Hole(span));
        *callee = Expr::seq(vec![Expr::num(0.0, span), inner], span);
    }
}

/// Root object of a property access chain such as `a.b[c].d`
pub fn access_root(expr: &Expr) -> &Expr {
    match expr {
        Expr::Dot { object, .. } | Expr::Sub { object, .. } => access_root(object),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::output::stmts_to_string;
    use crate::frontend::config::ParseOptions;
    use crate::frontend::core::parser::parse;
    use crate::middle::scope::resolve_scopes;

    fn expr_of(source: &str) -> (Expr, ScopeTree) {
        let mut program = parse(source, &ParseOptions::default()).unwrap();
        resolve_scopes(&mut program).unwrap();
        let expr = match program.body.pop() {
            Some(Stmt::Expr { expr, .. }) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        };
        (expr, program.scopes)
    }

    fn measure() -> OutputOptions {
        OutputOptions {
            max_line_len: 0,
            ..OutputOptions::default()
        }
    }

    #[test]
    fn test_side_effects() {
        let (expr, scopes) = expr_of("var a; a + 1");
        assert!(!has_side_effects(&expr, &scopes));
        let (expr, scopes) = expr_of("undeclared + 1");
        assert!(has_side_effects(&expr, &scopes));
        let (expr, scopes) = expr_of("typeof undeclared");
        assert!(!has_side_effects(&expr, &scopes));
        let (expr, scopes) = expr_of("var a; a.b");
        assert!(has_side_effects(&expr, &scopes));
        let (expr, scopes) = expr_of("void 0, NaN, [1, function(){}]");
        assert!(!has_side_effects(&expr, &scopes));
    }

    #[test]
    fn test_drop_side_effect_free() {
        let (expr, scopes) = expr_of("var a; a + f()");
        let kept = drop_side_effect_free(expr, &scopes).unwrap();
        assert_eq!(expr_to_string(&kept, &measure()), "f()");

        let (expr, scopes) = expr_of("var a; a ? f() : 1");
        let kept = drop_side_effect_free(expr, &scopes).unwrap();
        assert_eq!(expr_to_string(&kept, &measure()), "a&&f()");

        let (expr, scopes) = expr_of("var a; [a, 1]");
        assert!(drop_side_effect_free(expr, &scopes).is_none());
    }

    #[test]
    fn test_value_types() {
        let (expr, _) = expr_of("a == b && !c");
        assert!(is_boolean(&expr));
        let (expr, _) = expr_of("a * 2");
        assert!(is_number(&expr));
        let (expr, _) = expr_of("a + 2");
        assert!(!is_number(&expr));
        let (expr, _) = expr_of("a + ''");
        assert!(is_string(&expr));
    }

    #[test]
    fn test_negate() {
        let measure = measure();
        let (expr, _) = expr_of("a == b");
        assert_eq!(expr_to_string(&negate(expr, false, &measure), &measure), "a!=b");
        let (expr, _) = expr_of("!a");
        assert_eq!(expr_to_string(&negate(expr, false, &measure), &measure), "a");
        let (expr, _) = expr_of("a < b");
        assert_eq!(expr_to_string(&negate(expr.clone(), false, &measure), &measure), "!(a<b)");
        assert_eq!(expr_to_string(&negate(expr, true, &measure), &measure), "a>=b");
    }

    #[test]
    fn test_extract_declarations() {
        let program = parse("if (x) { var a = 1; function f(){} for (var b in o); }", &ParseOptions::default()).unwrap();
        let decls = extract_declarations(&program.body[0]);
        assert_eq!(decls.len(), 2);
        assert!(stmts_to_string(&decls, &measure()).starts_with("function f(){}var a,b"));
    }

    #[test]
    fn test_aborts() {
        let program = parse("function f(){ if (a) return 1; else throw 2; }", &ParseOptions::default()).unwrap();
        let Stmt::Function(func) = &program.body[0] else {
            panic!("expected function");
        };
        assert!(aborts(&func.body[0]));
    }
}
