//! Parenthesization rules
//!
//! Parentheses are never stored in the tree. The printer asks for a minimum
//! binding power at each operand position and wraps any expression that
//! binds more loosely, plus a few structural cases that precedence alone
//! does not cover.

use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::pratt::precedence::*;

/// Binding power of an expression as printed
pub fn expr_precedence(
    expr: &Expr,
    beautify: bool,
) -> u8 {
    match expr {
        Expr::Seq { .. } => BP_SEQUENCE,
        Expr::Assign { .. } => BP_ASSIGN,
        Expr::Conditional { .. } => BP_CONDITIONAL,
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary { prefix: true, .. } => BP_UNARY,
        Expr::Unary { prefix: false, .. } => BP_POSTFIX,
        // `new X` without arguments cannot be called or dereferenced directly
        Expr::New { args, .. } if args.is_empty() && !beautify => BP_POSTFIX,
        Expr::New { .. } | Expr::Call { .. } | Expr::Dot { .. } | Expr::Sub { .. } => BP_CALL,
        Expr::Num { value, .. } if value.is_nan() || value.is_infinite() => BP_MULTIPLICATIVE,
        Expr::Num { value, .. } if *value < 0.0 || (*value == 0.0 && value.is_sign_negative()) => {
            BP_UNARY
        }
        _ => BP_PRIMARY,
    }
}

/// Binding power required of the left operand of a binary operator
pub fn left_operand_precedence(op: BinaryOp) -> u8 {
    binary_precedence(op)
}

/// Binding power required of the right operand; operators associate left
pub fn right_operand_precedence(op: BinaryOp) -> u8 {
    binary_precedence(op) + 1
}

/// The expression would start with `function` or `{`, which cannot lead a
/// statement
pub fn needs_statement_parens(expr: &Expr) -> bool {
    matches!(expr, Expr::Function(_) | Expr::Object { .. })
}

/// A `new` callee containing a call in its member chain needs parentheses,
/// otherwise the call's arguments would be taken as the constructor's
pub fn callee_has_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } => true,
        Expr::Dot { object, .. } | Expr::Sub { object, .. } => callee_has_call(object),
        _ => false,
    }
}

/// Whether a bare `in` operator occurs outside any bracketed context
///
/// Such an expression must be parenthesized inside a `for` initializer.
pub fn contains_in(expr: &Expr) -> bool {
    match expr {
        Expr::Binary {
            op: BinaryOp::In, ..
        } => true,
        Expr::Binary { left, right, .. } => contains_in(left) || contains_in(right),
        Expr::Assign { target, value, .. } => contains_in(target) || contains_in(value),
        Expr::Conditional { test, cons, alt, .. } => {
            contains_in(test) || contains_in(cons) || contains_in(alt)
        }
        Expr::Seq { exprs, .. } => exprs.iter().any(contains_in),
        Expr::Unary { expr, .. } => contains_in(expr),
        Expr::Dot { object, .. } | Expr::Sub { object, .. } => contains_in(object),
        Expr::Call { callee, .. } | Expr::New { callee, .. } => contains_in(callee),
        _ => false,
    }
}
