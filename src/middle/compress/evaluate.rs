//! Constant evaluation
//!
//! `None` means "not statically computable"; callers skip the rewrite.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::frontend::core::lexer::literals::utf16_units;
use crate::frontend::core::parser::ast::{BinaryOp, Expr, UnaryOp};
use crate::middle::scope::{ScopeTree, SymbolId};
use crate::util::span::Span;

/// A primitive value known at compile time
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Undefined,
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

impl ConstValue {
    pub fn truthy(&self) -> bool {
        match self {
            ConstValue::Undefined | ConstValue::Null => false,
            ConstValue::Bool(b) => *b,
            ConstValue::Num(n) => *n != 0.0 && !n.is_nan(),
            ConstValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            ConstValue::Undefined => f64::NAN,
            ConstValue::Null => 0.0,
            ConstValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            ConstValue::Num(n) => *n,
            ConstValue::Str(s) => string_to_number(s),
        }
    }

    pub fn to_js_string(&self) -> String {
        match self {
            ConstValue::Undefined => "undefined".to_string(),
            ConstValue::Null => "null".to_string(),
            ConstValue::Bool(b) => b.to_string(),
            ConstValue::Num(n) => number_to_string(*n),
            ConstValue::Str(s) => s.clone(),
        }
    }

    /// Result of `typeof`
    pub fn type_of(&self) -> &'static str {
        match self {
            ConstValue::Undefined => "undefined",
            ConstValue::Null => "object",
            ConstValue::Bool(_) => "boolean",
            ConstValue::Num(_) => "number",
            ConstValue::Str(_) => "string",
        }
    }

    /// Literal expression producing this value
    pub fn to_expr(
        &self,
        span: Span,
    ) -> Expr {
        match self {
            ConstValue::Undefined => Expr::undefined(span),
            ConstValue::Null => Expr::Null(span),
            ConstValue::Bool(value) => Expr::Bool { value: *value, span },
            ConstValue::Num(n) if n.is_finite() && (*n < 0.0 || (*n == 0.0 && n.is_sign_negative())) => {
                Expr::unary(UnaryOp::Neg, Expr::num(-n, span), span)
            }
            ConstValue::Num(n) => Expr::num(*n, span),
            ConstValue::Str(s) => Expr::str(s.clone(), span),
        }
    }

    fn strict_eq(
        &self,
        other: &ConstValue,
    ) -> bool {
        match (self, other) {
            (ConstValue::Num(a), ConstValue::Num(b)) => a == b,
            (a, b) => a == b,
        }
    }

    fn loose_eq(
        &self,
        other: &ConstValue,
    ) -> bool {
        use ConstValue::*;
        match (self, other) {
            (Undefined | Null, Undefined | Null) => true,
            (Undefined | Null, _) | (_, Undefined | Null) => false,
            (Num(_), Str(_)) | (Str(_), Num(_)) | (Bool(_), _) | (_, Bool(_)) => {
                self.to_number() == other.to_number()
            }
            _ => self.strict_eq(other),
        }
    }
}

/// Number to string conversion as the language defines it
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value < 0.0 {
        return format!("-{}", number_to_string(-value));
    }

    // Shortest round-tripping digits and their decimal exponent
    let sci = format!("{:e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let sign = if e >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, e.abs())
        }
    }
}

/// String to number conversion; malformed text is NaN
pub fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return match u64::from_str_radix(hex, 16) {
            Ok(n) => n as f64,
            Err(_) => f64::NAN,
        };
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let numeric = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let m = n.trunc() % 4294967296.0;
    let m = if m < 0.0 { m + 4294967296.0 } else { m };
    m as u32
}

/// Folds expressions whose operands are all known
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator<'a> {
    scopes: Option<&'a ScopeTree>,
    fixed: Option<&'a HashMap<SymbolId, ConstValue>>,
    unsafe_: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        scopes: &'a ScopeTree,
        fixed: &'a HashMap<SymbolId, ConstValue>,
        unsafe_: bool,
    ) -> Self {
        Self {
            scopes: Some(scopes),
            fixed: Some(fixed),
            unsafe_,
        }
    }

    pub fn evaluate(
        &self,
        expr: &Expr,
    ) -> Option<ConstValue> {
        match expr {
            Expr::Num { value, .. } => Some(ConstValue::Num(*value)),
            Expr::Str { value, .. } => Some(ConstValue::Str(value.clone())),
            Expr::Bool { value, .. } => Some(ConstValue::Bool(*value)),
            Expr::Null(_) => Some(ConstValue::Null),
            Expr::Ident(ident) => {
                let def = ident.def?;
                if let Some(value) = self.fixed.and_then(|fixed| fixed.get(&def)) {
                    return Some(value.clone());
                }
                let symbol = self.scopes?.get_symbol(def)?;
                if !symbol.undeclared {
                    return None;
                }
                match ident.name.as_str() {
                    "undefined" => Some(ConstValue::Undefined),
                    "NaN" => Some(ConstValue::Num(f64::NAN)),
                    "Infinity" => Some(ConstValue::Num(f64::INFINITY)),
                    _ => None,
                }
            }
            Expr::Unary {
                op,
                prefix: true,
                expr: inner,
                ..
            } => self.unary(*op, inner),
            Expr::Binary {
                op, left, right, ..
            } => self.binary(*op, left, right),
            Expr::Conditional { test, cons, alt, .. } => {
                if self.evaluate(test)?.truthy() {
                    self.evaluate(cons)
                } else {
                    self.evaluate(alt)
                }
            }
            Expr::Dot { object, prop, .. } if self.unsafe_ && prop == "length" => match object.as_ref() {
                Expr::Str { value, .. } => Some(ConstValue::Num(utf16_units(value).len() as f64)),
                Expr::Array { elements, .. } if elements.iter().all(Expr::is_constant) => {
                    Some(ConstValue::Num(elements.len() as f64))
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn unary(
        &self,
        op: UnaryOp,
        inner: &Expr,
    ) -> Option<ConstValue> {
        if op == UnaryOp::Typeof && matches!(inner, Expr::Function(_)) {
            return Some(ConstValue::Str("function".to_string()));
        }
        let value = self.evaluate(inner)?;
        Some(match op {
            UnaryOp::Not => ConstValue::Bool(!value.truthy()),
            UnaryOp::Neg => ConstValue::Num(-value.to_number()),
            UnaryOp::Plus => ConstValue::Num(value.to_number()),
            UnaryOp::BitNot => ConstValue::Num(!to_int32(value.to_number()) as f64),
            UnaryOp::Typeof => ConstValue::Str(value.type_of().to_string()),
            UnaryOp::Void => ConstValue::Undefined,
            UnaryOp::Delete | UnaryOp::Inc | UnaryOp::Dec => return None,
        })
    }

    fn binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> Option<ConstValue> {
        let left = self.evaluate(left)?;
        match op {
            BinaryOp::And if !left.truthy() => return Some(left),
            BinaryOp::Or if left.truthy() => return Some(left),
            BinaryOp::And | BinaryOp::Or => return self.evaluate(right),
            _ => {}
        }
        let right = self.evaluate(right)?;
        fold_binary(op, &left, &right)
    }
}

/// Apply `op` to two known operands
pub fn fold_binary(
    op: BinaryOp,
    left: &ConstValue,
    right: &ConstValue,
) -> Option<ConstValue> {
    use ConstValue::{Bool, Num, Str};
    let num = |f: fn(f64, f64) -> f64| Num(f(left.to_number(), right.to_number()));
    let int = |f: fn(i32, i32) -> i32| Num(f(to_int32(left.to_number()), to_int32(right.to_number())) as f64);
    Some(match op {
        BinaryOp::Add => match (left, right) {
            (Str(_), _) | (_, Str(_)) => Str(format!("{}{}", left.to_js_string(), right.to_js_string())),
            _ => num(|a, b| a + b),
        },
        BinaryOp::Sub => num(|a, b| a - b),
        BinaryOp::Mul => num(|a, b| a * b),
        BinaryOp::Div => num(|a, b| a / b),
        BinaryOp::Mod => num(|a, b| a % b),
        BinaryOp::BitAnd => int(|a, b| a & b),
        BinaryOp::BitOr => int(|a, b| a | b),
        BinaryOp::BitXor => int(|a, b| a ^ b),
        BinaryOp::Shl => int(|a, b| a.wrapping_shl(b as u32 & 31)),
        BinaryOp::Shr => int(|a, b| a.wrapping_shr(b as u32 & 31)),
        BinaryOp::UShr => {
            let shift = to_uint32(right.to_number()) & 31;
            Num((to_uint32(left.to_number()) >> shift) as f64)
        }
        BinaryOp::StrictEq => Bool(left.strict_eq(right)),
        BinaryOp::StrictNotEq => Bool(!left.strict_eq(right)),
        BinaryOp::Eq => Bool(left.loose_eq(right)),
        BinaryOp::NotEq => Bool(!left.loose_eq(right)),
        BinaryOp::Lt => Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Gt => Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::LtE => Bool(matches!(compare(left, right), Some(Ordering::Less | Ordering::Equal))),
        BinaryOp::GtE => Bool(matches!(compare(left, right), Some(Ordering::Greater | Ordering::Equal))),
        BinaryOp::And | BinaryOp::Or | BinaryOp::In | BinaryOp::InstanceOf => return None,
    })
}

/// Abstract relational comparison; `None` when either side is NaN
fn compare(
    left: &ConstValue,
    right: &ConstValue,
) -> Option<Ordering> {
    match (left, right) {
        (ConstValue::Str(a), ConstValue::Str(b)) => Some(utf16_units(a).cmp(&utf16_units(b))),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

/// Evaluate without scope information: literals and operators only
pub fn evaluate(expr: &Expr) -> Option<ConstValue> {
    Evaluator::default().evaluate(expr)
}
