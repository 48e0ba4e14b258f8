//! Precedence handling
//!
//! Binding power levels shared by the parser (precedence climbing) and the
//! code generator (deciding where parentheses are required).

use crate::frontend::core::parser::ast::BinaryOp;

/// Binding power levels, lowest first
pub const BP_SEQUENCE: u8 = 0;
pub const BP_ASSIGN: u8 = 1;
pub const BP_CONDITIONAL: u8 = 2;
pub const BP_LOGICAL_OR: u8 = 3;
pub const BP_LOGICAL_AND: u8 = 4;
pub const BP_BIT_OR: u8 = 5;
pub const BP_BIT_XOR: u8 = 6;
pub const BP_BIT_AND: u8 = 7;
pub const BP_EQUALITY: u8 = 8;
pub const BP_RELATIONAL: u8 = 9;
pub const BP_SHIFT: u8 = 10;
pub const BP_ADDITIVE: u8 = 11;
pub const BP_MULTIPLICATIVE: u8 = 12;
pub const BP_UNARY: u8 = 13;
pub const BP_POSTFIX: u8 = 14;
pub const BP_CALL: u8 = 15;
pub const BP_PRIMARY: u8 = 16;

/// Binding power of a binary operator
pub fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => BP_LOGICAL_OR,
        BinaryOp::And => BP_LOGICAL_AND,
        BinaryOp::BitOr => BP_BIT_OR,
        BinaryOp::BitXor => BP_BIT_XOR,
        BinaryOp::BitAnd => BP_BIT_AND,
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => BP_EQUALITY,
        BinaryOp::Lt
        | BinaryOp::Gt
        | BinaryOp::LtE
        | BinaryOp::GtE
        | BinaryOp::In
        | BinaryOp::InstanceOf => BP_RELATIONAL,
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => BP_SHIFT,
        BinaryOp::Add | BinaryOp::Sub => BP_ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => BP_MULTIPLICATIVE,
    }
}

/// Binary operator spelled by an operator token, honoring the no-`in` context of `for` heads
pub fn infix_operator(
    text: &str,
    no_in: bool,
) -> Option<BinaryOp> {
    let op = BinaryOp::from_str(text)?;
    if no_in && op == BinaryOp::In {
        None
    } else {
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(binary_precedence(BinaryOp::Or) < binary_precedence(BinaryOp::And));
        assert!(binary_precedence(BinaryOp::And) < binary_precedence(BinaryOp::BitOr));
        assert!(binary_precedence(BinaryOp::Eq) < binary_precedence(BinaryOp::Lt));
        assert!(binary_precedence(BinaryOp::Shl) < binary_precedence(BinaryOp::Add));
        assert!(binary_precedence(BinaryOp::Add) < binary_precedence(BinaryOp::Mul));
        assert!(binary_precedence(BinaryOp::Mul) < BP_UNARY);
        assert!(BP_ASSIGN < BP_CONDITIONAL);
    }

    #[test]
    fn test_no_in_context() {
        assert_eq!(infix_operator("in", false), Some(BinaryOp::In));
        assert_eq!(infix_operator("in", true), None);
        assert_eq!(infix_operator("instanceof", true), Some(BinaryOp::InstanceOf));
        assert_eq!(infix_operator("=", false), None);
    }
}
