//! Infix and postfix parsing (led - left denotation)
//!
//! Binary operator chains, member access, calls and postfix updates.

use crate::frontend::core::lexer::tokens::*;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::parser_state::{ParseError, ParseResult};
use crate::frontend::core::parser::pratt::precedence::*;
use crate::frontend::core::parser::ParserState;
use crate::util::span::Position;

impl ParserState<'_> {
    /// Precedence climbing over binary operators stronger than `min_prec`
    pub(crate) fn expr_op(
        &mut self,
        left: Expr,
        start: Position,
        min_prec: u8,
        no_in: bool,
    ) -> ParseResult<Expr> {
        let mut left = left;
        loop {
            let op = match &self.current().kind {
                TokenKind::Operator(text) => infix_operator(text, no_in),
                _ => None,
            };
            let Some(op) = op else {
                return Ok(left);
            };
            let prec = binary_precedence(op);
            if prec <= min_prec {
                return Ok(left);
            }
            self.next()?;
            let right_start = self.start_pos();
            let right = self.maybe_unary(true)?;
            let right = self.expr_op(right, right_start, prec, no_in)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
    }

    /// Member access and (optionally) calls following an atom
    pub(crate) fn subscripts(
        &mut self,
        expr: Expr,
        start: Position,
        allow_calls: bool,
    ) -> ParseResult<Expr> {
        let mut expr = expr;
        loop {
            if self.is_punc('.') {
                self.next()?;
                let prop = match self.current().kind.word() {
                    Some(word) => word.to_string(),
                    None => return Err(self.unexpected(Some("name"))),
                };
                self.next()?;
                expr = Expr::Dot {
                    object: Box::new(expr),
                    prop,
                    span: self.span_from(start),
                };
            } else if self.is_punc('[') {
                self.next()?;
                let prop = self.expression(true, false)?;
                self.expect_punc(']')?;
                expr = Expr::Sub {
                    object: Box::new(expr),
                    prop: Box::new(prop),
                    span: self.span_from(start),
                };
            } else if allow_calls && self.is_punc('(') {
                let args = self.arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    span: self.span_from(start),
                };
            } else {
                return Ok(expr);
            }
        }
    }

    /// Parenthesized argument list
    pub(crate) fn arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect_punc('(')?;
        let mut args = Vec::new();
        let mut first = true;
        while !self.is_punc(')') {
            if first {
                first = false;
            } else {
                self.expect_punc(',')?;
            }
            args.push(self.maybe_assign(false)?);
        }
        self.next()?;
        Ok(args)
    }

    /// Postfix `++`/`--`, allowed only without a line break before the operator
    pub(crate) fn postfix(
        &mut self,
        expr: Expr,
        start: Position,
    ) -> ParseResult<Expr> {
        let mut expr = expr;
        while (self.is_op("++") || self.is_op("--")) && !self.current().nlb {
            let op = if self.is_op("++") {
                UnaryOp::Inc
            } else {
                UnaryOp::Dec
            };
            if !expr.is_assignable() {
                return Err(ParseError::InvalidAssignment {
                    message: format!("Invalid use of {} operator", op.as_str()),
                    position: self.start_pos(),
                });
            }
            self.next()?;
            expr = Expr::Unary {
                op,
                prefix: false,
                expr: Box::new(expr),
                span: self.span_from(start),
            };
        }
        Ok(expr)
    }
}
