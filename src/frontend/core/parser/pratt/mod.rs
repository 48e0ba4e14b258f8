//! Expression parser
//! Precedence climbing for binary operators, recursive descent for the rest

pub mod led;
pub mod nud;
pub mod precedence;

pub use precedence::*;

use crate::frontend::core::lexer::tokens::*;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::parser_state::{ParseError, ParseResult};
use crate::frontend::core::parser::ParserState;

/// Assignment operator spelled by a token; `Some(None)` is plain `=`
fn assignment_operator(kind: &TokenKind) -> Option<Option<BinaryOp>> {
    match kind {
        TokenKind::Operator("=") => Some(None),
        TokenKind::Operator(op) if op.len() >= 2 && op.ends_with('=') => {
            let base = &op[..op.len() - 1];
            let bin = BinaryOp::from_str(base)?;
            if bin.is_assignable() && !matches!(*op, "==" | "!=" | "<=" | ">=") {
                Some(Some(bin))
            } else {
                None
            }
        }
        _ => None,
    }
}

impl ParserState<'_> {
    /// Full expression; with `commas` a comma operator sequence is accepted
    pub fn expression(
        &mut self,
        commas: bool,
        no_in: bool,
    ) -> ParseResult<Expr> {
        let start = self.start_pos();
        let first = self.maybe_assign(no_in)?;
        if !commas || !self.is_punc(',') {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.skip_punc(',')? {
            exprs.push(self.maybe_assign(no_in)?);
        }
        Ok(Expr::Seq {
            exprs,
            span: self.span_from(start),
        })
    }

    /// Assignment expression (right associative)
    pub fn maybe_assign(
        &mut self,
        no_in: bool,
    ) -> ParseResult<Expr> {
        let start = self.start_pos();
        let left = self.maybe_conditional(no_in)?;
        if let Some(op) = assignment_operator(&self.current().kind) {
            if !left.is_assignable() {
                return Err(ParseError::InvalidAssignment {
                    message: "Invalid assignment".to_string(),
                    position: self.start_pos(),
                });
            }
            self.next()?;
            let value = self.maybe_assign(no_in)?;
            return Ok(Expr::Assign {
                op,
                target: Box::new(left),
                value: Box::new(value),
                span: self.span_from(start),
            });
        }
        Ok(left)
    }

    /// `test ? cons : alt`
    pub fn maybe_conditional(
        &mut self,
        no_in: bool,
    ) -> ParseResult<Expr> {
        let start = self.start_pos();
        let test = self.expr_ops(no_in)?;
        if !self.is_op("?") {
            return Ok(test);
        }
        self.next()?;
        let cons = self.maybe_assign(false)?;
        self.expect_punc(':')?;
        let alt = self.maybe_assign(no_in)?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            cons: Box::new(cons),
            alt: Box::new(alt),
            span: self.span_from(start),
        })
    }

    /// Binary operator chain
    pub fn expr_ops(
        &mut self,
        no_in: bool,
    ) -> ParseResult<Expr> {
        let start = self.start_pos();
        let left = self.maybe_unary(true)?;
        self.expr_op(left, start, 0, no_in)
    }
}
