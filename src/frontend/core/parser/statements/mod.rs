//! Statement parsing modules
//! Dispatch lives here; loops and jumps are in `control_flow`, declarations in `declarations`

pub mod control_flow;
pub mod declarations;

pub use control_flow::*;
pub use declarations::*;

use crate::frontend::core::lexer::state::UNSUPPORTED_WORDS;
use crate::frontend::core::lexer::tokens::*;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::parser_state::ParseResult;
use crate::frontend::core::parser::ParserState;

impl ParserState<'_> {
    /// Parse one statement
    pub fn parse_statement(&mut self) -> ParseResult<Stmt> {
        self.handle_regexp()?;
        let start = self.start_pos();

        if !matches!(self.current().kind, TokenKind::Str(_)) {
            self.in_directives = false;
        }

        match self.current().kind.clone() {
            TokenKind::Str(value) => {
                if self.in_directives {
                    let next = self.peek()?;
                    let ends = next.nlb || next.is_eof() || next.is_punc(';') || next.is_punc('}');
                    if ends {
                        self.next()?;
                        self.semicolon()?;
                        return Ok(Stmt::Directive {
                            value,
                            span: self.span_from(start),
                        });
                    }
                    self.in_directives = false;
                }
                self.simple_statement()
            }
            TokenKind::Num(_)
            | TokenKind::Regexp { .. }
            | TokenKind::Operator(_)
            | TokenKind::Atom(_)
            | TokenKind::Punc('(')
            | TokenKind::Punc('[') => self.simple_statement(),
            TokenKind::Name(name) => {
                if UNSUPPORTED_WORDS.contains(&name.as_str()) {
                    return Err(self.unsupported(&format!("'{}' declarations", name)));
                }
                if self.peek()?.is_punc(':') {
                    return parse_labeled_stmt(self, name);
                }
                self.simple_statement()
            }
            TokenKind::Punc('{') => {
                let body = self.block_body()?;
                Ok(Stmt::Block {
                    body,
                    span: self.span_from(start),
                })
            }
            TokenKind::Punc(';') => {
                self.next()?;
                Ok(Stmt::Empty(self.span_from(start)))
            }
            TokenKind::Keyword(kw) => match kw {
                "break" => parse_jump_stmt(self, true),
                "continue" => parse_jump_stmt(self, false),
                "debugger" => {
                    self.next()?;
                    self.semicolon()?;
                    Ok(Stmt::Debugger(self.span_from(start)))
                }
                "do" => parse_do_while_stmt(self),
                "for" => parse_for_stmt(self),
                "function" => parse_function_decl(self),
                "if" => parse_if_stmt(self),
                "return" => parse_return_stmt(self),
                "switch" => parse_switch_stmt(self),
                "throw" => parse_throw_stmt(self),
                "try" => parse_try_stmt(self),
                "var" | "const" => {
                    let decl = parse_var_decl(self, false)?;
                    self.semicolon()?;
                    Ok(Stmt::Var(VarDecl {
                        span: self.span_from(start),
                        ..decl
                    }))
                }
                "while" => parse_while_stmt(self),
                "with" => parse_with_stmt(self),
                _ => Err(self.unexpected(None)),
            },
            _ => Err(self.unexpected(None)),
        }
    }

    /// Expression statement
    fn simple_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start_pos();
        let expr = self.expression(true, false)?;
        self.semicolon()?;
        Ok(Stmt::Expr {
            expr,
            span: self.span_from(start),
        })
    }

    /// `{ statements }`
    pub(crate) fn block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect_punc('{')?;
        let mut body = Vec::new();
        while !self.is_punc('}') {
            if self.is_eof() {
                return Err(self.unexpected(Some("punc (})")));
            }
            body.push(self.parse_statement()?);
        }
        self.next()?;
        Ok(body)
    }

    /// Statement in loop position
    pub(crate) fn loop_body(&mut self) -> ParseResult<Stmt> {
        self.in_loop += 1;
        let body = self.parse_statement();
        self.in_loop -= 1;
        body
    }

    /// `( expression )`
    pub(crate) fn parenthesised(&mut self) -> ParseResult<Expr> {
        self.expect_punc('(')?;
        let expr = self.expression(true, false)?;
        self.expect_punc(')')?;
        Ok(expr)
    }

    /// Parse statements up to the end of input
    pub fn parse_toplevel(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.is_eof() {
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }
}
