//! Prefix expression parsing (nud - null denotation)
//!
//! Atoms, literals, unary prefixes, `new`, function expressions and
//! array/object literals.

use crate::frontend::core::lexer::literals::is_identifier_name;
use crate::frontend::core::lexer::state::UNSUPPORTED_WORDS;
use crate::frontend::core::lexer::tokens::*;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::parser_state::{ParseError, ParseResult};
use crate::frontend::core::parser::ParserState;

impl ParserState<'_> {
    /// Unary prefix operators, then an atom with postfix updates
    pub(crate) fn maybe_unary(
        &mut self,
        allow_calls: bool,
    ) -> ParseResult<Expr> {
        let start = self.start_pos();
        let prefix = match &self.current().kind {
            TokenKind::Operator(op) => UnaryOp::from_prefix(op),
            _ => None,
        };
        if let Some(op) = prefix {
            self.next()?;
            let expr = self.maybe_unary(allow_calls)?;
            if op.is_update() && !expr.is_assignable() {
                return Err(ParseError::InvalidAssignment {
                    message: format!("Invalid use of {} operator", op.as_str()),
                    position: start,
                });
            }
            return Ok(Expr::Unary {
                op,
                prefix: true,
                expr: Box::new(expr),
                span: self.span_from(start),
            });
        }
        let atom = self.expr_atom(allow_calls)?;
        self.postfix(atom, start)
    }

    /// Primary expression followed by its member accesses and calls
    pub(crate) fn expr_atom(
        &mut self,
        allow_calls: bool,
    ) -> ParseResult<Expr> {
        self.handle_regexp()?;
        let start = self.start_pos();

        if self.is_op("new") {
            return self.new_expression(allow_calls);
        }

        let atom = match self.current().kind.clone() {
            TokenKind::Punc('(') => {
                self.next()?;
                if self.is_punc(')') {
                    // lexing the token after `()` reports `=>` as unsupported
                    self.peek()?;
                    return Err(self.unexpected(Some("expression")));
                }
                let inner = self.expression(true, false)?;
                self.expect_punc(')')?;
                inner
            }
            TokenKind::Punc('[') => self.array_literal()?,
            TokenKind::Punc('{') => self.object_literal()?,
            TokenKind::Keyword("function") => {
                self.next()?;
                let func = self.function_rest(false)?;
                Expr::Function(Box::new(func))
            }
            TokenKind::Name(name) if name == "this" => {
                self.next()?;
                Expr::This(self.span_from(start))
            }
            TokenKind::Name(name) => {
                if UNSUPPORTED_WORDS.contains(&name.as_str()) {
                    return Err(self.unsupported(&format!("'{}'", name)));
                }
                let token = self.next()?;
                Expr::Ident(Ident::new(name, token.span))
            }
            TokenKind::Num(value) => {
                let token = self.next()?;
                Expr::Num {
                    value,
                    span: token.span,
                }
            }
            TokenKind::Str(value) => {
                let token = self.next()?;
                Expr::Str {
                    value,
                    span: token.span,
                }
            }
            TokenKind::Regexp { pattern, flags } => {
                let token = self.next()?;
                Expr::Regexp {
                    pattern,
                    flags,
                    span: token.span,
                }
            }
            TokenKind::Atom(atom) => {
                let token = self.next()?;
                match atom {
                    "null" => Expr::Null(token.span),
                    other => Expr::Bool {
                        value: other == "true",
                        span: token.span,
                    },
                }
            }
            _ => return Err(self.unexpected(None)),
        };
        self.subscripts(atom, start, allow_calls)
    }

    /// `new Callee(args)`; the argument list is optional
    fn new_expression(
        &mut self,
        allow_calls: bool,
    ) -> ParseResult<Expr> {
        let start = self.start_pos();
        self.next()?;
        if self.is_punc('.') {
            return Err(self.unsupported("new.target"));
        }
        let callee = self.expr_atom(false)?;
        let args = if self.is_punc('(') {
            self.arguments()?
        } else {
            Vec::new()
        };
        let expr = Expr::New {
            callee: Box::new(callee),
            args,
            span: self.span_from(start),
        };
        self.subscripts(expr, start, allow_calls)
    }

    /// `[a, , b]`; a trailing comma adds no element
    fn array_literal(&mut self) -> ParseResult<Expr> {
        let start = self.start_pos();
        self.expect_punc('[')?;
        let mut elements = Vec::new();
        let mut first = true;
        while !self.is_punc(']') {
            if first {
                first = false;
            } else {
                self.expect_punc(',')?;
            }
            if self.is_punc(']') {
                break;
            }
            if self.is_punc(',') {
                elements.push(Expr::Hole(self.current().span));
            } else {
                elements.push(self.maybe_assign(false)?);
            }
        }
        self.next()?;
        Ok(Expr::Array {
            elements,
            span: self.span_from(start),
        })
    }

    fn object_literal(&mut self) -> ParseResult<Expr> {
        let start = self.start_pos();
        self.expect_punc('{')?;
        let mut props = Vec::new();
        let mut first = true;
        while !self.is_punc('}') {
            if first {
                first = false;
            } else {
                self.expect_punc(',')?;
            }
            if self.is_punc('}') {
                break;
            }
            props.push(self.object_property()?);
        }
        self.next()?;
        Ok(Expr::Object {
            props,
            span: self.span_from(start),
        })
    }

    fn object_property(&mut self) -> ParseResult<Prop> {
        let start = self.start_pos();
        if let TokenKind::Name(name) = self.current().kind.clone() {
            if name == "get" || name == "set" {
                let is_getter = name == "get";
                let next = self.peek()?;
                if !next.is_punc(':') && !next.is_punc('(') && !next.is_punc(',') && !next.is_punc('}') {
                    self.next()?;
                    let (key, quoted) = self.property_name()?;
                    let func = self.function_rest(true)?;
                    let kind = if is_getter {
                        PropKind::Get(func)
                    } else {
                        PropKind::Set(func)
                    };
                    return Ok(Prop {
                        key,
                        quoted,
                        kind,
                        span: self.span_from(start),
                    });
                }
            }
        }

        let (key, quoted) = self.property_name()?;
        if self.is_punc('(') {
            return Err(self.unsupported("method shorthand in object literals"));
        }
        if self.is_punc(',') || self.is_punc('}') {
            return Err(self.unsupported("shorthand properties"));
        }
        self.expect_punc(':')?;
        let value = self.maybe_assign(false)?;
        Ok(Prop {
            key,
            quoted,
            kind: PropKind::Init(value),
            span: self.span_from(start),
        })
    }

    /// Key of an object literal property: `(text, was_quoted)`
    fn property_name(&mut self) -> ParseResult<(String, bool)> {
        if self.is_punc('[') {
            return Err(self.unsupported("computed property names"));
        }
        let key = match &self.current().kind {
            TokenKind::Num(value) => (crate::middle::compress::evaluate::number_to_string(*value), false),
            TokenKind::Str(value) => (value.clone(), true),
            kind => match kind.word() {
                Some(word) => (word.to_string(), false),
                None => return Err(self.unexpected(Some("property name"))),
            },
        };
        self.next()?;
        Ok(key)
    }

    /// Parameters and body of a function; `function` has been consumed
    ///
    /// Accessors (`anonymous_accessor`) have no name.
    pub(crate) fn function_rest(
        &mut self,
        anonymous_accessor: bool,
    ) -> ParseResult<Function> {
        let start = self.start_pos();
        let name = match self.current().kind.clone() {
            TokenKind::Name(name) if !anonymous_accessor => {
                if UNSUPPORTED_WORDS.contains(&name.as_str()) {
                    return Err(self.unsupported(&format!("'{}'", name)));
                }
                let token = self.next()?;
                Some(Ident::new(name, token.span))
            }
            _ => None,
        };
        if self.is_op("*") {
            return Err(self.unsupported("generator functions"));
        }

        self.expect_punc('(')?;
        let mut params = Vec::new();
        let mut first = true;
        while !self.is_punc(')') {
            if first {
                first = false;
            } else {
                self.expect_punc(',')?;
            }
            match self.current().kind.clone() {
                TokenKind::Name(name) if is_identifier_name(&name) => {
                    let token = self.next()?;
                    params.push(Ident::new(name, token.span));
                }
                TokenKind::Punc('[') | TokenKind::Punc('{') => {
                    return Err(self.unsupported("destructuring parameters"))
                }
                _ => return Err(self.unexpected(Some("name"))),
            }
            if self.is_op("=") {
                return Err(self.unsupported("default parameters"));
            }
        }
        self.next()?;

        let body = self.function_body()?;
        Ok(Function {
            name,
            params,
            body,
            scope: None,
            span: self.span_from(start),
        })
    }

    /// `{ statements }` of a function with fresh loop and label context
    pub(crate) fn function_body(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect_punc('{')?;
        let saved_loop = std::mem::replace(&mut self.in_loop, 0);
        let saved_switch = std::mem::replace(&mut self.in_switch, 0);
        let saved_labels = std::mem::take(&mut self.labels);
        let saved_directives = std::mem::replace(&mut self.in_directives, true);
        self.in_function += 1;

        let mut body = Vec::new();
        let result = loop {
            if self.is_punc('}') {
                break Ok(());
            }
            if self.is_eof() {
                break Err(self.unexpected(Some("punc (})")));
            }
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(err) => break Err(err),
            }
        };

        self.in_function -= 1;
        self.in_directives = saved_directives;
        self.labels = saved_labels;
        self.in_switch = saved_switch;
        self.in_loop = saved_loop;
        result?;
        self.next()?;
        Ok(body)
    }
}
