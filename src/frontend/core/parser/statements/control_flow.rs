//! Control flow statement parsing
//! Handles if/else, loops, switch, try, jumps and labels

use crate::frontend::core::lexer::tokens::*;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::parser_state::{ParseError, ParseResult};
use crate::frontend::core::parser::statements::declarations::parse_var_decl;
use crate::frontend::core::parser::ParserState;

/// Parse `label: statement`; the current token is the label name
pub fn parse_labeled_stmt(
    state: &mut ParserState<'_>,
    name: String,
) -> ParseResult<Stmt> {
    let start = state.start_pos();
    let token = state.next()?;
    if state.labels.contains(&name) {
        return Err(ParseError::DuplicateLabel {
            name,
            position: start,
        });
    }
    state.expect_punc(':')?;
    state.labels.push(name.clone());
    let body = state.parse_statement();
    state.labels.pop();
    Ok(Stmt::Labeled {
        label: Label {
            name,
            span: token.span,
        },
        body: Box::new(body?),
        span: state.span_from(start),
    })
}

/// Parse `break [label];` or `continue [label];`
pub fn parse_jump_stmt(
    state: &mut ParserState<'_>,
    is_break: bool,
) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;

    let mut label = None;
    if let TokenKind::Name(name) = state.current().kind.clone() {
        if !state.current().nlb {
            if !state.labels.contains(&name) {
                return Err(ParseError::UndefinedLabel {
                    name,
                    position: state.start_pos(),
                });
            }
            let token = state.next()?;
            label = Some(Label {
                name,
                span: token.span,
            });
        }
    }

    if label.is_none() {
        if is_break && state.in_loop == 0 && state.in_switch == 0 {
            return Err(ParseError::Invalid {
                message: "Break statement must be inside a loop or switch".to_string(),
                position: start,
            });
        }
        if !is_break && state.in_loop == 0 {
            return Err(ParseError::Invalid {
                message: "Continue statement must be inside a loop".to_string(),
                position: start,
            });
        }
    }

    state.semicolon()?;
    let span = state.span_from(start);
    Ok(if is_break {
        Stmt::Break { label, span }
    } else {
        Stmt::Continue { label, span }
    })
}

/// Parse `do body while (test)`; the trailing semicolon is optional
pub fn parse_do_while_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    let body = state.loop_body()?;
    if !state.is_keyword("while") {
        return Err(state.unexpected(Some("keyword (while)")));
    }
    state.next()?;
    let test = state.parenthesised()?;
    state.skip_punc(';')?;
    Ok(Stmt::DoWhile {
        body: Box::new(body),
        test,
        span: state.span_from(start),
    })
}

/// Parse `while (test) body`
pub fn parse_while_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    let test = state.parenthesised()?;
    let body = state.loop_body()?;
    Ok(Stmt::While {
        test,
        body: Box::new(body),
        span: state.span_from(start),
    })
}

/// Parse `for (init; test; update) body` or `for (left in object) body`
pub fn parse_for_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    state.expect_punc('(')?;

    let mut init = None;
    if !state.is_punc(';') {
        let init_start = state.start_pos();
        if state.is_keyword("var") || state.is_keyword("const") {
            let decl = parse_var_decl(state, true)?;
            init = Some(ForInit::Var(VarDecl {
                span: state.span_from(init_start),
                ..decl
            }));
        } else {
            init = Some(ForInit::Expr(state.expression(true, true)?));
        }

        if state.is_op("in") {
            let left = match init {
                Some(ForInit::Var(decl)) => {
                    if decl.defs.len() > 1 {
                        return Err(ParseError::Invalid {
                            message: "Only one variable declaration allowed in for..in loop"
                                .to_string(),
                            position: init_start,
                        });
                    }
                    ForInLeft::Var(decl)
                }
                Some(ForInit::Expr(expr)) => {
                    if !expr.is_assignable() {
                        return Err(ParseError::InvalidAssignment {
                            message: "Invalid left-hand side in for-in".to_string(),
                            position: init_start,
                        });
                    }
                    ForInLeft::Expr(expr)
                }
                None => return Err(state.unexpected(None)),
            };
            state.next()?;
            let object = state.expression(true, false)?;
            state.expect_punc(')')?;
            let body = state.loop_body()?;
            return Ok(Stmt::ForIn {
                left,
                object,
                body: Box::new(body),
                span: state.span_from(start),
            });
        }
    }

    state.expect_punc(';')?;
    let test = if state.is_punc(';') {
        None
    } else {
        Some(state.expression(true, false)?)
    };
    state.expect_punc(';')?;
    let update = if state.is_punc(')') {
        None
    } else {
        Some(state.expression(true, false)?)
    };
    state.expect_punc(')')?;
    let body = state.loop_body()?;
    Ok(Stmt::For {
        init,
        test,
        update,
        body: Box::new(body),
        span: state.span_from(start),
    })
}

/// Parse `if (test) cons [else alt]`
pub fn parse_if_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    let test = state.parenthesised()?;
    let cons = state.parse_statement()?;
    let alt = if state.is_keyword("else") {
        state.next()?;
        Some(Box::new(state.parse_statement()?))
    } else {
        None
    };
    Ok(Stmt::If {
        test,
        cons: Box::new(cons),
        alt,
        span: state.span_from(start),
    })
}

/// Parse `with (object) body`
pub fn parse_with_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    let object = state.parenthesised()?;
    let body = state.parse_statement()?;
    Ok(Stmt::With {
        object,
        body: Box::new(body),
        span: state.span_from(start),
    })
}

/// Parse `return [value];`
pub fn parse_return_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    if state.in_function == 0 && !state.bare_returns() {
        return Err(ParseError::Invalid {
            message: "'return' outside of function".to_string(),
            position: start,
        });
    }
    state.next()?;
    let value = if state.is_punc(';') || state.can_insert_semicolon() {
        None
    } else {
        Some(state.expression(true, false)?)
    };
    state.semicolon()?;
    Ok(Stmt::Return {
        value,
        span: state.span_from(start),
    })
}

/// Parse `throw value;`
pub fn parse_throw_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    if state.current().nlb {
        return Err(ParseError::Invalid {
            message: "Illegal newline after 'throw'".to_string(),
            position: state.start_pos(),
        });
    }
    let value = state.expression(true, false)?;
    state.semicolon()?;
    Ok(Stmt::Throw {
        value,
        span: state.span_from(start),
    })
}

/// Parse `switch (discriminant) { case ...: ... default: ... }`
pub fn parse_switch_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    let discriminant = state.parenthesised()?;
    state.expect_punc('{')?;
    state.in_switch += 1;
    let cases = parse_switch_cases(state);
    state.in_switch -= 1;
    let cases = cases?;
    Ok(Stmt::Switch {
        discriminant,
        cases,
        span: state.span_from(start),
    })
}

fn parse_switch_cases(state: &mut ParserState<'_>) -> ParseResult<Vec<SwitchCase>> {
    let mut cases: Vec<SwitchCase> = Vec::new();
    let mut seen_default = false;
    while !state.is_punc('}') {
        let case_start = state.start_pos();
        if state.is_keyword("case") {
            state.next()?;
            let test = state.expression(true, false)?;
            state.expect_punc(':')?;
            cases.push(SwitchCase {
                test: Some(test),
                body: Vec::new(),
                span: state.span_from(case_start),
            });
        } else if state.is_keyword("default") {
            if seen_default {
                return Err(ParseError::Invalid {
                    message: "More than one default clause in switch statement".to_string(),
                    position: case_start,
                });
            }
            seen_default = true;
            state.next()?;
            state.expect_punc(':')?;
            cases.push(SwitchCase {
                test: None,
                body: Vec::new(),
                span: state.span_from(case_start),
            });
        } else if state.is_eof() {
            return Err(state.unexpected(Some("punc (})")));
        } else {
            let stmt = state.parse_statement()?;
            match cases.last_mut() {
                Some(case) => {
                    case.body.push(stmt);
                    case.span = state.span_from(case.span.start);
                }
                None => return Err(state.unexpected(Some("keyword (case)"))),
            }
        }
    }
    state.next()?;
    Ok(cases)
}

/// Parse `try { } catch (e) { } finally { }`
pub fn parse_try_stmt(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    let block = state.block_body()?;

    let mut handler = None;
    if state.is_keyword("catch") {
        let catch_start = state.start_pos();
        state.next()?;
        state.expect_punc('(')?;
        let param = match state.current().kind.clone() {
            TokenKind::Name(name) => {
                let token = state.next()?;
                Ident::new(name, token.span)
            }
            TokenKind::Punc('{') | TokenKind::Punc('[') => {
                return Err(state.unsupported("destructuring catch parameters"))
            }
            _ => return Err(state.unexpected(Some("name"))),
        };
        state.expect_punc(')')?;
        let body = state.block_body()?;
        handler = Some(Catch {
            param,
            body,
            scope: None,
            span: state.span_from(catch_start),
        });
    }

    let finalizer = if state.is_keyword("finally") {
        state.next()?;
        Some(state.block_body()?)
    } else {
        None
    };

    if handler.is_none() && finalizer.is_none() {
        return Err(ParseError::Invalid {
            message: "Missing catch/finally blocks".to_string(),
            position: state.start_pos(),
        });
    }

    Ok(Stmt::Try {
        block,
        handler,
        finalizer,
        span: state.span_from(start),
    })
}
