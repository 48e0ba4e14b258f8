//! Declaration parsing
//! Handles `var`/`const` lists and function declarations

use crate::frontend::core::lexer::literals::is_identifier_name;
use crate::frontend::core::lexer::tokens::*;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::parser_state::ParseResult;
use crate::frontend::core::parser::ParserState;

/// Parse `var a = 1, b` without the terminating semicolon
///
/// `no_in` is set inside `for` heads, where `in` ends the initializer.
pub fn parse_var_decl(
    state: &mut ParserState<'_>,
    no_in: bool,
) -> ParseResult<VarDecl> {
    let start = state.start_pos();
    let kind = if state.is_keyword("const") {
        VarKind::Const
    } else {
        VarKind::Var
    };
    state.next()?;

    let mut defs = Vec::new();
    loop {
        let def_start = state.start_pos();
        let name = match state.current().kind.clone() {
            TokenKind::Name(name) if is_identifier_name(&name) => {
                let token = state.next()?;
                Ident::new(name, token.span)
            }
            TokenKind::Punc('{') | TokenKind::Punc('[') => {
                return Err(state.unsupported("destructuring declarations"))
            }
            _ => return Err(state.unexpected(Some("name"))),
        };
        let value = if state.is_op("=") {
            state.next()?;
            Some(state.maybe_assign(no_in)?)
        } else {
            None
        };
        if value.is_none() && kind == VarKind::Const && !(no_in && state.is_op("in")) {
            return Err(state.invalid("Missing initializer in const declaration"));
        }
        defs.push(VarDef {
            name,
            value,
            span: state.span_from(def_start),
        });
        if !state.skip_punc(',')? {
            break;
        }
    }

    Ok(VarDecl {
        kind,
        defs,
        span: state.span_from(start),
    })
}

/// Parse `function name(params) { body }` in statement position
pub fn parse_function_decl(state: &mut ParserState<'_>) -> ParseResult<Stmt> {
    let start = state.start_pos();
    state.next()?;
    if state.is_op("*") {
        return Err(state.unsupported("generator functions"));
    }
    if !matches!(state.current().kind, TokenKind::Name(_)) {
        return Err(state.unexpected(Some("name")));
    }
    let func = state.function_rest(false)?;
    Ok(Stmt::Function(Function {
        span: state.span_from(start),
        ..func
    }))
}
