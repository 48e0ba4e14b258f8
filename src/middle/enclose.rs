//! Wrapping a program in a function
//!
//! `{"window": "w"}` turns `body` into `(function(w){body})(window);`.

use indexmap::IndexMap;

use crate::frontend::config::ParseOptions;
use crate::frontend::core::parser::ast::{Expr, Program, Stmt};
use crate::frontend::core::parser::{parse, ParseError};

/// Move the whole body of `program` into an immediately invoked function
///
/// Keys are argument expressions, values the parameter names they bind.
/// Runs after mangling: the wrapper's names are printed as written.
pub fn wrap_enclose(
    program: &mut Program,
    pairs: &IndexMap<String, String>,
) -> Result<(), ParseError> {
    let params: Vec<&str> = pairs.values().map(String::as_str).collect();
    let args: Vec<&str> = pairs.keys().map(String::as_str).collect();
    let wrapper_source = format!("(function({}){{}})({});", params.join(","), args.join(","));
    let mut wrapper = parse(&wrapper_source, &ParseOptions::default())?;

    let Some(Stmt::Expr { expr: Expr::Call { callee, .. }, .. }) = wrapper.body.first_mut() else {
        return Err(ParseError::Invalid {
            message: format!("enclose wrapper did not parse as a call: {}", wrapper_source),
            position: wrapper.span.start,
        });
    };
    let Expr::Function(func) = callee.as_mut() else {
        return Err(ParseError::Invalid {
            message: format!("enclose wrapper did not parse as a function call: {}", wrapper_source),
            position: wrapper.span.start,
        });
    };
    func.body = std::mem::take(&mut program.body);
    program.body = wrapper.body;
    tracing::debug!("enclosed program with {} parameters", params.len());
    Ok(())
}
