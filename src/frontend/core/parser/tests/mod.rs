//! Parser tests
//!
//! - statements: statement forms, ASI and directives
//! - expressions: precedence, literals and member chains
//! - errors: rejected input and reported positions

mod errors;

use crate::frontend::config::ParseOptions;
use crate::frontend::core::parser::ast::{Expr, Program, Stmt};
use crate::frontend::core::parser::{parse, parse_expression, ParseError};

fn parse_ok(source: &str) -> Program {
    match parse(source, &ParseOptions::default()) {
        Ok(program) => program,
        Err(err) => panic!("failed to parse {:?}: {}", source, err),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse(source, &ParseOptions::default()) {
        Ok(program) => panic!("{:?} parsed into {:?}", source, program.body),
        Err(err) => err,
    }
}

fn expr(source: &str) -> Expr {
    parse_expression(source, &ParseOptions::default()).unwrap()
}

fn single_stmt(source: &str) -> Stmt {
    let mut program = parse_ok(source);
    assert_eq!(program.body.len(), 1, "{:?}", program.body);
    program.body.remove(0)
}
