//! Scope analysis unit tests

use crate::frontend::config::ParseOptions;
use crate::frontend::core::parser::{parse, Expr, Program, Stmt};
use crate::middle::scope::{resolve_scopes, ScopeError, ScopeKind, SymbolKind};

fn resolved(source: &str) -> Program {
    let mut program = parse(source, &ParseOptions::default()).unwrap();
    resolve_scopes(&mut program).unwrap();
    program
}

fn symbol_named<'a>(
    program: &'a Program,
    name: &str,
) -> Vec<&'a crate::middle::scope::SymbolDef> {
    program.scopes.symbols().filter(|s| s.name == name).collect()
}

#[test]
fn test_toplevel_declarations() {
    let program = resolved("var a = 1; function f(x) { return x; } b = 2;");
    let root = program.scopes.scope(program.scopes.root());
    assert_eq!(root.kind, ScopeKind::Toplevel);
    assert!(root.variables.contains_key("a"));
    assert!(root.variables.contains_key("f"));
    assert!(!root.variables.contains_key("x"));

    let b = symbol_named(&program, "b");
    assert_eq!(b.len(), 1);
    assert!(b[0].undeclared);
    assert!(b[0].global);
}

#[test]
fn test_hoisting_resolves_before_declaration() {
    let program = resolved("function f() { g(); var v; function g() { return v; } }");
    let g = symbol_named(&program, "g");
    assert_eq!(g.len(), 1);
    assert_eq!(g[0].kind, SymbolKind::Defun);
    assert_eq!(g[0].references.len(), 1);
    assert!(!g[0].undeclared);
}

#[test]
fn test_function_expression_name_is_local() {
    let program = resolved("var h = function inner() { return inner; }; inner;");
    let inner: Vec<_> = symbol_named(&program, "inner");
    assert_eq!(inner.len(), 2);
    assert!(inner.iter().any(|s| s.kind == SymbolKind::Lambda));
    assert!(inner.iter().any(|s| s.undeclared));
}

#[test]
fn test_implicit_arguments() {
    let program = resolved("function f() { return arguments[0]; } function g() {}");
    let args = symbol_named(&program, "arguments");
    assert_eq!(args.len(), 2);
    assert!(args.iter().all(|s| s.kind == SymbolKind::Arguments));
    let used: Vec<_> = program
        .scopes
        .scope_ids()
        .filter(|id| program.scopes.scope(*id).uses_arguments)
        .collect();
    assert_eq!(used.len(), 1);
}

#[test]
fn test_catch_scope() {
    let program = resolved("try { x(); } catch (e) { var y = e; }");
    let e = symbol_named(&program, "e");
    assert_eq!(e[0].kind, SymbolKind::CatchParam);
    assert_eq!(program.scopes.scope(e[0].scope).kind, ScopeKind::Catch);
    // `var` inside a catch block lands in the enclosing scope
    let y = symbol_named(&program, "y");
    assert_eq!(y[0].scope, program.scopes.root());
}

#[test]
fn test_references_are_linked() {
    let program = resolved("var a; a = 1; a;");
    match &program.body[2] {
        Stmt::Expr {
            expr: Expr::Ident(ident),
            ..
        } => {
            let def = program.scopes.symbol(ident.def.unwrap());
            assert_eq!(def.name, "a");
            assert_eq!(def.references.len(), 2);
            assert_eq!(def.assignments, 1);
        }
        other => panic!("unexpected statement {:?}", other),
    }
}

#[test]
fn test_enclosed_propagation() {
    let program = resolved("var outer; function f() { function g() { return outer; } }");
    let outer = program.scopes.lookup(program.scopes.root(), "outer").unwrap();
    let enclosing: Vec<_> = program
        .scopes
        .scope_ids()
        .filter(|id| program.scopes.scope(*id).enclosed.contains(&outer))
        .collect();
    // root, f and g
    assert_eq!(enclosing.len(), 3);
}

#[test]
fn test_own_declarations_are_enclosed() {
    let program = resolved("function f(p) { var q; }");
    let p = symbol_named(&program, "p")[0];
    let scope = program.scopes.scope(p.scope);
    let q = scope.variables["q"];
    assert!(scope.enclosed.contains(&q));
}

#[test]
fn test_eval_taints_ancestors() {
    let program = resolved("function a() { function b() { eval('x'); } } function c() {}");
    let tainted = program
        .scopes
        .scope_ids()
        .filter(|id| program.scopes.scope(*id).uses_eval)
        .count();
    // b, a and the top level; c stays clean
    assert_eq!(tainted, 3);
}

#[test]
fn test_declared_eval_does_not_taint() {
    let program = resolved("function a(eval) { eval('x'); }");
    assert!(program.scopes.scope_ids().all(|id| !program.scopes.scope(id).uses_eval));
}

#[test]
fn test_with_taints() {
    let program = resolved("function f(o) { with (o) { x = 1; } }");
    assert!(program.scopes.scope(program.scopes.root()).uses_with);
}

#[test]
fn test_resolution_is_repeatable() {
    let mut program = resolved("var a = 1; function f() { return a; }");
    let first = program.scopes.symbol_ids().count();
    resolve_scopes(&mut program).unwrap();
    assert_eq!(program.scopes.symbol_ids().count(), first);
}

#[test]
fn test_label_errors_from_scope_pass() {
    use crate::frontend::core::parser::Label;
    use crate::util::span::Span;

    // Build a tree the parser would reject: `break missing;` inside a loop
    let mut program = parse("while (x) { break; }", &ParseOptions::default()).unwrap();
    if let Stmt::While { body, .. } = &mut program.body[0] {
        if let Stmt::Block { body, .. } = body.as_mut() {
            body[0] = Stmt::Break {
                label: Some(Label {
                    name: "missing".to_string(),
                    span: Span::dummy(),
                }),
                span: Span::dummy(),
            };
        }
    }
    let err = resolve_scopes(&mut program).unwrap_err();
    assert!(matches!(err, ScopeError::UndefinedLabel { ref name, .. } if name == "missing"));
}

#[test]
fn test_constant_flag() {
    let program = resolved("const K = 1; var v = 2;");
    assert!(symbol_named(&program, "K")[0].constant);
    assert!(!symbol_named(&program, "v")[0].constant);
}

#[test]
fn test_var_in_catch_writes_catch_param() {
    let program = resolved("function f() { try { a(); } catch (e) { var e = 2; return e; } }");
    let e = symbol_named(&program, "e");
    assert_eq!(e.len(), 2);
    let param = e.iter().find(|s| s.kind == SymbolKind::CatchParam).unwrap();
    let var = e.iter().find(|s| s.kind == SymbolKind::Var).unwrap();
    assert!(param.pinned && var.pinned);
    assert_eq!(param.assignments, 1);
    assert!(var.references.is_empty());
}
