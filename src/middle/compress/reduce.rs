//! Constant propagation for variables assigned exactly once
//!
//! A variable is fixed when its only write is a statement-level
//! initializer in its own function body that evaluates to a constant, and
//! every read follows that initializer in source order. Reads inside
//! function declarations below the declaring scope are rejected: hoisting
//! lets them run before the initializer.

use std::collections::{HashMap, HashSet};

use super::evaluate::{evaluate, ConstValue};
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::visit::{self, Visitor};
use crate::middle::scope::{ScopeId, ScopeTree, SymbolId, SymbolKind};

struct Reference {
    symbol: SymbolId,
    offset: usize,
    in_declared_function: bool,
}

struct FixedCollector<'s> {
    scopes: &'s ScopeTree,
    /// Enclosing functions, innermost last, flagged when declared as statements
    functions: Vec<(ScopeId, bool)>,
    /// Statement nesting below the current function body
    depth: usize,
    candidates: HashMap<SymbolId, (ConstValue, usize)>,
    rejected: HashSet<SymbolId>,
    references: Vec<Reference>,
}

impl FixedCollector<'_> {
    fn enter_function(
        &mut self,
        func: &Function,
        declared: bool,
    ) {
        let Some(scope) = func.scope else {
            return;
        };
        self.functions.push((scope, declared));
        let depth = std::mem::replace(&mut self.depth, 0);
        visit::walk_function(self, func);
        self.depth = depth;
        self.functions.pop();
    }

    fn note_declaration(
        &mut self,
        decl: &VarDecl,
    ) {
        for def in &decl.defs {
            let (Some(symbol), Some(value)) = (def.name.def, def.value.as_ref()) else {
                continue;
            };
            match evaluate(value) {
                Some(constant) if !self.candidates.contains_key(&symbol) => {
                    self.candidates.insert(symbol, (constant, def.span.end.offset));
                }
                _ => {
                    self.rejected.insert(symbol);
                }
            }
        }
    }
}

impl Visitor for FixedCollector<'_> {
    fn visit_stmt(
        &mut self,
        stmt: &Stmt,
    ) {
        match stmt {
            Stmt::Var(decl) if self.depth == 0 => {
                self.note_declaration(decl);
                visit::walk_var_decl(self, decl);
            }
            Stmt::Function(func) => self.enter_function(func, true),
            _ => {
                self.depth += 1;
                visit::walk_stmt(self, stmt);
                self.depth -= 1;
            }
        }
    }

    fn visit_function(
        &mut self,
        func: &Function,
    ) {
        self.enter_function(func, false);
    }

    fn visit_expr(
        &mut self,
        expr: &Expr,
    ) {
        if let Expr::Ident(ident) = expr {
            if let Some(symbol) = ident.def.and_then(|def| self.scopes.get_symbol(def).map(|s| (def, s))) {
                let (id, def) = symbol;
                let below = match self.functions.iter().rposition(|(scope, _)| *scope == def.scope) {
                    Some(i) => &self.functions[i + 1..],
                    None => &self.functions[..],
                };
                self.references.push(Reference {
                    symbol: id,
                    offset: ident.span.start.offset,
                    in_declared_function: below.iter().any(|(_, declared)| *declared),
                });
            }
        }
        visit::walk_expr(self, expr);
    }
}

/// Values of variables that stay constant for their whole lifetime
pub fn fixed_values(
    body: &[Stmt],
    scopes: &ScopeTree,
    toplevel: bool,
) -> HashMap<SymbolId, ConstValue> {
    let mut collector = FixedCollector {
        scopes,
        functions: Vec::new(),
        depth: 0,
        candidates: HashMap::new(),
        rejected: HashSet::new(),
        references: Vec::new(),
    };
    visit::walk_stmts(&mut collector, body);

    let FixedCollector {
        mut candidates,
        rejected,
        references,
        ..
    } = collector;
    candidates.retain(|id, _| {
        let symbol = scopes.symbol(*id);
        !rejected.contains(id)
            && matches!(symbol.kind, SymbolKind::Var | SymbolKind::Const)
            && symbol.orig.len() == 1
            && symbol.assignments == 0
            && !scopes.is_tainted(*id)
            && (!symbol.global || toplevel)
    });
    for reference in &references {
        if let Some((_, declared_at)) = candidates.get(&reference.symbol) {
            if reference.offset < *declared_at || reference.in_declared_function {
                candidates.remove(&reference.symbol);
            }
        }
    }
    tracing::trace!("{} fixed variables", candidates.len());
    candidates.into_iter().map(|(id, (value, _))| (id, value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::config::ParseOptions;
    use crate::frontend::core::parser::parse;
    use crate::middle::scope::resolve_scopes;

    fn fixed_names(
        source: &str,
        toplevel: bool,
    ) -> Vec<(String, ConstValue)> {
        let mut program = parse(source, &ParseOptions::default()).unwrap();
        resolve_scopes(&mut program).unwrap();
        let fixed = fixed_values(&program.body, &program.scopes, toplevel);
        let mut names: Vec<(String, ConstValue)> = fixed
            .into_iter()
            .map(|(id, value)| (program.scopes.symbol(id).name.clone(), value))
            .collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));
        names
    }

    #[test]
    fn test_toplevel_constant() {
        let source = "var a = 2; (function () { console.log(a - 5); })();";
        assert_eq!(fixed_names(source, true), vec![("a".to_string(), ConstValue::Num(2.0))]);
        assert!(fixed_names(source, false).is_empty());
    }

    #[test]
    fn test_reassigned_variable_not_fixed() {
        assert!(fixed_names("var a = 2; f(a); a = 3;", true).is_empty());
    }

    #[test]
    fn test_local_constant() {
        let names = fixed_names("function f() { var b = 'x'; return b; }", false);
        assert_eq!(names, vec![("b".to_string(), ConstValue::Str("x".into()))]);
    }

    #[test]
    fn test_use_before_initializer() {
        assert!(fixed_names("function f() { g(b); var b = 1; return b; }", false).is_empty());
        assert!(fixed_names("function f() { function g() { return b; } var b = 1; return g(); }", false).is_empty());
    }

    #[test]
    fn test_conditional_initializer() {
        assert!(fixed_names("function f(x) { if (x) { var b = 1; } return b; }", false).is_empty());
    }
}
