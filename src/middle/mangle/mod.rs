//! Short names for local bindings
//!
//! Scopes are named parent first. Each scope counts through the alphabet
//! on its own and skips any name already visible through its `enclosed`
//! set, so a nested scope can reuse a name its parent assigned to a
//! binding the nested scope never sees.

pub mod charset;
pub mod properties;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::frontend::config::MangleOptions;
use crate::frontend::core::lexer::state::is_reserved_word;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::visit::{self, Visitor, VisitorMut};
use crate::middle::compress::evaluate::number_to_string;
use crate::middle::scope::{resolve_scopes, ScopeError, ScopeId, ScopeTree, SymbolId, SymbolKind};

pub use charset::{Alphabet, CharFrequency};
pub use properties::mangle_properties;

/// Whether the symbol must keep its source name
pub fn is_unmangleable(
    scopes: &ScopeTree,
    id: SymbolId,
    options: &MangleOptions,
) -> bool {
    let symbol = scopes.symbol(id);
    (symbol.global && !options.toplevel)
        || symbol.undeclared
        || symbol.kind == SymbolKind::Arguments
        || symbol.pinned
        || scopes.is_tainted(id)
        || options.reserved.iter().any(|name| *name == symbol.name)
        || (options.keep_fnames && matches!(symbol.kind, SymbolKind::Lambda | SymbolKind::Defun))
}

/// Counts the characters of everything mangling leaves untouched
struct FrequencyCollector<'a> {
    scopes: &'a ScopeTree,
    options: &'a MangleOptions,
    frequency: CharFrequency,
}

impl FrequencyCollector<'_> {
    fn consider_ident(
        &mut self,
        ident: &Ident,
    ) {
        let keeps_name = ident
            .def
            .filter(|id| self.scopes.get_symbol(*id).is_some())
            .map_or(true, |id| is_unmangleable(self.scopes, id, self.options));
        if keeps_name {
            self.frequency.consider(&ident.name);
        }
    }
}

impl Visitor for FrequencyCollector<'_> {
    fn visit_stmt(
        &mut self,
        stmt: &Stmt,
    ) {
        let keywords: &[&str] = match stmt {
            Stmt::Directive { value, .. } => {
                self.frequency.consider(value);
                &[]
            }
            Stmt::Var(decl) => &[decl.kind.as_str()],
            Stmt::Function(_) => &["function"],
            Stmt::Return { .. } => &["return"],
            Stmt::Throw { .. } => &["throw"],
            Stmt::Break { .. } => &["break"],
            Stmt::Continue { .. } => &["continue"],
            Stmt::Debugger(_) => &["debugger"],
            Stmt::If { alt: Some(_), .. } => &["if", "else"],
            Stmt::If { .. } => &["if"],
            Stmt::For { .. } => &["for"],
            Stmt::ForIn { .. } => &["for", "in"],
            Stmt::While { .. } => &["while"],
            Stmt::DoWhile { .. } => &["do", "while"],
            Stmt::With { .. } => &["with"],
            Stmt::Switch { .. } => &["switch", "case"],
            Stmt::Try { handler, finalizer, .. } => match (handler.is_some(), finalizer.is_some()) {
                (true, true) => &["try", "catch", "finally"],
                (true, false) => &["try", "catch"],
                _ => &["try", "finally"],
            },
            Stmt::Expr { .. } | Stmt::Block { .. } | Stmt::Empty(_) | Stmt::Labeled { .. } => &[],
        };
        for keyword in keywords {
            self.frequency.consider(keyword);
        }
        visit::walk_stmt(self, stmt);
    }

    fn visit_expr(
        &mut self,
        expr: &Expr,
    ) {
        match expr {
            Expr::Ident(ident) => self.consider_ident(ident),
            Expr::Str { value, .. } => self.frequency.consider(value),
            Expr::Num { value, .. } => self.frequency.consider(&number_to_string(*value)),
            Expr::Regexp { pattern, flags, .. } => {
                self.frequency.consider(pattern);
                self.frequency.consider(flags);
            }
            Expr::Bool { value, .. } => self.frequency.consider(if *value { "true" } else { "false" }),
            Expr::Null(_) => self.frequency.consider("null"),
            Expr::This(_) => self.frequency.consider("this"),
            Expr::Dot { prop, .. } => self.frequency.consider(prop),
            Expr::Object { props, .. } => {
                for prop in props {
                    self.frequency.consider(&prop.key);
                    match prop.kind {
                        PropKind::Get(_) => self.frequency.consider("get"),
                        PropKind::Set(_) => self.frequency.consider("set"),
                        PropKind::Init(_) => {}
                    }
                }
            }
            Expr::Unary { op, .. } => self.frequency.consider(op.as_str()),
            Expr::Binary { op, .. } => self.frequency.consider(op.as_str()),
            Expr::New { .. } => self.frequency.consider("new"),
            _ => {}
        }
        visit::walk_expr(self, expr);
    }

    fn visit_function(
        &mut self,
        func: &Function,
    ) {
        self.frequency.consider("function");
        visit::walk_function(self, func);
    }

    fn visit_binding(
        &mut self,
        ident: &Ident,
    ) {
        self.consider_ident(ident);
    }
}

/// Assigns `mangled_name` to every mangleable symbol
struct NameAssigner<'a> {
    options: &'a MangleOptions,
    alphabet: &'a Alphabet,
    /// Next name number per scope
    counters: HashMap<ScopeId, usize>,
}

impl NameAssigner<'_> {
    fn is_taken(
        &self,
        scopes: &ScopeTree,
        scope: ScopeId,
        name: &str,
    ) -> bool {
        if is_reserved_word(name) || self.options.reserved.iter().any(|r| r == name) {
            return true;
        }
        scopes.scope(scope).enclosed.iter().any(|id| {
            let symbol = scopes.symbol(*id);
            match &symbol.mangled_name {
                Some(mangled) => mangled == name,
                None => symbol.name == name && is_unmangleable(scopes, *id, self.options),
            }
        })
    }

    fn next_name(
        &mut self,
        scopes: &ScopeTree,
        scope: ScopeId,
    ) -> String {
        loop {
            let counter = self.counters.entry(scope).or_insert(0);
            let name = self.alphabet.base54(*counter);
            *counter += 1;
            if !self.is_taken(scopes, scope, &name) {
                return name;
            }
        }
    }

    fn name_scope(
        &mut self,
        scopes: &mut ScopeTree,
        scope: ScopeId,
    ) {
        let symbols: Vec<SymbolId> = scopes.scope(scope).variables.values().copied().collect();
        for id in symbols {
            if scopes.symbol(id).mangled_name.is_some() || is_unmangleable(scopes, id, self.options) {
                continue;
            }
            let symbol = scopes.symbol(id);
            // Old engines leak a function expression's name into the enclosing scope
            let home = match (symbol.kind, self.options.screw_ie8) {
                (SymbolKind::Lambda, false) => scopes.scope(symbol.scope).parent.unwrap_or(symbol.scope),
                _ => symbol.scope,
            };
            let name = self.next_name(scopes, home);
            tracing::trace!("{} -> {}", scopes.symbol(id).name, name);
            scopes.symbol_mut(id).mangled_name = Some(name);
        }
        let children = scopes.scope(scope).children.clone();
        for child in children {
            self.name_scope(scopes, child);
        }
    }
}

/// Renames labels; each function counts from the start again
struct LabelRenamer<'a> {
    alphabet: &'a Alphabet,
    counter: usize,
    /// Labels in effect, innermost last: source name and new name
    active: Vec<(String, String)>,
}

impl LabelRenamer<'_> {
    fn rename_target(
        &self,
        label: &mut Label,
    ) {
        if let Some((_, renamed)) = self.active.iter().rev().find(|(name, _)| *name == label.name) {
            label.name = renamed.clone();
        }
    }
}

impl VisitorMut for LabelRenamer<'_> {
    fn visit_stmt_mut(
        &mut self,
        stmt: &mut Stmt,
    ) {
        match stmt {
            Stmt::Labeled { label, body, .. } => {
                let saved = self.counter;
                let renamed = loop {
                    let name = self.alphabet.base54(self.counter);
                    self.counter += 1;
                    if !is_reserved_word(&name) {
                        break name;
                    }
                };
                let original = std::mem::replace(&mut label.name, renamed.clone());
                self.active.push((original, renamed));
                self.visit_stmt_mut(body);
                self.active.pop();
                self.counter = saved;
            }
            Stmt::Break { label: Some(label), .. } | Stmt::Continue { label: Some(label), .. } => {
                self.rename_target(label);
            }
            _ => visit::walk_stmt_mut(self, stmt),
        }
    }

    fn visit_function_mut(
        &mut self,
        func: &mut Function,
    ) {
        let counter = std::mem::replace(&mut self.counter, 0);
        let active = std::mem::take(&mut self.active);
        visit::walk_function_mut(self, func);
        self.counter = counter;
        self.active = active;
    }
}

/// Rename local bindings, labels and optionally properties of `program`
///
/// # Example
/// ```
/// use squeeze::frontend::config::{MangleOptions, OutputOptions, ParseOptions};
/// use squeeze::frontend::core::parser::parse;
/// use squeeze::middle::mangle::mangle;
/// use squeeze::backends::output::generate;
///
/// let mut program = parse("function f(long_name) { return long_name; }", &ParseOptions::default()).unwrap();
/// mangle(&mut program, &MangleOptions::default()).unwrap();
/// let out = generate(&program, &OutputOptions::default());
/// assert!(!out.contains("long_name"));
/// ```
pub fn mangle(
    program: &mut Program,
    options: &MangleOptions,
) -> Result<(), ScopeError> {
    resolve_scopes(program)?;
    if let Some(properties) = &options.properties {
        mangle_properties(program, properties);
    }

    let mut collector = FrequencyCollector {
        scopes: &program.scopes,
        options,
        frequency: CharFrequency::new(),
    };
    visit::walk_stmts(&mut collector, &program.body);
    let alphabet = collector.frequency.alphabet();

    let mut assigner = NameAssigner {
        options,
        alphabet: &alphabet,
        counters: HashMap::new(),
    };
    let root = program.scopes.root();
    assigner.name_scope(&mut program.scopes, root);

    let mut labels = LabelRenamer {
        alphabet: &alphabet,
        counter: 0,
        active: Vec::new(),
    };
    visit::walk_stmts_mut(&mut labels, &mut program.body);

    let renamed = program.scopes.symbols().filter(|s| s.mangled_name.is_some()).count();
    tracing::debug!("mangled {} names", renamed);
    Ok(())
}
