//! Lexical scope analysis
//!
//! An arena of scopes and symbol definitions addressed by typed handles.
//! Syntax nodes refer into the arena through `Option<ScopeId>` and
//! `Option<SymbolId>`; the arena never points back into the tree.

pub mod resolver;
#[cfg(test)]
mod tests;

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::util::span::Span;

pub use resolver::resolve_scopes;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
        pub struct $name(pub u32);

        impl $name {
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn to_raw(self) -> u32 {
                self.0
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(
                &self,
                f: &mut fmt::Formatter<'_>,
            ) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(ScopeId);
define_id!(SymbolId);

/// Scope analysis errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScopeError {
    #[error("Undefined label {name}")]
    UndefinedLabel { name: String, span: Span },
    #[error("Label {name} defined twice")]
    DuplicateLabel { name: String, span: Span },
}

impl ScopeError {
    pub fn span(&self) -> Span {
        match self {
            ScopeError::UndefinedLabel { span, .. } | ScopeError::DuplicateLabel { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Toplevel,
    Function,
    Catch,
}

/// How a symbol was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Const,
    /// Name of a function declaration
    Defun,
    /// Name of a function expression, visible only inside it
    Lambda,
    Param,
    CatchParam,
    /// The implicit `arguments` object of a function
    Arguments,
    /// A name used without any declaration
    Undeclared,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Var => "variable",
            SymbolKind::Const => "constant",
            SymbolKind::Defun => "function",
            SymbolKind::Lambda => "function name",
            SymbolKind::Param => "parameter",
            SymbolKind::CatchParam => "catch parameter",
            SymbolKind::Arguments => "arguments",
            SymbolKind::Undeclared => "global",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Declarations in source order
    pub variables: IndexMap<String, SymbolId>,
    /// Every symbol this scope or its descendants can see or declare
    pub enclosed: IndexSet<SymbolId>,
    pub uses_eval: bool,
    pub uses_with: bool,
    pub uses_arguments: bool,
    pub span: Span,
}

impl Scope {
    fn new(
        kind: ScopeKind,
        parent: Option<ScopeId>,
        span: Span,
    ) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            variables: IndexMap::new(),
            enclosed: IndexSet::new(),
            uses_eval: false,
            uses_with: false,
            uses_arguments: false,
            span,
        }
    }

    /// `eval` or `with` can observe names here
    pub fn is_tainted(&self) -> bool {
        self.uses_eval || self.uses_with
    }
}

#[derive(Debug, Clone)]
pub struct SymbolDef {
    pub name: String,
    pub kind: SymbolKind,
    /// Every declaration site
    pub orig: Vec<Span>,
    pub scope: ScopeId,
    /// Every reading or writing reference
    pub references: Vec<Span>,
    /// References that assign, including `++`/`--`
    pub assignments: usize,
    /// Declared in the top-level scope
    pub global: bool,
    pub undeclared: bool,
    pub constant: bool,
    /// Shared by a catch parameter and a `var` of the same name inside the
    /// catch block; the printed `var` must name the hoisted variable too
    pub pinned: bool,
    pub mangled_name: Option<String>,
}

impl SymbolDef {
    /// Name to print: the mangled one when assigned
    pub fn output_name(&self) -> &str {
        self.mangled_name.as_deref().unwrap_or(&self.name)
    }
}

/// Arena of scopes and symbols for one program
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<SymbolDef>,
    /// One shared definition per undeclared name
    globals: IndexMap<String, SymbolId>,
}

impl ScopeTree {
    /// Tree holding just the top-level scope
    pub fn new(span: Span) -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Toplevel, None, span)],
            symbols: Vec::new(),
            globals: IndexMap::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn scope(
        &self,
        id: ScopeId,
    ) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_mut(
        &mut self,
        id: ScopeId,
    ) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn symbol(
        &self,
        id: SymbolId,
    ) -> &SymbolDef {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(
        &mut self,
        id: SymbolId,
    ) -> &mut SymbolDef {
        &mut self.symbols[id.index()]
    }

    pub fn get_symbol(
        &self,
        id: SymbolId,
    ) -> Option<&SymbolDef> {
        self.symbols.get(id.index())
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0..self.scopes.len() as u32).map(ScopeId)
    }

    pub fn symbol_ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len() as u32).map(SymbolId)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolDef> {
        self.symbols.iter()
    }

    /// Undeclared names in order of first use
    pub fn globals(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.globals.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn add_scope(
        &mut self,
        kind: ScopeKind,
        parent: ScopeId,
        span: Span,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(parent), span));
        self.scope_mut(parent).children.push(id);
        id
    }

    /// Declare `name` in `scope`; a redeclaration returns the existing symbol
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        span: Span,
    ) -> SymbolId {
        if let Some(&existing) = self.scope(scope).variables.get(name) {
            let def = self.symbol_mut(existing);
            def.orig.push(span);
            // A function declaration wins over `var` of the same name
            if kind == SymbolKind::Defun && matches!(def.kind, SymbolKind::Var) {
                def.kind = kind;
            }
            return existing;
        }
        let id = SymbolId(self.symbols.len() as u32);
        let global = self.scope(scope).kind == ScopeKind::Toplevel;
        self.symbols.push(SymbolDef {
            name: name.to_string(),
            kind,
            orig: vec![span],
            scope,
            references: Vec::new(),
            assignments: 0,
            global,
            undeclared: false,
            constant: kind == SymbolKind::Const,
            pinned: false,
            mangled_name: None,
        });
        let entry = self.scope_mut(scope);
        entry.variables.insert(name.to_string(), id);
        entry.enclosed.insert(id);
        id
    }

    /// The shared definition of an undeclared name, created on first use
    pub fn global(
        &mut self,
        name: &str,
    ) -> SymbolId {
        if let Some(&id) = self.globals.get(name) {
            return id;
        }
        let id = SymbolId(self.symbols.len() as u32);
        let root = self.root();
        self.symbols.push(SymbolDef {
            name: name.to_string(),
            kind: SymbolKind::Undeclared,
            orig: Vec::new(),
            scope: root,
            references: Vec::new(),
            assignments: 0,
            global: true,
            undeclared: true,
            constant: false,
            pinned: false,
            mangled_name: None,
        });
        self.globals.insert(name.to_string(), id);
        id
    }

    /// Resolve `name` from `scope` outwards
    pub fn lookup(
        &self,
        scope: ScopeId,
        name: &str,
    ) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entry = self.scope(id);
            if let Some(&symbol) = entry.variables.get(name) {
                return Some(symbol);
            }
            current = entry.parent;
        }
        None
    }

    /// `scope` and its ancestors, innermost first
    pub fn ancestors(
        &self,
        scope: ScopeId,
    ) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |id| self.scope(*id).parent)
    }

    /// Nearest function or top-level scope, where `var` declarations land
    pub fn var_scope(
        &self,
        scope: ScopeId,
    ) -> ScopeId {
        self.ancestors(scope)
            .find(|id| self.scope(*id).kind != ScopeKind::Catch)
            .unwrap_or_else(|| self.root())
    }

    /// Record that `symbol` is visible from `from` up to its defining scope
    pub fn add_enclosed(
        &mut self,
        from: ScopeId,
        symbol: SymbolId,
    ) {
        let target = self.symbol(symbol).scope;
        let chain: Vec<ScopeId> = self.ancestors(from).collect();
        for id in chain {
            self.scope_mut(id).enclosed.insert(symbol);
            if id == target {
                break;
            }
        }
    }

    /// Mark every ancestor of a scope that uses `eval` or `with`
    pub fn propagate_taint(&mut self) {
        let tainted: Vec<(ScopeId, bool, bool)> = self
            .scope_ids()
            .filter_map(|id| {
                let scope = self.scope(id);
                scope.is_tainted().then_some((id, scope.uses_eval, scope.uses_with))
            })
            .collect();
        for (id, eval, with) in tainted {
            let chain: Vec<ScopeId> = self.ancestors(id).collect();
            for ancestor in chain {
                let scope = self.scope_mut(ancestor);
                scope.uses_eval |= eval;
                scope.uses_with |= with;
            }
        }
    }

    /// The symbol's scope is tainted by `eval` or `with`
    pub fn is_tainted(
        &self,
        symbol: SymbolId,
    ) -> bool {
        self.scope(self.symbol(symbol).scope).is_tainted()
    }

    /// Number of references to the symbol
    pub fn reference_count(
        &self,
        symbol: SymbolId,
    ) -> usize {
        self.symbol(symbol).references.len()
    }
}
