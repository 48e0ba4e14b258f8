//! Property name renaming
//!
//! Renames every property name that is not a builtin and not excluded by
//! the options. The same name gets the same replacement everywhere, so
//! the program stays consistent as long as it never builds property names
//! dynamically.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::charset::Alphabet;
use crate::frontend::config::PropertyMangleOptions;
use crate::frontend::core::lexer::state::is_reserved_word;
use crate::frontend::core::parser::ast::*;
use crate::frontend::core::parser::visit::{self, Visitor, VisitorMut};

/// Properties of the standard library objects and their prototypes
static BUILTIN_PROPERTIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Object
        "constructor", "hasOwnProperty", "isPrototypeOf", "propertyIsEnumerable", "toLocaleString",
        "toString", "valueOf", "prototype", "length", "name", "create", "defineProperty",
        "defineProperties", "freeze", "getOwnPropertyDescriptor", "getOwnPropertyNames",
        "getPrototypeOf", "isExtensible", "isFrozen", "isSealed", "keys", "preventExtensions", "seal",
        "__proto__", "__defineGetter__", "__defineSetter__", "__lookupGetter__", "__lookupSetter__",
        "get", "set", "value", "writable", "enumerable", "configurable",
        // Array
        "concat", "join", "pop", "push", "reverse", "shift", "slice", "sort", "splice", "unshift",
        "indexOf", "lastIndexOf", "every", "some", "forEach", "map", "filter", "reduce", "reduceRight",
        "isArray",
        // Function
        "apply", "bind", "call", "arguments", "caller",
        // Number
        "MAX_VALUE", "MIN_VALUE", "NaN", "NEGATIVE_INFINITY", "POSITIVE_INFINITY", "toExponential",
        "toFixed", "toPrecision",
        // String
        "charAt", "charCodeAt", "fromCharCode", "localeCompare", "match", "replace", "search",
        "split", "substr", "substring", "toLowerCase", "toUpperCase", "toLocaleLowerCase",
        "toLocaleUpperCase", "trim",
        // Error
        "message", "stack",
        // Math
        "E", "LN10", "LN2", "LOG10E", "LOG2E", "PI", "SQRT1_2", "SQRT2", "abs", "acos", "asin",
        "atan", "atan2", "ceil", "cos", "exp", "floor", "log", "max", "min", "pow", "random", "round",
        "sin", "sqrt", "tan",
        // Date
        "UTC", "now", "parse", "getDate", "getDay", "getFullYear", "getHours", "getMilliseconds",
        "getMinutes", "getMonth", "getSeconds", "getTime", "getTimezoneOffset", "getUTCDate",
        "getUTCDay", "getUTCFullYear", "getUTCHours", "getUTCMilliseconds", "getUTCMinutes",
        "getUTCMonth", "getUTCSeconds", "getYear", "setDate", "setFullYear", "setHours",
        "setMilliseconds", "setMinutes", "setMonth", "setSeconds", "setTime", "setUTCDate",
        "setUTCFullYear", "setUTCHours", "setUTCMilliseconds", "setUTCMinutes", "setUTCMonth",
        "setUTCSeconds", "setYear", "toDateString", "toGMTString", "toISOString", "toJSON",
        "toLocaleDateString", "toLocaleTimeString", "toTimeString", "toUTCString",
        // RegExp
        "exec", "test", "source", "global", "ignoreCase", "multiline", "lastIndex", "input", "index",
        // JSON
        "stringify",
    ]
    .into_iter()
    .collect()
});

/// Candidate and excluded names found in one walk
struct Collector<'o> {
    options: &'o Options,
    candidates: HashSet<String>,
    /// Written as quoted keys while `keep_quoted` is set
    ignored: HashSet<String>,
}

struct Options {
    regex: Option<Regex>,
    keep_quoted: bool,
    reserved: HashSet<String>,
    debug: bool,
}

impl Options {
    fn can_mangle(
        &self,
        name: &str,
    ) -> bool {
        let numeric = name.chars().all(|c| c.is_ascii_digit() || c == '.');
        !numeric && !BUILTIN_PROPERTIES.contains(name) && !self.reserved.contains(name)
    }
}

impl Collector<'_> {
    fn add(
        &mut self,
        name: &str,
        ignore: bool,
    ) {
        if ignore {
            self.ignored.insert(name.to_string());
        } else if self.options.can_mangle(name) {
            self.candidates.insert(name.to_string());
        }
    }

    /// String literals an expression can evaluate to
    fn add_strings(
        &mut self,
        expr: &Expr,
        ignore: bool,
    ) {
        match expr {
            Expr::Str { value, .. } => self.add(value, ignore),
            Expr::Seq { exprs, .. } => {
                if let Some(last) = exprs.last() {
                    self.add_strings(last, ignore);
                }
            }
            Expr::Conditional { cons, alt, .. } => {
                self.add_strings(cons, ignore);
                self.add_strings(alt, ignore);
            }
            _ => {}
        }
    }
}

impl Visitor for Collector<'_> {
    fn visit_expr(
        &mut self,
        expr: &Expr,
    ) {
        let keep_quoted = self.options.keep_quoted;
        match expr {
            Expr::Object { props, .. } => {
                for prop in props {
                    let ignore = matches!(prop.kind, PropKind::Init(_)) && keep_quoted && prop.quoted;
                    self.add(&prop.key, ignore);
                }
            }
            Expr::Dot { prop, .. } => self.add(prop, false),
            Expr::Sub { prop, .. } => self.add_strings(prop, keep_quoted),
            _ => {}
        }
        visit::walk_expr(self, expr);
    }
}

struct Renamer<'o> {
    options: &'o Options,
    alphabet: Alphabet,
    candidates: HashSet<String>,
    ignored: HashSet<String>,
    renamed: HashMap<String, String>,
    counter: usize,
}

impl Renamer<'_> {
    fn should_mangle(
        &self,
        name: &str,
    ) -> bool {
        if self.options.keep_quoted && self.ignored.contains(name) {
            return false;
        }
        if let Some(regex) = &self.options.regex {
            if !regex.is_match(name) {
                return false;
            }
        }
        self.candidates.contains(name)
    }

    fn usable(
        &self,
        name: &str,
    ) -> bool {
        self.options.can_mangle(name)
            && !(self.options.keep_quoted && self.ignored.contains(name))
            && !self.candidates.contains(name)
            && !is_reserved_word(name)
    }

    fn rename(
        &mut self,
        name: &str,
    ) -> Option<String> {
        if !self.should_mangle(name) {
            return None;
        }
        if let Some(renamed) = self.renamed.get(name) {
            return Some(renamed.clone());
        }
        let debug_name = format!("_${}$_", name);
        let renamed = if self.options.debug && self.usable(&debug_name) {
            debug_name
        } else {
            loop {
                let candidate = self.alphabet.base54(self.counter);
                self.counter += 1;
                if self.usable(&candidate) {
                    break candidate;
                }
            }
        };
        tracing::trace!("property {} -> {}", name, renamed);
        self.renamed.insert(name.to_string(), renamed.clone());
        Some(renamed)
    }

    fn rename_strings(
        &mut self,
        expr: &mut Expr,
    ) {
        match expr {
            Expr::Str { value, .. } => {
                if let Some(renamed) = self.rename(value) {
                    *value = renamed;
                }
            }
            Expr::Seq { exprs, .. } => {
                if let Some(last) = exprs.last_mut() {
                    self.rename_strings(last);
                }
            }
            Expr::Conditional { cons, alt, .. } => {
                self.rename_strings(cons);
                self.rename_strings(alt);
            }
            _ => {}
        }
    }
}

impl VisitorMut for Renamer<'_> {
    fn visit_expr_mut(
        &mut self,
        expr: &mut Expr,
    ) {
        visit::walk_expr_mut(self, expr);
        match expr {
            Expr::Dot { prop, .. } => {
                if let Some(renamed) = self.rename(prop) {
                    *prop = renamed;
                }
            }
            Expr::Sub { prop, .. } if !self.options.keep_quoted => self.rename_strings(prop),
            _ => {}
        }
    }

    fn visit_prop_mut(
        &mut self,
        prop: &mut Prop,
    ) {
        let keep = matches!(prop.kind, PropKind::Init(_)) && self.options.keep_quoted && prop.quoted;
        if !keep {
            if let Some(renamed) = self.rename(&prop.key) {
                prop.key = renamed;
            }
        }
        match &mut prop.kind {
            PropKind::Init(value) => self.visit_expr_mut(value),
            PropKind::Get(func) | PropKind::Set(func) => self.visit_function_mut(func),
        }
    }
}

/// Rename the properties of `program`; returns how many distinct names changed
///
/// An invalid `regex` renames nothing.
pub fn mangle_properties(
    program: &mut Program,
    options: &PropertyMangleOptions,
) -> usize {
    let regex = match options.regex.as_deref().map(Regex::new).transpose() {
        Ok(regex) => regex,
        Err(e) => {
            tracing::warn!("property regex rejected, properties left alone: {}", e);
            return 0;
        }
    };
    let options = Options {
        regex,
        keep_quoted: options.keep_quoted,
        reserved: options.reserved.iter().cloned().collect(),
        debug: options.debug,
    };

    let mut collector = Collector {
        options: &options,
        candidates: HashSet::new(),
        ignored: HashSet::new(),
    };
    visit::walk_stmts(&mut collector, &program.body);

    let mut renamer = Renamer {
        options: &options,
        alphabet: Alphabet::default(),
        candidates: collector.candidates,
        ignored: collector.ignored,
        renamed: HashMap::new(),
        counter: 0,
    };
    visit::walk_stmts_mut(&mut renamer, &mut program.body);
    tracing::debug!("renamed {} properties", renamer.renamed.len());
    renamer.renamed.len()
}
