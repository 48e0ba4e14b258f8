//! Size-reducing AST rewrites
//!
//! A pass optimizes every node bottom-up, tightens statement lists and then
//! drops unused declarations. Passes repeat while the printed program keeps
//! shrinking; a pass that does not help is rolled back.

pub mod evaluate;
mod collapse;
mod helpers;
mod hoist;
mod optimize;
mod reduce;
mod statements;
mod unused;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::backends::output::generate;
use crate::frontend::config::{CommentPolicy, CompressOptions, OutputOptions};
use crate::frontend::core::parser::ast::{Expr, Program};
use crate::middle::scope::{resolve_scopes, ScopeError, ScopeTree, SymbolId};

use evaluate::{ConstValue, Evaluator};

/// Upper bound on passes when output keeps shrinking
const MAX_PASSES: usize = 10;

/// Rewriting state for one pass
pub struct Compressor<'o> {
    options: &'o CompressOptions,
    /// Printer settings used to compare candidate rewrites
    measure: OutputOptions,
    scopes: ScopeTree,
    /// Variables known to hold one constant value
    fixed: HashMap<SymbolId, ConstValue>,
    global_defs: HashMap<String, ConstValue>,
}

fn global_def_value(
    name: &str,
    value: &serde_json::Value,
) -> Option<ConstValue> {
    match value {
        serde_json::Value::Null => Some(ConstValue::Null),
        serde_json::Value::Bool(b) => Some(ConstValue::Bool(*b)),
        serde_json::Value::Number(n) => n.as_f64().map(ConstValue::Num),
        serde_json::Value::String(s) => Some(ConstValue::Str(s.clone())),
        other => {
            tracing::warn!("global definition {} ignored: {} is not a primitive", name, other);
            None
        }
    }
}

impl<'o> Compressor<'o> {
    pub fn new(options: &'o CompressOptions) -> Self {
        let global_defs = options
            .global_defs
            .iter()
            .filter_map(|(name, value)| global_def_value(name, value).map(|v| (name.clone(), v)))
            .collect();
        Self {
            options,
            measure: OutputOptions {
                comments: CommentPolicy::None,
                max_line_len: 0,
                screw_ie8: options.screw_ie8,
                ..OutputOptions::default()
            },
            scopes: ScopeTree::default(),
            fixed: HashMap::new(),
            global_defs,
        }
    }

    fn eval(
        &self,
        expr: &Expr,
    ) -> Option<ConstValue> {
        if !self.options.evaluate {
            return None;
        }
        Evaluator::new(&self.scopes, &self.fixed, self.options.unsafe_).evaluate(expr)
    }

    fn is_pure(
        &self,
        expr: &Expr,
    ) -> bool {
        !helpers::has_side_effects(expr, &self.scopes)
    }

    fn negate(
        &self,
        expr: Expr,
    ) -> Expr {
        helpers::negate(expr, self.options.unsafe_comps, &self.measure)
    }

    fn best_of(
        &self,
        original: Expr,
        candidate: Expr,
    ) -> Expr {
        helpers::best_of(original, candidate, &self.measure)
    }

    fn printed_len(
        &self,
        expr: &Expr,
    ) -> usize {
        helpers::printed_len(expr, &self.measure)
    }

    /// One full pass over `program`
    fn pass(
        &mut self,
        program: &mut Program,
    ) -> Result<(), ScopeError> {
        resolve_scopes(program)?;
        self.scopes = std::mem::take(&mut program.scopes);
        self.fixed = if self.options.reduce_vars && self.options.evaluate {
            reduce::fixed_values(&program.body, &self.scopes, self.options.toplevel)
        } else {
            HashMap::new()
        };

        let mut body = std::mem::take(&mut program.body);
        self.optimize_toplevel(&mut body);
        program.body = body;

        if self.options.unused {
            resolve_scopes(program)?;
            unused::drop_unused(program, self.options);
        }
        Ok(())
    }
}

/// Compress `program` in place
///
/// The program's scopes are up to date on return.
///
/// # Example
/// ```
/// use squeeze::frontend::config::{CompressOptions, OutputOptions, ParseOptions};
/// use squeeze::frontend::core::parser::parse;
/// use squeeze::middle::compress::compress;
/// use squeeze::backends::output::generate;
///
/// let mut program = parse("if (a) { b(); } else { c(); }", &ParseOptions::default()).unwrap();
/// compress(&mut program, &CompressOptions::default()).unwrap();
/// assert_eq!(generate(&program, &OutputOptions::default()), "a?b():c();");
/// ```
pub fn compress(
    program: &mut Program,
    options: &CompressOptions,
) -> Result<(), ScopeError> {
    let mut compressor = Compressor::new(options);
    let mut size = generate(program, &compressor.measure).len();
    tracing::debug!("compressing {} bytes", size);

    let passes = options.passes.max(1);
    for pass in 0..MAX_PASSES.max(passes) {
        let snapshot = program.clone();
        if let Err(err) = compressor.pass(program) {
            tracing::debug!("pass {} failed, keeping the previous tree", pass + 1);
            *program = snapshot;
            return Err(err);
        }
        let next = generate(program, &compressor.measure).len();
        tracing::debug!("pass {}: {} -> {} bytes", pass + 1, size, next);
        if pass + 1 >= passes && next >= size {
            if next > size {
                *program = snapshot;
            }
            break;
        }
        size = next;
    }

    resolve_scopes(program)?;
    Ok(())
}
