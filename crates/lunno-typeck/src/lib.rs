//! Lunno type checker: Hindley-Milner inference over the parsed AST.
//!
//! # Architecture
//!
//! - [`ty`]: type representation (`Ty`, `TyVar`, `Scheme`)
//! - [`unify`]: substitution, unification with occurs check, generalization
//! - [`env`]: lexical scopes of type schemes
//! - [`builtins`]: bindings seeded into the global scope
//! - [`error`]: type errors with source spans
//!
//! Checking never stops at the first error. Every top-level expression is
//! inferred and all errors are collected in source order.

pub mod builtins;
pub mod env;
pub mod error;
mod infer;
pub mod ty;
pub mod unify;

use log::debug;
use lunno_common::Span;
use lunno_parser::Program;

use crate::error::TypeError;
use crate::infer::Checker;
use crate::ty::{Scheme, Ty};

/// The result of type checking a Lunno program.
#[derive(Debug)]
pub struct TypeckResult {
    /// Type errors in the order they were found.
    pub errors: Vec<TypeError>,
    /// Top-level declarations and their generalized schemes, in source order.
    pub globals: Vec<(String, Scheme)>,
    /// Resolved type of every expression, keyed by the span of its token.
    pub types: Vec<(Span, Ty)>,
    /// Type of the last top-level expression. `None` for an empty program.
    pub result_type: Option<Ty>,
}

impl TypeckResult {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The scheme of the last top-level declaration named `name`.
    pub fn global(&self, name: &str) -> Option<&Scheme> {
        self.globals
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, scheme)| scheme)
    }
}

/// Type-check a parsed program.
pub fn check(program: &Program) -> TypeckResult {
    let mut checker = Checker::new();
    let mut result_type = None;
    for expr in &program.exprs {
        result_type = Some(checker.infer(expr));
    }

    let types = checker
        .types
        .iter()
        .map(|(span, ty)| (span.clone(), checker.ctx.apply(ty)))
        .collect();
    let result_type = result_type.map(|ty| checker.ctx.apply(&ty));
    debug!(
        "Type-checked {} top-level expressions with {} errors",
        program.exprs.len(),
        checker.ctx.errors.len()
    );

    TypeckResult {
        errors: checker.ctx.errors,
        globals: checker.globals,
        types,
        result_type,
    }
}
