//! Type errors.
//!
//! Every variant carries the span of the expression that produced it so the
//! error renders as a caret diagnostic like lexer and parser errors do.

use lunno_common::{Diagnostic, Span};

use crate::ty::{Ty, TyVar};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: Ty, found: Ty, span: Span },

    #[error("arity mismatch: expected {expected} arguments, found {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("infinite type: {var} occurs in {ty}")]
    InfiniteType { var: TyVar, ty: Ty, span: Span },

    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier { name: String, span: Span },

    #[error("cannot call a value of type {ty}")]
    NotAFunction { ty: Ty, span: Span },

    #[error("if condition must be bool, found {found}")]
    NonBoolCondition { found: Ty, span: Span },

    #[error("match guard must be bool, found {found}")]
    NonBoolGuard { found: Ty, span: Span },

    #[error("operator '{op}' cannot be applied to {ty}")]
    InvalidOperand { op: String, ty: Ty, span: Span },

    /// An annotation names a type that does not exist. Checking continues
    /// with a fresh variable in its place.
    #[error("unknown type '{name}'")]
    UnknownType { name: String, span: Span },
}

impl TypeError {
    pub fn span(&self) -> &Span {
        match self {
            TypeError::Mismatch { span, .. }
            | TypeError::ArityMismatch { span, .. }
            | TypeError::InfiniteType { span, .. }
            | TypeError::UndefinedIdentifier { span, .. }
            | TypeError::NotAFunction { span, .. }
            | TypeError::NonBoolCondition { span, .. }
            | TypeError::NonBoolGuard { span, .. }
            | TypeError::InvalidOperand { span, .. }
            | TypeError::UnknownType { span, .. } => span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.to_string(), self.span().clone())
    }
}
