//! Shared types for the Lunno front end.
//!
//! Every stage of the pipeline (lexer, parser, type checker) reports problems
//! against the same [`Span`] type and renders them through [`Diagnostic`].

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod token;

pub use diagnostic::Diagnostic;
pub use error::{LexError, LexErrorKind};
pub use span::Span;
pub use token::{Token, TokenKind};
