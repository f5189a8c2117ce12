//! Lunno parser: turns the lexer's token stream into an AST.
//!
//! Parsing recovers from errors and keeps going, so one run reports every
//! syntax problem in a file alongside the best-effort [`Program`].

pub mod ast;
pub mod dump;
mod parser;

use lunno_common::{Diagnostic, Token};
use log::debug;

pub use ast::{Expr, ExprKind, Program};
pub use dump::dump_program;

/// Result of parsing a token stream.
#[derive(Debug)]
pub struct Parse {
    pub program: Program,
    /// Lexical errors (from `Illegal` tokens) followed by syntax errors.
    pub errors: Vec<Diagnostic>,
}

impl Parse {
    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a complete token stream into a [`Program`].
pub fn parse_program(tokens: &[Token]) -> Parse {
    let (program, errors) = parser::Parser::new(tokens).parse_program();
    debug!(
        "Parsed {} top-level expressions with {} errors",
        program.exprs.len(),
        errors.len()
    );
    Parse { program, errors }
}

/// Tokenize and parse `source` in one step.
///
/// An empty source yields its fatal lexer error as the only diagnostic.
pub fn parse_source(source: &str, file: &str) -> Parse {
    match lunno_lexer::tokenize(source, file) {
        Ok(tokens) => parse_program(&tokens),
        Err(err) => Parse {
            program: Program::default(),
            errors: vec![err.to_diagnostic()],
        },
    }
}
