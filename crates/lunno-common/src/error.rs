use std::fmt;

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::span::Span;

/// A lexer error with location information.
///
/// Errors are attached to `Illegal` tokens rather than aborting the scan,
/// so one run reports every lexical problem in a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    /// Create a new lexer error.
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Convert into a positioned diagnostic for reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.kind.to_string(), self.span.clone())
    }
}

/// The specific kind of lexer error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    /// Digits followed by a `.` with no fractional digit, e.g. `12.`.
    #[error("malformed float literal")]
    MalformedFloat,
    #[error("empty strings not allowed")]
    EmptyString,
    #[error("empty characters not allowed")]
    EmptyChar,
    #[error("character literal must contain exactly one character")]
    CharLength,
    #[error("invalid escape sequence in string literal")]
    InvalidStringEscape,
    #[error("invalid escape sequence in character literal")]
    InvalidCharEscape,
    /// The automaton stopped in a non-accepting state.
    #[error("invalid token")]
    InvalidToken,
    /// The whole source unit was empty. Fatal: returned as `Err`.
    #[error("empty source file")]
    EmptySource,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LexErrorKind::EmptySource => write!(f, "{}: {}", self.span.file, self.kind),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn span() -> Span {
        Span::new(Arc::from("main.ln"), 1, 1)
    }

    #[test]
    fn lex_error_display() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter('@'), span());
        assert_eq!(err.to_string(), "unexpected character '@'");
    }

    #[test]
    fn empty_source_names_the_file() {
        let err = LexError::new(LexErrorKind::EmptySource, span());
        assert_eq!(err.to_string(), "main.ln: empty source file");
    }

    #[test]
    fn lex_error_kind_messages() {
        assert_eq!(
            LexErrorKind::UnterminatedString.to_string(),
            "unterminated string literal"
        );
        assert_eq!(
            LexErrorKind::MalformedFloat.to_string(),
            "malformed float literal"
        );
        assert_eq!(
            LexErrorKind::CharLength.to_string(),
            "character literal must contain exactly one character"
        );
        assert_eq!(
            LexErrorKind::InvalidCharEscape.to_string(),
            "invalid escape sequence in character literal"
        );
    }

    #[test]
    fn to_diagnostic_keeps_position() {
        let err = LexError::new(
            LexErrorKind::EmptyChar,
            Span::new(Arc::from("a.ln"), 2, 5),
        );
        let diag = err.to_diagnostic();
        assert_eq!(diag.to_string(), "a.ln:2:5: empty characters not allowed");
    }
}
