//! Caret-annotated error reports.
//!
//! A [`Diagnostic`] is a message anchored at a [`Span`]. It renders in two
//! forms: a multi-line report quoting the offending source line, and a
//! compact `file:line:col: message` string used by editors and tests.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::span::{source_line, Span};

/// A positioned error message produced by any pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Render the human-readable report for this diagnostic.
    ///
    /// ```text
    /// error: unexpected token ')'
    ///   --> main.ln:1:9
    ///    |
    ///  1 | let x = )
    ///    |         ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let line = self.span.line;
        let col = self.span.column;
        let text = source_line(source, line);
        let pad = " ".repeat(col.saturating_sub(1) as usize);
        format!(
            "error: {msg}\n  --> {file}:{line}:{col}\n   |\n{line:>2} | {text}\n   | {pad}^\n",
            msg = self.message,
            file = self.span.file,
        )
    }

    /// Write the rendered report to `out` and return the compact form.
    ///
    /// A failing writer is not an error for the caller: the compact string
    /// is still returned so the message is never lost.
    pub fn report(&self, source: &str, out: &mut impl Write) -> String {
        if let Err(err) = out.write_all(self.render(source).as_bytes()) {
            log::warn!("failed to write diagnostic at {}: {}", self.span, err);
        }
        self.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn diag(msg: &str, line: u32, col: u32) -> Diagnostic {
        Diagnostic::new(msg, Span::new(Arc::from("main.ln"), line, col))
    }

    #[test]
    fn compact_form() {
        let d = diag("undefined identifier 'y'", 2, 5);
        assert_eq!(d.to_string(), "main.ln:2:5: undefined identifier 'y'");
    }

    #[test]
    fn render_points_at_column() {
        let d = diag("unexpected token ')'", 1, 9);
        assert_eq!(
            d.render("let x = )"),
            "error: unexpected token ')'\n  --> main.ln:1:9\n   |\n 1 | let x = )\n   |         ^\n"
        );
    }

    #[test]
    fn render_second_line() {
        let d = diag("boom", 2, 1);
        assert_eq!(
            d.render("a\nbc\n"),
            "error: boom\n  --> main.ln:2:1\n   |\n 2 | bc\n   | ^\n"
        );
    }

    #[test]
    fn render_wide_line_numbers() {
        let src = "\n".repeat(11) + "x";
        let d = diag("boom", 12, 1);
        assert!(d.render(&src).contains("\n12 | x\n"));
    }

    #[test]
    fn report_writes_and_returns_compact() {
        let d = diag("boom", 1, 2);
        let mut out = Vec::new();
        let compact = d.report("ab", &mut out);
        assert_eq!(compact, "main.ln:1:2: boom");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "error: boom\n  --> main.ln:1:2\n   |\n 1 | ab\n   |  ^\n"
        );
    }
}
