//! Document analysis for the language server.
//!
//! Runs the full pipeline (lex, parse, type check) on a document and
//! converts every reported problem to an LSP diagnostic. Nothing is cached
//! between runs.

use lunno_common::Span;
use lunno_parser::Program;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

/// The outcome of analyzing one document.
pub struct AnalysisResult {
    /// Lexical, syntax and type errors, in pipeline order.
    pub diagnostics: Vec<Diagnostic>,
    /// The best-effort AST, kept for completion.
    pub program: Program,
}

/// Analyze a Lunno document and produce LSP diagnostics.
pub fn analyze_document(uri: &str, source: &str) -> AnalysisResult {
    let parse = lunno_parser::parse_source(source, uri);

    let mut diagnostics: Vec<Diagnostic> = parse
        .errors
        .iter()
        .map(|err| to_lsp_diagnostic(source, &err.message, &err.span))
        .collect();

    // Type errors on a broken tree are mostly noise; only check clean parses.
    if parse.ok() {
        let typeck = lunno_typeck::check(&parse.program);
        diagnostics.extend(
            typeck
                .errors
                .iter()
                .map(|err| to_lsp_diagnostic(source, &err.to_string(), err.span())),
        );
    }

    log::debug!("Analyzed {}: {} diagnostics", uri, diagnostics.len());
    AnalysisResult {
        diagnostics,
        program: parse.program,
    }
}

fn to_lsp_diagnostic(source: &str, message: &str, span: &Span) -> Diagnostic {
    let start = span_to_position(source, span);
    let end = Position {
        line: start.line,
        character: start.character + 1,
    };
    Diagnostic {
        range: Range::new(start, end),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some("lunno".to_string()),
        message: message.to_string(),
        ..Default::default()
    }
}

/// Convert a 1-based, character-counted span to a 0-based LSP position.
///
/// LSP counts UTF-16 code units, so the column is re-measured against the
/// source line.
pub fn span_to_position(source: &str, span: &Span) -> Position {
    let line_text = lunno_common::span::source_line(source, span.line);
    let character = line_text
        .chars()
        .take(span.column.saturating_sub(1) as usize)
        .map(|c| c.len_utf16() as u32)
        .sum();
    Position {
        line: span.line.saturating_sub(1),
        character,
    }
}

/// Convert an LSP position to a byte offset in `source`.
///
/// Positions past the end of a line clamp to the line end. Returns `None`
/// for lines past the end of the document.
pub fn position_to_offset(source: &str, position: &Position) -> Option<usize> {
    let mut line_start = 0usize;
    for _ in 0..position.line {
        line_start += source[line_start..].find('\n')? + 1;
    }
    let line_text = &source[line_start..];
    let line_len = line_text.find('\n').unwrap_or(line_text.len());

    let mut utf16_offset = 0u32;
    for (byte_idx, c) in line_text[..line_len].char_indices() {
        if utf16_offset >= position.character {
            return Some(line_start + byte_idx);
        }
        utf16_offset += c.len_utf16() as u32;
    }
    Some(line_start + line_len)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn clean_document_has_no_diagnostics() {
        let result = analyze_document("file:///a.ln", "let x = 1\nx + 2");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.program.exprs.len(), 2);
    }

    #[test]
    fn parse_error_becomes_zero_based_range() {
        let result = analyze_document("file:///a.ln", "let x = 1\nlet = 2");
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.range.start, Position::new(1, 4));
        assert_eq!(diag.range.end, Position::new(1, 5));
        assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diag.message, "expected identifier after 'let'");
    }

    #[test]
    fn type_errors_are_reported() {
        let result = analyze_document("file:///a.ln", "if 1 then 2 else 3");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].range.start, Position::new(0, 3));
        assert_eq!(
            result.diagnostics[0].message,
            "if condition must be bool, found int"
        );
    }

    #[test]
    fn empty_document_reports_once() {
        let result = analyze_document("file:///a.ln", "");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.program.exprs.is_empty());
    }

    #[test]
    fn span_columns_are_measured_in_utf16() {
        let span = Span::new(Arc::from("a.ln"), 1, 4);
        // 'é' is one UTF-16 unit, '😀' is two.
        assert_eq!(span_to_position("é😀 x", &span), Position::new(0, 4));
    }

    #[test]
    fn position_to_offset_walks_lines() {
        let src = "ab\ncd\nef";
        assert_eq!(position_to_offset(src, &Position::new(0, 0)), Some(0));
        assert_eq!(position_to_offset(src, &Position::new(1, 1)), Some(4));
        assert_eq!(position_to_offset(src, &Position::new(1, 9)), Some(5));
        assert_eq!(position_to_offset(src, &Position::new(2, 2)), Some(8));
        assert_eq!(position_to_offset(src, &Position::new(5, 0)), None);
    }
}
