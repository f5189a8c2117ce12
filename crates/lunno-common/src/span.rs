use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// A source position: file name plus 1-based line and column.
///
/// Columns count characters, not bytes. The file name is shared between
/// every token of one source unit, so cloning a span is a reference-count
/// bump rather than a string copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub file: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(file: Arc<str>, line: u32, column: u32) -> Self {
        debug_assert!(line >= 1 && column >= 1, "spans are 1-based");
        Self { file, line, column }
    }

    /// Span pointing at the first character of `file`.
    pub fn start_of(file: Arc<str>) -> Self {
        Self::new(file, 1, 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Return the text of 1-based line `line` in `source`, without its newline.
///
/// Out-of-range lines yield the empty string.
pub fn source_line(source: &str, line: u32) -> &str {
    if line == 0 {
        return "";
    }
    source
        .split('\n')
        .nth((line - 1) as usize)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> Arc<str> {
        Arc::from("main.ln")
    }

    #[test]
    fn span_display() {
        let span = Span::new(file(), 3, 7);
        assert_eq!(span.to_string(), "main.ln:3:7");
    }

    #[test]
    fn span_start_of() {
        let span = Span::start_of(file());
        assert_eq!((span.line, span.column), (1, 1));
    }

    #[test]
    fn spans_share_file_name() {
        let name = file();
        let a = Span::new(name.clone(), 1, 1);
        let b = Span::new(name, 2, 4);
        assert!(Arc::ptr_eq(&a.file, &b.file));
    }

    #[test]
    fn source_line_lookup() {
        let src = "let x = 1\nlet y = 2\r\nx";
        assert_eq!(source_line(src, 1), "let x = 1");
        assert_eq!(source_line(src, 2), "let y = 2");
        assert_eq!(source_line(src, 3), "x");
    }

    #[test]
    fn source_line_out_of_range() {
        assert_eq!(source_line("x", 0), "");
        assert_eq!(source_line("x", 5), "");
    }
}
