/// Character-level source iterator for the Lunno lexer.
///
/// The cursor wraps a source string and tracks three positions at once: the
/// byte offset (for slicing lexemes), and the 1-based line and column (for
/// spans). A newline advances the line and resets the column to 1; any
/// other character advances the column by one.
pub struct Cursor<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    chars: std::str::Chars<'src>,
}

impl<'src> Cursor<'src> {
    /// Create a new cursor at the start of the source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            chars: source.chars(),
        }
    }

    /// Look at the current character without consuming it.
    ///
    /// Returns `None` at end of input instead of faulting.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Consume the current character, updating line and column.
    ///
    /// Returns the consumed character, or `None` if at end of input.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `n` characters, stopping early at end of input.
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Current byte offset in the source text.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Whether there are no more characters to consume.
    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// The unconsumed remainder of the source.
    pub fn rest(&self) -> &'src str {
        self.chars.as_str()
    }

    /// Advance while the predicate holds for the current character.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Source text between byte offset `start` and the current position.
    ///
    /// Offsets always come from [`Cursor::pos`], so they sit on character
    /// boundaries; an invalid range yields the empty string.
    pub fn slice_from(&self, start: usize) -> &'src str {
        self.source.get(start..self.pos).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_at_origin() {
        let cursor = Cursor::new("hello");
        assert_eq!(cursor.pos(), 0);
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        assert!(!cursor.is_eof());
    }

    #[test]
    fn peek_does_not_advance() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn advance_past_end_is_checked() {
        let mut cursor = Cursor::new("a");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.peek(), None);
        assert!(cursor.is_eof());
        assert_eq!(cursor.column(), 2);
    }

    #[test]
    fn newline_resets_column() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance_by(3);
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 2));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        // U+00E9 is 2 bytes in UTF-8 but one column.
        let mut cursor = Cursor::new("\u{00E9}a");
        cursor.advance();
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.column(), 2);
    }

    #[test]
    fn eat_while_and_slice() {
        let mut cursor = Cursor::new("abc123");
        cursor.eat_while(|c| c.is_ascii_alphabetic());
        assert_eq!(cursor.slice_from(0), "abc");
        assert_eq!(cursor.rest(), "123");
    }

    #[test]
    fn advance_by_stops_at_end() {
        let mut cursor = Cursor::new("ab");
        cursor.advance_by(10);
        assert!(cursor.is_eof());
        assert_eq!(cursor.pos(), 2);
    }
}
