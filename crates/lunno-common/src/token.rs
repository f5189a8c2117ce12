use serde::Serialize;

use crate::error::LexError;
use crate::span::Span;

/// A token produced by the Lunno lexer.
///
/// Tokens own their lexeme text so later stages never need the source
/// buffer. `indent` is set only on the first token of a line and holds the
/// number of leading whitespace characters on that line. `error` is set
/// exactly when `kind` is [`TokenKind::Illegal`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
    pub indent: Option<u32>,
    pub error: Option<LexError>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            indent: None,
            error: None,
        }
    }

    /// An `Illegal` token carrying the error that produced it.
    pub fn illegal(lexeme: impl Into<String>, span: Span, error: LexError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(TokenKind::Illegal, lexeme, span)
        }
    }

    /// The end-of-file sentinel (empty lexeme).
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::EndOfFile, "", span)
    }

    pub fn with_indent(mut self, indent: Option<u32>) -> Self {
        self.indent = indent;
        self
    }
}

/// Every kind of token in the Lunno language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords (21) ──────────────────────────────────────────────────
    KwLet,
    KwRec,
    KwFn,
    KwIf,
    KwThen,
    KwElse,
    KwImport,
    KwMatch,
    KwWith,
    KwWhen,
    KwTrue,
    KwFalse,
    KwNil,
    KwInt,
    KwFloat,
    KwString,
    KwChar,
    KwBool,
    KwUnit,
    KwList,
    /// A lone `_`. Scanned as an identifier and reclassified.
    Underscore,

    // ── Operators (11) ─────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `=`
    Assign,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanOrEqual,
    /// `>=`
    GreaterThanOrEqual,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // ── Punctuation (4) ────────────────────────────────────────────────
    /// `,`
    Comma,
    /// `:` (type annotations, slices, and list cons)
    Colon,
    /// `->`
    Arrow,
    /// `|` leading a match arm
    Pipe,

    // ── Literals and identifiers (5) ───────────────────────────────────
    Identifier,
    Integer,
    Float,
    /// String literal; the lexeme keeps its quotes.
    String,
    /// Character literal; the lexeme keeps its apostrophes.
    Char,

    // ── Special (2) ────────────────────────────────────────────────────
    EndOfFile,
    /// Malformed input. The token's `error` explains why.
    Illegal,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwLet
                | TokenKind::KwRec
                | TokenKind::KwFn
                | TokenKind::KwIf
                | TokenKind::KwThen
                | TokenKind::KwElse
                | TokenKind::KwImport
                | TokenKind::KwMatch
                | TokenKind::KwWith
                | TokenKind::KwWhen
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwNil
                | TokenKind::KwInt
                | TokenKind::KwFloat
                | TokenKind::KwString
                | TokenKind::KwChar
                | TokenKind::KwBool
                | TokenKind::KwUnit
                | TokenKind::KwList
        )
    }
}

/// Every keyword spelling, in declaration order. Used for editor completion.
pub const KEYWORDS: &[&str] = &[
    "let", "rec", "fn", "if", "then", "else", "import", "match", "with", "when", "true", "false",
    "nil", "int", "float", "string", "char", "bool", "unit", "list",
];

/// Look up a keyword from its string representation.
///
/// The lexer scans identifiers by maximal munch and calls this afterwards,
/// so `letter` is an identifier while `let` is a keyword.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "let" => Some(TokenKind::KwLet),
        "rec" => Some(TokenKind::KwRec),
        "fn" => Some(TokenKind::KwFn),
        "if" => Some(TokenKind::KwIf),
        "then" => Some(TokenKind::KwThen),
        "else" => Some(TokenKind::KwElse),
        "import" => Some(TokenKind::KwImport),
        "match" => Some(TokenKind::KwMatch),
        "with" => Some(TokenKind::KwWith),
        "when" => Some(TokenKind::KwWhen),
        "true" => Some(TokenKind::KwTrue),
        "false" => Some(TokenKind::KwFalse),
        "nil" => Some(TokenKind::KwNil),
        "int" => Some(TokenKind::KwInt),
        "float" => Some(TokenKind::KwFloat),
        "string" => Some(TokenKind::KwString),
        "char" => Some(TokenKind::KwChar),
        "bool" => Some(TokenKind::KwBool),
        "unit" => Some(TokenKind::KwUnit),
        "list" => Some(TokenKind::KwList),
        "_" => Some(TokenKind::Underscore),
        _ => None,
    }
}

/// Operators spelled with two characters, longest first.
pub const MULTI_CHAR_OPERATORS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::Equal),
    ("!=", TokenKind::NotEqual),
    ("<=", TokenKind::LessThanOrEqual),
    (">=", TokenKind::GreaterThanOrEqual),
    ("->", TokenKind::Arrow),
];

/// Single-character punctuation and operators.
pub fn single_char_token(c: char) -> Option<TokenKind> {
    let kind = match c {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        '[' => TokenKind::LeftBracket,
        ']' => TokenKind::RightBracket,
        '{' => TokenKind::LeftBrace,
        '}' => TokenKind::RightBrace,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Asterisk,
        '/' => TokenKind::Slash,
        ':' => TokenKind::Colon,
        ',' => TokenKind::Comma,
        '=' => TokenKind::Assign,
        '<' => TokenKind::LessThan,
        '>' => TokenKind::GreaterThan,
        '|' => TokenKind::Pipe,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_matches_lookup() {
        for kw in KEYWORDS {
            let kind = keyword_from_str(kw);
            assert!(
                kind.is_some_and(TokenKind::is_keyword),
                "keyword_from_str({kw:?}) should be a keyword, got {kind:?}"
            );
        }
        assert_eq!(KEYWORDS.len(), 20);
    }

    #[test]
    fn keyword_from_str_rejects_non_keywords() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str("letter"), None);
        assert_eq!(keyword_from_str(""), None);
        assert_eq!(keyword_from_str("Let"), None); // case-sensitive
        assert_eq!(keyword_from_str("__"), None);
    }

    #[test]
    fn underscore_is_not_a_keyword_for_completion() {
        assert_eq!(keyword_from_str("_"), Some(TokenKind::Underscore));
        assert!(!TokenKind::Underscore.is_keyword());
    }

    #[test]
    fn multi_char_operators_are_two_chars() {
        for (spelling, _) in MULTI_CHAR_OPERATORS {
            assert_eq!(spelling.chars().count(), 2);
        }
    }

    #[test]
    fn single_char_table() {
        assert_eq!(single_char_token('|'), Some(TokenKind::Pipe));
        assert_eq!(single_char_token('<'), Some(TokenKind::LessThan));
        assert_eq!(single_char_token('!'), None);
        assert_eq!(single_char_token('@'), None);
    }
}
