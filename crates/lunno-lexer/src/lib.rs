// Lunno lexer -- table-driven tokenizer for the Lunno language.

mod cursor;
pub mod dfa;

use std::sync::Arc;

use cursor::Cursor;
use dfa::{accept, transition, CharClass, State};
use log::debug;
use lunno_common::token::{single_char_token, MULTI_CHAR_OPERATORS};
use lunno_common::{LexError, LexErrorKind, Span, Token, TokenKind};

/// Tokenize a whole source unit.
///
/// Lexical problems never stop the scan: each becomes an `Illegal` token
/// carrying its [`LexError`], and the returned vector always ends with
/// exactly one `EndOfFile` token. The only failure is an empty source,
/// which has no tokens to report against.
pub fn tokenize(source: &str, file: &str) -> Result<Vec<Token>, LexError> {
    let file: Arc<str> = Arc::from(file);
    if source.is_empty() {
        return Err(LexError::new(
            LexErrorKind::EmptySource,
            Span::start_of(file),
        ));
    }
    let tokens: Vec<Token> = Lexer::new(source, file.clone()).collect();
    debug!(
        "Tokenized {}: {} tokens, {} illegal",
        file,
        tokens.len(),
        tokens.iter().filter(|t| t.kind == TokenKind::Illegal).count()
    );
    Ok(tokens)
}

/// The Lunno lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for character iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily
/// or collect them into a `Vec`.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    file: Arc<str>,
    /// Line of the most recently emitted token, for indentation tracking.
    last_line: Option<u32>,
    /// Whether we have already emitted the `EndOfFile` token.
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str, file: Arc<str>) -> Self {
        Self {
            cursor: Cursor::new(source),
            file,
            last_line: None,
            emitted_eof: false,
        }
    }

    fn span_here(&self) -> Span {
        Span::new(self.file.clone(), self.cursor.line(), self.cursor.column())
    }

    /// Skip whitespace, newlines and `#` line comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(c) if matches!(CharClass::of(Some(c)), CharClass::Whitespace | CharClass::Newline) => {
                    self.cursor.advance();
                }
                Some('#') => self.cursor.eat_while(|c| c != '\n'),
                _ => break,
            }
        }
    }

    /// Produce the next token, starting at a non-trivia character.
    fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.span_here();
        let indent = if self.last_line == Some(start.line) {
            None
        } else {
            Some(start.column - 1)
        };
        self.last_line = Some(start.line);

        if self.cursor.is_eof() {
            return Token::eof(start).with_indent(indent);
        }
        self.scan(start).with_indent(indent)
    }

    fn scan(&mut self, start: Span) -> Token {
        // ── Fixed spellings by direct lookahead ───────────────────────────
        let rest = self.cursor.rest();
        if let Some((spelling, kind)) = MULTI_CHAR_OPERATORS
            .iter()
            .find(|(spelling, _)| rest.starts_with(spelling))
        {
            self.cursor.advance_by(spelling.chars().count());
            return Token::new(*kind, *spelling, start);
        }
        if let Some(kind) = self.cursor.peek().and_then(single_char_token) {
            let begin = self.cursor.pos();
            self.cursor.advance();
            return Token::new(kind, self.cursor.slice_from(begin), start);
        }

        // ── Automaton ─────────────────────────────────────────────────────
        let begin = self.cursor.pos();
        let mut state = State::Start;
        loop {
            let class = CharClass::of(self.cursor.peek());
            match transition(state, class) {
                Some(State::Error) => {
                    let lexeme = self.cursor.slice_from(begin);
                    let err = LexError::new(dfa::unterminated(state), self.span_here());
                    return Token::illegal(lexeme, start, err);
                }
                Some(next) if class != CharClass::Eof => {
                    state = next;
                    self.cursor.advance();
                }
                _ => break,
            }
        }

        let lexeme = self.cursor.slice_from(begin);
        match accept(state, lexeme) {
            Some(Ok(kind)) => Token::new(kind, lexeme, start),
            Some(Err(rejection)) => {
                let span = Span::new(
                    self.file.clone(),
                    start.line,
                    start.column + rejection.offset,
                );
                Token::illegal(lexeme, start, LexError::new(rejection.kind, span))
            }
            None if lexeme.is_empty() => {
                // Nothing starts with this character: consume it so the scan
                // always makes progress.
                let c = self.cursor.advance().unwrap_or('\0');
                let err = LexError::new(LexErrorKind::UnexpectedCharacter(c), start.clone());
                Token::illegal(c.to_string(), start, err)
            }
            None => {
                let err = LexError::new(LexErrorKind::InvalidToken, start.clone());
                Token::illegal(lexeme, start, err)
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::EndOfFile {
            self.emitted_eof = true;
        }
        Some(token)
    }
}
