//! The scanner automaton: character classes, states, and the transition table.
//!
//! The lexer handles whitespace, comments and fixed operator spellings by
//! direct lookahead. Everything else (identifiers, numbers, string and
//! character literals, stray operator symbols) is recognized by running this
//! automaton from [`State::Start`] until no transition exists, then asking
//! [`accept`] what the consumed lexeme is.

use lunno_common::token::{keyword_from_str, MULTI_CHAR_OPERATORS};
use lunno_common::{LexErrorKind, TokenKind};

/// Coarse category of one input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Eof,
    Whitespace,
    Newline,
    Letter,
    Digit,
    Underscore,
    Dot,
    Quote,
    Apostrophe,
    Backslash,
    Operator,
    Other,
}

impl CharClass {
    pub fn of(c: Option<char>) -> CharClass {
        match c {
            None => CharClass::Eof,
            Some('\n') => CharClass::Newline,
            Some(' ' | '\t' | '\r') => CharClass::Whitespace,
            Some('_') => CharClass::Underscore,
            Some(c) if c.is_ascii_alphabetic() => CharClass::Letter,
            Some(c) if c.is_ascii_digit() => CharClass::Digit,
            Some('.') => CharClass::Dot,
            Some('"') => CharClass::Quote,
            Some('\'') => CharClass::Apostrophe,
            Some('\\') => CharClass::Backslash,
            Some(c) if "+-*/=<>!:,|()[]{}".contains(c) => CharClass::Operator,
            Some(_) => CharClass::Other,
        }
    }
}

/// Scanner states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    Ident,
    Int,
    /// Digits with a decimal point; may still lack fractional digits.
    Float,
    String,
    StringEsc,
    Char,
    CharEsc,
    /// One character consumed, expecting the closing apostrophe.
    CharDone,
    CharTooLong,
    Operator,
    Done,
    /// A literal ran into a newline or end of input.
    Error,
}

/// The transition table. `None` means the token ends before this character.
pub fn transition(state: State, class: CharClass) -> Option<State> {
    use CharClass as C;
    use State as S;

    let next = match (state, class) {
        (S::Start, C::Letter | C::Underscore) => S::Ident,
        (S::Start, C::Digit) => S::Int,
        (S::Start, C::Quote) => S::String,
        (S::Start, C::Apostrophe) => S::Char,
        (S::Start, C::Operator) => S::Operator,
        (S::Start, C::Eof) => S::Done,

        (S::Ident, C::Letter | C::Digit | C::Underscore) => S::Ident,

        (S::Int, C::Digit) => S::Int,
        (S::Int, C::Dot) => S::Float,
        (S::Float, C::Digit) => S::Float,

        (S::String, C::Quote) => S::Done,
        (S::String, C::Backslash) => S::StringEsc,
        (S::String, C::Newline | C::Eof) => S::Error,
        (S::String, _) => S::String,
        (S::StringEsc, C::Newline | C::Eof) => S::Error,
        (S::StringEsc, _) => S::String,

        (S::Char, C::Apostrophe) => S::Done,
        (S::Char, C::Backslash) => S::CharEsc,
        (S::Char, C::Newline | C::Eof) => S::Error,
        (S::Char, _) => S::CharDone,
        (S::CharEsc, C::Newline | C::Eof) => S::Error,
        (S::CharEsc, _) => S::CharDone,
        (S::CharDone | S::CharTooLong, C::Apostrophe) => S::Done,
        (S::CharDone | S::CharTooLong, C::Newline | C::Eof) => S::Error,
        (S::CharDone | S::CharTooLong, _) => S::CharTooLong,

        _ => return None,
    };
    Some(next)
}

/// Why an accepting state rejected its lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: LexErrorKind,
    /// Character offset of the reported position from the token start.
    pub offset: u32,
}

impl Rejection {
    fn at(kind: LexErrorKind, offset: u32) -> Self {
        Self { kind, offset }
    }
}

/// Classify the lexeme accumulated in `state`.
///
/// Returns `None` for non-accepting states.
pub fn accept(state: State, lexeme: &str) -> Option<Result<TokenKind, Rejection>> {
    let result = match state {
        State::Ident => Ok(keyword_from_str(lexeme).unwrap_or(TokenKind::Identifier)),
        State::Int => Ok(TokenKind::Integer),
        State::Float if lexeme.ends_with('.') => {
            let dot = lexeme.chars().count() as u32 - 1;
            Err(Rejection::at(LexErrorKind::MalformedFloat, dot))
        }
        State::Float => Ok(TokenKind::Float),
        State::Operator => MULTI_CHAR_OPERATORS
            .iter()
            .find(|(spelling, _)| *spelling == lexeme)
            .map(|(_, kind)| Ok(*kind))
            .unwrap_or_else(|| {
                let c = lexeme.chars().next().unwrap_or('\0');
                Err(Rejection::at(LexErrorKind::UnexpectedCharacter(c), 0))
            }),
        State::Done if lexeme.starts_with('"') => accept_string(lexeme),
        State::Done if lexeme.starts_with('\'') => accept_char(lexeme),
        _ => return None,
    };
    Some(result)
}

fn is_valid_escape(c: char) -> bool {
    matches!(c, 'n' | 't' | 'r' | '0' | '\\' | '\'' | '"' | 'u' | 'x')
}

/// Strip the surrounding delimiter from a closed literal.
fn literal_content(lexeme: &str) -> &str {
    let mut chars = lexeme.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

fn accept_string(lexeme: &str) -> Result<TokenKind, Rejection> {
    let content = literal_content(lexeme);
    if content.is_empty() {
        return Err(Rejection::at(LexErrorKind::EmptyString, 1));
    }
    let mut chars = content.chars().enumerate();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some((_, e)) if is_valid_escape(e) => {}
                _ => {
                    return Err(Rejection::at(
                        LexErrorKind::InvalidStringEscape,
                        i as u32 + 1,
                    ))
                }
            }
        }
    }
    Ok(TokenKind::String)
}

fn accept_char(lexeme: &str) -> Result<TokenKind, Rejection> {
    let content: Vec<char> = literal_content(lexeme).chars().collect();
    match content.as_slice() {
        [] => Err(Rejection::at(LexErrorKind::EmptyChar, 1)),
        ['\\', e] if is_valid_escape(*e) => Ok(TokenKind::Char),
        ['\\', e @ ('x' | 'u'), digits @ ..] if is_hex_escape(*e, digits) => Ok(TokenKind::Char),
        ['\\', ..] => Err(Rejection::at(LexErrorKind::InvalidCharEscape, 1)),
        [_] => Ok(TokenKind::Char),
        _ => Err(Rejection::at(LexErrorKind::CharLength, 1)),
    }
}

/// `\xHH` or `\uHHHH` with 1 to 2 (or 1 to 4) digits naming a valid char.
fn is_hex_escape(letter: char, digits: &[char]) -> bool {
    let max = if letter == 'x' { 2 } else { 4 };
    if digits.is_empty() || digits.len() > max || !digits.iter().all(char::is_ascii_hexdigit) {
        return false;
    }
    let hex: String = digits.iter().collect();
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .is_some()
}

/// The unterminated-literal error for a state that hit [`State::Error`].
pub fn unterminated(state: State) -> LexErrorKind {
    match state {
        State::String | State::StringEsc => LexErrorKind::UnterminatedString,
        _ => LexErrorKind::UnterminatedChar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> State {
        let mut state = State::Start;
        for c in input.chars() {
            match transition(state, CharClass::of(Some(c))) {
                Some(next) => state = next,
                None => break,
            }
        }
        state
    }

    #[test]
    fn classify_characters() {
        assert_eq!(CharClass::of(None), CharClass::Eof);
        assert_eq!(CharClass::of(Some('\n')), CharClass::Newline);
        assert_eq!(CharClass::of(Some('\t')), CharClass::Whitespace);
        assert_eq!(CharClass::of(Some('Q')), CharClass::Letter);
        assert_eq!(CharClass::of(Some('7')), CharClass::Digit);
        assert_eq!(CharClass::of(Some('_')), CharClass::Underscore);
        assert_eq!(CharClass::of(Some('!')), CharClass::Operator);
        assert_eq!(CharClass::of(Some('@')), CharClass::Other);
        assert_eq!(CharClass::of(Some('\u{00E9}')), CharClass::Other);
    }

    #[test]
    fn identifiers_and_numbers() {
        assert_eq!(run("foo_1"), State::Ident);
        assert_eq!(run("_x"), State::Ident);
        assert_eq!(run("42"), State::Int);
        assert_eq!(run("4.2"), State::Float);
        assert_eq!(run("4."), State::Float);
    }

    #[test]
    fn second_dot_ends_float() {
        assert_eq!(transition(State::Float, CharClass::Dot), None);
    }

    #[test]
    fn literals_reach_done() {
        assert_eq!(run("\"hi\""), State::Done);
        assert_eq!(run("\"a\\\"b\""), State::Done);
        assert_eq!(run("'a'"), State::Done);
        assert_eq!(run("'\\n'"), State::Done);
        assert_eq!(run("'ab'"), State::Done);
        assert_eq!(run("'abc"), State::CharTooLong);
    }

    #[test]
    fn newline_inside_literal_is_an_error() {
        assert_eq!(run("\"ab\n"), State::Error);
        assert_eq!(run("'a\n"), State::Error);
        assert_eq!(transition(State::String, CharClass::Eof), Some(State::Error));
    }

    #[test]
    fn accept_keywords_after_munch() {
        assert_eq!(accept(State::Ident, "let"), Some(Ok(TokenKind::KwLet)));
        assert_eq!(
            accept(State::Ident, "letter"),
            Some(Ok(TokenKind::Identifier))
        );
        assert_eq!(accept(State::Ident, "_"), Some(Ok(TokenKind::Underscore)));
    }

    #[test]
    fn accept_rejects_trailing_dot() {
        let err = accept(State::Float, "12.").unwrap().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::MalformedFloat);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn accept_string_escapes() {
        assert_eq!(accept(State::Done, "\"a\\tb\""), Some(Ok(TokenKind::String)));
        let err = accept(State::Done, "\"ab\\q\"").unwrap().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidStringEscape);
        assert_eq!(err.offset, 3);
        let err = accept(State::Done, "\"\"").unwrap().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::EmptyString);
    }

    #[test]
    fn accept_char_lengths() {
        assert_eq!(accept(State::Done, "'x'"), Some(Ok(TokenKind::Char)));
        assert_eq!(accept(State::Done, "'\\''"), Some(Ok(TokenKind::Char)));
        let kind = |lex| accept(State::Done, lex).unwrap().unwrap_err().kind;
        assert_eq!(kind("''"), LexErrorKind::EmptyChar);
        assert_eq!(kind("'ab'"), LexErrorKind::CharLength);
        assert_eq!(kind("'\\q'"), LexErrorKind::InvalidCharEscape);
    }

    #[test]
    fn accept_char_hex_escapes() {
        assert_eq!(accept(State::Done, "'\\x41'"), Some(Ok(TokenKind::Char)));
        assert_eq!(accept(State::Done, "'\\u00e9'"), Some(Ok(TokenKind::Char)));
        assert_eq!(accept(State::Done, "'\\x'"), Some(Ok(TokenKind::Char)));
        let kind = |lex| accept(State::Done, lex).unwrap().unwrap_err().kind;
        assert_eq!(kind("'\\x123'"), LexErrorKind::InvalidCharEscape);
        assert_eq!(kind("'\\xzz'"), LexErrorKind::InvalidCharEscape);
        assert_eq!(kind("'\\ud800'"), LexErrorKind::InvalidCharEscape);
    }

    #[test]
    fn lone_bang_is_unexpected() {
        let err = accept(State::Operator, "!").unwrap().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('!'));
    }

    #[test]
    fn non_accepting_states() {
        assert_eq!(accept(State::Start, ""), None);
        assert_eq!(accept(State::String, "\"ab"), None);
        assert_eq!(accept(State::CharTooLong, "'ab"), None);
    }
}
