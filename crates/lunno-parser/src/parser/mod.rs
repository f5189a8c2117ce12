//! Recursive-descent parser for Lunno.
//!
//! The parser walks a token slice and builds [`Expr`] trees directly. It
//! never stops at the first problem: each parse routine returns `None` after
//! recording a positioned [`Diagnostic`], and the caller decides how to
//! resynchronize. The top-level loop guarantees forward progress by skipping
//! a token whenever an expression fails without consuming anything. The one
//! exception is nesting past [`MAX_NESTING`], which ends the parse.
//!
//! `Illegal` tokens from the lexer are reported up front and then skipped by
//! every lookahead method, so the grammar never sees them.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod patterns;
pub(crate) mod types;

use lunno_common::{Diagnostic, Span, Token, TokenKind};

use crate::ast::{Expr, Program};

/// Deepest nesting of expressions, types and patterns the parser accepts.
/// Chained binary operators count one level per operator.
pub(crate) const MAX_NESTING: usize = 256;

pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    /// Current position in the token stream.
    pos: usize,
    /// Line of the most recently consumed token.
    prev_line: u32,
    /// Stand-in returned by lookahead past the end of a stream without EOF.
    eof: Token,
    errors: Vec<Diagnostic>,
    /// Token position of the last reported error, to avoid reporting twice.
    last_error_pos: Option<usize>,
    /// Current nesting level, bounded by [`MAX_NESTING`].
    depth: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        let errors = tokens
            .iter()
            .filter_map(|tok| tok.error.as_ref().map(|e| e.to_diagnostic()))
            .collect();
        let eof_span = tokens
            .last()
            .map(|t| t.span.clone())
            .unwrap_or_else(|| Span::start_of("<input>".into()));
        Self {
            tokens,
            pos: 0,
            prev_line: 1,
            eof: Token::eof(eof_span),
            errors,
            last_error_pos: None,
            depth: 0,
        }
    }

    /// Parse every top-level expression until end of file.
    pub(crate) fn parse_program(mut self) -> (Program, Vec<Diagnostic>) {
        let mut program = Program::default();
        while !self.at(TokenKind::EndOfFile) {
            let before = self.pos;
            match self.expr() {
                Some(expr) => program.exprs.push(expr),
                None if self.significant_pos() == self.significant_pos_from(before) => {
                    self.advance();
                }
                None => {}
            }
        }
        (program, self.errors)
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    fn should_skip(kind: TokenKind) -> bool {
        kind == TokenKind::Illegal
    }

    fn significant_pos_from(&self, mut pos: usize) -> usize {
        while pos < self.tokens.len() && Self::should_skip(self.tokens[pos].kind) {
            pos += 1;
        }
        pos
    }

    fn significant_pos(&self) -> usize {
        self.significant_pos_from(self.pos)
    }

    /// The current significant token.
    pub(crate) fn current(&self) -> &Token {
        self.tokens
            .get(self.significant_pos())
            .unwrap_or(&self.eof)
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Whether the current token sits on the same line as the previous one.
    pub(crate) fn on_same_line(&self) -> bool {
        self.current().span.line == self.prev_line
    }

    // ── Consumption ────────────────────────────────────────────────────

    /// Consume and return the current significant token.
    ///
    /// At end of file this returns the EOF token without moving.
    pub(crate) fn advance(&mut self) -> Token {
        let pos = self.significant_pos();
        let token = self.current().clone();
        if token.kind != TokenKind::EndOfFile {
            self.pos = pos + 1;
            self.prev_line = token.span.line;
        }
        token
    }

    /// Consume the current token if it matches `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind`, or report `expected <what>, found ...`.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.at(kind) {
            return Some(self.advance());
        }
        let found = self.describe_current();
        self.error(format!("expected {what}, found {found}"));
        None
    }

    /// Skip tokens until one of `kinds` (or end of file) is current.
    pub(crate) fn recover_to(&mut self, kinds: &[TokenKind]) {
        while !self.at(TokenKind::EndOfFile) && !kinds.contains(&self.current_kind()) {
            self.advance();
        }
    }

    // ── Nesting ────────────────────────────────────────────────────────

    /// Enter one nesting level.
    ///
    /// Past [`MAX_NESTING`] this reports the error, skips the rest of the
    /// input, and returns `false`.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= MAX_NESTING {
            self.error("expression nested too deeply");
            self.recover_to(&[]);
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    /// Run `parse` one nesting level deeper.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if !self.enter() {
            return None;
        }
        let result = parse(self);
        self.leave(1);
        result
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Human-readable name of the current token for messages.
    pub(crate) fn describe_current(&self) -> String {
        let tok = self.current();
        match tok.kind {
            TokenKind::EndOfFile => "end of file".to_string(),
            _ => format!("'{}'", tok.lexeme),
        }
    }

    /// Record an error at the current token.
    ///
    /// At most one error is kept per token position: once a token has been
    /// blamed, enclosing rules that fail because of it stay silent.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let pos = self.significant_pos();
        if self.last_error_pos == Some(pos) {
            return;
        }
        self.last_error_pos = Some(pos);
        let span = self.current().span.clone();
        self.errors.push(Diagnostic::new(message, span));
    }

    /// Record an error anchored at an already-consumed token.
    pub(crate) fn error_at(&mut self, message: impl Into<String>, token: &Token) {
        self.errors
            .push(Diagnostic::new(message, token.span.clone()));
    }
}

/// Whether a token can begin an expression.
pub(crate) fn starts_expr(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::Char
            | TokenKind::KwTrue
            | TokenKind::KwFalse
            | TokenKind::KwNil
            | TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::Minus
            | TokenKind::KwLet
            | TokenKind::KwFn
            | TokenKind::KwIf
            | TokenKind::KwImport
            | TokenKind::KwMatch
    )
}

impl Parser<'_> {
    /// Parse a full expression (lowest precedence).
    pub(crate) fn expr(&mut self) -> Option<Expr> {
        expressions::expr_bp(self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        lunno_lexer::tokenize(source, "t.ln").unwrap()
    }

    #[test]
    fn lookahead_skips_illegal_tokens() {
        let toks = tokens("@ x @ y");
        let mut p = Parser::new(&toks);
        assert_eq!(p.current_kind(), TokenKind::Identifier);
        assert_eq!(p.advance().lexeme, "x");
        assert_eq!(p.advance().lexeme, "y");
        assert_eq!(p.current_kind(), TokenKind::EndOfFile);
        assert_eq!(p.errors.len(), 2);
    }

    #[test]
    fn advance_stops_at_eof() {
        let toks = tokens("x");
        let mut p = Parser::new(&toks);
        assert_eq!(p.advance().kind, TokenKind::Identifier);
        assert_eq!(p.advance().kind, TokenKind::EndOfFile);
        assert_eq!(p.advance().kind, TokenKind::EndOfFile);
    }

    #[test]
    fn lookahead_past_stream_without_eof() {
        let mut p = Parser::new(&[]);
        assert_eq!(p.current_kind(), TokenKind::EndOfFile);
        assert_eq!(p.advance().kind, TokenKind::EndOfFile);
    }

    #[test]
    fn expect_reports_found_token() {
        let toks = tokens("x");
        let mut p = Parser::new(&toks);
        assert!(p.expect(TokenKind::LeftParen, "'('").is_none());
        assert_eq!(p.errors[0].message, "expected '(', found 'x'");
    }

    #[test]
    fn one_error_per_position() {
        let toks = tokens(")");
        let mut p = Parser::new(&toks);
        p.error("first");
        p.error("second");
        assert_eq!(p.errors.len(), 1);
        assert_eq!(p.errors[0].message, "first");
    }

    #[test]
    fn nesting_limit_stops_parsing() {
        let toks = tokens("x y z");
        let mut p = Parser::new(&toks);
        p.depth = MAX_NESTING;
        assert_eq!(p.nested(|p| Some(p.advance())), None);
        assert_eq!(p.errors.len(), 1);
        assert_eq!(p.errors[0].message, "expression nested too deeply");
        assert_eq!(p.errors[0].span.column, 1);
        assert!(p.at(TokenKind::EndOfFile));

        p.depth = 0;
        assert!(p.nested(|p| Some(p.advance())).is_some());
        assert_eq!(p.depth, 0);
    }
}
