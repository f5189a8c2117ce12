//! Precedence-climbing expression parser for Lunno.
//!
//! Binary operators are parsed by [`expr_bp`]: parse a unary operand, then
//! keep folding in operators whose precedence is at least the caller's
//! minimum, parsing each right-hand side one level higher so that every
//! operator is left-associative. Prefix `-` binds tighter than any binary
//! operator, and postfix call/index/slice bind tighter still.

use lunno_common::{Token, TokenKind};

use crate::ast::{BinOp, Expr, ExprKind, PrefixOp};

use super::{starts_expr, Parser};

// ── Operator table ─────────────────────────────────────────────────────

/// Map a token to the binary operator it spells, if any.
fn binary_op(kind: TokenKind) -> Option<BinOp> {
    let op = match kind {
        TokenKind::Colon => BinOp::Cons,
        TokenKind::Equal => BinOp::Eq,
        TokenKind::NotEqual => BinOp::NotEq,
        TokenKind::LessThan => BinOp::Lt,
        TokenKind::GreaterThan => BinOp::Gt,
        TokenKind::LessThanOrEqual => BinOp::LtEq,
        TokenKind::GreaterThanOrEqual => BinOp::GtEq,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Asterisk => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        _ => return None,
    };
    Some(op)
}

/// Slice bounds are parsed above `:` so the colon separates them.
const SLICE_BOUND_PREC: u8 = BinOp::Cons.precedence() + 1;

// ── Entry point ────────────────────────────────────────────────────────

/// Parse an expression whose binary operators all bind at least `min_prec`.
pub(crate) fn expr_bp(p: &mut Parser, min_prec: u8) -> Option<Expr> {
    p.nested(|p| {
        let lhs = unary(p)?;
        let mut folds = 0;
        let result = fold_binary(p, lhs, min_prec, &mut folds);
        p.leave(folds);
        result
    })
}

/// Fold operators into `lhs`, one nesting level per operator.
fn fold_binary(p: &mut Parser, mut lhs: Expr, min_prec: u8, folds: &mut usize) -> Option<Expr> {
    loop {
        let Some(op) = binary_op(p.current_kind()) else {
            break;
        };
        let prec = op.precedence();
        if prec < min_prec {
            break;
        }
        // A leading `-` on a new line starts the next expression.
        if op == BinOp::Sub && !p.on_same_line() {
            break;
        }
        let op_token = p.advance();

        if !p.enter() {
            return None;
        }
        *folds += 1;

        if !starts_expr(p.current_kind()) {
            p.error_at(
                "expected expression on right-hand side of operator",
                &op_token,
            );
            return Some(lhs);
        }
        let Some(rhs) = expr_bp(p, prec + 1) else {
            return Some(lhs);
        };
        lhs = Expr::new(
            ExprKind::Infix {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            op_token,
        );
    }

    Some(lhs)
}

fn unary(p: &mut Parser) -> Option<Expr> {
    if p.at(TokenKind::Minus) {
        let token = p.advance();
        let operand = p.nested(unary)?;
        return Some(Expr::new(
            ExprKind::Prefix {
                op: PrefixOp::Neg,
                operand: Box::new(operand),
            },
            token,
        ));
    }
    let primary = primary(p)?;
    postfix(p, primary)
}

// ── Postfix: call, index, slice ────────────────────────────────────────

/// Apply postfix forms left to right.
///
/// A `(` or `[` only continues an expression when it is on the same line;
/// on a new line it starts the next expression.
fn postfix(p: &mut Parser, mut lhs: Expr) -> Option<Expr> {
    loop {
        if !p.on_same_line() {
            return Some(lhs);
        }
        match p.current_kind() {
            TokenKind::LeftParen => {
                let token = p.advance();
                let args = delimited(p, ListKind::Arguments)?;
                lhs = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(lhs),
                        args,
                    },
                    token,
                );
            }
            TokenKind::LeftBracket => {
                let token = p.advance();
                lhs = index_or_slice(p, lhs, token)?;
            }
            _ => return Some(lhs),
        }
    }
}

fn index_or_slice(p: &mut Parser, target: Expr, token: Token) -> Option<Expr> {
    let start = if p.at(TokenKind::Colon) {
        None
    } else {
        Some(Box::new(expr_bp(p, SLICE_BOUND_PREC)?))
    };

    if p.eat(TokenKind::Colon) {
        let end = if p.at(TokenKind::RightBracket) {
            None
        } else {
            Some(Box::new(expr_bp(p, SLICE_BOUND_PREC)?))
        };
        p.expect(TokenKind::RightBracket, "']' to close slice")?;
        return Some(Expr::new(
            ExprKind::Slice {
                target: Box::new(target),
                start,
                end,
            },
            token,
        ));
    }

    p.expect(TokenKind::RightBracket, "']' to close index")?;
    let index = start?;
    Some(Expr::new(
        ExprKind::Index {
            target: Box::new(target),
            index,
        },
        token,
    ))
}

// ── Delimited lists ────────────────────────────────────────────────────

/// The comma-separated constructs sharing [`delimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    /// `[a, b]`
    Literal,
    /// `f(a, b)`
    Arguments,
}

impl ListKind {
    fn close(self) -> TokenKind {
        match self {
            ListKind::Literal => TokenKind::RightBracket,
            ListKind::Arguments => TokenKind::RightParen,
        }
    }

    fn close_spelling(self) -> &'static str {
        match self {
            ListKind::Literal => "]",
            ListKind::Arguments => ")",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ListKind::Literal => "list literal",
            ListKind::Arguments => "argument list",
        }
    }
}

/// Parse comma-separated expressions after an already consumed opener.
///
/// A trailing comma is allowed. On a bad element or separator the error is
/// reported once and the rest of the list is skipped.
pub(crate) fn delimited(p: &mut Parser, kind: ListKind) -> Option<Vec<Expr>> {
    let close = kind.close();
    let mut items = Vec::new();
    if p.eat(close) {
        return Some(items);
    }

    loop {
        match p.expr() {
            Some(item) => items.push(item),
            None => {
                skip_list_rest(p, kind);
                return None;
            }
        }
        if p.eat(TokenKind::Comma) {
            if p.eat(close) {
                return Some(items);
            }
            continue;
        }
        if p.eat(close) {
            return Some(items);
        }
        p.error(format!(
            "expected ',' or '{}' in {}",
            kind.close_spelling(),
            kind.name()
        ));
        skip_list_rest(p, kind);
        return None;
    }
}

/// Skip to the matching closer of an open list, consuming it.
fn skip_list_rest(p: &mut Parser, kind: ListKind) {
    let (open, close) = match kind {
        ListKind::Literal => (TokenKind::LeftBracket, TokenKind::RightBracket),
        ListKind::Arguments => (TokenKind::LeftParen, TokenKind::RightParen),
    };
    let mut depth = 0usize;
    while !p.at(TokenKind::EndOfFile) {
        let kind = p.current_kind();
        if kind == close {
            if depth == 0 {
                p.advance();
                return;
            }
            depth -= 1;
        } else if kind == open {
            depth += 1;
        }
        p.advance();
    }
}

// ── Primary expressions ────────────────────────────────────────────────

fn primary(p: &mut Parser) -> Option<Expr> {
    match p.current_kind() {
        TokenKind::Integer
        | TokenKind::Float
        | TokenKind::String
        | TokenKind::Char
        | TokenKind::KwTrue
        | TokenKind::KwFalse => literal(p),
        TokenKind::KwNil => {
            let token = p.advance();
            Some(Expr::new(ExprKind::List(Vec::new()), token))
        }
        TokenKind::Identifier => {
            let token = p.advance();
            Some(Expr::new(ExprKind::Ident(token.lexeme.clone()), token))
        }
        TokenKind::LeftParen => paren(p),
        TokenKind::LeftBracket => {
            let token = p.advance();
            let items = delimited(p, ListKind::Literal)?;
            Some(Expr::new(ExprKind::List(items), token))
        }
        TokenKind::LeftBrace => block(p),
        TokenKind::KwLet => p.let_decl(),
        TokenKind::KwFn => p.fn_literal(),
        TokenKind::KwIf => p.if_expr(),
        TokenKind::KwImport => p.import(),
        TokenKind::KwMatch => p.match_expr(),
        TokenKind::EndOfFile => {
            p.error("unexpected end of file");
            None
        }
        _ => {
            let found = p.current().lexeme.clone();
            p.error(format!("unexpected token '{found}'"));
            None
        }
    }
}

/// Parse a literal token into its value. Shared with pattern parsing.
pub(crate) fn literal(p: &mut Parser) -> Option<Expr> {
    let token = p.advance();
    let kind = match token.kind {
        TokenKind::Integer => match token.lexeme.parse::<i64>() {
            Ok(n) => ExprKind::Int(n),
            Err(_) => {
                p.error_at("invalid integer literal", &token);
                return None;
            }
        },
        TokenKind::Float => match token.lexeme.parse::<f64>() {
            Ok(x) if x.is_finite() => ExprKind::Float(x),
            _ => {
                p.error_at("invalid float literal", &token);
                return None;
            }
        },
        TokenKind::String => ExprKind::Str(unescape(strip_delimiters(&token.lexeme))),
        TokenKind::Char => match unescape(strip_delimiters(&token.lexeme)).chars().next() {
            Some(c) => ExprKind::Char(c),
            None => {
                p.error_at("invalid character literal", &token);
                return None;
            }
        },
        TokenKind::KwTrue => ExprKind::Bool(true),
        TokenKind::KwFalse => ExprKind::Bool(false),
        _ => {
            p.error_at(format!("unexpected token '{}'", token.lexeme), &token);
            return None;
        }
    };
    Some(Expr::new(kind, token))
}

fn strip_delimiters(lexeme: &str) -> &str {
    let mut chars = lexeme.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Decode backslash escapes. `\xHH` and `\uHHHH` take up to 2 and 4 hex
/// digits; with no digits the letter stands for itself.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(e @ ('x' | 'u')) => {
                let max = if e == 'x' { 2 } else { 4 };
                let mut digits = String::new();
                while digits.len() < max {
                    match chars.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if !digits.is_empty() => out.push(decoded),
                    _ => {
                        out.push(e);
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// `()` is unit; `(e)` is just `e`.
fn paren(p: &mut Parser) -> Option<Expr> {
    let open = p.advance();
    if p.eat(TokenKind::RightParen) {
        return Some(Expr::new(ExprKind::Unit, open));
    }
    let inner = p.expr()?;
    p.expect(TokenKind::RightParen, "')'")?;
    Some(inner)
}

/// `{ e1 e2 ... }`. Empty blocks are unit and single-expression blocks
/// collapse to their expression.
pub(crate) fn block(p: &mut Parser) -> Option<Expr> {
    let open = p.advance();
    let mut exprs = Vec::new();
    while !p.at(TokenKind::RightBrace) && !p.at(TokenKind::EndOfFile) {
        let before = p.current().span.clone();
        match p.expr() {
            Some(expr) => exprs.push(expr),
            None if p.current().span == before => {
                p.advance();
            }
            None => {}
        }
    }
    p.expect(TokenKind::RightBrace, "'}' to close block")?;

    Some(match exprs.len() {
        0 => Expr::new(ExprKind::Unit, open),
        1 => exprs.remove(0),
        _ => Expr::new(ExprKind::Block(exprs), open),
    })
}
