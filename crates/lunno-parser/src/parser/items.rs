//! Keyword-introduced forms: `let`, `fn`, `if`, `import`, and `match`.

use lunno_common::TokenKind;

use crate::ast::{Decl, Expr, ExprKind, MatchArm, Param};

use super::expressions::block;
use super::{starts_expr, Parser};

impl Parser<'_> {
    /// `let [rec] name [: Type] (= expr | { block })`
    ///
    /// A function-literal value yields [`ExprKind::FnDecl`], anything else
    /// [`ExprKind::VarDecl`].
    pub(crate) fn let_decl(&mut self) -> Option<Expr> {
        let let_token = self.advance();
        let recursive = self.eat(TokenKind::KwRec);

        if !self.at(TokenKind::Identifier) {
            self.error("expected identifier after 'let'");
            return None;
        }
        let name = self.advance().lexeme;

        let annotation = if self.eat(TokenKind::Colon) {
            Some(self.type_expr()?)
        } else {
            None
        };

        let value = if self.eat(TokenKind::Assign) {
            if !starts_expr(self.current_kind()) {
                self.error("expected value in let declaration");
                return None;
            }
            self.expr()?
        } else if self.at(TokenKind::LeftBrace) {
            block(self)?
        } else {
            self.error("expected '=' or '{' in let declaration");
            return None;
        };

        let is_fn = matches!(value.kind, ExprKind::FnLit { .. });
        let decl = Decl {
            name,
            recursive,
            annotation,
            value: Box::new(value),
        };
        let kind = if is_fn {
            ExprKind::FnDecl(decl)
        } else {
            ExprKind::VarDecl(decl)
        };
        Some(Expr::new(kind, let_token))
    }

    /// `fn (p1[: T], ...) [->] body`
    pub(crate) fn fn_literal(&mut self) -> Option<Expr> {
        let fn_token = self.advance();
        self.expect(TokenKind::LeftParen, "'(' after 'fn'")?;

        let mut params = Vec::new();
        if !self.eat(TokenKind::RightParen) {
            loop {
                if !self.at(TokenKind::Identifier) {
                    self.error("expected parameter name");
                    return None;
                }
                let token = self.advance();
                let annotation = if self.eat(TokenKind::Colon) {
                    Some(self.type_expr()?)
                } else {
                    None
                };
                params.push(Param {
                    name: token.lexeme.clone(),
                    annotation,
                    token,
                });
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                if self.eat(TokenKind::RightParen) {
                    break;
                }
                self.error("expected ',' or ')' in parameter list");
                return None;
            }
        }

        self.eat(TokenKind::Arrow);
        if !starts_expr(self.current_kind()) {
            self.error("expected function body");
            return None;
        }
        let body = self.expr()?;
        Some(Expr::new(
            ExprKind::FnLit {
                params,
                body: Box::new(body),
            },
            fn_token,
        ))
    }

    /// `if cond then e1 else e2`
    pub(crate) fn if_expr(&mut self) -> Option<Expr> {
        let if_token = self.advance();
        let cond = self.expr()?;
        if !self.eat(TokenKind::KwThen) {
            self.error("expected 'then' after if condition");
            return None;
        }
        let then_branch = self.expr()?;
        if !self.eat(TokenKind::KwElse) {
            self.error("expected 'else' after then branch");
            return None;
        }
        let else_branch = self.expr()?;
        Some(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            if_token,
        ))
    }

    /// `import name`. Resolution is not performed.
    pub(crate) fn import(&mut self) -> Option<Expr> {
        let import_token = self.advance();
        let name = self
            .expect(TokenKind::Identifier, "module name after 'import'")?
            .lexeme;
        Some(Expr::new(ExprKind::Import(name), import_token))
    }

    /// `match e with { | pat [when guard] -> body ... }`
    pub(crate) fn match_expr(&mut self) -> Option<Expr> {
        let match_token = self.advance();
        let scrutinee = self.expr()?;
        if !self.eat(TokenKind::KwWith) {
            self.error("expected 'with' after match scrutinee");
            return None;
        }
        if !self.eat(TokenKind::LeftBrace) {
            self.error("expected '{' to open match arms");
            return None;
        }

        let mut arms = Vec::new();
        while !self.at(TokenKind::RightBrace) && !self.at(TokenKind::EndOfFile) {
            match self.match_arm() {
                Some(arm) => arms.push(arm),
                None => self.recover_to(&[TokenKind::Pipe, TokenKind::RightBrace]),
            }
        }
        if !self.eat(TokenKind::RightBrace) {
            self.error("expected '}' to close match arms");
            return None;
        }

        Some(Expr::new(
            ExprKind::Match {
                scrutinee: Box::new(scrutinee),
                arms,
            },
            match_token,
        ))
    }

    fn match_arm(&mut self) -> Option<MatchArm> {
        if !self.eat(TokenKind::Pipe) {
            self.error("expected '|' to start match arm");
            // Step past the offending token so recovery can find the next arm.
            self.advance();
            return None;
        }
        let pattern = self.pattern()?;
        let guard = if self.eat(TokenKind::KwWhen) {
            Some(self.expr()?)
        } else {
            None
        };
        if !self.eat(TokenKind::Arrow) {
            self.error("expected '->' after match pattern");
            return None;
        }
        let body = self.expr()?;
        Some(MatchArm {
            pattern,
            guard,
            body,
        })
    }
}
