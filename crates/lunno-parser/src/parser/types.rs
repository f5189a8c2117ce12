//! Type annotation parsing.

use lunno_common::TokenKind;

use crate::ast::TypeExpr;

use super::Parser;

impl Parser<'_> {
    /// `fn(T, ...) [-> R]`, `list(T)`, `[T]`, or a bare name.
    pub(crate) fn type_expr(&mut self) -> Option<TypeExpr> {
        self.nested(Self::type_form)
    }

    fn type_form(&mut self) -> Option<TypeExpr> {
        match self.current_kind() {
            TokenKind::KwFn => {
                self.advance();
                self.expect(TokenKind::LeftParen, "'(' in function type")?;
                let mut params = Vec::new();
                if !self.eat(TokenKind::RightParen) {
                    loop {
                        params.push(self.type_expr()?);
                        if self.eat(TokenKind::Comma) {
                            continue;
                        }
                        if self.eat(TokenKind::RightParen) {
                            break;
                        }
                        self.error("expected ',' or ')' in function type");
                        return None;
                    }
                }
                let ret = if self.eat(TokenKind::Arrow) {
                    Some(Box::new(self.type_expr()?))
                } else {
                    None
                };
                Some(TypeExpr::Fn { params, ret })
            }
            TokenKind::KwList => {
                self.advance();
                self.expect(TokenKind::LeftParen, "'(' after 'list'")?;
                let elem = self.type_expr()?;
                self.expect(TokenKind::RightParen, "')' to close list type")?;
                Some(TypeExpr::List(Box::new(elem)))
            }
            TokenKind::LeftBracket => {
                self.advance();
                let elem = self.type_expr()?;
                self.expect(TokenKind::RightBracket, "']' to close list type")?;
                Some(TypeExpr::List(Box::new(elem)))
            }
            TokenKind::KwInt
            | TokenKind::KwFloat
            | TokenKind::KwBool
            | TokenKind::KwString
            | TokenKind::KwChar
            | TokenKind::KwUnit
            | TokenKind::Identifier => {
                let token = self.advance();
                Some(TypeExpr::Simple {
                    name: token.lexeme.clone(),
                    token,
                })
            }
            _ => {
                let found = self.current().lexeme.clone();
                self.error(format!("unexpected token in type: '{found}'"));
                None
            }
        }
    }
}
