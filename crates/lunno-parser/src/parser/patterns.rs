//! Match-arm pattern parsing.

use lunno_common::TokenKind;

use crate::ast::Pattern;

use super::expressions::literal;
use super::Parser;

impl Parser<'_> {
    /// `_`, `name`, a literal, `[p, ...]`, or `nil`.
    pub(crate) fn pattern(&mut self) -> Option<Pattern> {
        self.nested(Self::pattern_form)
    }

    fn pattern_form(&mut self) -> Option<Pattern> {
        match self.current_kind() {
            TokenKind::Underscore => Some(Pattern::Wildcard(self.advance())),
            TokenKind::Identifier => {
                let token = self.advance();
                Some(Pattern::Bind(token.lexeme.clone(), token))
            }
            TokenKind::KwNil => Some(Pattern::Nil(self.advance())),
            TokenKind::Integer
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::Char
            | TokenKind::KwTrue
            | TokenKind::KwFalse => literal(self).map(Pattern::Literal),
            TokenKind::LeftBracket => {
                let open = self.advance();
                let mut items = Vec::new();
                if !self.eat(TokenKind::RightBracket) {
                    loop {
                        items.push(self.pattern()?);
                        if self.eat(TokenKind::Comma) {
                            continue;
                        }
                        if self.eat(TokenKind::RightBracket) {
                            break;
                        }
                        self.error("expected ',' or ']' in list pattern");
                        return None;
                    }
                }
                Some(Pattern::List(items, open))
            }
            _ => {
                let found = self.current().lexeme.clone();
                self.error(format!("invalid pattern '{found}'"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_pattern(source: &str) -> Result<String, Vec<String>> {
        let tokens = lunno_lexer::tokenize(source, "t.ln").unwrap();
        let mut p = Parser::new(&tokens);
        match p.pattern() {
            Some(pat) if p.errors.is_empty() => Ok(pat.to_string()),
            _ => Err(p.errors.iter().map(|e| e.message.clone()).collect()),
        }
    }

    #[test]
    fn simple_patterns() {
        assert_eq!(parse_pattern("_"), Ok("_".to_string()));
        assert_eq!(parse_pattern("x"), Ok("x".to_string()));
        assert_eq!(parse_pattern("nil"), Ok("nil".to_string()));
        assert_eq!(parse_pattern("42"), Ok("42".to_string()));
        assert_eq!(parse_pattern("'a'"), Ok("'a'".to_string()));
        assert_eq!(parse_pattern("true"), Ok("true".to_string()));
    }

    #[test]
    fn nested_list_pattern() {
        assert_eq!(
            parse_pattern("[x, _, [1, nil]]"),
            Ok("[x, _, [1, nil]]".to_string())
        );
        assert_eq!(parse_pattern("[]"), Ok("[]".to_string()));
    }

    #[test]
    fn invalid_pattern_start() {
        assert_eq!(
            parse_pattern("+"),
            Err(vec!["invalid pattern '+'".to_string()])
        );
    }
}
