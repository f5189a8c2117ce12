//! LSP textDocument/completion for Lunno.
//!
//! Offers three groups, all filtered by the identifier fragment just before
//! the cursor:
//! 1. **Declared names** collected from the AST
//! 2. **Built-ins** such as `print`
//! 3. **Keywords**

use std::collections::HashSet;

use lunno_common::token::KEYWORDS;
use lunno_parser::ast::{Expr, ExprKind};
use lunno_parser::Program;
use lunno_typeck::builtins::BUILTINS;
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Position};

use crate::analysis::position_to_offset;

/// Compute completion items at `position`.
pub fn compute_completions(
    source: &str,
    program: &Program,
    position: &Position,
) -> Vec<CompletionItem> {
    let Some(offset) = position_to_offset(source, position) else {
        return Vec::new();
    };
    let prefix = extract_prefix(source, offset);

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for expr in &program.exprs {
        collect_names(expr, &mut seen, &mut names);
    }

    let mut items = Vec::new();
    for (name, kind) in names {
        push_item(&mut items, &prefix, &name, kind, '0');
    }
    for &builtin in BUILTINS {
        push_item(&mut items, &prefix, builtin, CompletionItemKind::FUNCTION, '1');
    }
    for &kw in KEYWORDS {
        push_item(&mut items, &prefix, kw, CompletionItemKind::KEYWORD, '2');
    }
    items
}

fn push_item(
    items: &mut Vec<CompletionItem>,
    prefix: &str,
    label: &str,
    kind: CompletionItemKind,
    tier: char,
) {
    if !label.starts_with(prefix) {
        return;
    }
    items.push(CompletionItem {
        label: label.to_string(),
        kind: Some(kind),
        sort_text: Some(format!("{tier}_{label}")),
        ..Default::default()
    });
}

/// The identifier characters immediately before `offset`.
fn extract_prefix(source: &str, offset: usize) -> &str {
    let before = &source[..offset];
    let start = before
        .rfind(|c: char| !c.is_alphanumeric() && c != '_')
        .map(|i| i + before[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    &before[start..]
}

/// Collect declared names in source order, first declaration wins.
fn collect_names(
    expr: &Expr,
    seen: &mut HashSet<String>,
    out: &mut Vec<(String, CompletionItemKind)>,
) {
    match &expr.kind {
        ExprKind::VarDecl(decl) | ExprKind::FnDecl(decl) => {
            if seen.insert(decl.name.clone()) {
                let kind = if matches!(expr.kind, ExprKind::FnDecl(_)) {
                    CompletionItemKind::FUNCTION
                } else {
                    CompletionItemKind::VARIABLE
                };
                out.push((decl.name.clone(), kind));
            }
            collect_names(&decl.value, seen, out);
        }
        ExprKind::Block(exprs) | ExprKind::List(exprs) => {
            for e in exprs {
                collect_names(e, seen, out);
            }
        }
        ExprKind::Call { callee, args } => {
            collect_names(callee, seen, out);
            for arg in args {
                collect_names(arg, seen, out);
            }
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            collect_names(cond, seen, out);
            collect_names(then_branch, seen, out);
            collect_names(else_branch, seen, out);
        }
        ExprKind::FnLit { body, .. } => collect_names(body, seen, out),
        ExprKind::Match { scrutinee, arms } => {
            collect_names(scrutinee, seen, out);
            for arm in arms {
                collect_names(&arm.body, seen, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(source: &str, position: Position) -> Vec<String> {
        let parse = lunno_parser::parse_source(source, "t.ln");
        compute_completions(source, &parse.program, &position)
            .into_iter()
            .map(|item| item.label)
            .collect()
    }

    #[test]
    fn prefix_extraction() {
        assert_eq!(extract_prefix("let ab", 6), "ab");
        assert_eq!(extract_prefix("f(x", 3), "x");
        assert_eq!(extract_prefix("x ", 2), "");
        assert_eq!(extract_prefix("é_a", "é_a".len()), "é_a");
    }

    #[test]
    fn keywords_filtered_by_prefix() {
        let got = labels("le", Position::new(0, 2));
        assert_eq!(got, vec!["let".to_string()]);
    }

    #[test]
    fn declared_names_come_first() {
        let src = "let total = 1\nlet tick = fn(n) n\nt";
        let got = labels(src, Position::new(2, 1));
        assert_eq!(got, vec!["total", "tick", "then", "true"]);
    }

    #[test]
    fn names_inside_blocks_and_calls() {
        let src = "let f = fn(a) {\n  let inner = a\n  inner\n}\nprint({\n  let arg = 1\n  arg\n})\n";
        let got = labels(src, Position::new(8, 0));
        assert!(got.contains(&"inner".to_string()));
        assert!(got.contains(&"arg".to_string()));
        assert!(got.contains(&"print".to_string()));
        assert!(got.contains(&"match".to_string()));
    }

    #[test]
    fn kinds_distinguish_functions_and_variables() {
        let src = "let v = 1\nlet g = fn() v\n";
        let parse = lunno_parser::parse_source(src, "t.ln");
        let items = compute_completions(src, &parse.program, &Position::new(2, 0));
        let kind_of = |label: &str| {
            items
                .iter()
                .find(|i| i.label == label)
                .and_then(|i| i.kind)
        };
        assert_eq!(kind_of("v"), Some(CompletionItemKind::VARIABLE));
        assert_eq!(kind_of("g"), Some(CompletionItemKind::FUNCTION));
        assert_eq!(kind_of("fn"), Some(CompletionItemKind::KEYWORD));
    }
}
