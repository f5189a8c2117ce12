//! Rendering of type errors as caret diagnostics.

use lunno_typeck::TypeckResult;

fn check_source(src: &str) -> TypeckResult {
    let parse = lunno_parser::parse_source(src, "test.ln");
    assert!(parse.ok(), "parse errors: {:?}", parse.errors);
    lunno_typeck::check(&parse.program)
}

/// Render the first type error for `src`.
fn render_first_error(src: &str) -> String {
    let result = check_source(src);
    let first = result
        .errors
        .first()
        .unwrap_or_else(|| panic!("expected a type error for {src:?}"));
    first.to_diagnostic().render(src)
}

#[test]
fn mismatch_points_at_the_value() {
    let output = render_first_error("let x: int = \"hello\"");
    assert_eq!(
        output,
        "error: type mismatch: expected int, found string\n  --> test.ln:1:14\n   |\n 1 | let x: int = \"hello\"\n   |              ^\n"
    );
}

#[test]
fn condition_error_points_at_the_condition() {
    let output = render_first_error("let a = 1\nif a then 2 else 3");
    assert_eq!(
        output,
        "error: if condition must be bool, found int\n  --> test.ln:2:4\n   |\n 2 | if a then 2 else 3\n   |    ^\n"
    );
}

#[test]
fn arity_error_points_at_the_call() {
    let output = render_first_error("let f = fn(a, b) a\nf(1)");
    assert_eq!(
        output,
        "error: arity mismatch: expected 2 arguments, found 1\n  --> test.ln:2:2\n   |\n 2 | f(1)\n   |  ^\n"
    );
}

#[test]
fn compact_forms_in_source_order() {
    let src = "let s: string = 'c'\nprint(missing)\ntrue + 1";
    let result = check_source(src);
    let compact: Vec<String> = result
        .errors
        .iter()
        .map(|e| e.to_diagnostic().to_string())
        .collect();
    insta::assert_snapshot!(compact.join("\n"), @r"
    test.ln:1:17: type mismatch: expected string, found char
    test.ln:2:7: undefined identifier 'missing'
    test.ln:3:8: type mismatch: expected bool, found int
    test.ln:3:6: operator '+' cannot be applied to bool
    ");
}
