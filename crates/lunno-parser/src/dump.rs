//! Indented text rendering of a [`Program`], one node per line.
//!
//! Used by `lunno run --dump-ast` and by parser snapshot tests.

use std::fmt::{self, Write};

use crate::ast::{Decl, Expr, ExprKind, MatchArm, Program};

pub fn dump_program(program: &Program) -> String {
    let mut out = String::new();
    for expr in &program.exprs {
        // Writing into a String cannot fail.
        let _ = write_expr(&mut out, expr, 0);
    }
    out
}

pub fn dump_expr(expr: &Expr) -> String {
    let mut out = String::new();
    let _ = write_expr(&mut out, expr, 0);
    out
}

fn write_expr(out: &mut String, expr: &Expr, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match &expr.kind {
        ExprKind::Ident(name) => writeln!(out, "{pad}Ident {name}"),
        ExprKind::Int(n) => writeln!(out, "{pad}Int {n}"),
        ExprKind::Float(x) => writeln!(out, "{pad}Float {x:?}"),
        ExprKind::Str(s) => writeln!(out, "{pad}Str {s:?}"),
        ExprKind::Char(c) => writeln!(out, "{pad}Char {c:?}"),
        ExprKind::Bool(b) => writeln!(out, "{pad}Bool {b}"),
        ExprKind::Unit => writeln!(out, "{pad}Unit"),
        ExprKind::List(items) => {
            writeln!(out, "{pad}List")?;
            children(out, items, depth)
        }
        ExprKind::Index { target, index } => {
            writeln!(out, "{pad}Index")?;
            children(out, [target.as_ref(), index.as_ref()], depth)
        }
        ExprKind::Slice { target, start, end } => {
            writeln!(out, "{pad}Slice")?;
            write_expr(out, target, depth + 1)?;
            for bound in [start, end] {
                match bound {
                    Some(bound) => write_expr(out, bound, depth + 1)?,
                    None => writeln!(out, "{pad}  Open")?,
                }
            }
            Ok(())
        }
        ExprKind::Prefix { operand, .. } => {
            writeln!(out, "{pad}Prefix -")?;
            children(out, [operand.as_ref()], depth)
        }
        ExprKind::Infix { op, lhs, rhs } => {
            writeln!(out, "{pad}Infix {op}")?;
            children(out, [lhs.as_ref(), rhs.as_ref()], depth)
        }
        ExprKind::Call { callee, args } => {
            writeln!(out, "{pad}Call")?;
            children(out, std::iter::once(callee.as_ref()).chain(args), depth)
        }
        ExprKind::VarDecl(decl) => declaration(out, "VarDecl", decl, depth),
        ExprKind::FnDecl(decl) => declaration(out, "FnDecl", decl, depth),
        ExprKind::FnLit { params, body } => {
            let params: Vec<String> = params
                .iter()
                .map(|p| match &p.annotation {
                    Some(ty) => format!("{}: {ty}", p.name),
                    None => p.name.clone(),
                })
                .collect();
            writeln!(out, "{pad}Fn({})", params.join(", "))?;
            children(out, [body.as_ref()], depth)
        }
        ExprKind::Block(exprs) => {
            writeln!(out, "{pad}Block")?;
            children(out, exprs, depth)
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            writeln!(out, "{pad}If")?;
            children(
                out,
                [cond.as_ref(), then_branch.as_ref(), else_branch.as_ref()],
                depth,
            )
        }
        ExprKind::Import(name) => writeln!(out, "{pad}Import {name}"),
        ExprKind::Match { scrutinee, arms } => {
            writeln!(out, "{pad}Match")?;
            write_expr(out, scrutinee, depth + 1)?;
            for arm in arms {
                match_arm(out, arm, depth + 1)?;
            }
            Ok(())
        }
    }
}

fn children<'a>(
    out: &mut String,
    exprs: impl IntoIterator<Item = &'a Expr>,
    depth: usize,
) -> fmt::Result {
    for expr in exprs {
        write_expr(out, expr, depth + 1)?;
    }
    Ok(())
}

fn declaration(out: &mut String, label: &str, decl: &Decl, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    let rec = if decl.recursive { "rec " } else { "" };
    match &decl.annotation {
        Some(ty) => writeln!(out, "{pad}{label} {rec}{}: {ty}", decl.name)?,
        None => writeln!(out, "{pad}{label} {rec}{}", decl.name)?,
    }
    write_expr(out, &decl.value, depth + 1)
}

fn match_arm(out: &mut String, arm: &MatchArm, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    writeln!(out, "{pad}Arm {}", arm.pattern)?;
    if let Some(guard) = &arm.guard {
        writeln!(out, "{pad}  When")?;
        write_expr(out, guard, depth + 2)?;
    }
    write_expr(out, &arm.body, depth + 1)
}
