//! Abstract syntax tree for Lunno programs.
//!
//! Every node category is a closed enum, so consumers (the type checker,
//! the AST dump, editor tooling) match exhaustively. Each expression keeps a
//! copy of the token that introduced it for diagnostics.

use std::fmt;

use lunno_common::Token;

/// A whole source unit: an ordered sequence of top-level expressions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
}

impl Expr {
    pub fn new(kind: ExprKind, token: Token) -> Self {
        Self { kind, token }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Atoms ──────────────────────────────────────────────────────────
    Ident(String),
    Int(i64),
    Float(f64),
    /// Escape-decoded string contents.
    Str(String),
    Char(char),
    Bool(bool),
    Unit,
    /// `[a, b, c]`; `nil` is the empty list.
    List(Vec<Expr>),

    // ── Operators ──────────────────────────────────────────────────────
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// `target[start:end]` with either bound optional.
    Slice {
        target: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
    },
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Infix {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    // ── Declarations ───────────────────────────────────────────────────
    /// `let` whose value is not a function literal.
    VarDecl(Decl),
    /// `let` whose value is a function literal.
    FnDecl(Decl),
    FnLit {
        params: Vec<Param>,
        body: Box<Expr>,
    },

    // ── Compound forms ─────────────────────────────────────────────────
    /// Two or more expressions in braces. Shorter blocks collapse while parsing.
    Block(Vec<Expr>),
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Import(String),
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
}

/// The shared shape of variable and function declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    pub recursive: bool,
    pub annotation: Option<TypeExpr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<TypeExpr>,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

/// Type annotations as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A bare name: a primitive like `int` or a user identifier.
    Simple { name: String, token: Token },
    /// `list(T)` or `[T]`.
    List(Box<TypeExpr>),
    /// `fn(T1, T2) -> R`; a missing return type means `unit`.
    Fn {
        params: Vec<TypeExpr>,
        ret: Option<Box<TypeExpr>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Wildcard(Token),
    Bind(String, Token),
    /// An int, float, string, char or bool literal expression.
    Literal(Expr),
    List(Vec<Pattern>, Token),
    Nil(Token),
}

impl Pattern {
    pub fn token(&self) -> &Token {
        match self {
            Pattern::Wildcard(tok) | Pattern::Bind(_, tok) | Pattern::Nil(tok) => tok,
            Pattern::List(_, tok) => tok,
            Pattern::Literal(expr) => &expr.token,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Neg,
}

/// Binary operators, including `:` (list cons).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Cons,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Binding precedence, low to high. All operators are left-associative.
    pub const fn precedence(self) -> u8 {
        match self {
            BinOp::Cons => 1,
            BinOp::Eq | BinOp::NotEq => 2,
            BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => 3,
            BinOp::Add | BinOp::Sub => 4,
            BinOp::Mul | BinOp::Div => 5,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            BinOp::Cons => ":",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Simple { name, .. } => f.write_str(name),
            TypeExpr::List(elem) => write!(f, "list({elem})"),
            TypeExpr::Fn { params, ret } => {
                f.write_str("fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                f.write_str(")")?;
                match ret {
                    Some(ret) => write!(f, " -> {ret}"),
                    None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Wildcard(_) => f.write_str("_"),
            Pattern::Bind(name, _) => f.write_str(name),
            Pattern::Literal(expr) => match &expr.kind {
                ExprKind::Int(n) => write!(f, "{n}"),
                ExprKind::Float(x) => write!(f, "{x:?}"),
                ExprKind::Str(s) => write!(f, "{s:?}"),
                ExprKind::Char(c) => write!(f, "{c:?}"),
                ExprKind::Bool(b) => write!(f, "{b}"),
                _ => f.write_str(&expr.token.lexeme),
            },
            Pattern::List(items, _) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Pattern::Nil(_) => f.write_str("nil"),
        }
    }
}
