//! Type representation for the Lunno type system.
//!
//! Defines the inference-time `Ty` enum, type variables (`TyVar`), and
//! polymorphic type schemes (`Scheme`). These are the values Hindley-Milner
//! inference manipulates.

use std::fmt;

use rustc_hash::FxHashSet;

/// A type variable. Ids come from a per-run counter and are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVar(pub u32);

impl fmt::Display for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// The primitive types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BaseTy {
    Int,
    Float,
    Bool,
    String,
    Char,
    Unit,
}

impl BaseTy {
    /// Resolve a primitive type name as written in annotations.
    pub fn from_name(name: &str) -> Option<BaseTy> {
        match name {
            "int" => Some(BaseTy::Int),
            "float" => Some(BaseTy::Float),
            "bool" => Some(BaseTy::Bool),
            "string" => Some(BaseTy::String),
            "char" => Some(BaseTy::Char),
            "unit" => Some(BaseTy::Unit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseTy::Int => "int",
            BaseTy::Float => "float",
            BaseTy::Bool => "bool",
            BaseTy::String => "string",
            BaseTy::Char => "char",
            BaseTy::Unit => "unit",
        }
    }
}

/// A Lunno type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    /// An inference variable, resolved through the substitution.
    Var(TyVar),
    Base(BaseTy),
    List(Box<Ty>),
    /// A function type: `fn(params) -> ret`.
    Fun(Vec<Ty>, Box<Ty>),
}

impl Ty {
    pub fn int() -> Ty {
        Ty::Base(BaseTy::Int)
    }

    pub fn float() -> Ty {
        Ty::Base(BaseTy::Float)
    }

    pub fn bool() -> Ty {
        Ty::Base(BaseTy::Bool)
    }

    pub fn string() -> Ty {
        Ty::Base(BaseTy::String)
    }

    pub fn char() -> Ty {
        Ty::Base(BaseTy::Char)
    }

    pub fn unit() -> Ty {
        Ty::Base(BaseTy::Unit)
    }

    pub fn list(elem: Ty) -> Ty {
        Ty::List(Box::new(elem))
    }

    pub fn fun(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Fun(params, Box::new(ret))
    }

    /// Collect the type variables in this type, in first-occurrence order.
    pub fn vars_in_order(&self, out: &mut Vec<TyVar>) {
        match self {
            Ty::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Ty::Base(_) => {}
            Ty::List(elem) => elem.vars_in_order(out),
            Ty::Fun(params, ret) => {
                for param in params {
                    param.vars_in_order(out);
                }
                ret.vars_in_order(out);
            }
        }
    }

    pub fn free_vars(&self) -> FxHashSet<TyVar> {
        let mut vars = Vec::new();
        self.vars_in_order(&mut vars);
        vars.into_iter().collect()
    }

    pub fn contains_var(&self, var: TyVar) -> bool {
        match self {
            Ty::Var(v) => *v == var,
            Ty::Base(_) => false,
            Ty::List(elem) => elem.contains_var(var),
            Ty::Fun(params, ret) => {
                params.iter().any(|p| p.contains_var(var)) || ret.contains_var(var)
            }
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Var(v) => write!(f, "{v}"),
            Ty::Base(base) => f.write_str(base.name()),
            Ty::List(elem) => write!(f, "list({elem})"),
            Ty::Fun(params, ret) => {
                f.write_str("fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
        }
    }
}

/// A polymorphic type scheme: `forall vars. ty`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheme {
    pub vars: Vec<TyVar>,
    pub ty: Ty,
}

impl Scheme {
    /// A scheme with no quantified variables.
    pub fn mono(ty: Ty) -> Self {
        Scheme {
            vars: Vec::new(),
            ty,
        }
    }

    pub fn is_mono(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vars.is_empty() {
            return write!(f, "{}", self.ty);
        }
        f.write_str("forall")?;
        for var in &self.vars {
            write!(f, " {var}")?;
        }
        write!(f, ". {}", self.ty)
    }
}
