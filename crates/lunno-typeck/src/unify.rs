//! Substitution-based unification for Hindley-Milner inference.
//!
//! A [`Subst`] maps type variables to the types they stand for. It is built
//! incrementally by [`unify`] during one checking run and threaded through
//! every call by `&mut`. [`InferCtx`] owns the substitution for a run along
//! with the fresh-variable counter and the collected errors.

use lunno_common::Span;
use rustc_hash::FxHashMap;

use crate::env::TypeEnv;
use crate::error::TypeError;
use crate::ty::{Scheme, Ty, TyVar};

/// Bindings from type variables to types.
pub type Subst = FxHashMap<TyVar, Ty>;

/// Why two types failed to unify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnifyError {
    /// Structurally incompatible types (the innermost clashing pair).
    Mismatch(Ty, Ty),
    /// Two function types with different parameter counts.
    Arity { expected: usize, found: usize },
    /// Binding the variable would make the type contain itself.
    Occurs(TyVar, Ty),
}

/// Follow variable bindings until reaching a non-variable or an unbound one.
fn shallow_resolve(ty: &Ty, subst: &Subst) -> Ty {
    let mut ty = ty;
    while let Ty::Var(v) = ty {
        match subst.get(v) {
            Some(bound) => ty = bound,
            None => break,
        }
    }
    ty.clone()
}

/// Resolve every variable in `ty` through `subst`, chasing transitively.
///
/// The result contains only unbound variables, so applying it again is a
/// no-op.
pub fn apply(ty: &Ty, subst: &Subst) -> Ty {
    match ty {
        Ty::Var(v) => match subst.get(v) {
            Some(bound) => apply(bound, subst),
            None => ty.clone(),
        },
        Ty::Base(_) => ty.clone(),
        Ty::List(elem) => Ty::list(apply(elem, subst)),
        Ty::Fun(params, ret) => Ty::fun(
            params.iter().map(|p| apply(p, subst)).collect(),
            apply(ret, subst),
        ),
    }
}

/// Make `a` and `b` equal by extending `subst`.
///
/// On failure the bindings made before the clash stay in place; callers
/// keep checking with that partial substitution.
pub fn unify(a: &Ty, b: &Ty, subst: &mut Subst) -> Result<(), UnifyError> {
    let a = shallow_resolve(a, subst);
    let b = shallow_resolve(b, subst);
    match (a, b) {
        (Ty::Var(x), Ty::Var(y)) if x == y => Ok(()),
        (Ty::Var(v), other) | (other, Ty::Var(v)) => bind(v, other, subst),
        (Ty::Base(x), Ty::Base(y)) if x == y => Ok(()),
        (Ty::List(x), Ty::List(y)) => unify(&x, &y, subst),
        (Ty::Fun(p1, r1), Ty::Fun(p2, r2)) => {
            if p1.len() != p2.len() {
                return Err(UnifyError::Arity {
                    expected: p1.len(),
                    found: p2.len(),
                });
            }
            for (x, y) in p1.iter().zip(&p2) {
                unify(x, y, subst)?;
            }
            unify(&r1, &r2, subst)
        }
        (a, b) => Err(UnifyError::Mismatch(a, b)),
    }
}

fn bind(var: TyVar, ty: Ty, subst: &mut Subst) -> Result<(), UnifyError> {
    let resolved = apply(&ty, subst);
    if resolved.contains_var(var) {
        return Err(UnifyError::Occurs(var, resolved));
    }
    subst.insert(var, ty);
    Ok(())
}

/// The inference context for one checking run.
pub struct InferCtx {
    next_var: u32,
    subst: Subst,
    /// Type errors accumulated during inference.
    pub errors: Vec<TypeError>,
}

impl InferCtx {
    pub fn new() -> Self {
        InferCtx {
            next_var: 0,
            subst: Subst::default(),
            errors: Vec::new(),
        }
    }

    // ── Type Variable Creation ──────────────────────────────────────────

    pub fn fresh_var(&mut self) -> Ty {
        let var = TyVar(self.next_var);
        self.next_var += 1;
        Ty::Var(var)
    }

    // ── Resolution ──────────────────────────────────────────────────────

    pub fn apply(&self, ty: &Ty) -> Ty {
        apply(ty, &self.subst)
    }

    // ── Unification ─────────────────────────────────────────────────────

    /// Unify without reporting. For rules that word their own errors.
    pub fn try_unify(&mut self, a: &Ty, b: &Ty) -> Result<(), UnifyError> {
        unify(a, b, &mut self.subst)
    }

    /// Unify `found` against `expected`, recording a type error at `span`
    /// on failure. Returns whether unification succeeded.
    pub fn unify(&mut self, expected: &Ty, found: &Ty, span: &Span) -> bool {
        match unify(expected, found, &mut self.subst) {
            Ok(()) => true,
            Err(err) => {
                let error = match err {
                    UnifyError::Mismatch(..) => TypeError::Mismatch {
                        expected: self.apply(expected),
                        found: self.apply(found),
                        span: span.clone(),
                    },
                    UnifyError::Arity { expected, found } => TypeError::ArityMismatch {
                        expected,
                        found,
                        span: span.clone(),
                    },
                    UnifyError::Occurs(var, ty) => TypeError::InfiniteType {
                        var,
                        ty,
                        span: span.clone(),
                    },
                };
                self.errors.push(error);
                false
            }
        }
    }

    // ── Generalization and Instantiation ────────────────────────────────

    /// Quantify over the variables free in `ty` but not free in `env`.
    pub fn generalize(&self, env: &TypeEnv, ty: &Ty) -> Scheme {
        let ty = self.apply(ty);
        let env_vars = env.free_vars(&self.subst);
        let mut vars = Vec::new();
        ty.vars_in_order(&mut vars);
        vars.retain(|v| !env_vars.contains(v));
        Scheme { vars, ty }
    }

    /// Replace each quantified variable with a fresh one.
    pub fn instantiate(&mut self, scheme: &Scheme) -> Ty {
        if scheme.is_mono() {
            return scheme.ty.clone();
        }
        let mapping: Subst = scheme
            .vars
            .iter()
            .map(|v| (*v, self.fresh_var()))
            .collect();
        apply(&scheme.ty, &mapping)
    }
}

impl Default for InferCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn span() -> Span {
        Span::new(Arc::from("t.ln"), 1, 1)
    }

    fn var(n: u32) -> Ty {
        Ty::Var(TyVar(n))
    }

    #[test]
    fn unify_same_base_types() {
        let mut s = Subst::default();
        assert!(unify(&Ty::int(), &Ty::int(), &mut s).is_ok());
        assert!(s.is_empty());
    }

    #[test]
    fn unify_different_base_types_fails() {
        let mut s = Subst::default();
        assert_eq!(
            unify(&Ty::int(), &Ty::string(), &mut s),
            Err(UnifyError::Mismatch(Ty::int(), Ty::string()))
        );
    }

    #[test]
    fn unify_var_binds_without_fresh_vars() {
        let mut s = Subst::default();
        unify(&var(0), &Ty::bool(), &mut s).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(apply(&var(0), &s), Ty::bool());
    }

    #[test]
    fn unify_chases_chains() {
        let mut s = Subst::default();
        unify(&var(0), &var(1), &mut s).unwrap();
        unify(&var(1), &var(2), &mut s).unwrap();
        unify(&var(2), &Ty::char(), &mut s).unwrap();
        assert_eq!(apply(&var(0), &s), Ty::char());
        // Already equal through the chain.
        assert!(unify(&var(0), &Ty::char(), &mut s).is_ok());
    }

    #[test]
    fn unify_lists_recursively() {
        let mut s = Subst::default();
        unify(&Ty::list(var(0)), &Ty::list(Ty::float()), &mut s).unwrap();
        assert_eq!(apply(&var(0), &s), Ty::float());
        assert!(unify(&Ty::list(Ty::int()), &Ty::int(), &mut s).is_err());
    }

    #[test]
    fn unify_functions() {
        let mut s = Subst::default();
        let f = Ty::fun(vec![var(0), Ty::int()], var(1));
        let g = Ty::fun(vec![Ty::bool(), var(2)], Ty::string());
        unify(&f, &g, &mut s).unwrap();
        assert_eq!(
            apply(&f, &s),
            Ty::fun(vec![Ty::bool(), Ty::int()], Ty::string())
        );
    }

    #[test]
    fn unify_arity_mismatch() {
        let mut s = Subst::default();
        let f = Ty::fun(vec![Ty::int()], Ty::int());
        let g = Ty::fun(vec![Ty::int(), Ty::int()], var(0));
        assert_eq!(
            unify(&f, &g, &mut s),
            Err(UnifyError::Arity {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn unify_is_symmetric_in_outcome() {
        let pairs = [
            (var(0), Ty::int()),
            (Ty::list(var(0)), Ty::list(Ty::bool())),
            (Ty::int(), Ty::float()),
            (Ty::fun(vec![var(0)], var(0)), Ty::fun(vec![Ty::int()], Ty::bool())),
            (Ty::list(Ty::int()), Ty::fun(vec![], Ty::int())),
        ];
        for (a, b) in pairs {
            let mut s1 = Subst::default();
            let mut s2 = Subst::default();
            let r1 = unify(&a, &b, &mut s1);
            let r2 = unify(&b, &a, &mut s2);
            assert_eq!(r1.is_ok(), r2.is_ok(), "{a} vs {b}");
            if r1.is_ok() {
                assert_eq!(apply(&a, &s1), apply(&a, &s2));
                assert_eq!(apply(&b, &s1), apply(&b, &s2));
            }
        }
    }

    #[test]
    fn occurs_check_rejects_infinite_types() {
        let mut s = Subst::default();
        let err = unify(&var(0), &Ty::list(var(0)), &mut s).unwrap_err();
        assert!(matches!(err, UnifyError::Occurs(TyVar(0), _)));
        assert!(s.is_empty());
    }

    #[test]
    fn apply_is_idempotent() {
        let mut s = Subst::default();
        unify(&var(0), &Ty::list(var(1)), &mut s).unwrap();
        unify(&var(1), &Ty::fun(vec![var(2)], var(3)), &mut s).unwrap();
        unify(&var(3), &Ty::int(), &mut s).unwrap();
        for ty in [var(0), var(1), var(2), Ty::fun(vec![var(0)], var(3))] {
            let once = apply(&ty, &s);
            assert_eq!(apply(&once, &s), once);
        }
    }

    #[test]
    fn failed_unify_keeps_partial_bindings() {
        let mut s = Subst::default();
        let f = Ty::fun(vec![var(0), Ty::int()], Ty::unit());
        let g = Ty::fun(vec![Ty::bool(), Ty::string()], Ty::unit());
        assert!(unify(&f, &g, &mut s).is_err());
        assert_eq!(apply(&var(0), &s), Ty::bool());
    }

    #[test]
    fn ctx_records_mismatch_with_resolved_types() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        ctx.unify(&a, &Ty::int(), &span());
        assert!(!ctx.unify(&Ty::list(a), &Ty::list(Ty::bool()), &span()));
        assert_eq!(
            ctx.errors,
            vec![TypeError::Mismatch {
                expected: Ty::list(Ty::int()),
                found: Ty::list(Ty::bool()),
                span: span(),
            }]
        );
    }

    #[test]
    fn fresh_vars_are_distinct() {
        let mut ctx = InferCtx::new();
        let a = ctx.fresh_var();
        let b = ctx.fresh_var();
        assert_ne!(a, b);
    }

    #[test]
    fn generalize_and_instantiate() {
        let mut ctx = InferCtx::new();
        let env = TypeEnv::new();
        let a = ctx.fresh_var();
        let scheme = ctx.generalize(&env, &Ty::fun(vec![a.clone()], a));
        assert_eq!(scheme.vars.len(), 1);

        let inst1 = ctx.instantiate(&scheme);
        let inst2 = ctx.instantiate(&scheme);
        assert_ne!(inst1, inst2);

        // Each instance can be used at a different type.
        assert!(ctx.unify(&inst1, &Ty::fun(vec![Ty::int()], Ty::int()), &span()));
        assert!(ctx.unify(&inst2, &Ty::fun(vec![Ty::bool()], Ty::bool()), &span()));
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn generalize_skips_environment_vars() {
        let mut ctx = InferCtx::new();
        let mut env = TypeEnv::new();
        let captured = ctx.fresh_var();
        let own = ctx.fresh_var();
        env.insert("x".into(), Scheme::mono(captured.clone()));
        let scheme = ctx.generalize(&env, &Ty::fun(vec![own.clone()], captured.clone()));
        assert_eq!(scheme.vars, vec![TyVar(1)]);

        // Instantiation leaves the captured variable alone.
        let inst = ctx.instantiate(&scheme);
        match inst {
            Ty::Fun(params, ret) => {
                assert_ne!(params[0], own);
                assert_eq!(*ret, captured);
            }
            other => panic!("expected function type, got {other}"),
        }
    }
}
