//! Algorithm W over the Lunno AST.
//!
//! [`Checker`] walks each expression, assigning it a type and unifying
//! constraints as it goes. Errors never abort the walk: a failing rule
//! records its error and returns a placeholder type (usually a fresh
//! variable) so one mistake does not cascade into unrelated reports.

use log::trace;
use lunno_common::Span;
use lunno_parser::ast::{BinOp, Decl, Expr, ExprKind, MatchArm, Param, Pattern, PrefixOp, TypeExpr};

use crate::builtins::register_builtins;
use crate::env::TypeEnv;
use crate::error::TypeError;
use crate::ty::{BaseTy, Scheme, Ty};
use crate::unify::InferCtx;

pub(crate) struct Checker {
    pub(crate) ctx: InferCtx,
    pub(crate) env: TypeEnv,
    /// Top-level declarations in source order.
    pub(crate) globals: Vec<(String, Scheme)>,
    /// The type of every checked expression, keyed by its token's span.
    pub(crate) types: Vec<(Span, Ty)>,
}

impl Checker {
    pub(crate) fn new() -> Self {
        let mut ctx = InferCtx::new();
        let mut env = TypeEnv::new();
        register_builtins(&mut ctx, &mut env);
        Checker {
            ctx,
            env,
            globals: Vec::new(),
            types: Vec::new(),
        }
    }

    pub(crate) fn infer(&mut self, expr: &Expr) -> Ty {
        let ty = self.infer_kind(expr);
        self.types.push((expr.token.span.clone(), ty.clone()));
        ty
    }

    fn infer_kind(&mut self, expr: &Expr) -> Ty {
        let span = &expr.token.span;
        match &expr.kind {
            ExprKind::Int(_) => Ty::int(),
            ExprKind::Float(_) => Ty::float(),
            ExprKind::Str(_) => Ty::string(),
            ExprKind::Char(_) => Ty::char(),
            ExprKind::Bool(_) => Ty::bool(),
            ExprKind::Unit | ExprKind::Import(_) => Ty::unit(),

            ExprKind::Ident(name) => match self.env.lookup(name).cloned() {
                Some(scheme) => self.ctx.instantiate(&scheme),
                None => {
                    self.ctx.errors.push(TypeError::UndefinedIdentifier {
                        name: name.clone(),
                        span: span.clone(),
                    });
                    self.ctx.fresh_var()
                }
            },

            ExprKind::List(items) => {
                let elem = self.ctx.fresh_var();
                for item in items {
                    let ty = self.infer(item);
                    self.ctx.unify(&elem, &ty, &item.token.span);
                }
                Ty::list(self.ctx.apply(&elem))
            }

            ExprKind::Index { target, index } => {
                let elem = self.expect_list(target);
                self.expect_int(index);
                elem
            }

            ExprKind::Slice { target, start, end } => {
                let elem = self.expect_list(target);
                for bound in [start, end].into_iter().flatten() {
                    self.expect_int(bound);
                }
                Ty::list(elem)
            }

            ExprKind::Prefix {
                op: PrefixOp::Neg,
                operand,
            } => {
                let ty = self.infer(operand);
                self.expect_numeric("-", &ty, span, false)
            }

            ExprKind::Infix { op, lhs, rhs } => self.infer_infix(*op, lhs, rhs, span),

            ExprKind::Call { callee, args } => self.infer_call(callee, args, span),

            ExprKind::VarDecl(decl) | ExprKind::FnDecl(decl) => {
                self.check_decl(decl, span);
                Ty::unit()
            }

            ExprKind::FnLit { params, body } => self.infer_fn(params, body),

            ExprKind::Block(exprs) => {
                self.env.push_scope();
                let mut last = Ty::unit();
                for expr in exprs {
                    last = self.infer(expr);
                }
                self.env.pop_scope();
                last
            }

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_ty = self.infer(cond);
                if self.ctx.try_unify(&Ty::bool(), &cond_ty).is_err() {
                    let found = self.ctx.apply(&cond_ty);
                    self.ctx.errors.push(TypeError::NonBoolCondition {
                        found,
                        span: cond.token.span.clone(),
                    });
                }
                let then_ty = self.infer(then_branch);
                let else_ty = self.infer(else_branch);
                self.ctx.unify(&then_ty, &else_ty, &else_branch.token.span);
                self.ctx.apply(&then_ty)
            }

            ExprKind::Match { scrutinee, arms } => self.infer_match(scrutinee, arms),
        }
    }

    // ── Declarations and functions ─────────────────────────────────────

    /// Check a `let`, then bind its generalized type in the enclosing scope.
    fn check_decl(&mut self, decl: &Decl, span: &Span) {
        let annotation = decl.annotation.as_ref().map(|t| self.resolve_type(t));

        // A recursive name is visible, monomorphically, inside its own value.
        let self_ty = if decl.recursive {
            let ty = annotation.clone().unwrap_or_else(|| self.ctx.fresh_var());
            self.env.push_scope();
            self.env.insert(decl.name.clone(), Scheme::mono(ty.clone()));
            Some(ty)
        } else {
            None
        };

        let value_ty = self.infer(&decl.value);

        if self_ty.is_some() {
            self.env.pop_scope();
        }
        // An annotated recursive binding already uses the annotation as its
        // own type, so the value is unified against it once.
        if let Some(expected) = annotation.or(self_ty) {
            self.ctx.unify(&expected, &value_ty, &decl.value.token.span);
        }

        let scheme = self.ctx.generalize(&self.env, &value_ty);
        trace!("{}: bound {} : {}", span, decl.name, scheme);
        if self.env.is_global() {
            self.globals.push((decl.name.clone(), scheme.clone()));
        }
        self.env.insert(decl.name.clone(), scheme);
    }

    fn infer_fn(&mut self, params: &[Param], body: &Expr) -> Ty {
        self.env.push_scope();
        let mut param_tys = Vec::with_capacity(params.len());
        for param in params {
            let ty = match &param.annotation {
                Some(annotation) => self.resolve_type(annotation),
                None => self.ctx.fresh_var(),
            };
            self.env.insert(param.name.clone(), Scheme::mono(ty.clone()));
            param_tys.push(ty);
        }
        let ret = self.infer(body);
        self.env.pop_scope();
        let params = param_tys.iter().map(|t| self.ctx.apply(t)).collect();
        Ty::fun(params, self.ctx.apply(&ret))
    }

    fn infer_call(&mut self, callee: &Expr, args: &[Expr], span: &Span) -> Ty {
        let callee_ty = self.infer(callee);
        let arg_tys: Vec<Ty> = args.iter().map(|arg| self.infer(arg)).collect();

        match self.ctx.apply(&callee_ty) {
            Ty::Fun(params, ret) if params.len() == args.len() => {
                for ((param, arg_ty), arg) in params.iter().zip(&arg_tys).zip(args) {
                    self.ctx.unify(param, arg_ty, &arg.token.span);
                }
                self.ctx.apply(&ret)
            }
            Ty::Fun(params, _) => {
                self.ctx.errors.push(TypeError::ArityMismatch {
                    expected: params.len(),
                    found: args.len(),
                    span: span.clone(),
                });
                self.ctx.fresh_var()
            }
            Ty::Var(_) => {
                let ret = self.ctx.fresh_var();
                self.ctx
                    .unify(&callee_ty, &Ty::fun(arg_tys, ret.clone()), span);
                self.ctx.apply(&ret)
            }
            other => {
                self.ctx.errors.push(TypeError::NotAFunction {
                    ty: other,
                    span: span.clone(),
                });
                self.ctx.fresh_var()
            }
        }
    }

    // ── Operators ──────────────────────────────────────────────────────

    fn infer_infix(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, span: &Span) -> Ty {
        let lhs_ty = self.infer(lhs);
        let rhs_ty = self.infer(rhs);

        if op == BinOp::Cons {
            let list = Ty::list(lhs_ty);
            self.ctx.unify(&list, &rhs_ty, &rhs.token.span);
            return self.ctx.apply(&list);
        }

        self.ctx.unify(&lhs_ty, &rhs_ty, &rhs.token.span);
        if op.is_arithmetic() {
            return self.expect_numeric(op.symbol(), &lhs_ty, span, op == BinOp::Add);
        }

        let operand = self.ctx.apply(&lhs_ty);
        let ordered = matches!(
            operand,
            Ty::Var(_)
                | Ty::Base(BaseTy::Int | BaseTy::Float | BaseTy::Char | BaseTy::String)
        );
        if op.is_comparison() && !matches!(op, BinOp::Eq | BinOp::NotEq) && !ordered {
            self.ctx.errors.push(TypeError::InvalidOperand {
                op: op.symbol().to_string(),
                ty: operand,
                span: span.clone(),
            });
        }
        Ty::bool()
    }

    /// Require an int or float operand (or string, for `+`).
    ///
    /// An unconstrained operand defaults to int.
    fn expect_numeric(&mut self, op: &str, ty: &Ty, span: &Span, allow_string: bool) -> Ty {
        match self.ctx.apply(ty) {
            Ty::Var(_) => {
                self.ctx.unify(&Ty::int(), ty, span);
                Ty::int()
            }
            resolved @ Ty::Base(BaseTy::Int | BaseTy::Float) => resolved,
            resolved @ Ty::Base(BaseTy::String) if allow_string => resolved,
            resolved => {
                self.ctx.errors.push(TypeError::InvalidOperand {
                    op: op.to_string(),
                    ty: resolved.clone(),
                    span: span.clone(),
                });
                resolved
            }
        }
    }

    /// Infer `target` as a list and return its element type.
    fn expect_list(&mut self, target: &Expr) -> Ty {
        let target_ty = self.infer(target);
        let elem = self.ctx.fresh_var();
        self.ctx
            .unify(&Ty::list(elem.clone()), &target_ty, &target.token.span);
        self.ctx.apply(&elem)
    }

    fn expect_int(&mut self, expr: &Expr) {
        let ty = self.infer(expr);
        self.ctx.unify(&Ty::int(), &ty, &expr.token.span);
    }

    // ── Match ──────────────────────────────────────────────────────────

    fn infer_match(&mut self, scrutinee: &Expr, arms: &[MatchArm]) -> Ty {
        let scrutinee_ty = self.infer(scrutinee);
        let result = self.ctx.fresh_var();
        for arm in arms {
            self.env.push_scope();
            self.bind_pattern(&arm.pattern, &scrutinee_ty);
            if let Some(guard) = &arm.guard {
                let guard_ty = self.infer(guard);
                if self.ctx.try_unify(&Ty::bool(), &guard_ty).is_err() {
                    let found = self.ctx.apply(&guard_ty);
                    self.ctx.errors.push(TypeError::NonBoolGuard {
                        found,
                        span: guard.token.span.clone(),
                    });
                }
            }
            let body_ty = self.infer(&arm.body);
            self.ctx.unify(&result, &body_ty, &arm.body.token.span);
            self.env.pop_scope();
        }
        self.ctx.apply(&result)
    }

    /// Check `pattern` against `expected`, binding names in the current scope.
    fn bind_pattern(&mut self, pattern: &Pattern, expected: &Ty) {
        match pattern {
            Pattern::Wildcard(_) => {}
            Pattern::Bind(name, _) => {
                let ty = self.ctx.apply(expected);
                self.env.insert(name.clone(), Scheme::mono(ty));
            }
            Pattern::Literal(expr) => {
                let ty = self.infer(expr);
                self.ctx.unify(expected, &ty, &expr.token.span);
            }
            Pattern::List(items, token) => {
                let elem = self.ctx.fresh_var();
                self.ctx
                    .unify(expected, &Ty::list(elem.clone()), &token.span);
                for item in items {
                    self.bind_pattern(item, &elem);
                }
            }
            Pattern::Nil(token) => {
                let elem = self.ctx.fresh_var();
                self.ctx.unify(expected, &Ty::list(elem), &token.span);
            }
        }
    }

    // ── Annotations ────────────────────────────────────────────────────

    /// Convert an annotation to a type. Unknown names are reported and
    /// replaced by a fresh variable.
    pub(crate) fn resolve_type(&mut self, ty: &TypeExpr) -> Ty {
        match ty {
            TypeExpr::Simple { name, token } => match BaseTy::from_name(name) {
                Some(base) => Ty::Base(base),
                None => {
                    self.ctx.errors.push(TypeError::UnknownType {
                        name: name.clone(),
                        span: token.span.clone(),
                    });
                    self.ctx.fresh_var()
                }
            },
            TypeExpr::List(elem) => Ty::list(self.resolve_type(elem)),
            TypeExpr::Fn { params, ret } => {
                let params = params.iter().map(|p| self.resolve_type(p)).collect();
                let ret = match ret {
                    Some(ret) => self.resolve_type(ret),
                    None => Ty::unit(),
                };
                Ty::fun(params, ret)
            }
        }
    }
}
