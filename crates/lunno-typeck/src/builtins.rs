//! Built-in bindings seeded into the global scope.

use crate::env::TypeEnv;
use crate::ty::Ty;
use crate::unify::InferCtx;

/// Names of every built-in, for editor completion.
pub const BUILTINS: &[&str] = &["print"];

/// Register the built-ins.
///
/// Each signature is built from fresh variables and generalized like a user
/// `let`, so `print` is `forall a. fn(a) -> unit`.
pub fn register_builtins(ctx: &mut InferCtx, env: &mut TypeEnv) {
    let a = ctx.fresh_var();
    let print = ctx.generalize(env, &Ty::fun(vec![a], Ty::unit()));
    env.insert("print".into(), print);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_is_polymorphic() {
        let mut ctx = InferCtx::new();
        let mut env = TypeEnv::new();
        register_builtins(&mut ctx, &mut env);

        let scheme = env.lookup("print").cloned().expect("print registered");
        assert_eq!(scheme.vars.len(), 1);
        assert_eq!(scheme.to_string(), "forall ?0. fn(?0) -> unit");
    }

    #[test]
    fn builtin_list_matches_registration() {
        let mut ctx = InferCtx::new();
        let mut env = TypeEnv::new();
        register_builtins(&mut ctx, &mut env);
        for name in BUILTINS {
            assert!(env.lookup(name).is_some(), "{name} not registered");
        }
    }
}
