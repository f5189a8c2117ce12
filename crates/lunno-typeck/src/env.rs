//! Lexical scopes mapping names to type schemes.
//!
//! Scopes nest strictly (function bodies, blocks, match arms, the temporary
//! scope holding a `let rec` name), so the chain is kept as a stack: the
//! parent of each frame is the frame below it. Lookups walk from the
//! innermost frame toward the global one.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ty::{Scheme, TyVar};
use crate::unify::{apply, Subst};

pub struct TypeEnv {
    /// Frame 0 is the global scope and is never popped.
    frames: Vec<FxHashMap<String, Scheme>>,
}

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Leave the innermost scope. The global scope is kept.
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind `name` in the innermost scope, shadowing outer bindings.
    pub fn insert(&mut self, name: String, scheme: Scheme) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, scheme);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Whether we are at top level (no nested scope open).
    pub fn is_global(&self) -> bool {
        self.frames.len() == 1
    }

    /// Type variables free anywhere in the environment under `subst`.
    ///
    /// A scheme's own quantified variables are not free.
    pub fn free_vars(&self, subst: &Subst) -> FxHashSet<TyVar> {
        let mut free = FxHashSet::default();
        for scheme in self.frames.iter().flat_map(|frame| frame.values()) {
            let ty = apply(&scheme.ty, subst);
            free.extend(
                ty.free_vars()
                    .into_iter()
                    .filter(|v| !scheme.vars.contains(v)),
            );
        }
        free
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
