use std::rc::Rc;

use crate::{ast::FunctionDef, interpreter::environment::Environment};

/// A user-defined function value.
///
/// A closure pairs the shared declaration with the environment that was
/// current when the declaration executed. Calls run the body in a fresh scope
/// whose parent is that environment, so the function keeps seeing the
/// variables it was declared next to after their scope has been left.
///
/// A closure declared in a scope is itself stored in that scope, which forms
/// an `Rc` cycle. Blocks, calls and session resets break it on exit with
/// [`Environment::release_if_unreachable`]. A cycle that is still reachable
/// at that point, for instance through a returned closure, is kept.
pub struct Closure {
    /// The declaration, shared with the AST.
    pub def: Rc<FunctionDef>,
    /// The environment captured at declaration time.
    pub env: Rc<Environment>,
}

impl Closure {
    /// Creates a closure over `env`.
    #[must_use]
    pub const fn new(def: Rc<FunctionDef>, env: Rc<Environment>) -> Self {
        Self { def, env }
    }

    /// The declared name of the function.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// The number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.def.params.len()
    }
}

// The captured environment usually contains the closure itself.
impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
         .field("name", &self.def.name)
         .field("params", &self.def.params)
         .finish_non_exhaustive()
    }
}
