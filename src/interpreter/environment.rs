use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::position::Position,
};

/// A scope mapping names to values, chained to its enclosing scope.
///
/// Scopes are shared through `Rc`: a block or call frame holds its scope
/// while it runs and closures hold the scope they were declared in for as
/// long as they live. Bindings are mutated in place through a `RefCell`, so
/// every holder observes assignments.
///
/// The parent chain is built only by [`Environment::with_parent`] and is
/// therefore acyclic. Its length equals the lexical nesting depth.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use sprig::interpreter::{environment::Environment, value::core::Value};
///
/// let globals = Rc::new(Environment::global());
/// globals.define("x", Value::Number(1.0));
///
/// let local = Environment::with_parent(Rc::clone(&globals));
/// local.define("x", Value::Number(2.0));
///
/// assert_eq!(local.get("x"), Some(Value::Number(2.0)));
/// assert_eq!(globals.get("x"), Some(Value::Number(1.0)));
/// ```
#[derive(Debug, Default)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent:   Option<Rc<Environment>>,
}

impl Environment {
    /// Creates an empty outermost scope.
    #[must_use]
    pub fn global() -> Self {
        Self::default()
    }

    /// Creates an empty scope nested in `parent`.
    #[must_use]
    pub fn with_parent(parent: Rc<Self>) -> Self {
        Self { bindings: RefCell::default(),
               parent:   Some(parent), }
    }

    /// The enclosing scope, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Binds `name` in this scope.
    ///
    /// A binding of the same name in this scope is replaced; bindings in
    /// enclosing scopes are shadowed, not touched.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Updates the nearest existing binding of `name`.
    ///
    /// # Errors
    /// `UndeclaredAssignment` if no enclosing scope binds `name`. Nothing is
    /// created in that case.
    pub fn assign(&self, name: &str, value: Value, position: Position) -> EvalResult<()> {
        let mut scope = self;
        loop {
            if let Some(slot) = scope.bindings.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            match scope.parent.as_deref() {
                Some(parent) => scope = parent,
                None => {
                    return Err(RuntimeError::UndeclaredAssignment { name: name.to_string(),
                                                                    position });
                },
            }
        }
    }

    /// Reads the nearest binding of `name`.
    ///
    /// # Errors
    /// `UndefinedVariable` if no enclosing scope binds `name`.
    pub fn lookup(&self, name: &str, position: Position) -> EvalResult<Value> {
        self.get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             position })
    }

    /// Reads the nearest binding of `name`, if there is one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            scope = scope.parent.as_deref()?;
        }
    }

    /// Number of scopes in the chain, counting this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        std::iter::successors(Some(self), |scope| scope.parent.as_deref()).count()
    }

    /// Drops every binding of this scope if nothing outside the scope can
    /// still reach it.
    ///
    /// A function declared in a scope is bound in that scope and captures it,
    /// so the two keep each other alive. When the only strong references to
    /// the scope are `self` and such functions, and the functions themselves
    /// are referenced only by their bindings here, the cycle is unreachable
    /// and is broken by clearing the bindings.
    ///
    /// Returns whether the bindings were dropped.
    pub fn release_if_unreachable(self: &Rc<Self>) -> bool {
        let captured_only_here = self.bindings
                                     .borrow()
                                     .values()
                                     .filter(|value| {
                                         matches!(value, Value::Function(closure)
                                             if Rc::ptr_eq(&closure.env, self)
                                                && Rc::strong_count(closure) == 1)
                                     })
                                     .count();
        if Rc::strong_count(self) != 1 + captured_only_here {
            return false;
        }

        // Taken out first: dropping the functions must not happen while the
        // bindings are borrowed.
        let released = std::mem::take(&mut *self.bindings.borrow_mut());
        drop(released);
        true
    }

    /// The names bound directly in this scope, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
