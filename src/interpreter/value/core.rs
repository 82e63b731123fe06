use std::rc::Rc;

use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::{
        evaluator::{builtin::BuiltinDef, core::EvalResult},
        value::function::Closure,
    },
    util::position::Position,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible values that variables can hold and
/// expressions can produce. Values are cheap to clone: strings and functions
/// are reference counted.
#[derive(Debug, Clone)]
pub enum Value {
    /// A numeric value (double precision floating-point).
    Number(f64),
    /// An immutable string.
    String(Rc<str>),
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// The absence of a value. Produced by `nil`, declarations without an
    /// initializer and functions that do not return a value.
    Nil,
    /// A user-defined function together with its captured environment.
    Function(Rc<Closure>),
    /// A native function provided by the interpreter.
    Builtin(&'static BuiltinDef),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Number(n) => Self::Number(*n),
            LiteralValue::String(s) => Self::from(s.as_str()),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Nil => Self::Nil,
        }
    }
}

impl Value {
    /// Whether the value counts as true in a condition.
    ///
    /// `nil` and `false` are falsy; every other value, including `0` and the
    /// empty string, is truthy.
    ///
    /// # Example
    /// ```
    /// use sprig::interpreter::value::core::Value;
    ///
    /// assert!(!Value::Nil.is_truthy());
    /// assert!(!Value::Bool(false).is_truthy());
    /// assert!(Value::Number(0.0).is_truthy());
    /// assert!(Value::from("").is_truthy());
    /// ```
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// The name of the value's type, as reported by `type()` and in error
    /// messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Nil => "nil",
            Self::Function(_) | Self::Builtin(_) => "function",
        }
    }

    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// # Parameters
    /// - `context`: What needed the number, used in the error message.
    /// - `position`: Source position for error reporting.
    ///
    /// # Errors
    /// `TypeMismatch` for every non-number value.
    pub fn as_number(&self, context: &str, position: Position) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(RuntimeError::TypeMismatch { details: format!("{context} must be a number, found {}",
                                                                       other.type_name()),
                                                      position }),
        }
    }
}

impl PartialEq for Value {
    /// Functions compare by identity, everything else by value. Values of
    /// different kinds are never equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Nil, Self::Nil) => true,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nil => write!(f, "nil"),
            Self::Function(closure) => write!(f, "<fn {}>", closure.name()),
            Self::Builtin(builtin) => write!(f, "<builtin fn {}>", builtin.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::evaluator::builtin::lookup_builtin;

    #[test]
    fn numbers_render_without_trailing_zeros() {
        assert_eq!(Value::Number(14.0).to_string(), "14");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
    }

    #[test]
    fn strings_render_without_quotes() {
        assert_eq!(Value::from("hello").to_string(), "hello");
    }

    #[test]
    fn values_of_different_kinds_are_never_equal() {
        assert_ne!(Value::Number(0.0), Value::Bool(false));
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_ne!(Value::from("1"), Value::Number(1.0));
    }

    #[test]
    fn builtins_compare_and_render_by_name() {
        let len = lookup_builtin("len").unwrap();
        assert_eq!(Value::Builtin(len), Value::Builtin(len));
        assert_eq!(Value::Builtin(len).to_string(), "<builtin fn len>");
        assert_eq!(Value::Builtin(len).type_name(), "function");
    }

    #[test]
    fn as_number_reports_the_found_type() {
        assert_eq!(Value::Nil.as_number("operand", Position::new(2, 4)),
                   Err(RuntimeError::TypeMismatch { details:  "operand must be a number, found nil".to_string(),
                                                    position: Position::new(2, 4), }));
    }
}
