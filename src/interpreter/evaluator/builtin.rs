use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::RuntimeError,
    interpreter::{environment::Environment, evaluator::core::EvalResult, value::core::Value},
    util::position::Position,
};

/// Type alias for builtin function handlers.
///
/// A builtin receives a slice of evaluated argument values and the position
/// of the call.
pub type BuiltinFn = fn(&[Value], Position) -> EvalResult<Value>;

/// A native function callable from scripts.
#[derive(Debug)]
pub struct BuiltinDef {
    /// The global name the function is bound to.
    pub name:  &'static str,
    /// The exact number of arguments the function takes.
    pub arity: usize,
    /// The implementation.
    pub func:  BuiltinFn,
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the number of arguments,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of all builtin functions, in installation order.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "clock" => { arity: 0, func: clock },
    "len"   => { arity: 1, func: len },
    "str"   => { arity: 1, func: stringify },
    "num"   => { arity: 1, func: num },
    "type"  => { arity: 1, func: type_of },
    "sqrt"  => { arity: 1, func: sqrt },
    "floor" => { arity: 1, func: |args, position| Ok(Value::Number(number_argument("floor", args, position)?.floor())) },
    "abs"   => { arity: 1, func: |args, position| Ok(Value::Number(number_argument("abs", args, position)?.abs())) },
}

/// Finds a builtin by name.
///
/// # Example
/// ```
/// use sprig::interpreter::evaluator::builtin::lookup_builtin;
///
/// assert_eq!(lookup_builtin("sqrt").map(|b| b.arity), Some(1));
/// assert!(lookup_builtin("nope").is_none());
/// ```
#[must_use]
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|builtin| builtin.name == name)
}

/// Binds every builtin in `env`.
pub fn install_builtins(env: &Environment) {
    for builtin in BUILTIN_TABLE {
        env.define(builtin.name, Value::Builtin(builtin));
    }
}

/// Returns the number of seconds since the Unix epoch.
///
/// Useful for timing scripts. A clock set before the epoch reads `0`.
pub fn clock(_args: &[Value], _position: Position) -> EvalResult<Value> {
    let seconds = SystemTime::now().duration_since(UNIX_EPOCH)
                                   .map_or(0.0, |elapsed| elapsed.as_secs_f64());
    Ok(Value::Number(seconds))
}

/// Returns the number of characters in a string.
///
/// # Example
/// ```
/// use sprig::{
///     interpreter::{evaluator::builtin::len, value::core::Value},
///     util::position::Position,
/// };
///
/// let n = len(&[Value::from("héllo")], Position::default()).unwrap();
/// assert_eq!(n, Value::Number(5.0));
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn len(args: &[Value], position: Position) -> EvalResult<Value> {
    match single_argument(args, position)? {
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        other => Err(invalid_argument(format!("len() expects a string, found {}", other.type_name()),
                                      position)),
    }
}

/// Renders any value the way `print` does.
pub fn stringify(args: &[Value], position: Position) -> EvalResult<Value> {
    let value = single_argument(args, position)?;
    match value {
        Value::String(_) => Ok(value.clone()),
        other => Ok(Value::from(other.to_string())),
    }
}

/// Converts a string holding a decimal number to that number. Numbers are
/// returned unchanged.
///
/// Surrounding whitespace is ignored. Strings that do not hold a finite
/// number are rejected.
///
/// # Example
/// ```
/// use sprig::{
///     interpreter::{evaluator::builtin::num, value::core::Value},
///     util::position::Position,
/// };
///
/// assert_eq!(num(&[Value::from(" -2.5 ")], Position::default()), Ok(Value::Number(-2.5)));
/// assert!(num(&[Value::from("two")], Position::default()).is_err());
/// ```
pub fn num(args: &[Value], position: Position) -> EvalResult<Value> {
    match single_argument(args, position)? {
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::String(s) => s.trim()
                             .parse::<f64>()
                             .ok()
                             .filter(|n| n.is_finite())
                             .map(Value::Number)
                             .ok_or_else(|| {
                                 invalid_argument(format!("num() cannot convert '{s}' to a number"),
                                                  position)
                             }),
        other => Err(invalid_argument(format!("num() expects a string or a number, found {}",
                                              other.type_name()),
                                      position)),
    }
}

/// Returns the name of a value's type as a string.
pub fn type_of(args: &[Value], position: Position) -> EvalResult<Value> {
    Ok(Value::from(single_argument(args, position)?.type_name()))
}

/// Computes the square root of a non-negative number.
pub fn sqrt(args: &[Value], position: Position) -> EvalResult<Value> {
    let n = number_argument("sqrt", args, position)?;
    if n < 0.0 {
        return Err(invalid_argument(format!("sqrt() of negative number {n}"), position));
    }
    Ok(Value::Number(n.sqrt()))
}

fn single_argument(args: &[Value], position: Position) -> EvalResult<&Value> {
    match args {
        [value] => Ok(value),
        _ => Err(RuntimeError::ArgumentCountMismatch { expected: 1,
                                                       found: args.len(),
                                                       position }),
    }
}

fn number_argument(name: &str, args: &[Value], position: Position) -> EvalResult<f64> {
    match single_argument(args, position)? {
        Value::Number(n) => Ok(*n),
        other => Err(invalid_argument(format!("{name}() expects a number, found {}", other.type_name()),
                                      position)),
    }
}

fn invalid_argument(details: String, position: Position) -> RuntimeError {
    RuntimeError::InvalidArgument { details, position }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> EvalResult<Value> {
        let builtin = lookup_builtin(name).unwrap();
        (builtin.func)(args, Position::new(1, 1))
    }

    #[test]
    fn table_and_name_list_agree() {
        assert_eq!(BUILTIN_FUNCTIONS,
                   &["clock", "len", "str", "num", "type", "sqrt", "floor", "abs"]);
        assert!(BUILTIN_FUNCTIONS.iter().all(|name| lookup_builtin(name).is_some()));
    }

    #[test]
    fn install_binds_every_builtin() {
        let env = Environment::global();
        install_builtins(&env);
        assert_eq!(env.names().len(), BUILTIN_FUNCTIONS.len());
        assert_eq!(env.get("abs").map(|v| v.to_string()), Some("<builtin fn abs>".to_string()));
    }

    #[test]
    fn str_renders_like_print() {
        assert_eq!(call("str", &[Value::Number(3.0)]), Ok(Value::from("3")));
        assert_eq!(call("str", &[Value::Nil]), Ok(Value::from("nil")));
    }

    #[test]
    fn type_names() {
        assert_eq!(call("type", &[Value::Bool(true)]), Ok(Value::from("bool")));
        assert_eq!(call("type", &[Value::Builtin(lookup_builtin("len").unwrap())]),
                   Ok(Value::from("function")));
    }

    #[test]
    fn numeric_builtins() {
        assert_eq!(call("sqrt", &[Value::Number(9.0)]), Ok(Value::Number(3.0)));
        assert_eq!(call("floor", &[Value::Number(-1.5)]), Ok(Value::Number(-2.0)));
        assert_eq!(call("abs", &[Value::Number(-4.0)]), Ok(Value::Number(4.0)));
    }

    #[test]
    fn invalid_arguments_are_reported() {
        assert!(matches!(call("sqrt", &[Value::Number(-1.0)]),
                         Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(call("len", &[Value::Number(1.0)]),
                         Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(call("num", &[Value::from("inf")]),
                         Err(RuntimeError::InvalidArgument { .. })));
    }

    #[test]
    fn clock_is_positive() {
        let Ok(Value::Number(seconds)) = call("clock", &[]) else {
            panic!("clock() must return a number");
        };
        assert!(seconds > 0.0);
    }
}
