use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
    util::position::Position,
};

impl Evaluator {
    /// Evaluates a binary operation.
    ///
    /// `and` and `or` evaluate their right operand only when the left one does
    /// not decide the result, and produce the deciding operand itself rather
    /// than a boolean. Every other operator evaluates both operands, left
    /// first, and hands them to [`apply_binary`].
    pub(super) fn eval_binary(&mut self,
                              left: &Expr,
                              op: BinaryOperator,
                              right: &Expr,
                              position: Position,
                              env: &Rc<Environment>)
                              -> EvalResult<Value> {
        let left = self.evaluate(left, env)?;

        match op {
            BinaryOperator::And if !left.is_truthy() => Ok(left),
            BinaryOperator::Or if left.is_truthy() => Ok(left),
            BinaryOperator::And | BinaryOperator::Or => self.evaluate(right, env),
            _ => {
                let right = self.evaluate(right, env)?;
                apply_binary(op, &left, &right, position)
            },
        }
    }
}

/// Applies a binary operator to two evaluated operands.
///
/// - `+` adds two numbers or concatenates two strings.
/// - `-`, `*`, `/` and `%` need two numbers; dividing by zero is an error.
/// - `<`, `<=`, `>` and `>=` compare two numbers or two strings.
/// - `==` and `!=` accept any operands; values of different kinds are unequal.
/// - `and` and `or` select one operand, as if both had been evaluated.
///
/// # Errors
/// `TypeMismatch` for operands the operator does not accept and
/// `DivisionByZero` for a zero divisor.
///
/// # Example
/// ```
/// use sprig::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::apply_binary, value::core::Value},
///     util::position::Position,
/// };
///
/// let sum = apply_binary(BinaryOperator::Add,
///                        &Value::from("ab"),
///                        &Value::from("cd"),
///                        Position::default());
/// assert_eq!(sum, Ok(Value::from("abcd")));
/// ```
pub fn apply_binary(op: BinaryOperator,
                    left: &Value,
                    right: &Value,
                    position: Position)
                    -> EvalResult<Value> {
    use BinaryOperator::{
        Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or, Sub,
    };

    match op {
        Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::from(format!("{a}{b}"))),
            _ => Err(mismatch(op, "two numbers or two strings", left, right, position)),
        },
        Sub | Mul | Div | Mod => {
            let (Value::Number(a), Value::Number(b)) = (left, right) else {
                return Err(mismatch(op, "numbers", left, right, position));
            };
            match op {
                Sub => Ok(Value::Number(a - b)),
                Mul => Ok(Value::Number(a * b)),
                _ if *b == 0.0 => Err(RuntimeError::DivisionByZero { position }),
                Div => Ok(Value::Number(a / b)),
                _ => Ok(Value::Number(a % b)),
            }
        },
        Less | LessEqual | Greater | GreaterEqual => compare(op, left, right, position),
        Equal => Ok(Value::Bool(left == right)),
        NotEqual => Ok(Value::Bool(left != right)),
        And => Ok(if left.is_truthy() { right.clone() } else { left.clone() }),
        Or => Ok(if left.is_truthy() { left.clone() } else { right.clone() }),
    }
}

/// Compares two numbers or two strings with an ordering operator.
///
/// Numbers follow IEEE 754, so every ordering involving `NaN` is false.
fn compare(op: BinaryOperator,
           left: &Value,
           right: &Value,
           position: Position)
           -> EvalResult<Value> {
    let result = match (left, right) {
        (Value::Number(a), Value::Number(b)) => match op {
            BinaryOperator::Less => a < b,
            BinaryOperator::LessEqual => a <= b,
            BinaryOperator::Greater => a > b,
            _ => a >= b,
        },
        (Value::String(a), Value::String(b)) => match op {
            BinaryOperator::Less => a < b,
            BinaryOperator::LessEqual => a <= b,
            BinaryOperator::Greater => a > b,
            _ => a >= b,
        },
        _ => return Err(mismatch(op, "two numbers or two strings", left, right, position)),
    };
    Ok(Value::Bool(result))
}

fn mismatch(op: BinaryOperator,
            expected: &str,
            left: &Value,
            right: &Value,
            position: Position)
            -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("operands of '{op}' must be {expected}, found {} and {}",
                                                  left.type_name(),
                                                  right.type_name()),
                                 position }
}
