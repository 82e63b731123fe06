use crate::{
    ast::UnaryOperator,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
    util::position::Position,
};

impl Evaluator {
    /// Applies a unary operator to an evaluated operand.
    ///
    /// - `-` negates a number.
    /// - `!` produces the boolean opposite of the operand's truthiness, for
    ///   any operand.
    ///
    /// # Errors
    /// `TypeMismatch` when negating anything but a number.
    ///
    /// # Example
    /// ```
    /// use sprig::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    ///     util::position::Position,
    /// };
    ///
    /// let not_nil = Evaluator::eval_unary(UnaryOperator::Not, &Value::Nil, Position::default());
    /// assert_eq!(not_nil, Ok(Value::Bool(true)));
    /// ```
    pub fn eval_unary(op: UnaryOperator, operand: &Value, position: Position) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => Ok(Value::Number(-operand.as_number("operand of '-'", position)?)),
            UnaryOperator::Not => Ok(Value::Bool(!operand.is_truthy())),
        }
    }
}
