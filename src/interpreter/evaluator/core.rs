use std::rc::Rc;

use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        output::{OutputChannel, OutputEvent},
        value::core::Value,
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default maximum depth of nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;

/// How a statement finished.
///
/// `Return`, `Break` and `Continue` travel outward through enclosing blocks,
/// conditionals and loops until the construct they target consumes them: a
/// call consumes `Return`, the innermost loop consumes `Break` and
/// `Continue`.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// Leave the current function with a value.
    Return(Value),
    /// Leave the innermost loop.
    Break,
    /// Start the next iteration of the innermost loop.
    Continue,
}

/// The tree-walking evaluator.
///
/// The evaluator holds no variables itself: every entry point takes the
/// environment to run in, so the caller decides which scope persists between
/// submissions. Output goes to the shared [`OutputChannel`].
#[derive(Debug)]
pub struct Evaluator {
    pub(super) output:         Rc<OutputChannel>,
    pub(super) call_depth:     usize,
    pub(super) max_call_depth: usize,
}

impl Evaluator {
    /// Creates an evaluator emitting to `output` that allows at most
    /// `max_call_depth` nested calls.
    #[must_use]
    pub const fn new(output: Rc<OutputChannel>, max_call_depth: usize) -> Self {
        Self { output,
               call_depth: 0,
               max_call_depth }
    }

    /// The current number of active calls.
    #[must_use]
    pub const fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Runs the statements of one submission, front to back, in `env`.
    ///
    /// When `echo` is set, each top-level expression statement emits the
    /// rendering of its value as an [`OutputKind::Value`] event. Expression
    /// statements nested in blocks or function bodies never echo.
    ///
    /// # Errors
    /// Stops at the first failing statement and returns its error. Effects of
    /// the statements before it are kept.
    ///
    /// [`OutputKind::Value`]: crate::interpreter::output::OutputKind::Value
    pub fn execute_submission(&mut self,
                              statements: &[Statement],
                              env: &Rc<Environment>,
                              echo: bool)
                              -> EvalResult<()> {
        self.call_depth = 0;

        for statement in statements {
            if let Statement::Expression { expr, .. } = statement
               && echo
            {
                let value = self.evaluate(expr, env)?;
                self.output.emit(&OutputEvent::value(value.to_string()));
                continue;
            }

            match self.execute(statement, env)? {
                Flow::Normal => {},
                flow => unreachable!("{flow:?} escaped to the top level"),
            }
        }

        Ok(())
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation.
    /// The evaluator dispatches based on expression variant.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `env`: Scope the expression's names resolve in.
    pub fn evaluate(&mut self, expr: &Expr, env: &Rc<Environment>) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.evaluate_expression(expr, env))
    }

    fn evaluate_expression(&mut self, expr: &Expr, env: &Rc<Environment>) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Identifier { name, position } => env.lookup(name, *position),
            Expr::Grouping { inner, .. } => self.evaluate(inner, env),
            Expr::Unary { op, operand, position } => {
                let operand = self.evaluate(operand, env)?;
                Self::eval_unary(*op, &operand, *position)
            },
            Expr::Binary { left,
                           op,
                           right,
                           position, } => self.eval_binary(left, *op, right, *position, env),
            Expr::Call { callee,
                         arguments,
                         position, } => self.eval_call(callee, arguments, *position, env),
            Expr::Assignment { target,
                               value,
                               position, } => {
                let value = self.evaluate(value, env)?;
                env.assign(target, value.clone(), *position)?;
                Ok(value)
            },
        }
    }
}
