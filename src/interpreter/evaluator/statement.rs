use std::rc::Rc;

use crate::{
    ast::{Expr, Statement},
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, Evaluator, Flow},
        output::OutputEvent,
        value::{core::Value, function::Closure},
    },
    util::stack::ensure_sufficient_stack,
};

impl Evaluator {
    /// Executes a single statement in `env`.
    ///
    /// # Returns
    /// How the statement finished. Anything other than [`Flow::Normal`] must
    /// be passed on by the caller until a loop or call consumes it.
    pub fn execute(&mut self, statement: &Statement, env: &Rc<Environment>) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.execute_statement(statement, env))
    }

    fn execute_statement(&mut self, statement: &Statement, env: &Rc<Environment>) -> EvalResult<Flow> {
        match statement {
            Statement::Expression { expr, .. } => {
                self.evaluate(expr, env)?;
                Ok(Flow::Normal)
            },
            Statement::VariableDeclaration { name, initializer, .. } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                env.define(name.as_str(), value);
                Ok(Flow::Normal)
            },
            Statement::Function(def) => {
                let closure = Closure::new(Rc::clone(def), Rc::clone(env));
                env.define(def.name.as_str(), Value::Function(Rc::new(closure)));
                Ok(Flow::Normal)
            },
            Statement::Print { expr, .. } => {
                let value = self.evaluate(expr, env)?;
                self.output.emit(&OutputEvent::print(value.to_string()));
                Ok(Flow::Normal)
            },
            Statement::Block { statements, .. } => self.execute_block(statements, env),
            Statement::Conditional { test,
                                     then_branch,
                                     else_branch,
                                     .. } => {
                if self.evaluate(test, env)?.is_truthy() {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::Loop { test, body, .. } => self.execute_loop(test, body, env),
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            },
            Statement::Break { .. } => Ok(Flow::Break),
            Statement::Continue { .. } => Ok(Flow::Continue),
        }
    }

    /// Executes `statements` in a new scope nested in `env`.
    ///
    /// The scope is discarded afterwards unless a value that outlives the
    /// block still refers to it.
    pub fn execute_block(&mut self,
                         statements: &[Statement],
                         env: &Rc<Environment>)
                         -> EvalResult<Flow> {
        let scope = Rc::new(Environment::with_parent(Rc::clone(env)));
        let flow = self.execute_statements(statements, &scope);
        scope.release_if_unreachable();
        flow
    }

    /// Executes `statements` in `env` itself, stopping at the first one that
    /// does not finish normally.
    pub(super) fn execute_statements(&mut self,
                                     statements: &[Statement],
                                     env: &Rc<Environment>)
                                     -> EvalResult<Flow> {
        for statement in statements {
            match self.execute(statement, env)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Runs a `while` loop.
    ///
    /// `Break` ends the loop and `Continue` re-checks the condition; both are
    /// consumed here. `Return` is passed on.
    fn execute_loop(&mut self,
                    test: &Expr,
                    body: &Statement,
                    env: &Rc<Environment>)
                    -> EvalResult<Flow> {
        while self.evaluate(test, env)?.is_truthy() {
            match self.execute(body, env)? {
                Flow::Normal | Flow::Continue => {},
                Flow::Break => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }
}
