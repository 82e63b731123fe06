use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, Evaluator, Flow},
        value::{core::Value, function::Closure},
    },
    util::position::Position,
};

impl Evaluator {
    /// Evaluates a function call.
    ///
    /// The callee is evaluated first, then the arguments from left to right.
    pub(super) fn eval_call(&mut self,
                            callee: &Expr,
                            arguments: &[Expr],
                            position: Position,
                            env: &Rc<Environment>)
                            -> EvalResult<Value> {
        let callee = self.evaluate(callee, env)?;
        let arguments = arguments.iter()
                                 .map(|argument| self.evaluate(argument, env))
                                 .collect::<EvalResult<Vec<_>>>()?;

        self.call_value(&callee, arguments, position)
    }

    /// Calls `callee` with already evaluated arguments.
    ///
    /// # Errors
    /// - `NotCallable` if `callee` is not a function.
    /// - `ArgumentCountMismatch` if the argument count differs from the
    ///   function's arity.
    /// - `CallDepthExceeded` if the call would nest deeper than the configured
    ///   limit.
    /// - Any error raised by the function body.
    pub fn call_value(&mut self,
                      callee: &Value,
                      arguments: Vec<Value>,
                      position: Position)
                      -> EvalResult<Value> {
        match callee {
            Value::Builtin(builtin) => {
                check_arity(builtin.arity, arguments.len(), position)?;
                trace!(function = builtin.name, "calling builtin");
                (builtin.func)(&arguments, position)
            },
            Value::Function(closure) => self.call_closure(closure, arguments, position),
            other => Err(RuntimeError::NotCallable { type_name: other.type_name(),
                                                     position }),
        }
    }

    /// Runs a closure's body in a fresh scope nested in its captured
    /// environment, with the parameters bound to `arguments`.
    ///
    /// Falling off the end of the body returns `nil`.
    fn call_closure(&mut self,
                    closure: &Closure,
                    arguments: Vec<Value>,
                    position: Position)
                    -> EvalResult<Value> {
        check_arity(closure.arity(), arguments.len(), position)?;
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded { limit: self.max_call_depth,
                                                         position });
        }

        let frame = Rc::new(Environment::with_parent(Rc::clone(&closure.env)));
        for (param, argument) in closure.def.params.iter().zip(arguments) {
            frame.define(param.as_str(), argument);
        }

        self.call_depth += 1;
        trace!(function = closure.name(), depth = self.call_depth, "calling function");
        let flow = self.execute_statements(&closure.def.body, &frame);
        self.call_depth -= 1;
        frame.release_if_unreachable();

        match flow? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }
}

const fn check_arity(expected: usize, found: usize, position: Position) -> EvalResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCountMismatch { expected,
                                                  found,
                                                  position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{FunctionDef, Statement},
        interpreter::{
            evaluator::builtin::lookup_builtin, lexer::tokenize, output::OutputChannel,
            parser::parse,
        },
    };

    fn evaluator() -> Evaluator {
        Evaluator::new(Rc::new(OutputChannel::new()), 8)
    }

    #[test]
    fn calling_a_non_function_fails() {
        assert_eq!(evaluator().call_value(&Value::Number(1.0), vec![], Position::new(1, 2)),
                   Err(RuntimeError::NotCallable { type_name: "number",
                                                   position:  Position::new(1, 2), }));
    }

    #[test]
    fn builtins_check_their_arity() {
        let len = Value::Builtin(lookup_builtin("len").unwrap());
        assert_eq!(evaluator().call_value(&len, vec![], Position::default()),
                   Err(RuntimeError::ArgumentCountMismatch { expected: 1,
                                                             found:    0,
                                                             position: Position::default(), }));
    }

    #[test]
    fn closures_run_in_their_captured_environment() {
        let captured = Rc::new(Environment::global());
        captured.define("base", Value::Number(10.0));

        let statements = parse(&tokenize("fun add(n) { return base + n }").unwrap()).unwrap();
        let Statement::Function(def) = &statements[0] else {
            panic!("expected function declaration");
        };
        let closure = Value::Function(Rc::new(Closure::new(Rc::clone(def), captured)));

        assert_eq!(evaluator().call_value(&closure, vec![Value::Number(5.0)], Position::default()),
                   Ok(Value::Number(15.0)));
    }

    #[test]
    fn call_frames_are_released_after_the_call() {
        let captured = Rc::new(Environment::global());
        let statements = parse(&tokenize("fun outer() { fun inner() {} let x = 1 }").unwrap()).unwrap();
        let Statement::Function(def) = &statements[0] else {
            panic!("expected function declaration");
        };
        let closure = Value::Function(Rc::new(Closure::new(Rc::clone(def), Rc::clone(&captured))));

        let mut evaluator = evaluator();
        for _ in 0..3 {
            evaluator.call_value(&closure, vec![], Position::default()).unwrap();
        }
        assert_eq!(Rc::strong_count(&captured), 2);
    }

    #[test]
    fn falling_off_the_end_returns_nil() {
        let def = FunctionDef { name:     "noop".to_string(),
                                params:   vec![],
                                body:     vec![],
                                position: Position::default(), };
        let closure = Value::Function(Rc::new(Closure::new(Rc::new(def), Rc::new(Environment::global()))));

        assert_eq!(evaluator().call_value(&closure, vec![], Position::default()), Ok(Value::Nil));
    }
}
