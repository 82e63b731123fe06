use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{
    ast::Statement,
    error::InterpreterError,
    interpreter::{
        environment::Environment,
        evaluator::{
            builtin::install_builtins,
            core::{DEFAULT_MAX_CALL_DEPTH, Evaluator},
        },
        lexer::tokenize,
        output::{OutputChannel, OutputEvent},
        parser::parse_into,
    },
};

/// Settings of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Whether top-level expression statements emit their value.
    pub echo_results:   bool,
    /// Maximum number of nested function calls before a call fails with
    /// `CallDepthExceeded`.
    pub max_call_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { echo_results:   true,
               max_call_depth: DEFAULT_MAX_CALL_DEPTH, }
    }
}

/// A running interpreter.
///
/// A session owns the global environment, so variables and functions
/// declared by one submission are visible to every later one. Everything a
/// submission produces, including its error, is delivered to the listeners
/// registered on the session's [`OutputChannel`].
///
/// # Example
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use sprig::interpreter::{output::OutputEvent, session::Session};
///
/// let mut session = Session::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// session.register(move |event: &OutputEvent| sink.borrow_mut().push(event.text.clone()));
///
/// session.submit("let x = 1").unwrap();
/// session.submit("x + 1").unwrap();
///
/// assert_eq!(*seen.borrow(), vec!["2".to_string()]);
/// ```
#[derive(Debug)]
pub struct Session {
    config:    SessionConfig,
    globals:   Rc<Environment>,
    evaluator: Evaluator,
    output:    Rc<OutputChannel>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Creates a session with the given configuration.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        let output = Rc::new(OutputChannel::new());

        Self { config,
               globals: fresh_globals(),
               evaluator: Evaluator::new(Rc::clone(&output), config.max_call_depth),
               output }
    }

    /// Runs one submission.
    ///
    /// The whole submission is lexed and parsed before anything runs, so a
    /// lex or parse error leaves the session exactly as it was. A runtime
    /// error stops the submission at the failing statement; earlier statements
    /// keep their effects.
    ///
    /// # Errors
    /// Returns the error that ended the submission, after emitting it as an
    /// [`OutputKind::Error`] event.
    ///
    /// [`OutputKind::Error`]: crate::interpreter::output::OutputKind::Error
    pub fn submit(&mut self, source: &str) -> Result<(), InterpreterError> {
        let result = self.run(source);
        if let Err(error) = &result {
            debug!(kind = %error.kind(), "submission failed");
            self.output.emit(&OutputEvent::error(error));
        }
        result
    }

    fn run(&mut self, source: &str) -> Result<(), InterpreterError> {
        let lexemes = tokenize(source)?;
        let mut statements: Vec<Statement> = Vec::new();
        parse_into(&lexemes, &mut statements)?;

        debug!(lexemes = lexemes.len(), statements = statements.len(), "running submission");
        self.evaluator
            .execute_submission(&statements, &self.globals, self.config.echo_results)?;
        Ok(())
    }

    /// The channel this session emits to.
    #[must_use]
    pub const fn output(&self) -> &Rc<OutputChannel> {
        &self.output
    }

    /// Registers an output listener. Shorthand for
    /// `session.output().register(listener)`.
    pub fn register<F>(&self, listener: F)
        where F: Fn(&OutputEvent) + 'static
    {
        self.output.register(listener);
    }

    /// The top-level environment.
    #[must_use]
    pub const fn globals(&self) -> &Rc<Environment> {
        &self.globals
    }

    /// The configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> SessionConfig {
        self.config
    }

    /// Turns echoing of top-level expression results on or off.
    pub const fn set_echo(&mut self, echo: bool) {
        self.config.echo_results = echo;
    }

    /// Discards every binding and starts over with a fresh global environment
    /// holding only the builtins. Registered listeners are kept.
    pub fn reset(&mut self) {
        debug!(bindings = self.globals.names().len(), "resetting session");
        let previous = std::mem::replace(&mut self.globals, fresh_globals());
        previous.release_if_unreachable();
    }
}

fn fresh_globals() -> Rc<Environment> {
    let globals = Environment::global();
    install_builtins(&globals);
    Rc::new(globals)
}

/// Runs `source` as the only submission of a fresh session.
///
/// Returns the texts of the print and value events in the order they were
/// emitted.
///
/// # Errors
/// Returns the error that ended the submission.
///
/// # Example
/// ```
/// use sprig::evaluate_source;
///
/// assert_eq!(evaluate_source("print 1; 2 + 3", true).unwrap(), vec!["1", "5"]);
/// assert_eq!(evaluate_source("print 1; 2 + 3", false).unwrap(), vec!["1"]);
/// assert!(evaluate_source("print nope", true).is_err());
/// ```
pub fn evaluate_source(source: &str, echo: bool) -> Result<Vec<String>, InterpreterError> {
    let mut session = Session::with_config(SessionConfig { echo_results: echo,
                                                           ..SessionConfig::default() });
    let texts = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&texts);
    session.register(move |event: &OutputEvent| {
               if !event.is_error() {
                   sink.borrow_mut().push(event.text.clone());
               }
           });

    session.submit(source)?;
    Ok(texts.take())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        interpreter::{output::OutputKind, value::core::Value},
    };

    fn recording_session() -> (Session, Rc<RefCell<Vec<OutputEvent>>>) {
        let session = Session::with_config(SessionConfig { echo_results:   true,
                                                           max_call_depth: 32, });
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.register(move |event: &OutputEvent| sink.borrow_mut().push(event.clone()));
        (session, events)
    }

    #[test]
    fn parse_error_is_emitted_and_leaves_state_alone() {
        let (mut session, events) = recording_session();
        session.submit("let x = 1").unwrap();

        let error = session.submit("let y = 2; 1 +").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
        assert_eq!(session.globals().get("y"), None);
        assert_eq!(session.globals().get("x"), Some(Value::Number(1.0)));

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, OutputKind::Error(ErrorKind::Parse));
        assert_eq!(events[0].text, "Parse error on line 1, column 15: Unexpected end of input.");
    }

    #[test]
    fn lex_error_is_reported_as_such() {
        let (mut session, events) = recording_session();
        assert_eq!(session.submit("let a = #").unwrap_err().kind(), ErrorKind::Lex);
        assert_eq!(events.borrow()[0].kind, OutputKind::Error(ErrorKind::Lex));
        assert_eq!(session.globals().get("a"), None);
    }

    #[test]
    fn reset_discards_bindings_but_keeps_listeners_and_builtins() {
        let (mut session, events) = recording_session();
        session.submit("let x = 1").unwrap();
        session.reset();

        assert!(session.submit("x").is_err());
        session.submit("abs(-3)").unwrap();

        let texts: Vec<String> = events.borrow().iter().map(|e| e.text.clone()).collect();
        assert_eq!(texts,
                   vec!["Runtime error on line 1, column 1: Undefined variable 'x'.".to_string(),
                        "3".to_string()]);
    }

    #[test]
    fn reset_frees_the_previous_globals() {
        let (mut session, _) = recording_session();
        session.submit("fun f() { return g } fun g() { return f }").unwrap();
        let previous = Rc::downgrade(session.globals());

        session.reset();
        assert!(previous.upgrade().is_none());
    }

    #[test]
    fn echo_can_be_switched_off() {
        let (mut session, events) = recording_session();
        session.set_echo(false);
        session.submit("1 + 1; print 2").unwrap();

        assert!(!session.config().echo_results);
        assert_eq!(events.borrow().as_slice(), &[OutputEvent::print("2")]);
    }

    #[test]
    fn evaluate_source_collects_output_in_order() {
        assert_eq!(evaluate_source("let a = \"x\"; print a + \"y\"; a", true).unwrap(),
                   vec!["xy", "x"]);
    }
}
