use std::{cell::RefCell, rc::Rc};

use crate::error::{ErrorKind, InterpreterError};

/// What an [`OutputEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Text produced by a `print` statement.
    Print,
    /// The echoed result of a top-level expression statement.
    Value,
    /// A submission failed at the given stage.
    Error(ErrorKind),
}

/// One unit of output produced while running a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEvent {
    /// What produced the text.
    pub kind: OutputKind,
    /// The rendered text, without a trailing newline.
    pub text: String,
}

impl OutputEvent {
    /// A `print` statement's output.
    #[must_use]
    pub fn print(text: impl Into<String>) -> Self {
        Self { kind: OutputKind::Print,
               text: text.into(), }
    }

    /// An echoed expression result.
    #[must_use]
    pub fn value(text: impl Into<String>) -> Self {
        Self { kind: OutputKind::Value,
               text: text.into(), }
    }

    /// The report of a failed submission.
    #[must_use]
    pub fn error(error: &InterpreterError) -> Self {
        Self { kind: OutputKind::Error(error.kind()),
               text: error.to_string(), }
    }

    /// Whether the event reports an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, OutputKind::Error(_))
    }
}

type Listener = Rc<dyn Fn(&OutputEvent)>;

/// Fans out output events to every registered listener.
///
/// The evaluator only ever talks to this channel, so the core never touches
/// stdout or any other device. Listeners are called synchronously, in
/// registration order, each with the same event. A listener registered while
/// an event is being delivered starts receiving events from the next
/// emission on.
///
/// # Example
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use sprig::interpreter::output::{OutputChannel, OutputEvent};
///
/// let channel = OutputChannel::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = Rc::clone(&seen);
/// channel.register(move |event: &OutputEvent| sink.borrow_mut().push(event.text.clone()));
/// channel.emit(&OutputEvent::print("7"));
///
/// assert_eq!(*seen.borrow(), vec!["7".to_string()]);
/// ```
#[derive(Default)]
pub struct OutputChannel {
    listeners: RefCell<Vec<Listener>>,
}

impl OutputChannel {
    /// Creates a channel with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener. Registering the same closure twice delivers every
    /// event to it twice.
    pub fn register<F>(&self, listener: F)
        where F: Fn(&OutputEvent) + 'static
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Delivers `event` to every listener registered so far.
    pub fn emit(&self, event: &OutputEvent) {
        let listeners = self.listeners.borrow().clone();
        for listener in &listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for OutputChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputChannel")
         .field("listeners", &self.listener_count())
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(channel: &OutputChannel, tag: &'static str, log: &Rc<RefCell<Vec<String>>>) {
        let log = Rc::clone(log);
        channel.register(move |event: &OutputEvent| {
                   log.borrow_mut().push(format!("{tag}:{}", event.text));
               });
    }

    #[test]
    fn listeners_receive_events_in_registration_order() {
        let channel = OutputChannel::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&channel, "first", &log);
        recorder(&channel, "second", &log);

        channel.emit(&OutputEvent::print("7"));

        assert_eq!(*log.borrow(), vec!["first:7", "second:7"]);
    }

    #[test]
    fn emitting_without_listeners_is_a_no_op() {
        OutputChannel::new().emit(&OutputEvent::value("1"));
    }

    #[test]
    fn listener_registered_during_emission_waits_for_the_next_event() {
        let channel = Rc::new(OutputChannel::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_channel = Rc::clone(&channel);
        let inner_log = Rc::clone(&log);
        channel.register(move |_: &OutputEvent| {
                   if inner_channel.listener_count() == 1 {
                       recorder(&inner_channel, "late", &inner_log);
                   }
               });

        channel.emit(&OutputEvent::print("a"));
        assert!(log.borrow().is_empty());

        channel.emit(&OutputEvent::print("b"));
        assert_eq!(*log.borrow(), vec!["late:b"]);
    }

    #[test]
    fn error_events_carry_their_kind() {
        use crate::{error::RuntimeError, util::position::Position};

        let error = InterpreterError::from(RuntimeError::DivisionByZero { position: Position::new(1, 3) });
        let event = OutputEvent::error(&error);

        assert_eq!(event.kind, OutputKind::Error(ErrorKind::Runtime));
        assert!(event.is_error());
        assert_eq!(event.text, "Runtime error on line 1, column 3: Division by zero.");
    }
}
