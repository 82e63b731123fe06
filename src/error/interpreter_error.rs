use crate::error::{LexError, ParseError, RuntimeError};

/// Which stage of a submission produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed token.
    Lex,
    /// Grammar violation.
    Parse,
    /// Failure while evaluating.
    Runtime,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex => write!(f, "Lex error"),
            Self::Parse => write!(f, "Parse error"),
            Self::Runtime => write!(f, "Runtime error"),
        }
    }
}

/// Any error a submission can end with.
///
/// All variants are recoverable at the submission boundary: they abort the
/// rest of the current submission, never the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpreterError {
    /// The submission could not be lexed.
    #[error("Lex error on {0}")]
    Lex(#[from] LexError),
    /// The submission could not be parsed.
    #[error("Parse error on {0}")]
    Parse(#[from] ParseError),
    /// A statement of the submission failed while running.
    #[error("Runtime error on {0}")]
    Runtime(#[from] RuntimeError),
}

impl InterpreterError {
    /// Returns the stage that produced the error.
    ///
    /// # Example
    /// ```
    /// use sprig::{
    ///     error::{ErrorKind, InterpreterError, RuntimeError},
    ///     util::position::Position,
    /// };
    ///
    /// let error: InterpreterError =
    ///     RuntimeError::DivisionByZero { position: Position::new(1, 3) }.into();
    ///
    /// assert_eq!(error.kind(), ErrorKind::Runtime);
    /// assert_eq!(error.to_string(),
    ///            "Runtime error on line 1, column 3: Division by zero.");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Lex(_) => ErrorKind::Lex,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Runtime(_) => ErrorKind::Runtime,
        }
    }
}
