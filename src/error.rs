/// Lexing errors.
///
/// Defines the errors raised while turning source text into lexemes: a
/// character that starts no token, or a string literal that never closes.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building statements from
/// lexemes. Parse errors include unexpected tokens, missing delimiters,
/// unterminated blocks and misplaced control-flow keywords.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include undefined variables, type mismatches, calls to
/// non-function values, wrong argument counts and division by zero.
pub mod runtime_error;

/// The combined error type returned by a session submission.
pub mod interpreter_error;

pub use interpreter_error::{ErrorKind, InterpreterError};
pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
