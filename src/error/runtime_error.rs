use crate::util::position::Position;

/// Represents all errors that can occur during evaluation and runtime.
///
/// The position identifies the expression or statement that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Tried to read a variable that is not bound in any enclosing scope.
    #[error("{position}: Undefined variable '{name}'.")]
    UndefinedVariable {
        /// The name of the variable.
        name:     String,
        /// The source position of the reference.
        position: Position,
    },
    /// Tried to assign to a name that was never declared.
    #[error("{position}: Cannot assign to undeclared variable '{name}'.")]
    UndeclaredAssignment {
        /// The name of the variable.
        name:     String,
        /// The source position of the assignment.
        position: Position,
    },
    /// Called a value that is not a function.
    #[error("{position}: Can only call functions, not {type_name}.")]
    NotCallable {
        /// The type of the value that was called.
        type_name: &'static str,
        /// The source position of the call.
        position:  Position,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("{position}: Expected {expected} arguments but got {found}.")]
    ArgumentCountMismatch {
        /// The number of parameters the function declares.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source position of the call.
        position: Position,
    },
    /// An operator was applied to values of the wrong type.
    #[error("{position}: Type error: {details}.")]
    TypeMismatch {
        /// Details about the type mismatch.
        details:  String,
        /// The source position of the operation.
        position: Position,
    },
    /// Attempted division (or remainder) by zero.
    #[error("{position}: Division by zero.")]
    DivisionByZero {
        /// The source position of the operator.
        position: Position,
    },
    /// A built-in function received an argument it cannot handle.
    #[error("{position}: Invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details:  String,
        /// The source position of the call.
        position: Position,
    },
    /// Function calls nested deeper than the session allows.
    #[error("{position}: Maximum call depth of {limit} exceeded.")]
    CallDepthExceeded {
        /// The configured maximum depth.
        limit:    usize,
        /// The source position of the call that went too deep.
        position: Position,
    },
}

impl RuntimeError {
    /// Returns where the error occurred.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UndefinedVariable { position, .. }
            | Self::UndeclaredAssignment { position, .. }
            | Self::NotCallable { position, .. }
            | Self::ArgumentCountMismatch { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::DivisionByZero { position }
            | Self::InvalidArgument { position, .. }
            | Self::CallDepthExceeded { position, .. } => *position,
        }
    }
}
