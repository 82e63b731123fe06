use crate::util::position::Position;

/// Represents all errors that can occur during parsing.
///
/// Every variant records the position of the offending token. Parsing stops
/// at the first error of a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Found a token that cannot start or continue the current construct.
    #[error("{position}: Unexpected token '{token}'.")]
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// Where the token appears.
        position: Position,
    },
    /// A specific token was required but something else was found.
    #[error("{position}: Expected {expected}, found '{found}'.")]
    ExpectedToken {
        /// Description of what was required.
        expected: String,
        /// The token encountered instead.
        found:    String,
        /// Where the token appears.
        position: Position,
    },
    /// Reached the end of input in the middle of a construct.
    #[error("{position}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// Position of the end of input.
        position: Position,
    },
    /// A `{` without its matching `}`.
    #[error("{position}: Unterminated block, missing '}}'.")]
    UnterminatedBlock {
        /// Position of the opening brace.
        position: Position,
    },
    /// The left side of `=` is not a variable name.
    #[error("{position}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// Position of the invalid target.
        position: Position,
    },
    /// More than the allowed number of parameters or arguments.
    #[error("{position}: Cannot have more than {limit} {what}.")]
    TooManyArguments {
        /// `"parameters"` or `"arguments"`.
        what:     &'static str,
        /// The maximum count.
        limit:    usize,
        /// Position of the first surplus item.
        position: Position,
    },
    /// The same parameter name appears twice in a function declaration.
    #[error("{position}: Duplicate parameter '{name}'.")]
    DuplicateParameter {
        /// The repeated name.
        name:     String,
        /// Position of the second occurrence.
        position: Position,
    },
    /// `return` used outside of a function body.
    #[error("{position}: Cannot return from outside a function.")]
    ReturnOutsideFunction {
        /// Position of the `return` keyword.
        position: Position,
    },
    /// `break` or `continue` used outside of a loop body.
    #[error("{position}: Cannot use '{keyword}' outside of a loop.")]
    LoopControlOutsideLoop {
        /// The keyword used.
        keyword:  &'static str,
        /// Position of the keyword.
        position: Position,
    },
    /// Expressions or statements nested deeper than the parser accepts.
    #[error("{position}: Nesting is deeper than {limit} levels.")]
    TooDeeplyNested {
        /// The maximum nesting depth.
        limit:    usize,
        /// Position of the construct that went over the limit.
        position: Position,
    },
}

impl ParseError {
    /// Returns where the error occurred.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::ExpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position }
            | Self::UnterminatedBlock { position }
            | Self::InvalidAssignmentTarget { position }
            | Self::TooManyArguments { position, .. }
            | Self::DuplicateParameter { position, .. }
            | Self::ReturnOutsideFunction { position }
            | Self::LoopControlOutsideLoop { position, .. }
            | Self::TooDeeplyNested { position, .. } => *position,
        }
    }
}
