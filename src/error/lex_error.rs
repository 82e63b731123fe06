use crate::util::position::Position;

/// Represents all errors that can occur while lexing a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A character that does not start any token.
    #[error("{position}: Unexpected character '{character}'.")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Where the character appears.
        position:  Position,
    },
    /// A string literal without its closing quote.
    #[error("{position}: Unterminated string literal.")]
    UnterminatedString {
        /// Position of the opening quote.
        position: Position,
    },
}

impl LexError {
    /// Returns where the error occurred.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::InvalidCharacter { position, .. } | Self::UnterminatedString { position } => {
                *position
            },
        }
    }
}
