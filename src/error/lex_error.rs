use thiserror::Error;

/// Represents all errors that can occur during tokenization.
///
/// There is no recovery within one `tokenize` call: the first offending
/// character ends the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that cannot start any token.
    #[error("Error on line {line}, column {column}: Unexpected character '{character}'.")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// The source line where the error occurred.
        line:      usize,
        /// The source column where the error occurred.
        column:    usize,
    },
    /// The input produced more tokens than the configured ceiling allows.
    #[error("Input exceeds the maximum of {limit} tokens.")]
    TooManyTokens {
        /// The configured ceiling.
        limit: usize,
    },
}
