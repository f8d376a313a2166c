use thiserror::Error;

use crate::{
    ast::{Position, Range},
    error::LexError,
};

/// Represents all errors that can occur while parsing a line.
///
/// A parse error is scoped to the line that produced it; callers parsing a
/// document line by line keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// Found an unexpected token while parsing.
    #[error("Error at {range}: Unexpected token '{token}'.")]
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// Where it was found.
        range: Range,
    },
    /// Reached the end of the line while an operand was still expected.
    #[error("Error at {range}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// Where the line ended.
        range:    Range,
    },
    /// A closing parenthesis `)` was expected but not found.
    #[error("Error at {range}: Expected closing parenthesis ')' but none found.")]
    ExpectedClosingParen {
        /// Location of the opening parenthesis.
        range: Range,
    },
    /// Found extra tokens after a complete statement.
    #[error("Error at {range}: Extra tokens after expression: {token}.")]
    UnexpectedTrailingTokens {
        /// The first extra token.
        token: String,
        /// Where it was found.
        range: Range,
    },
    /// `a < b < c` and similar.
    #[error("Error at {range}: Comparisons cannot be chained.")]
    ChainedComparison {
        /// Location of the second comparison operator.
        range: Range,
    },
    /// A number literal that does not fit the decimal type.
    #[error("Error at {range}: Literal '{literal}' is out of range.")]
    LiteralOutOfRange {
        /// The literal text.
        literal: String,
        /// Where it was found.
        range:   Range,
    },
    /// A date whose day is outside 1..=31 or whose year is not a plain
    /// integer.
    #[error("Error at {range}: Invalid date literal: {details}.")]
    InvalidDate {
        /// What is wrong with it.
        details: String,
        /// Where it was found.
        range:   Range,
    },
    /// A time literal with an hour or minute out of range.
    #[error("Error at {range}: Invalid time literal '{literal}'.")]
    InvalidTime {
        /// The literal text.
        literal: String,
        /// Where it was found.
        range:   Range,
    },
    /// Tried to assign to a keyword.
    #[error("Error at {range}: '{name}' is a reserved word and cannot be assigned.")]
    IdentifierReserved {
        /// The reserved name.
        name:  String,
        /// Where it was found.
        range: Range,
    },
    /// Nesting exceeded the configured depth ceiling.
    #[error("Error at {range}: Expression nesting exceeds the maximum depth of {limit}.")]
    TooDeep {
        /// The configured ceiling.
        limit: usize,
        /// Where the limit was hit.
        range: Range,
    },
}

impl ParseError {
    /// The source range the error points at.
    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::Lex(LexError::UnexpectedCharacter { line, column, .. }) => {
                Range::new(Position::new(*line, *column), Position::new(*line, *column + 1))
            },
            Self::Lex(LexError::TooManyTokens { .. }) => Range::point(1, 1),
            Self::UnexpectedToken { range, .. }
            | Self::UnexpectedEndOfInput { range, .. }
            | Self::ExpectedClosingParen { range }
            | Self::UnexpectedTrailingTokens { range, .. }
            | Self::ChainedComparison { range }
            | Self::LiteralOutOfRange { range, .. }
            | Self::InvalidDate { range, .. }
            | Self::InvalidTime { range, .. }
            | Self::IdentifierReserved { range, .. }
            | Self::TooDeep { range, .. } => *range,
        }
    }
}
