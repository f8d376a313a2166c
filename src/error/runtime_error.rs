use thiserror::Error;

use crate::ast::Range;

/// Represents all errors that can occur during evaluation.
///
/// A runtime error aborts only the statement that raised it. Bindings made by
/// earlier statements stay in the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Tried to use a name with no binding.
    #[error("Error at {range}: Undefined variable '{name}'.")]
    UndefinedVariable {
        /// The name of the variable.
        name:  String,
        /// Where it was referenced.
        range: Range,
    },
    /// Called a function that is not in the built-in table.
    #[error("Error at {range}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name:  String,
        /// Where it was called.
        range: Range,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Error at {range}: '{name}' expects {expected} argument(s), found {found}.")]
    ArgumentCountMismatch {
        /// The name of the function.
        name:     String,
        /// Human-readable arity.
        expected: String,
        /// Number of arguments supplied.
        found:    usize,
        /// Where it was called.
        range:    Range,
    },
    /// An argument was invalid or out of range.
    #[error("Error at {range}: Invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// Where it was supplied.
        range:   Range,
    },
    /// Operand kinds that the type rules reject.
    #[error("Error at {range}: {details}.")]
    Incompatible {
        /// Description produced by the compatibility rules.
        details: String,
        /// Where the operation was written.
        range:   Range,
    },
    /// Currency arithmetic or conversion with no configured rate.
    #[error("Error at {range}: No exchange rate from {from} to {to}.")]
    MissingExchangeRate {
        /// Source currency code.
        from:  String,
        /// Target currency code.
        to:    String,
        /// Where the conversion was needed.
        range: Range,
    },
    /// `in <unit>` with a target the value cannot be expressed in.
    #[error("Error at {range}: Cannot convert {from} to '{target}'.")]
    UnknownConversionTarget {
        /// Description of the source value's unit.
        from:   String,
        /// The requested target.
        target: String,
        /// Where the conversion was written.
        range:  Range,
    },
    /// A date literal naming a day that does not exist.
    #[error("Error at {range}: Invalid date: {details}.")]
    InvalidDate {
        /// Details naming the valid day range.
        details: String,
        /// Where the literal was written.
        range:   Range,
    },
    /// Date arithmetic stepped outside the representable calendar.
    #[error("Error at {range}: Date out of range.")]
    DateOutOfRange {
        /// Where the operation was written.
        range: Range,
    },
    /// Decimal arithmetic overflowed.
    #[error("Error at {range}: Numeric overflow while computing the result.")]
    Overflow {
        /// Where the operation was written.
        range: Range,
    },
    /// Attempted division or modulus by zero.
    #[error("Error at {range}: Division by zero.")]
    DivisionByZero {
        /// Where the operation was written.
        range: Range,
    },
}

impl RuntimeError {
    /// The source range the error points at.
    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::UndefinedVariable { range, .. }
            | Self::UnknownFunction { range, .. }
            | Self::ArgumentCountMismatch { range, .. }
            | Self::InvalidArgument { range, .. }
            | Self::Incompatible { range, .. }
            | Self::MissingExchangeRate { range, .. }
            | Self::UnknownConversionTarget { range, .. }
            | Self::InvalidDate { range, .. }
            | Self::DateOutOfRange { range }
            | Self::Overflow { range }
            | Self::DivisionByZero { range } => *range,
        }
    }
}
