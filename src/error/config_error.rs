use thiserror::Error;

/// Represents errors raised while seeding an [`Environment`] from
/// configuration.
///
/// [`Environment`]: crate::interpreter::evaluator::core::Environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An exchange-rate key that is not of the form `FROM/TO`.
    #[error("Malformed currency pair '{pair}': expected FROM/TO, e.g. USD/EUR.")]
    MalformedPair {
        /// The key as given.
        pair: String,
    },
    /// An exchange rate that is not a positive decimal.
    #[error("Invalid exchange rate '{rate}' for {pair}: expected a positive decimal.")]
    InvalidRate {
        /// The currency pair.
        pair: String,
        /// The rate as given.
        rate: String,
    },
    /// A `NAME=VALUE` setting without the `=`.
    #[error("Malformed setting '{setting}': expected NAME=VALUE.")]
    MalformedSetting {
        /// The setting as given.
        setting: String,
    },
    /// A global whose name is not a plain identifier.
    #[error("Invalid global name '{name}'.")]
    InvalidGlobalName {
        /// The name as given.
        name: String,
    },
    /// A global whose value is an expression rather than a literal.
    #[error("Global '{name}' must be a literal value, found '{source_text}'.")]
    NonLiteralGlobal {
        /// The global's name.
        name:        String,
        /// The offending value text.
        source_text: String,
    },
    /// A literal global that does not produce a value (`Feb 30 2025`).
    #[error("Global '{name}' is not a valid value: {details}")]
    InvalidGlobalValue {
        /// The global's name.
        name:    String,
        /// Why evaluation failed.
        details: String,
    },
}
