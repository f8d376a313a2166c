/// The runtime value type.
///
/// Defines [`core::Value`], its static kind, and amount helpers shared by
/// the evaluator and the built-in functions.
pub mod core;
/// Human-readable rendering of values.
///
/// Grouping separators, currency symbol/code fidelity, unit pluralization,
/// and date, time and rate layouts.
pub mod format;
