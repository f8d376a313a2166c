/// Binary operator evaluation logic.
///
/// Handles arithmetic between every pair of value kinds: plain numbers,
/// measured amounts, rates, dates and times. Also holds comparisons.
pub mod binary;

/// `in`/`as` conversion between units and currencies.
pub mod conversion;

/// Core evaluation logic and the environment.
///
/// Contains the main evaluation engine, the name bindings, the exchange rates
/// in effect and the reference date for relative date literals.
pub mod core;

/// Function evaluation.
///
/// Handles built-in function calls, argument checking, and keyword
/// arguments.
pub mod function;

/// Unary operator evaluation logic.
pub mod unary;
