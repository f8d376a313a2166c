/// Dispatch of binary operations by operand shape.
pub mod core;
/// Checked arithmetic on plain amounts.
pub mod scalar;
/// Exponentiation.
pub mod power;
/// Arithmetic on currencies, quantities and durations, with first-unit-wins
/// conversion of the right operand.
pub mod measured;
/// Arithmetic on rates.
pub mod rate;
/// Date and time arithmetic.
pub mod calendar;
/// Comparisons and value ordering.
pub mod comparison;
