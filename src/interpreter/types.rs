/// Value kinds and the compatibility rules shared by the checker and the
/// evaluator.
pub mod compat;
/// Currency symbols, ISO 4217 codes and exchange rates.
pub mod currency;
/// Month names, leap years and calendar validation.
pub mod dates;
/// The unit table: dimensions, conversion factors and data-size bases.
pub mod units;
