/// Decimal conversion and rounding helpers.
///
/// This module provides checked conversions from `Decimal` to the integer
/// types that dates, exponents and rounding digits need, the literal reader
/// that strips grouping separators, and napkin rounding. Every conversion
/// returns a `Result` carrying the caller's error instead of truncating.
pub mod num;
