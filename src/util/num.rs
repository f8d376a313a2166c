use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rust_decimal_macros::dec;

/// Reads a number literal as written in source, ignoring `,` and `_`
/// grouping separators.
///
/// ## Returns
/// - `Some(Decimal)`: The value, if it fits the decimal type.
/// - `None`: If the digits overflow it.
///
/// ## Example
/// ```
/// use calcmark::util::num::parse_decimal_literal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal_literal("1,234.5"), Some(Decimal::new(12345, 1)));
/// assert_eq!(parse_decimal_literal("1_000"), Some(Decimal::from(1000)));
/// ```
#[must_use]
pub fn parse_decimal_literal(text: &str) -> Option<Decimal> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && *c != '_').collect();
    Decimal::from_str(&cleaned).ok()
}

/// Safely converts a `Decimal` to `i64` if and only if it is integral and in
/// range.
///
/// ## Errors
/// Returns `Err(error)` for fractional or out-of-range values.
///
/// ## Example
/// ```
/// use calcmark::util::num::decimal_to_i64_checked;
/// use rust_decimal::Decimal;
///
/// assert_eq!(decimal_to_i64_checked(Decimal::from(42), "bad"), Ok(42));
/// assert!(decimal_to_i64_checked(Decimal::new(15, 1), "bad").is_err());
/// ```
pub fn decimal_to_i64_checked<E>(value: Decimal, error: E) -> Result<i64, E> {
    if !value.fract().is_zero() {
        return Err(error);
    }
    value.to_i64().ok_or(error)
}

/// Safely converts a `Decimal` to `u32` if and only if it is integral,
/// non-negative and in range.
///
/// ## Errors
/// Returns `Err(error)` for fractional, negative or out-of-range values.
pub fn decimal_to_u32_checked<E>(value: Decimal, error: E) -> Result<u32, E> {
    if !value.fract().is_zero() || value.is_sign_negative() {
        return Err(error);
    }
    value.to_u32().ok_or(error)
}

/// Rounds a magnitude to the nearer of the two bracketing members of the
/// 1-2-5 sequence (1, 2, 5, 10, 20, 50, ...) at its order of magnitude.
///
/// Ties round up. The sign is preserved and zero stays zero. Returns `None`
/// when rounding up would leave the decimal range.
///
/// ## Example
/// ```
/// use calcmark::util::num::napkin_round;
/// use rust_decimal::Decimal;
///
/// assert_eq!(napkin_round(Decimal::from(1_234_567)), Some(Decimal::from(1_000_000)));
/// assert_eq!(napkin_round(Decimal::from(3_500)), Some(Decimal::from(5_000)));
/// assert_eq!(napkin_round(Decimal::from(-140)), Some(Decimal::from(-100)));
/// assert_eq!(napkin_round(Decimal::MAX), None);
/// ```
#[must_use]
pub fn napkin_round(value: Decimal) -> Option<Decimal> {
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    let magnitude = value.abs();
    let scale = order_of_magnitude(magnitude);
    let mantissa = magnitude / scale;

    let (lower, upper) = if mantissa < dec!(2) {
        (dec!(1), dec!(2))
    } else if mantissa < dec!(5) {
        (dec!(2), dec!(5))
    } else {
        (dec!(5), dec!(10))
    };

    let nearest = if mantissa - lower < upper - mantissa {
        lower
    } else {
        upper
    };

    let rounded = nearest.checked_mul(scale)?.normalize();
    Some(if value.is_sign_negative() { -rounded } else { rounded })
}

/// Largest power of ten not exceeding `magnitude`. `magnitude` must be
/// positive.
fn order_of_magnitude(magnitude: Decimal) -> Decimal {
    let ten = dec!(10);
    let mut scale = Decimal::ONE;
    while let Some(next) = scale.checked_mul(ten)
          && next <= magnitude
    {
        scale = next;
    }
    while scale > magnitude {
        scale /= ten;
    }
    scale
}

/// Inserts `,` thousands separators into the integer part of a plain decimal
/// string such as `-1234567.25`.
///
/// ## Example
/// ```
/// use calcmark::util::num::group_thousands;
///
/// assert_eq!(group_thousands("-1234567.25"), "-1,234,567.25");
/// assert_eq!(group_thousands("999"), "999");
/// ```
#[must_use]
pub fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = plain.strip_prefix('-')
                                .map_or(("", plain), |rest| ("-", rest));
    let (integer, fraction) = unsigned.split_once('.')
                                      .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Rounds a value for display: two decimal places for magnitudes of at least
/// one, four below that, with trailing zeros removed.
#[must_use]
pub fn display_round(value: Decimal) -> Decimal {
    let places = if value.abs() >= Decimal::ONE { 2 } else { 4 };
    value.round_dp(places).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn napkin_rounding_near_the_decimal_limit() {
        let huge = Decimal::from_str_exact("79000000000000000000000000000").unwrap();
        assert_eq!(napkin_round(huge), None);
        assert_eq!(napkin_round(-huge), None);

        let fits = Decimal::from_str_exact("51000000000000000000000000000").unwrap();
        assert_eq!(napkin_round(fits), Decimal::from_str_exact("50000000000000000000000000000").ok());
    }

    #[test]
    fn napkin_rounding_small_magnitudes() {
        assert_eq!(napkin_round(dec!(0.0037)), Some(dec!(0.005)));
        assert_eq!(napkin_round(dec!(0.0012)), Some(dec!(0.001)));
        assert_eq!(napkin_round(Decimal::ZERO), Some(Decimal::ZERO));
    }
}
