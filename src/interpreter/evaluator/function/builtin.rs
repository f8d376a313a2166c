use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    ast::Range,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult, types::currency::ExchangeRates, value::core::Value,
    },
    util::num::decimal_to_u32_checked,
};

/// Largest number of decimal places `round` accepts.
const MAX_DIGITS: u32 = 28;

/// Applies a rounding-style builtin to the amount of a value.
///
/// Units, currencies and rate denominators are kept, so `floor($9.99)` is
/// `$9.00`. Halves round away from zero.
///
/// # Parameters
/// - `name`: One of `"abs"`, `"floor"`, `"ceil"`, `"round"`.
/// - `args`: Slice containing one argument.
/// - `range`: Range of the call.
///
/// # Example
/// ```
/// use calcmark::{
///     ast::Range,
///     interpreter::{evaluator::function::builtin::unary_round, value::core::Value},
/// };
/// use rust_decimal::Decimal;
///
/// let r = unary_round("round", &[Value::Number(Decimal::new(25, 1))], Range::point(1, 1)).unwrap();
/// assert_eq!(r, Value::Number(Decimal::from(3)));
///
/// let r = unary_round("abs", &[Value::quantity(Decimal::from(-4), "kg")], Range::point(1, 1)).unwrap();
/// assert_eq!(r.to_string(), "4 kg");
/// ```
pub fn unary_round(name: &str, args: &[Value], range: Range) -> EvalResult<Value> {
    let value = first(args, range)?;
    value.map_amount(range, |amount| {
             Ok(match name {
                 "abs" => amount.abs(),
                 "floor" => amount.floor(),
                 "ceil" => amount.ceil(),
                 _ => amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
             })
         })
}

/// `round(x)` or `round(x, digits)`.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] when `digits` is not a whole
/// number between 0 and 28.
pub fn round(args: &[Value], _rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    let value = first(args, range)?;
    let Some(digits) = args.get(1) else {
        return unary_round("round", args, range);
    };

    let digits = digits.as_number(range)?;
    let invalid = RuntimeError::InvalidArgument { details: format!("round expects 0 to {MAX_DIGITS} digits, found \
                                                                    {digits}"),
                                                  range };
    let digits = decimal_to_u32_checked(digits, invalid.clone())?;
    if digits > MAX_DIGITS {
        return Err(invalid);
    }

    value.map_amount(range, |amount| {
             Ok(amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero))
         })
}

pub(super) fn first(args: &[Value], range: Range) -> EvalResult<&Value> {
    args.first()
        .ok_or_else(|| RuntimeError::InvalidArgument { details: "expected at least one argument".to_string(),
                                                       range })
}

/// Reads a plain number argument.
pub(super) fn number_arg(args: &[Value], index: usize, range: Range) -> EvalResult<Decimal> {
    args.get(index)
        .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("missing argument {}", index + 1),
                                                       range })?
        .as_number(range)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_to_digits_keeps_currency() {
        let range = Range::point(1, 1);
        let price = Value::currency(dec!(19.456), "USD");

        let rounded = round(&[price, Value::Number(dec!(1))], &ExchangeRates::default(), range).unwrap();
        assert_eq!(rounded, Value::currency(dec!(19.5), "USD"));
    }

    #[test]
    fn round_rejects_fractional_digits() {
        let range = Range::point(1, 1);
        let args = [Value::Number(dec!(1.5)), Value::Number(dec!(0.5))];
        assert!(matches!(round(&args, &ExchangeRates::default(), range),
                         Err(RuntimeError::InvalidArgument { .. })));
    }
}
