use std::cmp::Ordering;

use crate::{
    ast::Range,
    interpreter::{
        evaluator::{
            core::{EvalResult, Environment},
            function::builtin::first,
        },
        types::currency::ExchangeRates,
        value::core::Value,
    },
};

/// Returns the smallest or largest argument.
///
/// Arguments are compared after unit and currency conversion, but the
/// winner is returned exactly as it was given: `max(1 km, 900 m)` is
/// `1 km`. On ties the earliest argument wins.
///
/// The operation is selected by the `name` parameter, which must be `"min"`
/// or `"max"`.
///
/// # Errors
/// Returns the comparison error for arguments that cannot be ordered
/// against each other.
///
/// # Example
/// ```
/// use calcmark::{
///     ast::Range,
///     interpreter::{
///         evaluator::function::min_max::min_max, types::currency::ExchangeRates, value::core::Value,
///     },
/// };
/// use rust_decimal::Decimal;
///
/// let args = [Value::quantity(Decimal::ONE, "km"), Value::quantity(Decimal::from(900), "m")];
/// let r = min_max("max", &args, &ExchangeRates::default(), Range::point(1, 1)).unwrap();
/// assert_eq!(r.to_string(), "1 km");
/// ```
pub fn min_max(name: &str, args: &[Value], rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    let wanted = if name == "min" {
        Ordering::Less
    } else {
        Ordering::Greater
    };

    let mut best = first(args, range)?;
    for candidate in &args[1..] {
        if Environment::order(candidate, best, rates, range)? == wanted {
            best = candidate;
        }
    }
    Ok(best.clone())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::RuntimeError;

    #[test]
    fn min_of_plain_numbers() {
        let args = [Value::Number(dec!(3)), Value::Number(dec!(-1)), Value::Number(dec!(7))];
        let r = min_max("min", &args, &ExchangeRates::default(), Range::point(1, 1));
        assert_eq!(r, Ok(Value::Number(dec!(-1))));
    }

    #[test]
    fn unorderable_arguments_fail() {
        let args = [Value::Boolean(true), Value::Number(dec!(1))];
        assert!(matches!(min_max("max", &args, &ExchangeRates::default(), Range::point(1, 1)),
                         Err(RuntimeError::Incompatible { .. })));
    }
}
