use rust_decimal::Decimal;

use crate::{
    ast::{BinaryOperator, Range},
    interpreter::{
        evaluator::{
            core::{EvalResult, Environment},
            function::builtin::first,
        },
        types::{
            compat::{Kind, normalize},
            currency::{ExchangeRates, RateLookup},
        },
        value::core::Value,
    },
};

/// Adds every argument with the same rules as `+`.
///
/// The first argument's unit or currency wins, so `sum(1 km, 500 m)` is
/// `1.5 km`.
///
/// # Errors
/// Returns the first error `+` would raise for a pair of arguments.
pub fn sum(args: &[Value], rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    let head = first(args, range)?.clone();
    args[1..].iter()
             .try_fold(head, |total, next| {
                 Environment::apply_binary(BinaryOperator::Add, &total, next, rates, range)
             })
}

/// Arithmetic mean of the arguments.
///
/// When every argument has the same kind (one unit, or all durations) the
/// mean keeps that unit. Currencies are converted into the first argument's
/// code when every rate is known. Otherwise the raw amounts are averaged and
/// the result is a plain number, so `avg($100, €200)` is `150` when no
/// USD/EUR rate is configured.
///
/// # Errors
/// Returns [`crate::error::RuntimeError::InvalidArgument`] for arguments that
/// have no amount, such as dates or booleans.
///
/// # Example
/// ```
/// use calcmark::{
///     ast::Range,
///     interpreter::{
///         evaluator::function::aggregate::avg, types::currency::ExchangeRates, value::core::Value,
///     },
/// };
/// use rust_decimal::Decimal;
///
/// let rates = ExchangeRates::default();
/// let range = Range::point(1, 1);
///
/// let shared = [Value::currency(Decimal::from(100), "USD"), Value::currency(Decimal::from(200), "USD")];
/// assert_eq!(avg(&shared, &rates, range).unwrap(), Value::currency(Decimal::from(150), "USD"));
///
/// let mixed = [Value::currency(Decimal::from(100), "USD"), Value::currency(Decimal::from(200), "EUR")];
/// assert_eq!(avg(&mixed, &rates, range).unwrap(), Value::Number(Decimal::from(150)));
/// ```
pub fn avg(args: &[Value], rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    let count = Value::Number(Decimal::from(args.len()));
    let kind = normalize(&first(args, range)?.kind());
    let convertible = |arg: &Value| match (&kind, arg) {
        (Kind::Currency(to), Value::Currency { code, .. }) => rates.can_convert(code, to),
        _ => normalize(&arg.kind()) == kind,
    };

    if args.iter().all(convertible) {
        let total = sum(args, rates, range)?;
        return Environment::apply_binary(BinaryOperator::Div, &total, &count, rates, range);
    }

    let total = args.iter().try_fold(Decimal::ZERO, |total, arg| {
                                let amount = Environment::amount_of(arg, range)?;
                                Environment::eval_number_op(BinaryOperator::Add, total, amount, range)
                            })?;
    let mean = Environment::eval_number_op(BinaryOperator::Div, total, Decimal::from(args.len()), range)?;
    Ok(Value::Number(mean.normalize()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::RuntimeError;

    #[test]
    fn sum_converts_to_the_first_unit() {
        let args = [Value::quantity(dec!(1), "km"), Value::quantity(dec!(500), "m")];
        let total = sum(&args, &ExchangeRates::default(), Range::point(1, 1)).unwrap();
        assert_eq!(total.to_string(), "1.5 km");
    }

    #[test]
    fn sum_of_unrelated_dimensions_fails() {
        let args = [Value::quantity(dec!(1), "km"), Value::quantity(dec!(1), "kg")];
        assert!(sum(&args, &ExchangeRates::default(), Range::point(1, 1)).is_err());
    }

    #[test]
    fn avg_of_durations_keeps_the_first_unit() {
        let args = [Value::quantity(dec!(1), "hour"), Value::quantity(dec!(30), "minutes")];
        let mean = avg(&args, &ExchangeRates::default(), Range::point(1, 1)).unwrap();
        assert_eq!(mean.to_string(), "0.75 hours");
    }

    #[test]
    fn avg_converts_currencies_with_known_rates() {
        let mut rates = ExchangeRates::default();
        rates.insert("EUR", "USD", dec!(2));
        let args = [Value::currency(dec!(100), "USD"), Value::currency(dec!(100), "EUR")];

        let mean = avg(&args, &rates, Range::point(1, 1)).unwrap();
        assert_eq!(mean, Value::currency(dec!(150), "USD"));
    }

    #[test]
    fn avg_rejects_values_without_an_amount() {
        let args = [Value::Boolean(true), Value::Number(dec!(1))];
        assert!(matches!(avg(&args, &ExchangeRates::default(), Range::point(1, 1)),
                         Err(RuntimeError::InvalidArgument { .. })));
    }
}
