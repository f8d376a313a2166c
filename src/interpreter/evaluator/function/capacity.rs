use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    ast::{BinaryOperator, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Environment},
            function::builtin::{first, number_arg},
        },
        types::{
            currency::ExchangeRates,
            units::{Dimension, lookup_unit, time_unit},
        },
        value::core::Value,
    },
};

/// Units tried by [`best_duration`], largest first.
const DURATION_UNITS: [&str; 5] = ["day", "h", "min", "s", "ms"];

/// `accumulate(rate, duration)`: the total a rate produces over a duration.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] unless the arguments are a rate
/// followed by a duration.
///
/// # Example
/// ```
/// use calcmark::{
///     ast::Range,
///     interpreter::{
///         evaluator::function::capacity::accumulate,
///         types::{currency::ExchangeRates, units::lookup_unit},
///         value::core::Value,
///     },
/// };
/// use rust_decimal::Decimal;
///
/// let per_hour = Value::Rate { amount: Box::new(Value::currency(Decimal::from(50), "USD")),
///                              per:    lookup_unit("hour").unwrap(), };
/// let day = Value::quantity(Decimal::from(8), "hours");
///
/// let total = accumulate(&[per_hour, day], &ExchangeRates::default(), Range::point(1, 1)).unwrap();
/// assert_eq!(total.to_string(), "400.00 USD");
/// ```
pub fn accumulate(args: &[Value], rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    match args {
        [rate @ Value::Rate { .. }, duration @ Value::Duration { .. }] => {
            Environment::apply_binary(BinaryOperator::Mul, rate, duration, rates, range)
        },
        _ => Err(RuntimeError::InvalidArgument { details: "accumulate expects a rate and a duration".to_string(),
                                                 range }),
    }
}

/// `downtime(availability, period)`: how much downtime an availability
/// target allows per period.
///
/// Availability may be a fraction (`0.999`) or a percentage (`99.9`); any
/// value above 1 is read as a percentage.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] when the availability falls
/// outside 0 to 100 percent.
pub fn downtime(args: &[Value], _rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    let mut availability = number_arg(args, 0, range)?;
    if availability > Decimal::ONE {
        availability /= dec!(100);
    }
    if availability.is_sign_negative() || availability > Decimal::ONE {
        return Err(RuntimeError::InvalidArgument { details: format!("availability must be between 0 and 100%, \
                                                                     found {availability}"),
                                                   range });
    }

    let period = seconds_of(args.get(1), range)?;
    let seconds = (Decimal::ONE - availability).checked_mul(period)
                                                .ok_or(RuntimeError::Overflow { range })?;
    best_duration(seconds, range)
}

/// `rtt(scope)`: typical round-trip time for a network scope.
pub fn rtt(args: &[Value], _rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    first(args, range).cloned()
}

/// `throughput(network)`: nominal throughput of a link, in MB per second.
pub fn throughput(args: &[Value], _rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    first(args, range).cloned()
}

/// `transfer_time(size, scope, network)`: one round trip plus the time to
/// push `size` through the link.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] when `size` is not a data
/// quantity.
pub fn transfer_time(args: &[Value], _rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    let [size, latency, link] = args else {
        return Err(RuntimeError::InvalidArgument { details: "transfer_time expects three arguments".to_string(),
                                                   range });
    };

    let megabytes = match size {
        Value::Quantity { amount, unit } if lookup_unit(unit).is_some_and(|u| u.dimension == Dimension::Data) => {
            Environment::convert_units(*amount, unit, "MB", range)?
        },
        other => {
            return Err(RuntimeError::InvalidArgument { details: format!("expected a data size, found {}",
                                                                        other.kind()),
                                                       range });
        },
    };

    let rtt_seconds = seconds_of(Some(latency), range)?;
    let per_second = match link {
        Value::Rate { amount, .. } => Environment::amount_of(amount, range)?,
        other => Environment::amount_of(other, range)?,
    };
    if per_second.is_zero() {
        return Err(RuntimeError::DivisionByZero { range });
    }

    let sending = megabytes.checked_div(per_second)
                           .ok_or(RuntimeError::Overflow { range })?;
    let total = rtt_seconds.checked_add(sending)
                           .ok_or(RuntimeError::Overflow { range })?;
    best_duration(total, range)
}

/// Expresses a number of seconds in the largest unit that keeps the amount
/// at or above one, falling back to milliseconds.
///
/// # Example
/// ```
/// use calcmark::{ast::Range, interpreter::evaluator::function::capacity::best_duration};
/// use rust_decimal::Decimal;
///
/// let d = best_duration(Decimal::from(2592), Range::point(1, 1)).unwrap();
/// assert_eq!(d.to_string(), "43.2 minutes");
/// ```
///
/// # Errors
/// Returns [`RuntimeError::Overflow`] if the conversion overflows.
pub fn best_duration(seconds: Decimal, range: Range) -> EvalResult<Value> {
    for symbol in DURATION_UNITS {
        let Some(unit) = time_unit(symbol) else {
            continue;
        };
        let Some(per) = unit.seconds() else {
            continue;
        };
        let amount = seconds.checked_div(per)
                            .ok_or(RuntimeError::Overflow { range })?;
        if amount.abs() >= Decimal::ONE || symbol == "ms" {
            return Ok(Value::duration(amount.normalize(), unit));
        }
    }
    Err(RuntimeError::Overflow { range })
}

fn seconds_of(value: Option<&Value>, range: Range) -> EvalResult<Decimal> {
    value.and_then(Value::duration_seconds)
         .ok_or_else(|| RuntimeError::InvalidArgument { details: "expected a duration".to_string(),
                                                        range })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::evaluator::function::core::KeywordKind;

    fn keyword(kind: KeywordKind, name: &str) -> Value {
        kind.resolve(name).unwrap()
    }

    #[test]
    fn three_nines_per_month() {
        let args = [Value::Number(dec!(99.9)), keyword(KeywordKind::Period, "month")];
        let allowed = downtime(&args, &ExchangeRates::default(), Range::point(1, 1)).unwrap();
        assert_eq!(allowed.to_string(), "43.2 minutes");
    }

    #[test]
    fn fractional_availability_matches_percentage() {
        let range = Range::point(1, 1);
        let rates = ExchangeRates::default();
        let day = keyword(KeywordKind::Period, "day");

        let percent = downtime(&[Value::Number(dec!(99)), day.clone()], &rates, range).unwrap();
        let fraction = downtime(&[Value::Number(dec!(0.99)), day], &rates, range).unwrap();
        assert_eq!(percent, fraction);
        assert_eq!(percent.to_string(), "14.4 minutes");
    }

    #[test]
    fn availability_out_of_range() {
        let args = [Value::Number(dec!(150)), keyword(KeywordKind::Period, "year")];
        assert!(matches!(downtime(&args, &ExchangeRates::default(), Range::point(1, 1)),
                         Err(RuntimeError::InvalidArgument { .. })));
    }

    #[test]
    fn transfer_over_gigabit() {
        let args = [Value::quantity(dec!(1), "GB"),
                    keyword(KeywordKind::Scope, "regional"),
                    keyword(KeywordKind::Network, "gigabit")];
        let time = transfer_time(&args, &ExchangeRates::default(), Range::point(1, 1)).unwrap();
        assert_eq!(time.to_string(), "8.005 seconds");
    }

    #[test]
    fn transfer_needs_a_data_size() {
        let args = [Value::quantity(dec!(1), "kg"),
                    keyword(KeywordKind::Scope, "local"),
                    keyword(KeywordKind::Network, "wifi")];
        assert!(transfer_time(&args, &ExchangeRates::default(), Range::point(1, 1)).is_err());
    }

    #[test]
    fn small_durations_use_milliseconds() {
        let d = best_duration(dec!(0.0005), Range::point(1, 1)).unwrap();
        assert_eq!(d.to_string(), "0.5 milliseconds");
    }
}
