use rust_decimal::Decimal;

use crate::{
    ast::{BinaryOperator, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Environment},
        types::{currency::ExchangeRates, units::UnitDef},
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates arithmetic involving a rate.
    ///
    /// - `rate * duration` accumulates the rate over the duration and
    ///   returns the numerator's kind (`$50/hour * 8 hours` is `$400`).
    /// - `rate * number` and `rate / number` scale the numerator.
    /// - `rate ± rate` re-expresses the right rate per the left rate's time
    ///   unit, then combines the numerators.
    ///
    /// # Errors
    /// Returns arithmetic errors, or a conversion error when the numerators
    /// cannot be combined.
    pub(crate) fn eval_rate_op(op: BinaryOperator,
                               left: &Value,
                               right: &Value,
                               rates: &ExchangeRates,
                               range: Range)
                               -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mul, Sub};

        match (left, op, right) {
            (Value::Rate { amount, per }, Mul, duration @ Value::Duration { .. })
            | (duration @ Value::Duration { .. }, Mul, Value::Rate { amount, per }) => {
                Self::accumulate(amount, per, duration, range)
            },
            (Value::Rate { amount, per }, Mul | Div, Value::Number(n)) => {
                let numerator = Self::apply_binary(op, amount, &Value::Number(*n), rates, range)?;
                Ok(Value::Rate { amount: Box::new(numerator),
                                 per:    *per, })
            },
            (Value::Number(n), Mul, Value::Rate { amount, per }) => {
                let numerator = Self::apply_binary(op, &Value::Number(*n), amount, rates, range)?;
                Ok(Value::Rate { amount: Box::new(numerator),
                                 per:    *per, })
            },
            (Value::Rate { amount: left_amount, per }, Add | Sub, Value::Rate { amount: right_amount, per: right_per }) => {
                let rescaled = Self::rescale(right_amount, right_per, per, range)?;
                let numerator = Self::apply_binary(op, left_amount, &rescaled, rates, range)?;
                Ok(Value::Rate { amount: Box::new(numerator),
                                 per:    *per, })
            },
            _ => Err(RuntimeError::Incompatible { details: format!("Operator '{op}' cannot be applied to {} and {}",
                                                                   left.kind(),
                                                                   right.kind()),
                                                  range }),
        }
    }

    /// Multiplies a rate's numerator by how many of its time units fit in
    /// `duration`.
    pub(crate) fn accumulate(numerator: &Value,
                             per: &UnitDef,
                             duration: &Value,
                             range: Range)
                             -> EvalResult<Value> {
        let seconds = duration.duration_seconds()
                              .ok_or(RuntimeError::Overflow { range })?;
        let per_seconds = Self::unit_seconds(per, range)?;
        numerator.map_amount(range, |amount| {
                     let total = Self::eval_number_op(BinaryOperator::Mul, amount, seconds, range)?;
                     Self::eval_number_op(BinaryOperator::Div, total, per_seconds, range).map(|a| a.normalize())
                 })
    }

    /// Re-expresses a rate's numerator per a different time unit:
    /// `60 per minute` rescaled to `per hour` is `3600`.
    pub(crate) fn rescale(numerator: &Value, from: &UnitDef, to: &UnitDef, range: Range) -> EvalResult<Value> {
        if from == to {
            return Ok(numerator.clone());
        }
        let to_seconds = Self::unit_seconds(to, range)?;
        let from_seconds = Self::unit_seconds(from, range)?;
        numerator.map_amount(range, |amount| {
                     let total = Self::eval_number_op(BinaryOperator::Mul, amount, to_seconds, range)?;
                     Self::eval_number_op(BinaryOperator::Div, total, from_seconds, range).map(|a| a.normalize())
                 })
    }

    fn unit_seconds(unit: &UnitDef, range: Range) -> EvalResult<Decimal> {
        unit.seconds()
            .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("'{}' is not a unit of time",
                                                                            unit.symbol),
                                                           range })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::interpreter::types::units::time_unit;

    #[test]
    fn rate_times_duration_accumulates() {
        let range = Range::point(1, 1);
        let hourly = Value::Rate { amount: Box::new(Value::currency(dec!(50), "USD")),
                                   per:    time_unit("hour").unwrap(), };
        let shift = Value::quantity(dec!(90), "minutes");

        let pay = Environment::eval_rate_op(BinaryOperator::Mul, &hourly, &shift, &ExchangeRates::default(), range);
        assert_eq!(pay, Ok(Value::currency(dec!(75), "USD")));
    }

    #[test]
    fn rates_add_per_left_unit() {
        let range = Range::point(1, 1);
        let per_second = Value::Rate { amount: Box::new(Value::Number(dec!(1))),
                                       per:    time_unit("s").unwrap(), };
        let per_minute = Value::Rate { amount: Box::new(Value::Number(dec!(60))),
                                       per:    time_unit("min").unwrap(), };

        let sum = Environment::eval_rate_op(BinaryOperator::Add,
                                            &per_second,
                                            &per_minute,
                                            &ExchangeRates::default(),
                                            range).unwrap();
        assert_eq!(sum.to_string(), "2/second");
    }
}
