use rust_decimal::Decimal;

use crate::{
    ast::{BinaryOperator, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Environment},
        types::{
            currency::{ExchangeRates, RateLookup},
            units,
        },
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates arithmetic between numbers, currencies, quantities and
    /// durations.
    ///
    /// With a plain number on one side the operator is applied to the other
    /// side's amount and its unit is kept. With two measured operands the
    /// right one is first expressed in the left one's unit or currency
    /// (first-unit-wins); division of like measures yields a plain ratio.
    ///
    /// # Errors
    /// - [`RuntimeError::MissingExchangeRate`] when two currencies cannot be
    ///   reconciled.
    /// - Arithmetic errors from [`Environment::eval_number_op`].
    pub(crate) fn eval_measured_op(op: BinaryOperator,
                                   left: &Value,
                                   right: &Value,
                                   rates: &ExchangeRates,
                                   range: Range)
                                   -> EvalResult<Value> {
        match (left, right) {
            (measured, Value::Number(n)) => {
                let amount = Self::amount_of(measured, range)?;
                Ok(measured.with_amount(Self::eval_number_op(op, amount, *n, range)?))
            },
            (Value::Number(n), measured) => {
                let amount = Self::amount_of(measured, range)?;
                Ok(measured.with_amount(Self::eval_number_op(op, *n, amount, range)?))
            },
            _ => {
                let left_amount = Self::amount_of(left, range)?;
                let right_amount = Self::express_in(right, left, rates, range)?;
                let result = Self::eval_number_op(op, left_amount, right_amount, range)?;

                if op == BinaryOperator::Div {
                    Ok(Value::Number(result.normalize()))
                } else {
                    Ok(left.with_amount(result))
                }
            },
        }
    }

    /// Builds a rate from an amount divided by a duration: `$100 / 4 hours`
    /// is `$25/hour`.
    pub(crate) fn eval_per_duration(amount: &Value, duration: &Value, range: Range) -> EvalResult<Value> {
        let Value::Duration { amount: length, unit, .. } = duration else {
            return Err(RuntimeError::InvalidArgument { details: format!("expected a duration, found {}",
                                                                        duration.kind()),
                                                       range });
        };
        let numerator = Self::amount_of(amount, range)?;
        let per_unit = Self::eval_number_op(BinaryOperator::Div, numerator, *length, range)?;

        Ok(Value::Rate { amount: Box::new(amount.with_amount(per_unit)),
                         per:    *unit, })
    }

    /// Expresses `value`'s amount in the unit or currency of `target`.
    ///
    /// Units outside the unit table are taken as already matching, so
    /// `3 apples + 2 pears` adds the raw amounts.
    ///
    /// # Errors
    /// - [`RuntimeError::MissingExchangeRate`] for currencies with no rate.
    /// - [`RuntimeError::UnknownConversionTarget`] for known units of
    ///   different dimensions.
    pub(crate) fn express_in(value: &Value,
                             target: &Value,
                             rates: &ExchangeRates,
                             range: Range)
                             -> EvalResult<Decimal> {
        match (value, target) {
            (Value::Currency { amount, code: from, .. }, Value::Currency { code: to, .. }) => {
                Self::exchange(*amount, from, to, rates, range)
            },
            (Value::Quantity { amount, unit: from }, Value::Quantity { unit: to, .. }) => {
                Self::convert_units(*amount, from, to, range)
            },
            (Value::Duration { amount, unit: from, .. }, Value::Duration { unit: to, .. }) => {
                Self::convert_units(*amount, from.symbol, to.symbol, range)
            },
            (Value::Quantity { amount, unit: from }, Value::Duration { unit: to, .. }) => {
                Self::convert_units(*amount, from, to.symbol, range)
            },
            (Value::Duration { amount, unit: from, .. }, Value::Quantity { unit: to, .. }) => {
                Self::convert_units(*amount, from.symbol, to, range)
            },
            (other, _) => Self::amount_of(other, range),
        }
    }

    /// Converts money from one currency to another.
    pub(crate) fn exchange(amount: Decimal,
                           from: &str,
                           to: &str,
                           rates: &ExchangeRates,
                           range: Range)
                           -> EvalResult<Decimal> {
        if from == to {
            return Ok(amount);
        }
        let rate = rates.rate(from, to)
                        .ok_or_else(|| RuntimeError::MissingExchangeRate { from: from.to_string(),
                                                                           to: to.to_string(),
                                                                           range })?;
        amount.checked_mul(rate)
              .ok_or(RuntimeError::Overflow { range })
    }

    /// Converts an amount between units, leniently passing through units
    /// that are not in the unit table.
    pub(crate) fn convert_units(amount: Decimal, from: &str, to: &str, range: Range) -> EvalResult<Decimal> {
        if from == to {
            return Ok(amount);
        }
        match (units::lookup_unit(from), units::lookup_unit(to)) {
            (Some(_), Some(_)) => {
                units::convert(amount, from, to).ok_or_else(|| RuntimeError::UnknownConversionTarget {
                                                    from: from.to_string(),
                                                    target: to.to_string(),
                                                    range,
                                                })
            },
            _ => Ok(amount),
        }
    }

    /// The amount of a value that has one.
    pub(crate) fn amount_of(value: &Value, range: Range) -> EvalResult<Decimal> {
        value.amount()
             .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("expected an amount, found {}",
                                                                             value.kind()),
                                                            range })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn first_unit_wins() {
        let range = Range::point(1, 1);
        let rates = ExchangeRates::default();

        let km = Value::quantity(dec!(1), "km");
        let m = Value::quantity(dec!(500), "m");
        assert_eq!(Environment::eval_measured_op(BinaryOperator::Add, &km, &m, &rates, range),
                   Ok(Value::quantity(dec!(1.5), "km")));
        assert_eq!(Environment::eval_measured_op(BinaryOperator::Add, &m, &km, &rates, range),
                   Ok(Value::quantity(dec!(1500), "m")));
    }

    #[test]
    fn currency_needs_rate_both_ways() {
        let range = Range::point(1, 1);
        let mut rates = ExchangeRates::default();
        let usd = Value::currency(dec!(10), "USD");
        let eur = Value::currency(dec!(10), "EUR");

        assert!(matches!(Environment::express_in(&eur, &usd, &rates, range),
                         Err(RuntimeError::MissingExchangeRate { .. })));

        rates.insert("EUR", "USD", dec!(1.1));
        assert_eq!(Environment::express_in(&eur, &usd, &rates, range), Ok(dec!(11.0)));
    }

    #[test]
    fn unknown_units_pass_through() {
        let range = Range::point(1, 1);
        assert_eq!(Environment::convert_units(dec!(3), "apples", "pears", range), Ok(dec!(3)));
        assert_eq!(Environment::convert_units(dec!(3), "apples", "kg", range), Ok(dec!(3)));
    }
}
