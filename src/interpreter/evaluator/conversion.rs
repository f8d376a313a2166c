use crate::{
    ast::Range,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Environment},
        types::{
            currency::{normalize, symbol_for_code},
            units::{Dimension, lookup_unit},
        },
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates `value in target`.
    ///
    /// The target is read as a unit when the unit table knows it, and as a
    /// currency code or symbol otherwise:
    /// - quantities and durations convert within their dimension;
    /// - currencies convert through the configured rates, keeping a symbol
    ///   prefix when the source amount was written with one;
    /// - a plain number takes the target as its unit or currency;
    /// - a rate whose target is a time unit is re-expressed per that unit,
    ///   any other target converts the rate's numerator.
    ///
    /// # Errors
    /// - [`RuntimeError::UnknownConversionTarget`] when the value cannot be
    ///   expressed in `target`.
    /// - [`RuntimeError::MissingExchangeRate`] for a currency pair with no
    ///   rate.
    ///
    /// # Example
    /// ```
    /// use calcmark::{
    ///     ast::Range,
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let env = Environment::new().with_exchange_rate("USD", "EUR", Decimal::new(9, 1));
    /// let range = Range::point(1, 1);
    ///
    /// let distance = Value::quantity(Decimal::from(5), "km");
    /// assert_eq!(env.eval_conversion(&distance, "m", range).unwrap().to_string(), "5,000 m");
    ///
    /// let price = Value::currency(Decimal::from(100), "USD");
    /// assert_eq!(env.eval_conversion(&price, "EUR", range).unwrap().to_string(), "90.00 EUR");
    /// ```
    pub fn eval_conversion(&self, value: &Value, target: &str, range: Range) -> EvalResult<Value> {
        let cannot = || RuntimeError::UnknownConversionTarget { from: value.kind().to_string(),
                                                               target: target.to_string(),
                                                               range };

        if let Some(unit) = lookup_unit(target) {
            return match value {
                Value::Number(n) => Ok(Value::quantity(*n, target)),
                Value::Quantity { amount, unit: from } => {
                    let converted = Self::convert_units(*amount, from, unit.symbol, range)?;
                    Ok(Value::quantity(converted, target))
                },
                Value::Duration { amount, unit: from, .. } if unit.dimension == Dimension::Time => {
                    let converted = Self::convert_units(*amount, from.symbol, unit.symbol, range)?;
                    Ok(Value::quantity(converted, target))
                },
                Value::Rate { amount, per } if unit.dimension == Dimension::Time => {
                    Ok(Value::Rate { amount: Box::new(Self::rescale(amount, per, unit, range)?),
                                     per:    unit, })
                },
                Value::Rate { amount, per } => Ok(Value::Rate { amount: Box::new(self.eval_conversion(amount,
                                                                                                     target,
                                                                                                     range)?),
                                                                per:    *per, }),
                _ => Err(cannot()),
            };
        }

        let code = normalize(target).or_else(|| normalize(&target.to_ascii_uppercase()))
                                    .ok_or_else(cannot)?;
        let symbol = symbol_for_code(&code).filter(|symbol| *symbol == target)
                                           .map(str::to_string);

        match value {
            Value::Number(n) => Ok(Value::Currency { amount: *n,
                                                     code,
                                                     symbol }),
            Value::Currency { amount, code: from, symbol: written } => {
                let amount = Self::exchange(*amount, from, &code, self.rates(), range)?;
                let symbol = symbol.or_else(|| written.as_ref().and(symbol_for_code(&code)).map(str::to_string));
                Ok(Value::Currency { amount,
                                     code,
                                     symbol })
            },
            Value::Rate { amount, per } => Ok(Value::Rate { amount: Box::new(self.eval_conversion(amount,
                                                                                                 target,
                                                                                                 range)?),
                                                            per:    *per, }),
            _ => Err(cannot()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn numbers_take_the_target_unit() {
        let env = Environment::new();
        let range = Range::point(1, 1);

        assert_eq!(env.eval_conversion(&Value::Number(dec!(3)), "hours", range),
                   Ok(Value::quantity(dec!(3), "hours")));
        assert_eq!(env.eval_conversion(&Value::Number(dec!(3)), "usd", range),
                   Ok(Value::currency(dec!(3), "USD")));
    }

    #[test]
    fn durations_convert_between_time_units() {
        let env = Environment::new();
        let range = Range::point(1, 1);
        let minutes = Value::quantity(dec!(90), "minutes");

        assert_eq!(env.eval_conversion(&minutes, "hours", range).unwrap().to_string(), "1.5 hours");
        assert!(matches!(env.eval_conversion(&minutes, "kg", range),
                         Err(RuntimeError::UnknownConversionTarget { .. })));
    }

    #[test]
    fn rates_are_reexpressed_per_target() {
        let env = Environment::new();
        let range = Range::point(1, 1);
        let per_minute = Value::Rate { amount: Box::new(Value::quantity(dec!(2), "MB")),
                                       per:    lookup_unit("min").unwrap(), };

        let per_hour = env.eval_conversion(&per_minute, "hour", range).unwrap();
        assert_eq!(per_hour.to_string(), "120 MB/hour");

        let in_kb = env.eval_conversion(&per_minute, "KB", range).unwrap();
        assert_eq!(in_kb.to_string(), "2,000 KB/minute");
    }

    #[test]
    fn dates_cannot_be_converted() {
        let env = Environment::new();
        let today = Value::Date(env.today());
        assert!(env.eval_conversion(&today, "days", Range::point(1, 1)).is_err());
    }
}
