use std::cmp::Ordering;

use crate::{
    ast::{ComparisonOperator, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::incompatible,
            core::{EvalResult, Environment},
        },
        types::{compat::comparison_result, currency::ExchangeRates},
        value::core::Value,
    },
};

/// Maps an operator and an ordering to the comparison's outcome.
#[must_use]
pub const fn ordering_satisfies(op: ComparisonOperator, ordering: Ordering) -> bool {
    match op {
        ComparisonOperator::Less => ordering.is_lt(),
        ComparisonOperator::Greater => ordering.is_gt(),
        ComparisonOperator::LessEqual => ordering.is_le(),
        ComparisonOperator::GreaterEqual => ordering.is_ge(),
        ComparisonOperator::Equal => ordering.is_eq(),
        ComparisonOperator::NotEqual => ordering.is_ne(),
    }
}

impl Environment {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// Operands are reconciled the same way arithmetic reconciles them: the
    /// right operand is expressed in the left one's unit or currency before
    /// the amounts are compared.
    ///
    /// # Returns
    /// A [`Value::Boolean`].
    ///
    /// # Example
    /// ```
    /// use calcmark::{
    ///     ast::{ComparisonOperator, Range},
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let env = Environment::new();
    /// let mile = Value::quantity(Decimal::ONE, "mi");
    /// let km = Value::quantity(Decimal::ONE, "km");
    ///
    /// let result = env.eval_comparison(ComparisonOperator::Greater, &mile, &km, Range::point(1, 1));
    /// assert_eq!(result.unwrap(), Value::Boolean(true));
    /// ```
    pub fn eval_comparison(&self,
                           op: ComparisonOperator,
                           left: &Value,
                           right: &Value,
                           range: Range)
                           -> EvalResult<Value> {
        Self::compare(op, left, right, self.rates(), range).map(Value::Boolean)
    }

    /// Decides `left op right` against an explicit rate table.
    ///
    /// # Errors
    /// Returns the compatibility failure for operands that cannot be
    /// compared, or a conversion error.
    pub fn compare(op: ComparisonOperator,
                   left: &Value,
                   right: &Value,
                   rates: &ExchangeRates,
                   range: Range)
                   -> EvalResult<bool> {
        comparison_result(op, &left.kind(), &right.kind(), rates).map_err(|problem| incompatible(problem, range))?;
        Self::order(left, right, rates, range).map(|ordering| ordering_satisfies(op, ordering))
    }

    /// Orders two comparable values.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Incompatible`] for values with no common
    /// ordering, or a conversion error.
    pub fn order(left: &Value, right: &Value, rates: &ExchangeRates, range: Range) -> EvalResult<Ordering> {
        match (left, right) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Ok(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Ok(a.cmp(b)),
            (Value::Rate { amount: a, per: left_per }, Value::Rate { amount: b, per: right_per }) => {
                let rescaled = Self::rescale(b, right_per, left_per, range)?;
                Self::order(a, &rescaled, rates, range)
            },
            (Value::Number(a), other) | (other, Value::Number(a)) if other.amount().is_some() => {
                let b = Self::amount_of(other, range)?;
                Ok(if matches!(left, Value::Number(_)) {
                       a.cmp(&b)
                   } else {
                       b.cmp(a)
                   })
            },
            _ if left.amount().is_some() && right.amount().is_some() => {
                let a = Self::amount_of(left, range)?;
                let b = Self::express_in(right, left, rates, range)?;
                Ok(a.cmp(&b))
            },
            _ => Err(RuntimeError::Incompatible { details: format!("Cannot compare {} with {}",
                                                                   left.kind(),
                                                                   right.kind()),
                                                  range }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn booleans_only_support_equality() {
        let range = Range::point(1, 1);
        let rates = ExchangeRates::default();
        let yes = Value::Boolean(true);

        assert_eq!(Environment::compare(ComparisonOperator::Equal, &yes, &yes, &rates, range), Ok(true));
        assert!(matches!(Environment::compare(ComparisonOperator::Less, &yes, &yes, &rates, range),
                         Err(RuntimeError::Incompatible { .. })));
    }

    #[test]
    fn currencies_compare_after_exchange() {
        let range = Range::point(1, 1);
        let mut rates = ExchangeRates::default();
        rates.insert("EUR", "USD", dec!(1.1));

        let usd = Value::currency(dec!(105), "USD");
        let eur = Value::currency(dec!(100), "EUR");
        assert_eq!(Environment::compare(ComparisonOperator::Less, &usd, &eur, &rates, range), Ok(true));
    }

    #[test]
    fn number_against_measure_compares_amounts() {
        let range = Range::point(1, 1);
        let rates = ExchangeRates::default();
        let price = Value::currency(dec!(20), "USD");

        assert_eq!(Environment::compare(ComparisonOperator::Greater, &Value::Number(dec!(30)), &price, &rates, range),
                   Ok(true));
        assert_eq!(Environment::compare(ComparisonOperator::Greater, &price, &Value::Number(dec!(30)), &rates, range),
                   Ok(false));
    }
}
