use crate::{
    ast::{BinaryOperator, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Environment},
        types::{
            compat::{Incompatibility, binary_result},
            currency::ExchangeRates,
        },
        value::core::Value,
    },
};

/// Turns a rejected operand combination into the runtime error reported for
/// it. A currency mismatch is reported as the missing rate that would have
/// allowed it.
pub(crate) fn incompatible(problem: Incompatibility, range: Range) -> RuntimeError {
    match problem {
        Incompatibility::Currency { left, right } => RuntimeError::MissingExchangeRate { from: right,
                                                                                        to: left,
                                                                                        range },
        other => RuntimeError::Incompatible { details: other.message(),
                                              range },
    }
}

impl Environment {
    /// Evaluates a binary operation between two values using this
    /// environment's exchange rates.
    ///
    /// # Example
    /// ```
    /// use calcmark::{
    ///     ast::{BinaryOperator, Range},
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let env = Environment::new();
    /// let left = Value::quantity(Decimal::from(5), "kg");
    /// let right = Value::quantity(Decimal::from(500), "g");
    ///
    /// let sum = env.eval_binary(BinaryOperator::Add, &left, &right, Range::point(1, 1)).unwrap();
    /// assert_eq!(sum.to_string(), "5.5 kg");
    /// ```
    pub fn eval_binary(&self, op: BinaryOperator, left: &Value, right: &Value, range: Range) -> EvalResult<Value> {
        Self::apply_binary(op, left, right, self.rates(), range)
    }

    /// Evaluates `left op right` against an explicit rate table.
    ///
    /// The operand kinds are first run through the shared compatibility
    /// rules, so anything the checker would reject fails here with the same
    /// message. The operation is then routed by operand shape:
    /// - plain numbers go straight to [`Environment::eval_number_op`],
    /// - dates and times to calendar arithmetic,
    /// - rates to rate arithmetic,
    /// - an amount divided by a duration builds a rate,
    /// - everything else is measured arithmetic with first-unit-wins.
    ///
    /// # Errors
    /// Returns the compatibility failure, or any arithmetic error raised by
    /// the operation itself.
    pub fn apply_binary(op: BinaryOperator,
                        left: &Value,
                        right: &Value,
                        rates: &ExchangeRates,
                        range: Range)
                        -> EvalResult<Value> {
        use Value::{Currency, Date, Duration, Number, Quantity, Rate, Time};

        binary_result(op, &left.kind(), &right.kind(), rates).map_err(|problem| incompatible(problem, range))?;

        match (left, right) {
            (Number(a), Number(b)) => Self::eval_number_op(op, *a, *b, range).map(Number),
            (Date(_) | Time(_), _) | (_, Date(_) | Time(_)) => Self::eval_calendar_op(op, left, right, range),
            (Rate { .. }, _) | (_, Rate { .. }) => Self::eval_rate_op(op, left, right, rates, range),
            (Currency { .. } | Quantity { .. }, Duration { .. }) if op == BinaryOperator::Div => {
                Self::eval_per_duration(left, right, range)
            },
            _ => Self::eval_measured_op(op, left, right, rates, range),
        }
    }
}
