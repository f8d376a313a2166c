use crate::{
    ast::{Range, UnaryOperator},
    interpreter::{
        evaluator::{
            binary::core::incompatible,
            core::{EvalResult, Environment},
        },
        types::compat::unary_result,
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates a prefix operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: flips the sign of the amount, keeping unit, currency or
    ///   rate denominator.
    /// - `Plus`: returns the value unchanged.
    ///
    /// Dates, times and booleans have no sign.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `range`: Source range for error reporting.
    ///
    /// # Example
    /// ```
    /// use calcmark::{
    ///     ast::{Range, UnaryOperator},
    ///     interpreter::{evaluator::core::Environment, value::core::Value},
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let debt = Value::currency(Decimal::from(20), "EUR");
    /// let v = Environment::eval_unary(UnaryOperator::Negate, &debt, Range::point(1, 1)).unwrap();
    /// assert_eq!(v, Value::currency(Decimal::from(-20), "EUR"));
    ///
    /// let flag = Value::Boolean(true);
    /// assert!(Environment::eval_unary(UnaryOperator::Negate, &flag, Range::point(1, 1)).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, range: Range) -> EvalResult<Value> {
        unary_result(op, &value.kind()).map_err(|problem| incompatible(problem, range))?;

        match op {
            UnaryOperator::Plus => Ok(value.clone()),
            UnaryOperator::Negate => {
                value.map_amount(range, |amount| Ok(if amount.is_zero() { amount } else { -amount }))
            },
        }
    }
}
