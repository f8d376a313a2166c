use rust_decimal::Decimal;

use crate::{
    ast::{BinaryOperator, Range},
    error::RuntimeError,
    interpreter::evaluator::core::{EvalResult, Environment},
};

impl Environment {
    /// Applies an arithmetic operator to two plain amounts.
    ///
    /// Every other binary evaluation path reduces to this one once units
    /// and currencies have been reconciled. All arithmetic is checked.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left amount.
    /// - `right`: Right amount.
    /// - `range`: Source range for error reporting.
    ///
    /// # Errors
    /// - [`RuntimeError::DivisionByZero`] for `/` or `%` by zero.
    /// - [`RuntimeError::Overflow`] when the result does not fit.
    ///
    /// # Example
    /// ```
    /// use calcmark::{
    ///     ast::{BinaryOperator, Range},
    ///     error::RuntimeError,
    ///     interpreter::evaluator::core::Environment,
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let range = Range::point(1, 1);
    /// let seven = Environment::eval_number_op(BinaryOperator::Add,
    ///                                         Decimal::from(3),
    ///                                         Decimal::from(4),
    ///                                         range).unwrap();
    /// assert_eq!(seven, Decimal::from(7));
    ///
    /// assert_eq!(Environment::eval_number_op(BinaryOperator::Mod, Decimal::ONE, Decimal::ZERO, range),
    ///            Err(RuntimeError::DivisionByZero { range }));
    /// ```
    pub fn eval_number_op(op: BinaryOperator, left: Decimal, right: Decimal, range: Range) -> EvalResult<Decimal> {
        use BinaryOperator::{Add, Div, Mod, Mul, Pow, Sub};

        let overflow = RuntimeError::Overflow { range };
        match op {
            Add => left.checked_add(right).ok_or(overflow),
            Sub => left.checked_sub(right).ok_or(overflow),
            Mul => left.checked_mul(right).ok_or(overflow),
            Div | Mod if right.is_zero() => Err(RuntimeError::DivisionByZero { range }),
            Div => left.checked_div(right).ok_or(overflow),
            Mod => left.checked_rem(right).ok_or(overflow),
            Pow => Self::eval_pow(left, right, range),
        }
    }
}
