use rust_decimal::{Decimal, MathematicalOps};

use crate::{
    ast::Range,
    error::RuntimeError,
    interpreter::evaluator::core::{EvalResult, Environment},
    util::num::decimal_to_i64_checked,
};

impl Environment {
    /// Evaluates an exponentiation.
    ///
    /// Integral exponents use repeated multiplication so `2 ^ 10` is exact;
    /// fractional exponents go through `powd`, which is only defined for a
    /// non-negative base.
    ///
    /// # Parameters
    /// - `base`: The base.
    /// - `exponent`: The exponent.
    /// - `range`: Source range for error reporting.
    ///
    /// # Returns
    /// `base ^ exponent`, normalized.
    ///
    /// # Example
    /// ```
    /// use calcmark::{ast::Range, interpreter::evaluator::core::Environment};
    /// use rust_decimal::Decimal;
    ///
    /// let result = Environment::eval_pow(Decimal::from(2), Decimal::from(10), Range::point(1, 1)).unwrap();
    /// assert_eq!(result, Decimal::from(1024));
    /// ```
    pub fn eval_pow(base: Decimal, exponent: Decimal, range: Range) -> EvalResult<Decimal> {
        if base.is_zero() && exponent.is_sign_negative() {
            return Err(RuntimeError::DivisionByZero { range });
        }

        let result = if exponent.fract().is_zero() {
            let exponent = decimal_to_i64_checked(exponent, RuntimeError::Overflow { range })?;
            base.checked_powi(exponent)
        } else {
            if base.is_sign_negative() {
                return Err(RuntimeError::InvalidArgument { details: format!("cannot raise negative {base} to the \
                                                                             fractional power {exponent}"),
                                                           range });
            }
            base.checked_powd(exponent)
        };

        result.map(|r| r.normalize())
              .ok_or(RuntimeError::Overflow { range })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn negative_and_fractional_exponents() {
        let range = Range::point(1, 1);
        assert_eq!(Environment::eval_pow(dec!(2), dec!(-2), range), Ok(dec!(0.25)));
        assert_eq!(Environment::eval_pow(dec!(0), dec!(-1), range),
                   Err(RuntimeError::DivisionByZero { range }));
        assert!(matches!(Environment::eval_pow(dec!(-8), dec!(0.5), range),
                         Err(RuntimeError::InvalidArgument { .. })));
    }
}
