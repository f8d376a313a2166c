use rust_decimal::MathematicalOps;

use crate::{
    ast::Range,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::builtin::number_arg},
        types::currency::ExchangeRates,
        value::core::Value,
    },
};

/// Computes the square root of a plain number.
///
/// Units do not survive a square root, so only dimensionless numbers are
/// accepted.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] for a negative number or a
/// value that is not a plain number.
///
/// # Example
/// ```
/// use calcmark::{
///     ast::Range,
///     interpreter::{
///         evaluator::function::sqrt::sqrt, types::currency::ExchangeRates, value::core::Value,
///     },
/// };
/// use rust_decimal::Decimal;
///
/// let root = sqrt(&[Value::Number(Decimal::from(144))], &ExchangeRates::default(), Range::point(1, 1));
/// assert_eq!(root.unwrap(), Value::Number(Decimal::from(12)));
///
/// let negative = sqrt(&[Value::Number(Decimal::from(-1))], &ExchangeRates::default(), Range::point(1, 1));
/// assert!(negative.is_err());
/// ```
pub fn sqrt(args: &[Value], _rates: &ExchangeRates, range: Range) -> EvalResult<Value> {
    let x = number_arg(args, 0, range)?;

    if x.is_sign_negative() && !x.is_zero() {
        return Err(RuntimeError::InvalidArgument { details: format!("cannot take the square root of {x}"),
                                                   range });
    }

    x.sqrt()
     .map(|root| Value::Number(root.normalize()))
     .ok_or(RuntimeError::Overflow { range })
}
