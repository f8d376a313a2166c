use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::{
    ast::Range,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        types::{
            compat::Kind,
            units::{Dimension, UnitDef, lookup_unit},
        },
    },
};

/// Represents a runtime value in the interpreter.
///
/// Values are immutable. Currency, quantity and duration values keep the
/// symbol, code or unit the user wrote so the formatter can echo it back.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A dimensionless decimal.
    Number(Decimal),
    /// An amount of money.
    Currency {
        /// The amount.
        amount: Decimal,
        /// ISO code, or the free-form code the user wrote.
        code:   String,
        /// Leading symbol when the amount was written with one (`$100`).
        symbol: Option<String>,
    },
    /// An amount with a unit. The unit may be unknown to the unit table, in
    /// which case it is carried along as a label.
    Quantity {
        /// The amount.
        amount: Decimal,
        /// Unit as written.
        unit:   String,
    },
    /// A calendar date.
    Date(NaiveDate),
    /// A wall-clock time.
    Time(NaiveTime),
    /// A signed amount of time.
    Duration {
        /// The amount, in `unit`s.
        amount:  Decimal,
        /// A time unit from the unit table.
        unit:    &'static UnitDef,
        /// The unit as written in the source. Computed durations have none
        /// and print the unit's long name.
        written: Option<String>,
    },
    /// A boolean, produced by literals and comparisons.
    Boolean(bool),
    /// An amount per unit of time (`$50/hour`).
    Rate {
        /// The numerator: a number, currency, quantity or duration.
        amount: Box<Self>,
        /// The time unit of the denominator.
        per:    &'static UnitDef,
    },
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

impl Value {
    /// Builds a currency value with no display symbol.
    #[must_use]
    pub fn currency(amount: Decimal, code: &str) -> Self {
        Self::Currency { amount,
                         code: code.to_string(),
                         symbol: None }
    }

    /// Builds a quantity, turning time units into a [`Value::Duration`].
    #[must_use]
    pub fn quantity(amount: Decimal, unit: &str) -> Self {
        match lookup_unit(unit) {
            Some(def) if def.dimension == Dimension::Time => Self::Duration { amount,
                                                                              unit: def,
                                                                              written: Some(unit.to_string()) },
            _ => Self::Quantity { amount,
                                  unit: unit.to_string() },
        }
    }

    /// A duration that was computed rather than written, shown with the
    /// unit's long name.
    #[must_use]
    pub const fn duration(amount: Decimal, unit: &'static UnitDef) -> Self {
        Self::Duration { amount,
                         unit,
                         written: None }
    }

    /// The static kind of this value, as the compatibility rules see it.
    ///
    /// # Example
    /// ```
    /// use calcmark::interpreter::{types::compat::Kind, value::core::Value};
    /// use rust_decimal::Decimal;
    ///
    /// let price = Value::currency(Decimal::from(5), "EUR");
    /// assert_eq!(price.kind(), Kind::Currency("EUR".to_string()));
    /// assert_eq!(Value::quantity(Decimal::ONE, "hours").kind(), Kind::Duration);
    /// ```
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Number(_) => Kind::Number,
            Self::Currency { code, .. } => Kind::Currency(code.clone()),
            Self::Quantity { unit, .. } => Kind::Quantity(unit.clone()),
            Self::Date(_) => Kind::Date,
            Self::Time(_) => Kind::Time,
            Self::Duration { .. } => Kind::Duration,
            Self::Boolean(_) => Kind::Boolean,
            Self::Rate { amount, .. } => Kind::Rate(Box::new(amount.kind())),
        }
    }

    /// The numeric amount of a number, currency, quantity or duration.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Number(amount)
            | Self::Currency { amount, .. }
            | Self::Quantity { amount, .. }
            | Self::Duration { amount, .. } => Some(*amount),
            _ => None,
        }
    }

    /// Returns a copy with the amount replaced, keeping unit, code and
    /// symbol. For rates the numerator's amount is replaced.
    #[must_use]
    pub fn with_amount(&self, amount: Decimal) -> Self {
        match self {
            Self::Number(_) => Self::Number(amount),
            Self::Currency { code, symbol, .. } => Self::Currency { amount,
                                                                    code: code.clone(),
                                                                    symbol: symbol.clone() },
            Self::Quantity { unit, .. } => Self::Quantity { amount,
                                                            unit: unit.clone() },
            Self::Duration { unit, written, .. } => Self::Duration { amount,
                                                                     unit: *unit,
                                                                     written: written.clone() },
            Self::Rate { amount: numerator, per } => Self::Rate { amount: Box::new(numerator.with_amount(amount)),
                                                                  per:    *per, },
            other => other.clone(),
        }
    }

    /// Applies `f` to the amount, keeping units. Values without an amount are
    /// rejected.
    ///
    /// # Errors
    /// Propagates `f`'s error, or [`RuntimeError::InvalidArgument`] when the
    /// value has no amount.
    pub fn map_amount(&self, range: Range, f: impl FnOnce(Decimal) -> EvalResult<Decimal>) -> EvalResult<Self> {
        let amount = match self {
            Self::Rate { amount, .. } => amount.amount(),
            other => other.amount(),
        };
        let details = || format!("expected a numeric value, found {}", self.kind());
        let amount = amount.ok_or_else(|| RuntimeError::InvalidArgument { details: details(),
                                                                          range })?;
        Ok(self.with_amount(f(amount)?))
    }

    /// Extracts a plain number.
    ///
    /// # Errors
    /// Returns [`RuntimeError::InvalidArgument`] for any other kind of value.
    pub fn as_number(&self, range: Range) -> EvalResult<Decimal> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(RuntimeError::InvalidArgument { details: format!("expected a number, found {}",
                                                                          other.kind()),
                                                         range }),
        }
    }

    /// The length of a duration in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<Decimal> {
        match self {
            Self::Duration { amount, unit, .. } => amount.checked_mul(unit.seconds()?),
            _ => None,
        }
    }

    /// Whether the value's amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount().is_some_and(|a| a.is_zero())
    }
}
