use crate::{
    ast::{BinaryOperator, ComparisonOperator, UnaryOperator},
    interpreter::types::{
        currency::RateLookup,
        units::{self, Dimension},
    },
};

/// The static kind of a value, as far as it can be known without evaluating.
///
/// Kinds are what the checker infers and what the evaluator's values report,
/// so both run the same compatibility rules over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Dimensionless number.
    Number,
    /// Money in the given currency code.
    Currency(String),
    /// An amount in the given unit (as written, possibly unknown to the unit
    /// table).
    Quantity(String),
    /// A calendar date.
    Date,
    /// A wall-clock time.
    Time,
    /// An amount of time.
    Duration,
    /// `true` or `false`.
    Boolean,
    /// An amount per unit of time; the box holds the numerator's kind.
    Rate(Box<Kind>),
    /// Not statically known. Compatible with everything.
    Unknown,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::Currency(code) => write!(f, "{code}"),
            Self::Quantity(unit) => match units::dimension_of(unit) {
                Some(dimension) => write!(f, "{dimension} ({unit})"),
                None => write!(f, "{unit}"),
            },
            Self::Date => write!(f, "date"),
            Self::Time => write!(f, "time"),
            Self::Duration => write!(f, "duration"),
            Self::Boolean => write!(f, "boolean"),
            Self::Rate(numerator) => write!(f, "{numerator} rate"),
            Self::Unknown => write!(f, "value"),
        }
    }
}

/// Why two kinds cannot be combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incompatibility {
    /// Two currencies with no exchange rate between them.
    Currency {
        /// Left code.
        left:  String,
        /// Right code.
        right: String,
    },
    /// Two units of different dimensions.
    Units {
        /// Left unit.
        left:  String,
        /// Right unit.
        right: String,
    },
    /// `date + date`.
    DatePlusDate,
    /// `duration - date`.
    DurationMinusDate,
    /// Any other operator/kind combination the rules reject.
    Type {
        /// The operator as written.
        op:    String,
        /// Left kind.
        left:  Kind,
        /// Right kind, absent for unary operators.
        right: Option<Kind>,
    },
}

impl Incompatibility {
    /// One-line description.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Currency { left, right } => {
                format!("Cannot combine {left} and {right} without an exchange rate")
            },
            Self::Units { left, right } => {
                let describe = |unit: &str| {
                    units::dimension_of(unit).map_or_else(|| unit.to_string(), |d| format!("{d} ({unit})"))
                };
                format!("Cannot combine {} with {}", describe(left), describe(right))
            },
            Self::DatePlusDate => "Cannot add two dates".to_string(),
            Self::DurationMinusDate => "Cannot subtract a date from a duration".to_string(),
            Self::Type { op, left, right: Some(right) } => {
                format!("Operator '{op}' cannot be applied to {left} and {right}")
            },
            Self::Type { op, left, right: None } => format!("Operator '{op}' cannot be applied to {left}"),
        }
    }

    /// A suggestion for fixing the expression, when there is an obvious one.
    #[must_use]
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Currency { left, right } => {
                Some(format!("Configure an exchange rate such as {right}/{left}"))
            },
            Self::DatePlusDate => Some("Subtract the dates to get the duration between them".to_string()),
            Self::DurationMinusDate => Some("Reverse the operands: date - duration".to_string()),
            Self::Units { .. } | Self::Type { .. } => None,
        }
    }
}

fn type_error(op: impl ToString, left: &Kind, right: &Kind) -> Incompatibility {
    Incompatibility::Type { op:    op.to_string(),
                            left:  left.clone(),
                            right: Some(right.clone()), }
}

fn is_numeric_like(kind: &Kind) -> bool {
    matches!(kind, Kind::Number | Kind::Unknown)
}

/// Whether a quantity's unit is a time unit, which makes it a duration.
fn is_time_quantity(unit: &str) -> bool {
    units::dimension_of(unit) == Some(Dimension::Time)
}

/// Resolves the kind produced by `left op right`, or why the operation is not
/// allowed.
///
/// Both the checker and the evaluator call this before doing any arithmetic,
/// so a statement that checks cleanly cannot fail evaluation on kinds alone.
///
/// # Example
/// ```
/// use calcmark::{
///     ast::BinaryOperator,
///     interpreter::types::{
///         compat::{Incompatibility, Kind, binary_result},
///         currency::NoRates,
///     },
/// };
///
/// let usd = Kind::Currency("USD".to_string());
/// let eur = Kind::Currency("EUR".to_string());
///
/// assert_eq!(binary_result(BinaryOperator::Add, &usd, &Kind::Number, &NoRates), Ok(usd.clone()));
/// assert!(matches!(binary_result(BinaryOperator::Add, &usd, &eur, &NoRates),
///                  Err(Incompatibility::Currency { .. })));
/// assert_eq!(binary_result(BinaryOperator::Sub, &Kind::Date, &Kind::Date, &NoRates),
///            Ok(Kind::Duration));
/// ```
///
/// # Errors
/// Returns the [`Incompatibility`] describing the rejected combination.
pub fn binary_result<R>(op: BinaryOperator,
                        left: &Kind,
                        right: &Kind,
                        rates: &R)
                        -> Result<Kind, Incompatibility>
    where R: RateLookup + ?Sized
{
    use BinaryOperator::{Add, Div, Mod, Mul, Pow, Sub};
    use Kind::{Boolean, Currency, Date, Duration, Number, Quantity, Rate, Time, Unknown};

    // Time-dimension quantities behave as durations.
    let left = normalize(left);
    let right = normalize(right);
    let (left, right) = (&left, &right);

    match (left, op, right) {
        (Boolean, ..) | (_, _, Boolean) => Err(type_error(op, left, right)),

        (Unknown, _, Unknown) => Ok(Unknown),
        (Unknown, Add | Sub | Mul | Div | Mod, Number) | (Number, Add | Sub | Mul | Div | Mod | Pow, Unknown) => {
            Ok(Unknown)
        },
        (Unknown, Pow, _) | (_, Pow, Unknown) => Ok(Number),
        (Unknown, Mul, other) | (other, Add | Sub | Mul | Div | Mod, Unknown) => Ok(other.clone()),
        (Unknown, Add | Sub, other) => Ok(other.clone()),
        (Unknown, Div | Mod, _) => Ok(Unknown),

        (Number, _, Number) => Ok(Number),
        (_, Pow, _) => Err(type_error(op, left, right)),

        // Dates.
        (Date, Add, Date) => Err(Incompatibility::DatePlusDate),
        (Date, Sub, Date) => Ok(Duration),
        (Date, Add | Sub, Duration) | (Duration, Add, Date) => Ok(Date),
        (Duration, Sub, Date) => Err(Incompatibility::DurationMinusDate),
        (Date, ..) | (_, _, Date) => Err(type_error(op, left, right)),

        // Times.
        (Time, Add | Sub, Duration) | (Duration, Add, Time) => Ok(Time),
        (Time, Sub, Time) => Ok(Duration),
        (Time, ..) | (_, _, Time) => Err(type_error(op, left, right)),

        // Durations.
        (Duration, Add | Sub, Duration) => Ok(Duration),
        (Duration, Mul | Div | Mod, Number) | (Number, Mul, Duration) => Ok(Duration),
        (Duration, Div, Duration) => Ok(Number),

        // Currencies.
        (Currency(a), Add | Sub | Mod, Currency(b)) => {
            if a == b || rates.can_convert(b, a) {
                Ok(left.clone())
            } else {
                Err(Incompatibility::Currency { left:  a.clone(),
                                                right: b.clone(), })
            }
        },
        (Currency(a), Div, Currency(b)) => {
            if a == b || rates.can_convert(b, a) {
                Ok(Number)
            } else {
                Err(Incompatibility::Currency { left:  a.clone(),
                                                right: b.clone(), })
            }
        },
        (Currency(_), Add | Sub | Mul | Div | Mod, Number) | (Number, Add | Mul, Currency(_)) => {
            Ok(if matches!(left, Currency(_)) {
                left.clone()
            } else {
                right.clone()
            })
        },
        (Currency(_) | Quantity(_), Div, Duration) => Ok(Rate(Box::new(left.clone()))),

        // Quantities.
        (Quantity(a), Add | Sub | Mod, Quantity(b)) => {
            if units::compatible(a, b) {
                Ok(left.clone())
            } else {
                Err(Incompatibility::Units { left:  a.clone(),
                                             right: b.clone(), })
            }
        },
        (Quantity(a), Div, Quantity(b)) => {
            if units::compatible(a, b) {
                Ok(Number)
            } else {
                Err(type_error(op, left, right))
            }
        },
        (Quantity(_), Add | Sub | Mul | Div | Mod, Number) => Ok(left.clone()),
        (Number, Add | Sub | Mul, Quantity(_)) => Ok(right.clone()),

        // Rates.
        (Rate(numerator), Mul, Duration) | (Duration, Mul, Rate(numerator)) => Ok((**numerator).clone()),
        (Rate(_), Mul | Div, Number) | (Number, Mul, Rate(_)) => {
            Ok(if matches!(left, Rate(_)) {
                left.clone()
            } else {
                right.clone()
            })
        },
        (Rate(a), Add | Sub, Rate(b)) => {
            binary_result(op, a, b, rates)?;
            Ok(left.clone())
        },

        _ => Err(type_error(op, left, right)),
    }
}

/// Maps a time-unit quantity to [`Kind::Duration`]; other kinds pass through.
#[must_use]
pub fn normalize(kind: &Kind) -> Kind {
    match kind {
        Kind::Quantity(unit) if is_time_quantity(unit) => Kind::Duration,
        other => other.clone(),
    }
}

/// Resolves the kind of a comparison between `left` and `right`.
///
/// # Errors
/// Returns the [`Incompatibility`] when the operands cannot be compared.
pub fn comparison_result<R>(op: ComparisonOperator,
                            left: &Kind,
                            right: &Kind,
                            rates: &R)
                            -> Result<Kind, Incompatibility>
    where R: RateLookup + ?Sized
{
    let left = normalize(left);
    let right = normalize(right);

    let comparable = match (&left, &right) {
        (Kind::Unknown, _) | (_, Kind::Unknown) => true,
        (Kind::Boolean, Kind::Boolean) => op.is_equality(),
        (Kind::Currency(a), Kind::Currency(b)) => {
            if a == b || rates.can_convert(b, a) {
                true
            } else {
                return Err(Incompatibility::Currency { left:  a.clone(),
                                                       right: b.clone(), });
            }
        },
        (Kind::Quantity(a), Kind::Quantity(b)) => {
            if units::compatible(a, b) {
                true
            } else {
                return Err(Incompatibility::Units { left:  a.clone(),
                                                    right: b.clone(), });
            }
        },
        (Kind::Rate(a), Kind::Rate(b)) => comparison_result(op, a, b, rates).is_ok(),
        (Kind::Currency(_) | Kind::Quantity(_), Kind::Number) | (Kind::Number, Kind::Currency(_) | Kind::Quantity(_)) => {
            true
        },
        (a, b) => a == b,
    };

    if comparable {
        Ok(Kind::Boolean)
    } else {
        Err(type_error(op, &left, &right))
    }
}

/// Resolves the kind of a prefix operation.
///
/// # Errors
/// Returns an [`Incompatibility::Type`] for operands that have no sign.
pub fn unary_result(op: UnaryOperator, operand: &Kind) -> Result<Kind, Incompatibility> {
    match normalize(operand) {
        Kind::Boolean | Kind::Date | Kind::Time => {
            let symbol = match op {
                UnaryOperator::Negate => "-",
                UnaryOperator::Plus => "+",
            };
            Err(Incompatibility::Type { op:    symbol.to_string(),
                                        left:  operand.clone(),
                                        right: None, })
        },
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::types::currency::{ExchangeRates, NoRates};

    fn currency(code: &str) -> Kind {
        Kind::Currency(code.to_string())
    }

    fn quantity(unit: &str) -> Kind {
        Kind::Quantity(unit.to_string())
    }

    #[test]
    fn currency_mixing_needs_a_rate() {
        let mut rates = ExchangeRates::default();
        assert!(binary_result(BinaryOperator::Add, &currency("USD"), &currency("EUR"), &rates).is_err());

        rates.insert("EUR", "USD", rust_decimal::Decimal::ONE);
        assert_eq!(binary_result(BinaryOperator::Add, &currency("USD"), &currency("EUR"), &rates),
                   Ok(currency("USD")));
    }

    #[test]
    fn first_unit_wins_for_quantities() {
        assert_eq!(binary_result(BinaryOperator::Add, &quantity("kg"), &quantity("lb"), &NoRates),
                   Ok(quantity("kg")));
        assert!(matches!(binary_result(BinaryOperator::Add, &quantity("kg"), &quantity("m"), &NoRates),
                         Err(Incompatibility::Units { .. })));
    }

    #[test]
    fn date_rules() {
        assert_eq!(binary_result(BinaryOperator::Add, &Kind::Date, &Kind::Date, &NoRates),
                   Err(Incompatibility::DatePlusDate));
        assert_eq!(binary_result(BinaryOperator::Sub, &Kind::Duration, &Kind::Date, &NoRates),
                   Err(Incompatibility::DurationMinusDate));
        assert_eq!(binary_result(BinaryOperator::Add, &Kind::Date, &quantity("days"), &NoRates),
                   Ok(Kind::Date));
        assert!(binary_result(BinaryOperator::Mul, &Kind::Date, &Kind::Number, &NoRates).is_err());
    }

    #[test]
    fn rates_multiply_back_out() {
        let rate = Kind::Rate(Box::new(currency("USD")));
        assert_eq!(binary_result(BinaryOperator::Mul, &rate, &Kind::Duration, &NoRates),
                   Ok(currency("USD")));
        assert_eq!(binary_result(BinaryOperator::Div, &currency("USD"), &Kind::Duration, &NoRates),
                   Ok(rate));
    }

    #[test]
    fn booleans_only_compare_for_equality() {
        assert_eq!(comparison_result(ComparisonOperator::Equal, &Kind::Boolean, &Kind::Boolean, &NoRates),
                   Ok(Kind::Boolean));
        assert!(comparison_result(ComparisonOperator::Less, &Kind::Boolean, &Kind::Boolean, &NoRates).is_err());
        assert!(binary_result(BinaryOperator::Add, &Kind::Boolean, &Kind::Number, &NoRates).is_err());
    }
}
