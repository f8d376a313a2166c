use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveTime, TimeDelta};
use rust_decimal::Decimal;

use crate::{
    ast::{DateSpec, Expr, Range, Statement},
    config::Limits,
    error::{ConfigError, RuntimeError},
    interpreter::{
        lexer::{TokenKind, tokenize},
        parser::core::parse_program,
        types::{
            currency::{ExchangeRates, is_valid_code},
            dates::validate_date,
            units::time_unit,
        },
        value::core::Value,
    },
    util::num::napkin_round,
};

pub type EvalResult<T> = Result<T, RuntimeError>;

/// Holds the state a document is evaluated against: variable bindings,
/// pre-seeded globals, exchange rates and the date `today` resolves to.
///
/// Evaluation is single-threaded and statements run in document order. An
/// assignment rebinds its name; a failing statement leaves every earlier
/// binding in place.
///
/// # Example
/// ```
/// use calcmark::{interpreter::evaluator::core::Environment, parse};
///
/// let statements = parse("x = 5\ny = x + 3").unwrap();
/// let mut env = Environment::new();
///
/// let values = env.evaluate(&statements).unwrap();
/// assert_eq!(values[1].to_string(), "8");
/// assert_eq!(env.get("x").map(ToString::to_string), Some("5".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    globals:  HashMap<String, Value>,
    rates:    ExchangeRates,
    today:    NaiveDate,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an empty environment whose `today` is the local date.
    #[must_use]
    pub fn new() -> Self {
        Self { bindings: HashMap::new(),
               globals:  HashMap::new(),
               rates:    ExchangeRates::default(),
               today:    Local::now().date_naive(), }
    }

    /// Registers the rate taking one unit of `from` to `to`.
    #[must_use]
    pub fn with_exchange_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates.insert(from, to, rate);
        self
    }

    /// Replaces the whole rate table.
    #[must_use]
    pub fn with_exchange_rates(mut self, rates: ExchangeRates) -> Self {
        self.rates = rates;
        self
    }

    /// Pins the date that `today`, `tomorrow` and `yesterday` are relative
    /// to.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The configured exchange rates.
    #[must_use]
    pub const fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// The date relative date keywords resolve against.
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// Seeds a global from literal source text, e.g. `tax_rate` = `8.5%`.
    ///
    /// Globals are bound immediately and restored by [`Environment::reset`].
    /// Only literals are accepted so that seeding never depends on other
    /// bindings.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidGlobalName`] when `name` is not a single
    ///   non-reserved identifier.
    /// - [`ConfigError::NonLiteralGlobal`] when `literal` is anything but one
    ///   literal.
    /// - [`ConfigError::InvalidGlobalValue`] when the literal does not
    ///   produce a value.
    ///
    /// # Example
    /// ```
    /// use calcmark::{error::ConfigError, interpreter::evaluator::core::Environment};
    ///
    /// let mut env = Environment::new();
    /// env.seed_global("budget", "$5,000").unwrap();
    /// assert_eq!(env.get("budget").unwrap().to_string(), "$5,000.00");
    ///
    /// assert!(matches!(env.seed_global("total", "budget * 2"),
    ///                  Err(ConfigError::NonLiteralGlobal { .. })));
    /// ```
    pub fn seed_global(&mut self, name: &str, literal: &str) -> Result<(), ConfigError> {
        let invalid_name = || ConfigError::InvalidGlobalName { name: name.to_string() };
        let non_literal = || ConfigError::NonLiteralGlobal { name:        name.to_string(),
                                                             source_text: literal.to_string(), };

        let tokens = tokenize(name).map_err(|_| invalid_name())?;
        match tokens.as_slice() {
            [ident, eof] if ident.kind == TokenKind::Identifier
                            && ident.literal == name
                            && eof.kind == TokenKind::Eof => {},
            _ => return Err(invalid_name()),
        }

        let tokens = tokenize(literal).map_err(|_| non_literal())?;
        let statements = parse_program(&tokens, &Limits::default()).map_err(|_| non_literal())?;
        let expr = match statements.as_slice() {
            [Statement::Expression { expr, .. }] if expr.is_literal() => expr,
            _ => return Err(non_literal()),
        };

        let value = self.eval(expr)
                        .map_err(|e| ConfigError::InvalidGlobalValue { name:    name.to_string(),
                                                                       details: e.to_string(), })?;

        tracing::debug!(name, %value, "seeded global");
        self.globals.insert(name.to_string(), value.clone());
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Drops every binding made by evaluation, keeping seeded globals.
    pub fn reset(&mut self) {
        self.bindings = self.globals.clone();
    }

    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Binds `name`, replacing any earlier value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Whether `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The bound names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Evaluates an expression against the current bindings.
    ///
    /// Evaluation never mutates the environment; only
    /// [`Environment::eval_statement`] binds names.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised by any subexpression.
    pub fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::NumberLiteral { value, .. } => Ok(Value::Number(*value)),
            Expr::CurrencyLiteral { amount, code, symbol, .. } => {
                Ok(Self::eval_currency_literal(*amount, code, symbol.as_deref()))
            },
            Expr::BooleanLiteral { value, .. } => Ok(Value::Boolean(*value)),
            Expr::DateLiteral { date, range } => self.eval_date_literal(date, *range),
            Expr::TimeLiteral { hour, minute, second, range } => {
                NaiveTime::from_hms_opt(*hour, *minute, *second).map(Value::Time)
                                                               .ok_or_else(|| RuntimeError::InvalidArgument {
                                                                   details: format!("{hour}:{minute:02} is not a valid time"),
                                                                   range:   *range,
                                                               })
            },
            Expr::DurationLiteral { amount, unit, .. } | Expr::QuantityLiteral { amount, unit, .. } => {
                Ok(Value::quantity(*amount, unit))
            },
            Expr::RateLiteral { amount, per, range } => {
                let amount = self.eval(amount)?;
                let per = time_unit(per).ok_or_else(|| RuntimeError::InvalidArgument {
                                             details: format!("'{per}' is not a unit of time"),
                                             range:   *range,
                                         })?;
                Ok(Value::Rate { amount: Box::new(amount),
                                 per })
            },
            Expr::Identifier { name, range } => {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable { name:  name.clone(),
                                                                     range: *range, })
            },
            Expr::UnaryOp { op, expr, range } => {
                let value = self.eval(expr)?;
                Self::eval_unary(*op, &value, *range)
            },
            Expr::BinaryOp { op, left, right, range } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                self.eval_binary(*op, &left, &right, *range)
            },
            Expr::ComparisonOp { op, left, right, range } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                self.eval_comparison(*op, &left, &right, *range)
            },
            Expr::FunctionCall { name, arguments, range } => self.eval_function(name, arguments, *range),
            Expr::UnitConversion { expr, target, range } => {
                let value = self.eval(expr)?;
                self.eval_conversion(&value, target, *range)
            },
            Expr::NapkinConversion { expr, range } => {
                let value = self.eval(expr)?;
                value.map_amount(*range, |amount| {
                         napkin_round(amount).ok_or(RuntimeError::Overflow { range: *range })
                     })
            },
            Expr::PercentageOf { percentage, of, range } => {
                let fraction = self.eval(percentage)?.as_number(percentage.range())?;
                let base = self.eval(of)?;
                base.map_amount(*range, |amount| {
                        amount.checked_mul(fraction)
                              .ok_or(RuntimeError::Overflow { range: *range })
                    })
            },
        }
    }

    /// Symbol-prefixed amounts and valid ISO codes are money; any other
    /// three-letter suffix is carried as a free-form unit label.
    fn eval_currency_literal(amount: Decimal, code: &str, symbol: Option<&str>) -> Value {
        match symbol {
            Some(symbol) => Value::Currency { amount,
                                              code: code.to_string(),
                                              symbol: Some(symbol.to_string()) },
            None if is_valid_code(code) => Value::currency(amount, code),
            None => Value::Quantity { amount,
                                      unit: code.to_string() },
        }
    }

    fn eval_date_literal(&self, date: &DateSpec, range: Range) -> EvalResult<Value> {
        match *date {
            DateSpec::Calendar { month, day, year } => {
                validate_date(month, day, year).map(Value::Date)
                                               .map_err(|problem| RuntimeError::InvalidDate {
                                                   details: format!("{}; {}", problem.message(), problem.detail()),
                                                   range,
                                               })
            },
            DateSpec::Relative { offset_days } => {
                TimeDelta::try_days(offset_days).and_then(|delta| self.today.checked_add_signed(delta))
                                                .map(Value::Date)
                                                .ok_or(RuntimeError::DateOutOfRange { range })
            },
        }
    }

    /// Evaluates one statement. Assignments bind their name and yield the
    /// assigned value.
    ///
    /// # Errors
    /// Returns the statement's [`RuntimeError`]; nothing is bound on error.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Value> {
        match statement {
            Statement::Assignment { name, value, .. } => {
                let value = self.eval(value)?;
                tracing::debug!(name = name.as_str(), %value, "assigned");
                self.set(name.clone(), value.clone());
                Ok(value)
            },
            Statement::Expression { expr, .. } => {
                let value = self.eval(expr)?;
                tracing::debug!(%value, "evaluated");
                Ok(value)
            },
        }
    }

    /// Evaluates statements in order and returns one value per statement.
    ///
    /// # Errors
    /// Stops at the first failing statement and returns its error. Bindings
    /// made by the statements before it are kept.
    pub fn evaluate(&mut self, statements: &[Statement]) -> EvalResult<Vec<Value>> {
        statements.iter()
                  .map(|statement| self.eval_statement(statement))
                  .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::Identifier { name:  name.to_string(),
                           range: Range::point(1, 1), }
    }

    #[test]
    fn relative_dates_follow_today() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let env = Environment::new().with_today(today);
        let tomorrow = Expr::DateLiteral { date:  DateSpec::Relative { offset_days: 1 },
                                           range: Range::point(1, 1), };

        assert_eq!(env.eval(&tomorrow),
                   Ok(Value::Date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())));
    }

    #[test]
    fn failed_statement_keeps_earlier_bindings() {
        let mut env = Environment::new();
        let statements = vec![Statement::Assignment { name:  "a".to_string(),
                                                      value: Expr::NumberLiteral { value:   dec!(2),
                                                                                   percent: false,
                                                                                   range:   Range::point(1, 5), },
                                                      range: Range::point(1, 1), },
                              Statement::Expression { expr:  ident("missing"),
                                                      range: Range::point(2, 1), }];

        assert!(matches!(env.evaluate(&statements), Err(RuntimeError::UndefinedVariable { .. })));
        assert_eq!(env.get("a"), Some(&Value::Number(dec!(2))));
    }

    #[test]
    fn reset_restores_globals() {
        let mut env = Environment::new();
        env.seed_global("rate", "5%").unwrap();
        env.set("scratch", Value::Number(Decimal::ONE));

        env.reset();
        assert!(env.contains("rate"));
        assert!(!env.contains("scratch"));
    }

    #[test]
    fn globals_must_be_literals_with_plain_names() {
        let mut env = Environment::new();
        assert!(matches!(env.seed_global("in", "5"), Err(ConfigError::InvalidGlobalName { .. })));
        assert!(matches!(env.seed_global("two words", "5"), Err(ConfigError::InvalidGlobalName { .. })));
        assert!(matches!(env.seed_global("x", "1 + 2"), Err(ConfigError::NonLiteralGlobal { .. })));
        assert!(matches!(env.seed_global("d", "Feb 30 2025"), Err(ConfigError::InvalidGlobalValue { .. })));
        assert!(env.seed_global("neg", "-4 kg").is_ok());
    }
}
