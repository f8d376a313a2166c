use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    ast::{Expr, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Environment},
            function::{aggregate, builtin, capacity, min_max, sqrt},
        },
        types::{
            compat::{Kind, normalize},
            currency::ExchangeRates,
            units::{UnitDef, time_unit},
        },
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the evaluated arguments (keyword arguments already
/// resolved to values), the exchange rates in effect, and the call's range.
pub type BuiltinFn = fn(&[Value], &ExchangeRates, Range) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin is variadic with at least `n`
///   arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// Any of these counts.
    OneOf(&'static [usize]),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }

    /// Human-readable form used in arity errors: `2`, `1 or 2`,
    /// `at least 1`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(m) => m.to_string(),
            Self::OneOf(arr) => arr.iter()
                                   .map(ToString::to_string)
                                   .collect::<Vec<_>>()
                                   .join(" or "),
            Self::AtLeast(m) => format!("at least {m}"),
        }
    }
}

/// The closed vocabularies accepted at keyword positions.
///
/// A keyword argument is a bare word such as `month` or `gigabit`. It is
/// never looked up as a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    /// A calendar period, used by `downtime`.
    Period,
    /// A network distance, used by `rtt` and `transfer_time`.
    Scope,
    /// A link speed, used by `throughput` and `transfer_time`.
    Network,
}

/// Periods and their time unit.
const PERIODS: [(&str, &str); 4] = [("day", "day"), ("week", "week"), ("month", "month"), ("year", "year")];

/// Round-trip latency by distance, in milliseconds.
const SCOPES: [(&str, Decimal); 4] = [("local", dec!(0.5)),
                                      ("regional", dec!(5)),
                                      ("continental", dec!(30)),
                                      ("global", dec!(150))];

/// Link throughput, in megabytes per second.
const NETWORKS: [(&str, Decimal); 4] = [("hundred_megabit", dec!(12.5)),
                                        ("wifi", dec!(50)),
                                        ("gigabit", dec!(125)),
                                        ("ten_gigabit", dec!(1250))];

impl KeywordKind {
    /// Name of the vocabulary, used in messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Period => "period",
            Self::Scope => "scope",
            Self::Network => "network",
        }
    }

    /// The words this vocabulary accepts.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        match self {
            Self::Period => PERIODS.iter().map(|(name, _)| *name).collect(),
            Self::Scope => SCOPES.iter().map(|(name, _)| *name).collect(),
            Self::Network => NETWORKS.iter().map(|(name, _)| *name).collect(),
        }
    }

    /// Resolves a keyword to the value it stands for: a one-unit duration
    /// for periods, a latency for scopes, a per-second rate for networks.
    /// Matching is case-insensitive.
    ///
    /// # Example
    /// ```
    /// use calcmark::interpreter::evaluator::function::core::KeywordKind;
    ///
    /// assert_eq!(KeywordKind::Scope.resolve("Global").unwrap().to_string(), "150 milliseconds");
    /// assert_eq!(KeywordKind::Network.resolve("gigabit").unwrap().to_string(), "125 MB/second");
    /// assert!(KeywordKind::Period.resolve("fortnight").is_none());
    /// ```
    #[must_use]
    pub fn resolve(self, name: &str) -> Option<Value> {
        let name = name.to_ascii_lowercase();
        match self {
            Self::Period => {
                PERIODS.iter()
                       .find(|(period, _)| *period == name)
                       .and_then(|(_, unit)| time_unit(unit))
                       .map(|unit| Value::duration(Decimal::ONE, unit))
            },
            Self::Scope => {
                let (_, millis) = SCOPES.iter().find(|(scope, _)| *scope == name)?;
                time_unit("ms").map(|unit| Value::duration(*millis, unit))
            },
            Self::Network => {
                let (_, megabytes) = NETWORKS.iter().find(|(network, _)| *network == name)?;
                let second: &'static UnitDef = time_unit("s")?;
                Some(Value::Rate { amount: Box::new(Value::quantity(*megabytes, "MB")),
                                   per:    second, })
            },
        }
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - optionally, the argument positions that take keywords,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (the table row),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (@keywords) => { &[] };
    (@keywords $keywords:expr) => { $keywords };
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                $(keywords: $keywords:expr,)?
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// One row of the builtin table.
        #[derive(Debug)]
        pub struct BuiltinDef {
            /// Lower-case call name.
            pub name:     &'static str,
            /// Accepted argument counts.
            pub arity:    Arity,
            /// Positions that take a keyword instead of an expression.
            pub keywords: &'static [(usize, KeywordKind)],
            func:         BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name:     $name,
                             arity:    $arity,
                             keywords: builtin_functions!(@keywords $($keywords)?),
                             func:     $func },
            )*
        ];
        /// Names of every builtin, in table order.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "avg"           => { arity: Arity::AtLeast(1), func: aggregate::avg },
    "sum"           => { arity: Arity::AtLeast(1), func: aggregate::sum },
    "min"           => { arity: Arity::AtLeast(1), func: |args, rates, range| min_max::min_max("min", args, rates, range) },
    "max"           => { arity: Arity::AtLeast(1), func: |args, rates, range| min_max::min_max("max", args, rates, range) },
    "sqrt"          => { arity: Arity::Exact(1), func: sqrt::sqrt },
    "abs"           => { arity: Arity::Exact(1), func: |args, _, range| builtin::unary_round("abs", args, range) },
    "floor"         => { arity: Arity::Exact(1), func: |args, _, range| builtin::unary_round("floor", args, range) },
    "ceil"          => { arity: Arity::Exact(1), func: |args, _, range| builtin::unary_round("ceil", args, range) },
    "round"         => { arity: Arity::OneOf(&[1, 2]), func: builtin::round },
    "accumulate"    => { arity: Arity::Exact(2), func: capacity::accumulate },
    "downtime"      => { arity: Arity::Exact(2),
                         keywords: &[(1, KeywordKind::Period)],
                         func: capacity::downtime },
    "rtt"           => { arity: Arity::Exact(1),
                         keywords: &[(0, KeywordKind::Scope)],
                         func: capacity::rtt },
    "throughput"    => { arity: Arity::Exact(1),
                         keywords: &[(0, KeywordKind::Network)],
                         func: capacity::throughput },
    "transfer_time" => { arity: Arity::Exact(3),
                         keywords: &[(1, KeywordKind::Scope), (2, KeywordKind::Network)],
                         func: capacity::transfer_time },
}

/// Finds a builtin by its (lower-case) name.
#[must_use]
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|b| b.name == name)
}

impl BuiltinDef {
    /// The keyword vocabulary expected at argument `index`, if that
    /// position takes a keyword.
    #[must_use]
    pub fn keyword_at(&self, index: usize) -> Option<KeywordKind> {
        self.keywords
            .iter()
            .find(|(position, _)| *position == index)
            .map(|(_, kind)| *kind)
    }

    /// Whether argument `index` must be a plain number.
    #[must_use]
    pub fn requires_number(&self, index: usize) -> bool {
        matches!((self.name, index), ("sqrt" | "downtime", 0) | ("round", 1))
    }

    /// The kind a call produces given its argument kinds, as far as it can
    /// be known without evaluating.
    ///
    /// # Example
    /// ```
    /// use calcmark::interpreter::{evaluator::function::core::lookup_builtin, types::compat::Kind};
    ///
    /// let avg = lookup_builtin("avg").unwrap();
    /// let usd = Kind::Currency("USD".to_string());
    /// let eur = Kind::Currency("EUR".to_string());
    ///
    /// assert_eq!(avg.result_kind(&[usd.clone(), usd.clone()]), usd);
    /// assert_eq!(avg.result_kind(&[usd, eur]), Kind::Number);
    /// ```
    #[must_use]
    pub fn result_kind(&self, args: &[Kind]) -> Kind {
        let args: Vec<Kind> = args.iter().map(normalize).collect();
        let first = args.first().cloned().unwrap_or(Kind::Unknown);

        match self.name {
            "avg" => {
                if args.contains(&Kind::Unknown) {
                    Kind::Unknown
                } else if args.iter().all(|kind| *kind == first) {
                    first
                } else {
                    Kind::Number
                }
            },
            "sum" | "min" | "max" | "abs" | "floor" | "ceil" | "round" => {
                args.into_iter().find(|kind| *kind != Kind::Unknown).unwrap_or(Kind::Unknown)
            },
            "sqrt" => Kind::Number,
            "accumulate" => match first {
                Kind::Rate(numerator) => *numerator,
                _ => Kind::Unknown,
            },
            "throughput" => Kind::Rate(Box::new(Kind::Quantity("MB".to_string()))),
            "downtime" | "rtt" | "transfer_time" => Kind::Duration,
            _ => Kind::Unknown,
        }
    }

    fn check_arity(&self, found: usize, range: Range) -> EvalResult<()> {
        if self.arity.check(found) {
            Ok(())
        } else {
            Err(RuntimeError::ArgumentCountMismatch { name: self.name.to_string(),
                                                      expected: self.arity.describe(),
                                                      found,
                                                      range })
        }
    }
}

impl Environment {
    /// Evaluates a function call.
    ///
    /// The name must match a builtin. Arity is verified first; then each
    /// argument is evaluated, except at keyword positions, where the bare
    /// word is resolved against the function's keyword vocabulary.
    ///
    /// # Parameters
    /// - `name`: Function name, lower-case.
    /// - `arguments`: Unevaluated argument expressions.
    /// - `range`: Range of the whole call.
    ///
    /// # Returns
    /// The function result or an error if lookup, arity or an argument
    /// fails.
    pub(crate) fn eval_function(&self, name: &str, arguments: &[Expr], range: Range) -> EvalResult<Value> {
        let builtin = lookup_builtin(name).ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                                        range })?;
        builtin.check_arity(arguments.len(), range)?;

        let values = arguments.iter()
                              .enumerate()
                              .map(|(index, argument)| match builtin.keyword_at(index) {
                                  Some(kind) => Self::eval_keyword(kind, argument),
                                  None => self.eval(argument),
                              })
                              .collect::<EvalResult<Vec<_>>>()?;

        (builtin.func)(&values, self.rates(), range)
    }

    fn eval_keyword(kind: KeywordKind, argument: &Expr) -> EvalResult<Value> {
        let resolved = match argument {
            Expr::Identifier { name, .. } => kind.resolve(name),
            _ => None,
        };
        resolved.ok_or_else(|| RuntimeError::InvalidArgument { details: format!("expected a {} (one of: {})",
                                                                                kind.describe(),
                                                                                kind.names().join(", ")),
                                                               range:   argument.range(), })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_descriptions() {
        assert_eq!(Arity::Exact(2).describe(), "2");
        assert_eq!(Arity::OneOf(&[1, 2]).describe(), "1 or 2");
        assert_eq!(Arity::AtLeast(1).describe(), "at least 1");
        assert!(Arity::AtLeast(1).check(5));
        assert!(!Arity::AtLeast(1).check(0));
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in BUILTIN_FUNCTIONS {
            assert!(lookup_builtin(name).is_some(), "{name}");
        }
        assert!(lookup_builtin("median").is_none());
    }

    #[test]
    fn keyword_positions() {
        let transfer = lookup_builtin("transfer_time").unwrap();
        assert_eq!(transfer.keyword_at(0), None);
        assert_eq!(transfer.keyword_at(1), Some(KeywordKind::Scope));
        assert_eq!(transfer.keyword_at(2), Some(KeywordKind::Network));
    }
}
