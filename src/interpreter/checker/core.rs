use std::collections::HashMap;

use crate::{
    ast::{BinaryOperator, ComparisonOperator, DateSpec, Expr, Range, Statement},
    interpreter::{
        checker::diagnostic::{Diagnostic, DiagnosticCode},
        evaluator::function::core::{BUILTIN_FUNCTIONS, BuiltinDef, lookup_builtin},
        lexer::boolean_value,
        scope::{NameLookup, undefined_identifiers},
        types::{
            compat::{Incompatibility, Kind, binary_result, comparison_result, normalize, unary_result},
            currency::{self, RateLookup},
            dates::validate_date,
            units::{self, Dimension, lookup_unit},
        },
    },
};

const CURRENCY_CODES_LINK: &str = "https://en.wikipedia.org/wiki/ISO_4217";

/// Names visible to the checker: the caller's names plus everything assigned
/// by earlier statements in the same pass.
struct Scope<'a, N: ?Sized> {
    outer:    &'a N,
    assigned: HashMap<String, Kind>,
}

impl<N: NameLookup + ?Sized> NameLookup for Scope<'_, N> {
    fn is_defined(&self, name: &str) -> bool {
        self.assigned.contains_key(name) || self.outer.is_defined(name)
    }

    fn kind_of(&self, name: &str) -> Option<Kind> {
        self.assigned
            .get(name)
            .cloned()
            .or_else(|| self.outer.kind_of(name))
    }

    fn rates(&self) -> &dyn RateLookup {
        self.outer.rates()
    }
}

/// Checks statements in source order without evaluating anything.
///
/// Each statement sees the caller's names plus the names assigned by the
/// statements before it, never the ones after. Error diagnostics mean the
/// statement must not be evaluated; warnings and hints never block.
///
/// # Parameters
/// - `statements`: Parsed statements, in source order.
/// - `names`: What is already defined. An
///   [`Environment`](crate::interpreter::evaluator::core::Environment) also
///   supplies value kinds and exchange rates.
///
/// # Returns
/// Every diagnostic found, in source order.
///
/// # Example
/// ```
/// use std::collections::HashSet;
///
/// use calcmark::{interpreter::checker::core::check, parse};
///
/// let statements = parse("x = 5\ny = x + z").unwrap();
/// let diagnostics = check(&statements, &HashSet::<String>::new());
///
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(diagnostics[0].code.as_str(), "undefined_variable");
/// ```
#[must_use]
pub fn check<N: NameLookup + ?Sized>(statements: &[Statement], names: &N) -> Vec<Diagnostic> {
    let mut checker = Checker { scope:       Scope { outer:    names,
                                                     assigned: HashMap::new(), },
                                diagnostics: Vec::new(), };

    for statement in statements {
        let kind = checker.check_expr_resolved(statement.expr());
        if let Statement::Assignment { name, .. } = statement {
            checker.scope.assigned.insert(name.clone(), kind);
        }
    }

    tracing::debug!(statements = statements.len(),
                    diagnostics = checker.diagnostics.len(),
                    "checked statements");
    checker.diagnostics
}

struct Checker<'a, N: ?Sized> {
    scope:       Scope<'a, N>,
    diagnostics: Vec<Diagnostic>,
}

impl<N: NameLookup + ?Sized> Checker<'_, N> {
    /// Reports undefined names, then infers the expression's kind.
    fn check_expr_resolved(&mut self, expr: &Expr) -> Kind {
        for (name, range) in undefined_identifiers(expr, &self.scope) {
            self.diagnostics.push(Diagnostic::error(DiagnosticCode::UndefinedVariable,
                                                    format!("Undefined variable '{name}'"),
                                                    range)
                                  .with_detail("Assign it on an earlier line before using it"));
        }
        self.infer(expr)
    }

    fn infer(&mut self, expr: &Expr) -> Kind {
        match expr {
            Expr::NumberLiteral { .. } => Kind::Number,
            Expr::BooleanLiteral { .. } => Kind::Boolean,
            Expr::TimeLiteral { .. } => Kind::Time,
            Expr::DurationLiteral { .. } => Kind::Duration,
            Expr::QuantityLiteral { unit, .. } => normalize(&Kind::Quantity(unit.clone())),
            Expr::CurrencyLiteral { code, symbol, range, .. } => self.infer_currency(code, symbol.as_deref(), *range),
            Expr::DateLiteral { date, range } => {
                if let DateSpec::Calendar { month, day, year } = *date
                   && let Err(problem) = validate_date(month, day, year)
                {
                    self.diagnostics.push(Diagnostic::error(DiagnosticCode::InvalidDate, problem.message(), *range)
                                          .with_detail(problem.detail()));
                }
                Kind::Date
            },
            Expr::RateLiteral { amount, .. } => Kind::Rate(Box::new(self.infer(amount))),
            Expr::Identifier { name, .. } => {
                if boolean_value(name).is_some() && !self.scope.is_defined(name) {
                    Kind::Boolean
                } else {
                    self.scope.kind_of(name).unwrap_or(Kind::Unknown)
                }
            },
            Expr::UnaryOp { op, expr, range } => {
                let operand = self.infer(expr);
                unary_result(*op, &operand).unwrap_or_else(|problem| self.incompatible(&problem, *range))
            },
            Expr::BinaryOp { left, op, right, range } => {
                let left_kind = self.infer(left);
                let right_kind = self.infer(right);
                self.check_binary(*op, &left_kind, right, &right_kind, *range)
            },
            Expr::ComparisonOp { left, op, right, range } => {
                let left_kind = self.infer(left);
                let right_kind = self.infer(right);
                comparison_result(*op, &left_kind, &right_kind, self.scope.rates())
                    .unwrap_or_else(|problem| self.incompatible(&problem, *range))
            },
            Expr::FunctionCall { name, arguments, range } => self.check_call(name, arguments, *range),
            Expr::UnitConversion { expr, target, .. } => {
                let source = self.infer(expr);
                conversion_kind(&source, target)
            },
            Expr::NapkinConversion { expr, .. } => self.infer(expr),
            Expr::PercentageOf { percentage, of, .. } => {
                let fraction = self.infer(percentage);
                self.require_number(&fraction, "'of'", percentage.range());
                self.infer(of)
            },
        }
    }

    fn infer_currency(&mut self, code: &str, symbol: Option<&str>, range: Range) -> Kind {
        if symbol.is_none() && !currency::is_valid_code(code) {
            self.diagnostics.push(Diagnostic::warning(DiagnosticCode::UnknownCurrency,
                                                      format!("Unknown currency code '{code}'"),
                                                      range)
                                  .with_detail(format!("'{code}' is not an ISO 4217 code; it is treated as a unit \
                                                        label"))
                                  .with_link(CURRENCY_CODES_LINK));
            return Kind::Quantity(code.to_string());
        }
        Kind::Currency(code.to_string())
    }

    fn check_binary(&mut self,
                    op: BinaryOperator,
                    left: &Kind,
                    right_expr: &Expr,
                    right: &Kind,
                    range: Range)
                    -> Kind {
        if matches!(op, BinaryOperator::Div | BinaryOperator::Mod) && is_literal_zero(right_expr) {
            self.diagnostics.push(Diagnostic::warning(DiagnosticCode::DivisionByZero,
                                                      "Division by zero",
                                                      right_expr.range())
                                  .with_detail("This line will fail when evaluated"));
        }

        if matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
           && let (Kind::Quantity(a), Kind::Quantity(b)) = (left, right)
           && units::mixes_data_bases(a, b)
        {
            self.diagnostics.push(Diagnostic::hint(DiagnosticCode::MixedDataBase,
                                                   format!("Mixing {a} and {b}"),
                                                   range)
                                  .with_detail("One unit counts in powers of 1024 and the other in powers of \
                                                1000; the result may be off by a few percent"));
        }

        binary_result(op, left, right, self.scope.rates()).unwrap_or_else(|problem| self.incompatible(&problem, range))
    }

    fn check_call(&mut self, name: &str, arguments: &[Expr], range: Range) -> Kind {
        let Some(builtin) = lookup_builtin(name) else {
            for argument in arguments {
                self.infer(argument);
            }
            self.diagnostics.push(Diagnostic::error(DiagnosticCode::UnknownFunction,
                                                    format!("Unknown function '{name}'"),
                                                    range)
                                  .with_detail(format!("Available functions: {}", BUILTIN_FUNCTIONS.join(", "))));
            return Kind::Unknown;
        };

        if !builtin.arity.check(arguments.len()) {
            self.diagnostics.push(Diagnostic::error(DiagnosticCode::WrongArgumentCount,
                                                    format!("'{name}' expects {} argument(s), found {}",
                                                            builtin.arity.describe(),
                                                            arguments.len()),
                                                    range));
        }

        let kinds: Vec<Kind> = arguments.iter()
                                        .enumerate()
                                        .map(|(index, argument)| self.check_argument(builtin, index, argument))
                                        .collect();

        match name {
            "sum" => self.fold_kinds(&kinds, range),
            "min" | "max" => {
                for kind in kinds.iter().skip(1) {
                    if let Some(first) = kinds.first()
                       && let Err(problem) =
                           comparison_result(ComparisonOperator::Less, first, kind, self.scope.rates())
                    {
                        self.incompatible(&problem, range);
                    }
                }
                builtin.result_kind(&kinds)
            },
            _ => builtin.result_kind(&kinds),
        }
    }

    fn check_argument(&mut self, builtin: &BuiltinDef, index: usize, argument: &Expr) -> Kind {
        if let Some(keyword) = builtin.keyword_at(index) {
            let resolved = match argument {
                Expr::Identifier { name, .. } => keyword.resolve(name),
                _ => None,
            };
            return match resolved {
                Some(value) => value.kind(),
                None => {
                    self.diagnostics.push(Diagnostic::error(DiagnosticCode::InvalidKeywordArgument,
                                                            format!("Expected a {} for '{}'",
                                                                    keyword.describe(),
                                                                    builtin.name),
                                                            argument.range())
                                          .with_detail(format!("One of: {}", keyword.names().join(", "))));
                    Kind::Unknown
                },
            };
        }

        let kind = self.infer(argument);
        if builtin.requires_number(index) {
            self.require_number(&kind, &format!("'{}'", builtin.name), argument.range());
        }
        kind
    }

    /// `sum` adds its arguments left to right, so they must be addable.
    fn fold_kinds(&mut self, kinds: &[Kind], range: Range) -> Kind {
        let mut kinds = kinds.iter();
        let Some(first) = kinds.next() else {
            return Kind::Unknown;
        };
        let mut total = first.clone();
        for kind in kinds {
            total = binary_result(BinaryOperator::Add, &total, kind, self.scope.rates())
                .unwrap_or_else(|problem| self.incompatible(&problem, range));
        }
        total
    }

    fn require_number(&mut self, kind: &Kind, what: &str, range: Range) {
        if !matches!(normalize(kind), Kind::Number | Kind::Unknown) {
            self.diagnostics.push(Diagnostic::error(DiagnosticCode::TypeMismatch,
                                                    format!("{what} expects a number, found {kind}"),
                                                    range));
        }
    }

    /// Records a compatibility failure; the offending subexpression's kind
    /// becomes unknown so the failure is reported once.
    fn incompatible(&mut self, problem: &Incompatibility, range: Range) -> Kind {
        let code = match problem {
            Incompatibility::Currency { .. } => DiagnosticCode::IncompatibleCurrency,
            Incompatibility::Units { .. } => DiagnosticCode::IncompatibleUnits,
            Incompatibility::DatePlusDate | Incompatibility::DurationMinusDate | Incompatibility::Type { .. } => {
                DiagnosticCode::TypeMismatch
            },
        };
        let mut diagnostic = Diagnostic::error(code, problem.message(), range);
        if let Some(suggestion) = problem.suggestion() {
            diagnostic = diagnostic.with_detail(suggestion);
        }
        self.diagnostics.push(diagnostic);
        Kind::Unknown
    }
}

/// The kind `source in target` produces. Whether the target is valid is
/// only known at evaluation.
fn conversion_kind(source: &Kind, target: &str) -> Kind {
    if let Kind::Rate(numerator) = source {
        return match lookup_unit(target) {
            Some(unit) if unit.dimension == Dimension::Time => source.clone(),
            _ => Kind::Rate(Box::new(conversion_kind(numerator, target))),
        };
    }
    if lookup_unit(target).is_some() {
        return normalize(&Kind::Quantity(target.to_string()));
    }
    currency::normalize(target).or_else(|| currency::normalize(&target.to_ascii_uppercase()))
                               .map_or(Kind::Unknown, Kind::Currency)
}

fn is_literal_zero(expr: &Expr) -> bool {
    match expr {
        Expr::NumberLiteral { value: amount, .. }
        | Expr::CurrencyLiteral { amount, .. }
        | Expr::QuantityLiteral { amount, .. }
        | Expr::DurationLiteral { amount, .. } => amount.is_zero(),
        Expr::UnaryOp { expr, .. } => is_literal_zero(expr),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{interpreter::checker::diagnostic::Severity, parse};

    fn codes(source: &str) -> Vec<&'static str> {
        check(&parse(source).unwrap(), &HashSet::<String>::new()).iter()
                                                                  .map(|d| d.code.as_str())
                                                                  .collect()
    }

    #[test]
    fn later_assignments_are_not_visible_earlier() {
        assert_eq!(codes("y = x + 1\nx = 2"), ["undefined_variable"]);
        assert!(codes("x = 2\ny = x + 1").is_empty());
    }

    #[test]
    fn currency_mismatch_without_rate() {
        assert_eq!(codes("$100 + 20 EUR"), ["incompatible_currency"]);
    }

    #[test]
    fn dimension_mismatch() {
        assert_eq!(codes("5 kg + 3 m"), ["incompatible_units"]);
        assert!(codes("5 kg + 10 lb").is_empty());
    }

    #[test]
    fn literal_zero_division_only_warns() {
        let diagnostics = check(&parse("10 / 0").unwrap(), &HashSet::<String>::new());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].code, DiagnosticCode::DivisionByZero);
    }

    #[test]
    fn data_base_mixing_is_a_hint() {
        let diagnostics = check(&parse("1 GiB + 1 GB").unwrap(), &HashSet::<String>::new());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Hint);
    }

    #[test]
    fn unknown_currency_code_warns() {
        assert_eq!(codes("5 XYZ"), ["unknown_currency"]);
    }

    #[test]
    fn function_table_checks() {
        assert_eq!(codes("median(1, 2)"), ["unknown_function"]);
        assert_eq!(codes("sqrt(1, 2)"), ["wrong_argument_count"]);
        assert_eq!(codes("rtt(nearby)"), ["invalid_keyword_argument"]);
        assert_eq!(codes("sqrt($4)"), ["type_mismatch"]);
        assert_eq!(codes("sum(1 kg, 2 m)"), ["incompatible_units"]);
        assert!(codes("transfer_time(1 GB, global, wifi)").is_empty());
    }

    #[test]
    fn kinds_flow_through_assignments() {
        assert_eq!(codes("d = Jan 1 2025\nd * 2"), ["type_mismatch"]);
        assert_eq!(codes("a = today\nb = today\na + b"), ["type_mismatch"]);
    }
}
