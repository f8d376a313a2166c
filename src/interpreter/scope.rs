use std::collections::{HashMap, HashSet};

use crate::{
    ast::{Expr, Range},
    interpreter::{
        evaluator::{core::Environment, function::core::lookup_builtin},
        lexer::boolean_value,
        types::{
            compat::Kind,
            currency::{NoRates, RateLookup},
        },
        value::core::Value,
    },
};

/// What the checker and the classifier need to know about the names in
/// scope.
///
/// A plain set of names is enough to decide whether a line resolves. An
/// [`Environment`] also knows each name's kind and the exchange rates, which
/// lets the checker catch unit and currency mismatches against existing
/// bindings.
pub trait NameLookup {
    /// Whether `name` is bound.
    fn is_defined(&self, name: &str) -> bool;

    /// The kind of the value bound to `name`, when known.
    fn kind_of(&self, _name: &str) -> Option<Kind> {
        None
    }

    /// Exchange rates in effect.
    fn rates(&self) -> &dyn RateLookup {
        &NoRates
    }
}

impl NameLookup for HashSet<String> {
    fn is_defined(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl NameLookup for HashMap<String, Value> {
    fn is_defined(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn kind_of(&self, name: &str) -> Option<Kind> {
        self.get(name).map(Value::kind)
    }
}

impl NameLookup for Environment {
    fn is_defined(&self, name: &str) -> bool {
        self.contains(name)
    }

    fn kind_of(&self, name: &str) -> Option<Kind> {
        self.get(name).map(Value::kind)
    }

    fn rates(&self) -> &dyn RateLookup {
        Self::rates(self)
    }
}

impl<T: NameLookup + ?Sized> NameLookup for &T {
    fn is_defined(&self, name: &str) -> bool {
        (**self).is_defined(name)
    }

    fn kind_of(&self, name: &str) -> Option<Kind> {
        (**self).kind_of(name)
    }

    fn rates(&self) -> &dyn RateLookup {
        (**self).rates()
    }
}

/// Collects every identifier in `expr` that `names` does not define, in
/// source order.
///
/// Boolean keywords count as defined. Keyword positions of builtin calls
/// (`rtt(global)`) are not variable references and are skipped. This is the
/// one definition of "does this expression resolve" that the checker and the
/// classifier share.
///
/// # Example
/// ```
/// use std::collections::HashSet;
///
/// use calcmark::{ast::Statement, interpreter::scope::undefined_identifiers, parse};
///
/// let statements = parse("price * qty + rtt(global)").unwrap();
/// let Statement::Expression { expr, .. } = &statements[0] else { unreachable!() };
///
/// let names: HashSet<String> = ["price".to_string()].into_iter().collect();
/// let missing: Vec<String> = undefined_identifiers(expr, &names).into_iter().map(|(n, _)| n).collect();
/// assert_eq!(missing, ["qty"]);
/// ```
pub fn undefined_identifiers(expr: &Expr, names: &impl NameLookup) -> Vec<(String, Range)> {
    let mut missing = Vec::new();
    collect_undefined(expr, names, &mut missing);
    missing
}

fn collect_undefined(expr: &Expr, names: &impl NameLookup, missing: &mut Vec<(String, Range)>) {
    match expr {
        Expr::Identifier { name, range } => {
            if !names.is_defined(name) && boolean_value(name).is_none() {
                missing.push((name.clone(), *range));
            }
        },
        Expr::BinaryOp { left, right, .. } | Expr::ComparisonOp { left, right, .. } => {
            collect_undefined(left, names, missing);
            collect_undefined(right, names, missing);
        },
        Expr::UnaryOp { expr, .. } | Expr::UnitConversion { expr, .. } | Expr::NapkinConversion { expr, .. } => {
            collect_undefined(expr, names, missing);
        },
        Expr::RateLiteral { amount, .. } => collect_undefined(amount, names, missing),
        Expr::PercentageOf { percentage, of, .. } => {
            collect_undefined(percentage, names, missing);
            collect_undefined(of, names, missing);
        },
        Expr::FunctionCall { name, arguments, .. } => {
            let builtin = lookup_builtin(name);
            for (index, argument) in arguments.iter().enumerate() {
                if builtin.and_then(|b| b.keyword_at(index)).is_none() {
                    collect_undefined(argument, names, missing);
                }
            }
        },
        Expr::NumberLiteral { .. }
        | Expr::CurrencyLiteral { .. }
        | Expr::BooleanLiteral { .. }
        | Expr::DateLiteral { .. }
        | Expr::TimeLiteral { .. }
        | Expr::DurationLiteral { .. }
        | Expr::QuantityLiteral { .. } => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::Statement, parse};

    fn expression(source: &str) -> Expr {
        match parse(source).unwrap().remove(0) {
            Statement::Expression { expr, .. } | Statement::Assignment { value: expr, .. } => expr,
        }
    }

    #[test]
    fn reports_each_missing_name_with_its_range() {
        let names = HashSet::<String>::new();
        let missing = undefined_identifiers(&expression("a + b"), &names);

        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].0, "a");
        assert_eq!(missing[1].1.start.column, 5);
    }

    #[test]
    fn keyword_arguments_are_not_references() {
        let names = HashSet::<String>::new();
        assert!(undefined_identifiers(&expression("transfer_time(1 GB, regional, gigabit)"), &names).is_empty());
        assert_eq!(undefined_identifiers(&expression("sum(a, 1)"), &names).len(), 1);
    }

    #[test]
    fn environment_knows_kinds() {
        let mut env = Environment::new();
        env.evaluate(&parse("rent = $1,200").unwrap()).unwrap();

        assert!(env.is_defined("rent"));
        assert_eq!(env.kind_of("rent"), Some(Kind::Currency("USD".to_string())));
        assert_eq!(HashSet::<String>::new().kind_of("rent"), None);
    }
}
