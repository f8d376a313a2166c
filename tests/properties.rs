//! Property-based tests for the public pipeline.
//!
//! 1. **Lexer never panics** and always ends a successful token list with
//!    `Eof`.
//! 2. **Parser never panics** on arbitrary input.
//! 3. **Classification is deterministic** for the same line and names.
//! 4. **Known-valid fragments** lex and classify as calculations.
//! 5. **Integer formatting** survives stripping its grouping separators.
//! 6. **Small-integer arithmetic** agrees with native arithmetic.

use std::collections::HashSet;

use calcmark::{
    classify, evaluate,
    interpreter::{
        classifier::LineType, evaluator::core::Environment, lexer::TokenKind, value::format::format_number,
    },
    parse, tokenize,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

const VALID_LINES: &[&str] = &["42",
                               "$1,200.50",
                               "5 kg + 10 lb",
                               "100 USD",
                               "20% of $50",
                               "2 ^ 10",
                               "5 km in miles",
                               "1,234,567 as napkin",
                               "Jan 31 2025 + 1 month",
                               "14:30 - 9:05",
                               "avg(1, 2, 3)",
                               "downtime(99.9%, month)",
                               "today + 3 days",
                               "true"];

fn valid_line() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_LINES).prop_map(ToString::to_string)
}

/// Text drawn from the characters the language cares about, so generated
/// lines reach the parser more often than uniformly random strings would.
fn calc_like() -> impl Strategy<Value = String> {
    "[a-z0-9 $€%+*/().,:=<>-]{0,40}"
}

fn names() -> HashSet<String> {
    ["x", "total", "rent"].iter().map(ToString::to_string).collect()
}

proptest! {
    #[test]
    fn tokenize_never_panics(input in any::<String>()) {
        if let Ok(tokens) = tokenize(&input) {
            prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        }
    }

    #[test]
    fn parse_never_panics(input in calc_like()) {
        let _ = parse(&input);
    }

    #[test]
    fn classify_is_deterministic(input in calc_like()) {
        let names = names();
        prop_assert_eq!(classify(&input, &names), classify(&input, &names));
    }

    #[test]
    fn classify_never_panics_on_arbitrary_text(input in any::<String>()) {
        let _ = classify(&input, &HashSet::<String>::new());
    }

    #[test]
    fn valid_lines_are_calculations(line in valid_line()) {
        prop_assert!(tokenize(&line).is_ok());
        prop_assert_eq!(classify(&line, &HashSet::<String>::new()), LineType::Calculation);
    }

    #[test]
    fn grouped_integers_read_back(n in -1_000_000_000_i64..1_000_000_000) {
        let shown = format_number(Decimal::from(n));
        let digits: String = shown.chars().filter(|c| *c != ',').collect();
        prop_assert_eq!(digits.parse::<i64>().ok(), Some(n));
    }

    #[test]
    fn small_integer_arithmetic(a in 0_i64..10_000, b in 0_i64..10_000) {
        let mut env = Environment::new();
        let statements = parse(&format!("{a} + {b}\n{a} * {b}")).unwrap();
        let values = evaluate(&statements, &mut env).unwrap();

        prop_assert_eq!(values[0].amount(), Some(Decimal::from(a + b)));
        prop_assert_eq!(values[1].amount(), Some(Decimal::from(a * b)));
    }
}
