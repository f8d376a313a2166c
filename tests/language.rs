use std::collections::HashSet;

use calcmark::{
    ast::{BinaryOperator, Expr, Statement},
    check, classify,
    config::Limits,
    error::{LexError, ParseError, RuntimeError},
    evaluate, evaluate_document,
    interpreter::{
        checker::diagnostic::{DiagnosticCode, Severity},
        classifier::LineType,
        evaluator::core::Environment,
        lexer::TokenKind,
        value::core::Value,
    },
    parse, parse_with_limits, tokenize,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Parses, checks and evaluates `src`, returning the display of the last
/// value. Error diagnostics count as failure, like they do in a document.
fn get_result(src: &str, env: &mut Environment) -> Result<String, String> {
    let statements = parse(src).map_err(|e| e.to_string())?;
    if let Some(error) = check(&statements, &*env).into_iter().find(|d| d.is_error()) {
        return Err(error.to_string());
    }
    let values = evaluate(&statements, env).map_err(|e| e.to_string())?;
    values.last().map(ToString::to_string).ok_or_else(|| "no value".to_string())
}

fn assert_success(src: &str, expected: &str) {
    match get_result(src, &mut Environment::new()) {
        Ok(shown) => assert_eq!(shown, expected, "unexpected result for {src:?}"),
        Err(e) => panic!("Script {src:?} failed: {e}"),
    }
}

fn assert_failure(src: &str) {
    if let Ok(shown) = get_result(src, &mut Environment::new()) {
        panic!("Script {src:?} succeeded with {shown} but was expected to fail")
    }
}

fn no_names() -> HashSet<String> {
    HashSet::new()
}

#[test]
fn whole_pipeline_on_two_assignments() {
    let src = "x = 5\ny = x + 3\n";

    let tokens = tokenize(src).unwrap();
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Newline).count(), 2);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));

    let statements = parse(src).unwrap();
    assert_eq!(statements.len(), 2);
    assert!(matches!(&statements[0], Statement::Assignment { name, .. } if name == "x"));
    match &statements[1] {
        Statement::Assignment { name, value: Expr::BinaryOp { op, left, .. }, .. } => {
            assert_eq!(name, "y");
            assert_eq!(*op, BinaryOperator::Add);
            assert!(matches!(left.as_ref(), Expr::Identifier { name, .. } if name == "x"));
        },
        other => panic!("expected an assignment of a sum, got {other:?}"),
    }

    assert!(check(&statements, &no_names()).is_empty());

    let mut env = Environment::new();
    let values = evaluate(&statements, &mut env).unwrap();
    assert_eq!(values, [Value::Number(dec!(5)), Value::Number(dec!(8))]);
    assert_eq!(env.get("x"), Some(&Value::Number(dec!(5))));
    assert_eq!(env.get("y"), Some(&Value::Number(dec!(8))));
}

#[test]
fn classification_depends_on_defined_names() {
    let mut names = no_names();
    assert_eq!(classify("total", &names), LineType::Markdown);

    names.insert("total".to_string());
    assert_eq!(classify("total", &names), LineType::Calculation);
}

#[test]
fn classification_is_repeatable() {
    let names: HashSet<String> = ["rent".to_string()].into_iter().collect();
    for line in ["rent * 12", "Rent is due", "", "# Heading", "5 km in miles"] {
        assert_eq!(classify(line, &names), classify(line, &names));
    }
}

#[test]
fn first_unit_wins() {
    let mut env = Environment::new();
    let values = evaluate(&parse("5 kg + 10 lb").unwrap(), &mut env).unwrap();
    match &values[0] {
        Value::Quantity { amount, unit } => {
            assert_eq!(unit, "kg");
            assert_eq!(amount.round_dp(2), dec!(9.54));
        },
        other => panic!("expected a quantity, got {other:?}"),
    }

    assert_success("10 lb + 5 kg", "21.02 lb");
    assert_success("1 km + 500 m", "1.5 km");
}

#[test]
fn impossible_dates_are_error_diagnostics() {
    let diagnostics = check(&parse("Feb 30 2025").unwrap(), &no_names());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidDate);
    assert_eq!(diagnostics[0].detail.as_deref(),
               Some("February has 28 days in 2025 (not a leap year)"));

    assert!(check(&parse("Feb 29 2024").unwrap(), &no_names()).is_empty());
}

#[test]
fn years_outside_the_supported_range() {
    for src in ["Jan 1 1899", "Jan 1 2101"] {
        let diagnostics = check(&parse(src).unwrap(), &no_names());
        assert_eq!(diagnostics.len(), 1, "{src}");
        assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidDate);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }
    assert!(check(&parse("Jan 1 1900").unwrap(), &no_names()).is_empty());
    assert!(check(&parse("Dec 31 2100").unwrap(), &no_names()).is_empty());
}

#[test]
fn century_leap_years() {
    let diagnostics = check(&parse("Feb 29 1900").unwrap(), &no_names());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidDate);
    assert_eq!(diagnostics[0].detail.as_deref(),
               Some("February has 28 days in 1900 (not a leap year)"));

    assert_success("Feb 29 2000", "Feb 29, 2000");
}

#[test]
fn averaging_currencies() {
    let mut env = Environment::new();
    let mixed = evaluate(&parse("avg($100, €200)").unwrap(), &mut env).unwrap();
    assert_eq!(mixed, [Value::Number(dec!(150))]);

    assert_success("avg($100, $200)", "$150.00");

    let mut env = Environment::new().with_exchange_rate("EUR", "USD", dec!(2));
    assert_eq!(get_result("avg($100, €100)", &mut env).as_deref(), Ok("$150.00"));
}

#[test]
fn missing_operand_is_a_parse_error() {
    assert!(matches!(parse("1 +"), Err(ParseError::UnexpectedEndOfInput { .. })));
    assert!(matches!(parse("1 < 2 < 3"), Err(ParseError::ChainedComparison { .. })));
}

#[test]
fn parsing_respects_configured_limits() {
    let few_tokens = Limits { max_tokens: 3,
                              ..Limits::default() };
    assert!(matches!(parse_with_limits("1 + 2 + 3", &few_tokens),
                     Err(ParseError::Lex(LexError::TooManyTokens { limit: 3 }))));
    assert!(parse_with_limits("1 + 2", &few_tokens).is_ok());

    let shallow = Limits { max_depth: 8,
                           ..Limits::default() };
    let nested = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    assert!(matches!(parse_with_limits(&nested, &shallow), Err(ParseError::TooDeep { limit: 8, .. })));
    assert!(parse_with_limits("(1 + 2) * 3", &shallow).is_ok());
}

#[test]
fn modulo_by_a_zero_variable() {
    let mut env = Environment::new();
    let statements = parse("x = 0\n10 % x").unwrap();
    assert!(check(&statements, &no_names()).iter().all(|d| !d.is_error()));

    let result = evaluate(&statements, &mut env);
    assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
    assert!(env.contains("x"));
}

#[test]
fn failed_statement_keeps_earlier_bindings() {
    let mut env = Environment::new();
    let result = evaluate(&parse("a = 2\nb = a / 0\nc = 3").unwrap(), &mut env);

    assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
    assert!(env.contains("a"));
    assert!(!env.contains("b"));
    assert!(!env.contains("c"));
}

#[test]
fn currency_display_follows_the_input() {
    assert_success("$100", "$100.00");
    assert_success("100 USD", "100.00 USD");
    assert_success("€1,200.5", "€1,200.50");
    assert_success("$19.99 * 3", "$59.97");
    assert_success("20% of $50", "$10.00");
}

#[test]
fn numbers_and_grouping() {
    assert_success("1,200 + 1_000", "2,200");
    assert_success("2 ^ 10", "1,024");
    assert_success("10 / 4", "2.5");
    assert_success("5x3", "15");
    assert_success("1,234,567 as napkin", "1,000,000");
    assert_success("-(2 + 3)", "-5");
    assert_success("12,34 + 1", "1,235");
    assert_success("avg(1, 2)", "1.5");
}

#[test]
fn napkin_rounding_out_of_range_is_an_error() {
    let statements = parse("79,000,000,000,000,000,000,000,000,000 as napkin").unwrap();
    let result = evaluate(&statements, &mut Environment::new());
    assert!(matches!(result, Err(RuntimeError::Overflow { .. })), "got {result:?}");

    assert_success("51,000,000,000,000,000,000,000,000,000 as napkin",
                   "50,000,000,000,000,000,000,000,000,000");
}

#[test]
fn conversions() {
    assert_success("5 km in m", "5,000 m");
    assert_success("90 minutes in hours", "1.5 hours");
    assert_success("3 in kg", "3 kg");

    let mut env = Environment::new().with_exchange_rate("USD", "EUR", dec!(0.9));
    assert_eq!(get_result("$100 in EUR", &mut env).as_deref(), Ok("€90.00"));
    assert_eq!(get_result("100 USD in EUR", &mut env).as_deref(), Ok("90.00 EUR"));
}

#[test]
fn abbreviated_durations_display_as_written() {
    assert_success("5 h", "5 h");
    assert_success("10 sec", "10 sec");
    assert_success("2 h + 30 mins", "2.5 h");
    assert_success("3 hours * 2", "6 hours");
    assert_success("90 mins in h", "1.5 h");
    assert_success("Mar 8 2025 - Mar 1 2025", "7 days");
}

#[test]
fn reverse_conversions_use_the_reciprocal_rate() {
    let mut env = Environment::new().with_exchange_rate("USD", "EUR", dec!(0.5));
    assert_eq!(get_result("€10 in USD", &mut env).as_deref(), Ok("$20.00"));
    assert_eq!(get_result("20 EUR in USD", &mut env).as_deref(), Ok("40.00 USD"));
    assert_eq!(get_result("$10 + €10", &mut env).as_deref(), Ok("$30.00"));
}

#[test]
fn metal_codes_are_not_money() {
    assert_success("5 XAU", "5 XAU");
    assert_success("2 XDR + 3 XDR", "5 XDR");
}

#[test]
fn comparisons_convert_first() {
    assert_success("1 km > 900 m", "true");
    assert_success("2 == 2", "true");
    assert_success("$5 < $4", "false");
}

#[test]
fn calendar_arithmetic() {
    assert_success("Jan 31 2025 + 1 month", "Feb 28, 2025");
    assert_success("Mar 1 2025 - Feb 1 2025", "28 days");
    assert_success("17:30 - 9:00", "510 minutes");
}

#[test]
fn capacity_planning_functions() {
    assert_success("downtime(99.9%, month)", "43.2 minutes");
    assert_success("transfer_time(1 GB, regional, gigabit)", "8.005 seconds");
    assert_success("max(1 km, 900 m)", "1 km");
    assert_success("sum(1 km, 500 m)", "1.5 km");
    assert_success("sqrt(16)", "4");
}

#[test]
fn mismatches_fail() {
    assert_failure("5 kg + 3 m");
    assert_failure("$100 + 20 EUR");
    assert_failure("Jan 1 2025 * 2");
    assert_failure("median(1, 2)");
    assert_failure("sqrt(1, 2)");
    assert_failure("rtt(nearby)");
    assert_failure("undefined_name + 1");
}

#[test]
fn seeded_globals_are_visible() {
    let mut env = Environment::new();
    env.seed_global("tax", "8%").unwrap();
    assert_eq!(get_result("$100 * tax", &mut env).as_deref(), Ok("$8.00"));
    assert_eq!(env.get("tax"), Some(&Value::Number(Decimal::new(8, 2))));
}

#[test]
fn document_lines_are_independent() {
    let doc = "# Trip\n\
               flights = $1,200\n\
               hotel = flights / 0\n\
               nights = 4\n\
               oops = 5 kg + 3 m\n\
               nights * $150\n\
               We will see how it goes.";
    let mut env = Environment::new();
    let lines = evaluate_document(doc, &mut env);

    let types: Vec<LineType> = lines.iter().map(|l| l.line_type).collect();
    assert_eq!(types,
               [LineType::Markdown,
                LineType::Calculation,
                LineType::Calculation,
                LineType::Calculation,
                LineType::Calculation,
                LineType::Calculation,
                LineType::Markdown]);

    // Runtime failure: warned about, evaluated, failed.
    assert!(lines[2].value.is_none());
    assert!(lines[2].error.is_some());
    assert_eq!(lines[2].diagnostics[0].code, DiagnosticCode::DivisionByZero);

    // Checker error: never evaluated.
    assert!(lines[4].value.is_none());
    assert!(lines[4].error.is_none());
    assert!(lines[4].diagnostics.iter().any(|d| d.code == DiagnosticCode::IncompatibleUnits));

    assert_eq!(lines[5].value.as_ref().map(ToString::to_string).as_deref(), Some("$600.00"));
    assert!(env.contains("flights"));
    assert!(!env.contains("hotel"));
}

#[test]
fn diagnostics_point_at_their_document_line() {
    let mut env = Environment::new();
    let lines = evaluate_document("a = 1\n\nb = a / 0", &mut env);
    let range = lines[2].diagnostics[0].range.unwrap();
    assert_eq!(range.start.line, 3);
}

#[test]
fn sample_document() {
    let mut env = Environment::new().with_exchange_rate("USD", "EUR", dec!(0.92));
    let lines = evaluate_document(include_str!("example.cm"), &mut env);

    let failures: Vec<String> = lines.iter()
                                     .filter(|l| l.line_type == LineType::Calculation && l.value.is_none())
                                     .map(|l| format!("line {}: {:?} {:?}", l.line, l.error, l.diagnostics))
                                     .collect();
    assert!(failures.is_empty(), "calculation lines failed:\n{}", failures.join("\n"));

    let calculations = lines.iter().filter(|l| l.line_type == LineType::Calculation).count();
    assert!(calculations > 10, "only {calculations} calculation lines recognised");
    assert_eq!(env.get("monthly_total").map(ToString::to_string).as_deref(), Some("$2,350.00"));
}
