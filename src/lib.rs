//! # calcmark
//!
//! calcmark is the language engine behind documents that interleave prose
//! with calculations. A line is a calculation only if it tokenizes, parses to
//! exactly one statement and every name it reads is already defined;
//! everything else is prose.
//!
//! The pipeline is [`tokenize`] → [`parse`] → [`check`] → [`evaluate`], with
//! [`classify`] deciding per line and [`evaluate_document`] driving a whole
//! document.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Statement,
    config::Limits,
    error::{LexError, LineError, ParseError, RuntimeError},
    interpreter::{
        checker::diagnostic::Diagnostic,
        classifier::{LineType, classify_with_limits},
        evaluator::core::Environment,
        lexer::{Token, tokenize_with_limits},
        parser::core::parse_program,
        scope::NameLookup,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums that represent the
/// syntactic structure of a line as a tree. The AST is built by the parser
/// and traversed by the checker, the classifier and the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source ranges to AST nodes for error reporting.
pub mod ast;
/// Resource ceilings for lexing and parsing.
pub mod config;
/// Provides unified error types for lexing, parsing, configuration and
/// evaluation.
///
/// This module defines all errors that can be raised while processing a
/// document. Every error carries the source range it refers to.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Attaches line and column information for caret-accurate display.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the language engine.
///
/// This module ties together lexing, parsing, checking, classification,
/// evaluation and value representation.
///
/// # Responsibilities
/// - Coordinates all core components.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General numeric helpers: checked conversions, grouping and rounding.
pub mod util;

/// Tokenizes `source`.
///
/// # Errors
/// Returns a [`LexError`] at the first character that starts no token.
///
/// # Example
/// ```
/// let tokens = calcmark::tokenize("$1,200 * 3").unwrap();
/// assert_eq!(tokens.len(), 4); // currency, `*`, number, end of input
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with_limits(source, &Limits::default())
}

/// Parses `source` into one statement per non-blank line.
///
/// # Errors
/// Returns the first lexing or parsing error.
///
/// # Examples
/// ```
/// use calcmark::{ast::Statement, parse};
///
/// let statements = parse("x = 5\ny = x + 3").unwrap();
/// assert!(matches!(&statements[0], Statement::Assignment { name, .. } if name == "x"));
///
/// // A missing operand is a parse error, not a diagnostic.
/// assert!(parse("1 +").is_err());
/// ```
pub fn parse(source: &str) -> Result<Vec<Statement>, ParseError> {
    parse_with_limits(source, &Limits::default())
}

/// [`parse`] with explicit token and depth ceilings.
///
/// # Errors
/// Returns the first lexing or parsing error, including
/// [`LexError::TooManyTokens`] and [`ParseError::TooDeep`].
pub fn parse_with_limits(source: &str, limits: &Limits) -> Result<Vec<Statement>, ParseError> {
    let tokens = tokenize_with_limits(source, limits)?;
    parse_program(&tokens, limits)
}

/// Checks statements against the names already defined, without evaluating
/// anything. See [`interpreter::checker::core::check`].
#[must_use]
pub fn check<N: NameLookup + ?Sized>(statements: &[Statement], names: &N) -> Vec<Diagnostic> {
    interpreter::checker::core::check(statements, names)
}

/// Classifies one document line. See
/// [`interpreter::classifier::classify`].
#[must_use]
pub fn classify(line: &str, names: &impl NameLookup) -> LineType {
    interpreter::classifier::classify(line, names)
}

/// Evaluates statements in order against `env`, binding assigned names.
///
/// # Errors
/// Returns the first [`RuntimeError`]. Bindings made by the statements before
/// the failing one are kept.
///
/// # Example
/// ```
/// use calcmark::{evaluate, interpreter::evaluator::core::Environment, parse};
///
/// let mut env = Environment::new();
/// let values = evaluate(&parse("5 kg + 10 lb").unwrap(), &mut env).unwrap();
/// assert_eq!(values[0].to_string(), "9.54 kg");
/// ```
pub fn evaluate(statements: &[Statement], env: &mut Environment) -> Result<Vec<Value>, RuntimeError> {
    env.evaluate(statements)
}

/// The outcome of one document line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineResult {
    /// 1-based line number.
    pub line:        usize,
    /// How the line was classified.
    pub line_type:   LineType,
    /// The value, for calculation lines that evaluated.
    pub value:       Option<Value>,
    /// Checker findings for calculation lines.
    pub diagnostics: Vec<Diagnostic>,
    /// Why a calculation line produced no value, when it failed to parse or
    /// evaluate. Lines blocked by error diagnostics have no error here.
    pub error:       Option<LineError>,
}

impl LineResult {
    const fn new(line: usize, line_type: LineType) -> Self {
        Self { line,
               line_type,
               value: None,
               diagnostics: Vec::new(),
               error: None }
    }
}

/// Processes a whole document line by line against `env`.
///
/// Each line is classified against the names defined so far. Calculation
/// lines are parsed and checked; lines with error diagnostics are not
/// evaluated. A failing line never stops the lines after it.
///
/// # Example
/// ```
/// use calcmark::{evaluate_document, interpreter::{classifier::LineType, evaluator::core::Environment}};
///
/// let doc = "# Budget\n\nrent = $1,500\nfood = $400\nrent + food\nThat is the total.";
/// let mut env = Environment::new();
/// let lines = evaluate_document(doc, &mut env);
///
/// assert_eq!(lines[0].line_type, LineType::Markdown);
/// assert_eq!(lines[1].line_type, LineType::Blank);
/// assert_eq!(lines[4].value.as_ref().map(ToString::to_string), Some("$1,900.00".to_string()));
/// assert_eq!(lines[5].line_type, LineType::Markdown);
/// ```
pub fn evaluate_document(source: &str, env: &mut Environment) -> Vec<LineResult> {
    evaluate_document_with_limits(source, env, &Limits::default())
}

/// [`evaluate_document`] with explicit token and depth ceilings.
pub fn evaluate_document_with_limits(source: &str, env: &mut Environment, limits: &Limits) -> Vec<LineResult> {
    source.lines()
          .enumerate()
          .map(|(index, text)| evaluate_line(index + 1, text, env, limits))
          .collect()
}

fn evaluate_line(number: usize, text: &str, env: &mut Environment, limits: &Limits) -> LineResult {
    let line_type = classify_with_limits(text, &*env, limits);
    let mut result = LineResult::new(number, line_type);
    if line_type != LineType::Calculation {
        return result;
    }

    let statements = match parse_line(number, text, limits) {
        Ok(statements) => statements,
        Err(error) => {
            result.error = Some(error.into());
            return result;
        },
    };

    result.diagnostics = check(&statements, &*env);
    if result.diagnostics.iter().any(Diagnostic::is_error) {
        tracing::debug!(line = number, "skipping evaluation after error diagnostics");
        return result;
    }

    match env.evaluate(&statements) {
        Ok(mut values) => result.value = values.pop(),
        Err(error) => result.error = Some(error.into()),
    }
    result
}

/// Parses a single document line, reporting positions on its document line.
fn parse_line(number: usize, text: &str, limits: &Limits) -> Result<Vec<Statement>, ParseError> {
    let mut tokens = tokenize_with_limits(text, limits)?;
    for token in &mut tokens {
        token.line = number;
    }
    parse_program(&tokens, limits)
}
