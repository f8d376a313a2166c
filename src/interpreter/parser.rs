/// Core parsing state and the expression entry point.
///
/// Holds the token cursor, the depth ceiling, and the program-level loop
/// that enforces one statement per line.
pub mod core;

/// Unary and primary expression parsing.
///
/// Handles prefix `+`/`-`, exponentiation, parenthesized groups, identifiers
/// and function calls.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the comparison, conversion, additive and multiplicative levels
/// of the precedence chain.
pub mod binary;

/// Literal parsing.
///
/// Numbers and their suffixes (percent, units, rates), currency, time and
/// date literals.
pub mod literal;

/// Utility functions for the parser.
pub mod utils;

/// Statement parsing.
///
/// Implements assignments and bare expression statements.
pub mod statement;
