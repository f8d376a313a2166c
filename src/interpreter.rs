/// The checker module reports problems without evaluating anything.
///
/// It walks parsed statements in source order, infers a static kind for
/// every subexpression and runs the same compatibility rules as the
/// evaluator, producing positioned diagnostics with stable codes.
///
/// # Responsibilities
/// - Reports names used before they are defined.
/// - Reports unit, currency and type mismatches, and invalid dates.
/// - Validates builtin calls: names, argument counts, keyword arguments.
pub mod checker;
/// Decides, line by line, whether a document line is a calculation.
pub mod classifier;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, applies first-unit-wins conversion and
/// date arithmetic, manages variable state, and produces values. It is the
/// core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, builtin functions and conversions.
/// - Reports runtime errors such as division by zero or a missing exchange
///   rate.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// currency amounts, identifiers, operators and keywords. This is the first
/// stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with kind and source
///   location.
/// - Resolves the contextual `x` operator and fuses multi-word idioms.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of each line.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates grammar, reporting errors with location info.
/// - Enforces one statement per line.
pub mod parser;
/// Name resolution shared by the checker and the classifier.
pub mod scope;
/// Value kinds, units, currencies and calendar rules.
pub mod types;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Renders values for display.
pub mod value;
