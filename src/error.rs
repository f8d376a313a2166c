/// Lexing errors.
///
/// Raised when a character cannot start any token, or when the input exceeds
/// the configured token ceiling. The classifier treats a lex failure as "this
/// line is prose".
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while turning tokens into
/// statements: unexpected tokens, missing operands, chained comparisons,
/// trailing tokens and malformed date or time literals.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. A runtime
/// error aborts the statement that raised it; earlier statements keep their
/// bindings.
pub mod runtime_error;
/// Configuration errors.
///
/// Raised while seeding an environment (exchange-rate pairs, literal-only
/// globals) before any evaluation begins.
pub mod config_error;
/// Document-line errors.
///
/// Wraps the parse or runtime error that stopped one line of a document.
/// Other lines are unaffected.
pub mod line_error;

pub use config_error::ConfigError;
pub use lex_error::LexError;
pub use line_error::LineError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
