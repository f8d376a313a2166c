/// Default ceiling on the number of tokens a single `tokenize` call may
/// produce.
pub const DEFAULT_MAX_TOKENS: usize = 10_000;
/// Default ceiling on expression nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Resource ceilings applied while lexing and parsing untrusted input.
///
/// Both limits fail fast with a dedicated error kind
/// ([`LexError::TooManyTokens`], [`ParseError::TooDeep`]) instead of letting
/// a pathological line exhaust memory or the stack.
///
/// ## Example
/// ```
/// use calcmark::{config::Limits, error::LexError, interpreter::lexer::tokenize_with_limits};
///
/// let limits = Limits { max_tokens: 3,
///                       ..Limits::default() };
///
/// assert_eq!(tokenize_with_limits("1 + 2 + 3", &limits),
///            Err(LexError::TooManyTokens { limit: 3 }));
/// ```
///
/// [`LexError::TooManyTokens`]: crate::error::LexError::TooManyTokens
/// [`ParseError::TooDeep`]: crate::error::ParseError::TooDeep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum tokens per input, `Eof` excluded.
    pub max_tokens: usize,
    /// Maximum nesting of parentheses, unary operators and calls.
    pub max_depth:  usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_tokens: DEFAULT_MAX_TOKENS,
               max_depth:  DEFAULT_MAX_DEPTH, }
    }
}
