use logos::Logos;

use crate::{
    ast::{Position, Range},
    config::Limits,
    error::LexError,
};

/// Words that are keywords wherever they appear, matched case-insensitively.
pub const KEYWORDS: [&str; 9] = ["in", "to", "as", "of", "per", "napkin", "today", "tomorrow", "yesterday"];

/// Words that read as boolean literals, with the value each one denotes.
pub const BOOLEANS: [(&str, bool); 6] =
    [("true", true), ("false", false), ("yes", true), ("no", false), ("on", true), ("off", false)];

/// Multi-word phrases fused into a single function token, with the built-in
/// each one calls.
const IDIOMS: [(&[&str], &str); 2] = [(&["average", "of"], "avg"), (&["square", "root", "of"], "sqrt")];

/// The raw token automaton. Keyword, boolean and contextual-`x` decisions
/// happen afterwards in [`tokenize_with_limits`], which produces [`Token`]s.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[regex(r"[0-9]+([,_][0-9]+)*(\.[0-9]+)?")]
    Number,
    #[regex(r"[$€£¥₹][0-9]+([,_][0-9]+)*(\.[0-9]+)?")]
    Currency,
    #[regex(r"[0-9][0-9]?:[0-9][0-9](:[0-9][0-9])?")]
    Time,
    #[regex(r##"[^\s0-9+\-*×/%^=!<>(),$€£¥₹:.#"';&|\[\]{}@~?`][^\s+\-*×/%^=!<>(),$€£¥₹:.#"';&|\[\]{}@~?`]*"##,
            allow_greedy = true)]
    Word,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    #[token("×")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    #[token("**")]
    Caret,
    #[token("=")]
    Assign,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("\n")]
    Newline,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and where it starts so every token can report a
/// 1-based line and column.
#[derive(Debug, Clone, Copy)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset at which the current line starts.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `1,200.50`, `42`, `1_000`.
    Number,
    /// A currency symbol fused with a number: `$1,200.50`.
    Currency,
    /// `14:30`, `9:05:10`.
    Time,
    /// Any other word.
    Identifier,
    /// One of [`KEYWORDS`].
    Keyword,
    /// One of [`BOOLEANS`].
    Boolean,
    /// A fused multi-word idiom such as `average of`.
    Function,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`, `×`, contextual `x`.
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`, `**`
    Caret,
    /// `=`
    Assign,
    /// `==`
    EqualEqual,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// A line break. Significant: it separates statements.
    Newline,
    /// End of input. Always the last token.
    Eof,
}

impl TokenKind {
    /// Whether the token is an arithmetic or comparison operator.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(self,
                 Self::Plus
                 | Self::Minus
                 | Self::Star
                 | Self::Slash
                 | Self::Percent
                 | Self::Caret
                 | Self::EqualEqual
                 | Self::NotEqual
                 | Self::Greater
                 | Self::GreaterEqual
                 | Self::Less
                 | Self::LessEqual)
    }
}

/// Represents a lexical token in the source input.
///
/// The literal keeps the source text exactly as written, so display code can
/// echo the user's casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind:    TokenKind,
    /// The source text of the token.
    pub literal: String,
    /// 1-based line.
    pub line:    usize,
    /// 1-based column, counted in characters.
    pub column:  usize,
}

impl Token {
    fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind,
               literal: literal.into(),
               line,
               column }
    }

    /// The range the token covers.
    #[must_use]
    pub fn range(&self) -> Range {
        Range::new(Position::new(self.line, self.column),
                   Position::new(self.line, self.column + self.literal.chars().count()))
    }

    /// Whether this is the keyword `word`, ignoring case.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.literal.eq_ignore_ascii_case(word)
    }

    /// Whether this is an identifier spelled `word`, ignoring case.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.literal.eq_ignore_ascii_case(word)
    }
}

/// The built-in a fused idiom token calls, e.g. `avg` for `Average of`.
#[must_use]
pub fn idiom_function(literal: &str) -> Option<&'static str> {
    let words: Vec<String> = literal.split_whitespace()
                                    .map(str::to_ascii_lowercase)
                                    .collect();
    IDIOMS.iter()
          .find(|(phrase, _)| phrase.iter().eq(words.iter()))
          .map(|(_, function)| *function)
}

/// The boolean a word denotes, if it is one of [`BOOLEANS`].
#[must_use]
pub fn boolean_value(word: &str) -> Option<bool> {
    BOOLEANS.iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(word))
            .map(|(_, value)| *value)
}

/// Whether `word` is reserved as a keyword or boolean.
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word)) || boolean_value(word).is_some()
}

/// Tokenizes `source` with the default [`Limits`].
///
/// The returned list always ends with an `Eof` token.
///
/// # Errors
/// Returns a [`LexError`] at the first character that starts no token.
///
/// ## Example
/// ```
/// use calcmark::interpreter::lexer::{TokenKind, tokenize};
///
/// let kinds: Vec<TokenKind> = tokenize("x = 5\ny = x + 3\n").unwrap()
///                                                             .iter()
///                                                             .map(|t| t.kind)
///                                                             .collect();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Identifier,
///                 TokenKind::Assign,
///                 TokenKind::Number,
///                 TokenKind::Newline,
///                 TokenKind::Identifier,
///                 TokenKind::Assign,
///                 TokenKind::Identifier,
///                 TokenKind::Plus,
///                 TokenKind::Number,
///                 TokenKind::Newline,
///                 TokenKind::Eof]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with_limits(source, &Limits::default())
}

/// Tokenizes `source`, failing once more than `limits.max_tokens` tokens
/// have been produced.
///
/// # Errors
/// Returns [`LexError::UnexpectedCharacter`] for a character that starts no
/// token and [`LexError::TooManyTokens`] when the ceiling is exceeded.
pub fn tokenize_with_limits(source: &str, limits: &Limits) -> Result<Vec<Token>, LexError> {
    let mut lexer = RawToken::lexer_with_extras(source, LexerExtras::default());
    let mut tokens: Vec<Token> = Vec::new();

    while let Some(raw) = lexer.next() {
        let span = lexer.span();
        let extras = lexer.extras;
        let column = column_of(source, extras.line_start, span.start);
        let literal = lexer.slice();

        let Ok(raw) = raw else {
            let character = source.get(span.start..)
                                  .and_then(|rest| rest.chars().next())
                                  .unwrap_or('\u{FFFD}');
            return Err(LexError::UnexpectedCharacter { character,
                                                       line: extras.line,
                                                       column });
        };

        match raw {
            RawToken::Newline => {
                tokens.push(Token::new(TokenKind::Newline, literal, extras.line, column));
                lexer.extras.line += 1;
                lexer.extras.line_start = span.end;
            },
            RawToken::Word => {
                let next = source.get(span.end..).and_then(|rest| rest.chars().next());
                push_word(&mut tokens, literal, next, extras.line, column);
            },
            other => tokens.push(Token::new(simple_kind(other), literal, extras.line, column)),
        }

        if tokens.len() > limits.max_tokens {
            return Err(LexError::TooManyTokens { limit: limits.max_tokens });
        }
    }

    let tokens = fuse_idioms(tokens);

    let extras = lexer.extras;
    let eof_column = column_of(source, extras.line_start, source.len());
    let mut tokens = tokens;
    tokens.push(Token::new(TokenKind::Eof, "", extras.line, eof_column));

    tracing::trace!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

fn column_of(source: &str, line_start: usize, offset: usize) -> usize {
    source.get(line_start..offset)
          .map_or(0, |prefix| prefix.chars().count())
          + 1
}

const fn simple_kind(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Number => TokenKind::Number,
        RawToken::Currency => TokenKind::Currency,
        RawToken::Time => TokenKind::Time,
        RawToken::Word => TokenKind::Identifier,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Assign => TokenKind::Assign,
        RawToken::EqualEqual => TokenKind::EqualEqual,
        RawToken::NotEqual => TokenKind::NotEqual,
        RawToken::Greater => TokenKind::Greater,
        RawToken::GreaterEqual => TokenKind::GreaterEqual,
        RawToken::Less => TokenKind::Less,
        RawToken::LessEqual => TokenKind::LessEqual,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Newline => TokenKind::Newline,
    }
}

/// Classifies a word, splitting a contextual `x` multiply off the front when
/// it directly follows a number (`5 x 3`, `5x3`).
fn push_word(tokens: &mut Vec<Token>, word: &str, next: Option<char>, line: usize, column: usize) {
    let after_number = tokens.last()
                             .is_some_and(|t| t.kind == TokenKind::Number && t.line == line);

    if after_number && let Some(rest) = word.strip_prefix(['x', 'X']) {
        if rest.is_empty() && next.is_none_or(char::is_whitespace) {
            tokens.push(Token::new(TokenKind::Star, &word[..1], line, column));
            return;
        }
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            tokens.push(Token::new(TokenKind::Star, &word[..1], line, column));
            tokens.push(Token::new(TokenKind::Number, rest, line, column + 1));
            return;
        }
    }

    let lower = word.to_lowercase();
    let kind = if KEYWORDS.contains(&lower.as_str()) {
        TokenKind::Keyword
    } else if boolean_value(&lower).is_some() {
        TokenKind::Boolean
    } else {
        TokenKind::Identifier
    };
    tokens.push(Token::new(kind, word, line, column));
}

/// Replaces each run of tokens spelling a fixed idiom with one `Function`
/// token whose literal is the phrase as written.
fn fuse_idioms(tokens: Vec<Token>) -> Vec<Token> {
    let mut fused = Vec::with_capacity(tokens.len());
    let mut index = 0;

    while index < tokens.len() {
        let matched = IDIOMS.iter().find_map(|(phrase, _)| {
                                       let window = tokens.get(index..index + phrase.len())?;
                                       let first_line = window.first()?.line;
                                       window.iter()
                                             .zip(phrase.iter())
                                             .all(|(token, word)| {
                                                 matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword)
                                                 && token.line == first_line
                                                 && token.literal.eq_ignore_ascii_case(word)
                                             })
                                             .then_some(window)
                                   });

        match matched {
            Some(window) => {
                let literal = window.iter()
                                    .map(|t| t.literal.as_str())
                                    .collect::<Vec<_>>()
                                    .join(" ");
                fused.push(Token::new(TokenKind::Function, literal, window[0].line, window[0].column));
                index += window.len();
            },
            None => {
                fused.push(tokens[index].clone());
                index += 1;
            },
        }
    }

    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn contextual_multiply() {
        assert_eq!(kinds("5x3"),
                   vec![TokenKind::Number, TokenKind::Star, TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("5 x 3"),
                   vec![TokenKind::Number, TokenKind::Star, TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("x + 3"),
                   vec![TokenKind::Identifier, TokenKind::Plus, TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("5 xyz"), vec![TokenKind::Number, TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn digits_around_a_separator_stay_one_number() {
        let tokens = tokenize("1,234,567.5").unwrap();
        assert_eq!(tokens[0].literal, "1,234,567.5");

        let tokens = tokenize("12,34").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].literal, "12,34");
        assert_eq!(tokens.len(), 2);

        let tokens = tokenize("1_000").unwrap();
        assert_eq!(tokens[0].literal, "1_000");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn spaced_commas_separate_arguments() {
        assert_eq!(kinds("avg(1, 2)"),
                   vec![TokenKind::Identifier,
                        TokenKind::LParen,
                        TokenKind::Number,
                        TokenKind::Comma,
                        TokenKind::Number,
                        TokenKind::RParen,
                        TokenKind::Eof]);
        assert_eq!(kinds("max(a,b)"),
                   vec![TokenKind::Identifier,
                        TokenKind::LParen,
                        TokenKind::Identifier,
                        TokenKind::Comma,
                        TokenKind::Identifier,
                        TokenKind::RParen,
                        TokenKind::Eof]);
    }

    #[test]
    fn currency_and_time_literals() {
        let tokens = tokenize("€1,200.50 at 14:30").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Currency);
        assert_eq!(tokens[0].literal, "€1,200.50");
        assert_eq!(tokens[2].kind, TokenKind::Time);
        assert_eq!(tokens[2].column, 14);
    }

    #[test]
    fn idioms_fuse() {
        let tokens = tokenize("Square root of 16").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Function);
        assert_eq!(idiom_function(&tokens[0].literal), Some("sqrt"));
    }

    #[test]
    fn keywords_and_booleans_ignore_case() {
        assert_eq!(kinds("IN Yes"), vec![TokenKind::Keyword, TokenKind::Boolean, TokenKind::Eof]);
    }

    #[test]
    fn reports_position_of_bad_character() {
        assert_eq!(tokenize("1 +\n2 : 3"),
                   Err(LexError::UnexpectedCharacter { character: ':',
                                                       line:      2,
                                                       column:    3, }));
    }
}
