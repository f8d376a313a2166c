use crate::{
    ast::{Expr, Position, Range, Statement},
    config::Limits,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{binary::parse_comparison, statement::parse_statement},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// A read position into a token list, plus the nesting depth reached so far.
///
/// The cursor never moves past the trailing `Eof` token, so `peek` always
/// has something to report.
pub struct Cursor<'a> {
    tokens:    &'a [Token],
    position:  usize,
    depth:     usize,
    max_depth: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the first token.
    #[must_use]
    pub const fn new(tokens: &'a [Token], limits: &Limits) -> Self {
        Self { tokens,
               position: 0,
               depth: 0,
               max_depth: limits.max_depth }
    }

    /// The current token, or `None` once the list is exhausted.
    #[must_use]
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// The token `n` places after the current one.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + n)
    }

    /// The current token's kind, `Eof` when exhausted.
    #[must_use]
    pub fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Consumes and returns the current token. `Eof` is never consumed.
    pub fn next(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        Some(token)
    }

    /// Whether the cursor sits on a `Newline` or `Eof`.
    #[must_use]
    pub fn at_line_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Eof)
    }

    /// Range of the most recently consumed token.
    #[must_use]
    pub fn last_range(&self) -> Range {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or_else(|| self.here(), Token::range)
    }

    /// Range of the current token.
    #[must_use]
    pub fn here(&self) -> Range {
        self.peek()
            .map_or_else(|| Range::new(Position::new(1, 1), Position::new(1, 1)), Token::range)
    }

    /// Builds the error for a token that cannot appear here: end-of-input
    /// when the line is over, unexpected token otherwise.
    #[must_use]
    pub fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) if !self.at_line_end() => {
                ParseError::UnexpectedToken { token: token.literal.clone(),
                                              range: token.range(), }
            },
            _ => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                    range:    self.here(), },
        }
    }

    /// Consumes the current token if it has `kind`, failing otherwise.
    ///
    /// # Errors
    /// Returns [`Cursor::unexpected`] when the kind does not match.
    pub fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<&'a Token> {
        if self.peek_kind() == kind {
            self.next().ok_or_else(|| self.unexpected(expected))
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Runs `parse` one nesting level deeper, failing with
    /// [`ParseError::TooDeep`] once the configured ceiling is passed.
    ///
    /// # Errors
    /// Propagates `parse`'s error, or returns `TooDeep`.
    pub fn descend<T>(&mut self, range: Range, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep { limit: self.max_depth,
                                             range });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, comparison, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar: `expression := comparison`
///
/// # Parameters
/// - `cursor`: Token cursor positioned at the start of the expression.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression(cursor: &mut Cursor) -> ParseResult<Expr> {
    parse_comparison(cursor)
}

/// Parses every line of a token list into statements.
///
/// Blank lines produce nothing. Every other line must reduce to exactly one
/// statement followed by a line break or the end of input; anything left
/// over is [`ParseError::UnexpectedTrailingTokens`].
///
/// # Parameters
/// - `tokens`: Tokens ending with `Eof`, as returned by the lexer.
/// - `limits`: Depth ceiling to enforce.
///
/// # Returns
/// One statement per non-blank line, in source order.
///
/// # Errors
/// Returns the first [`ParseError`] encountered.
pub fn parse_program(tokens: &[Token], limits: &Limits) -> ParseResult<Vec<Statement>> {
    let mut cursor = Cursor::new(tokens, limits);
    let mut statements = Vec::new();

    loop {
        while cursor.peek_kind() == TokenKind::Newline {
            cursor.next();
        }
        if cursor.peek_kind() == TokenKind::Eof {
            break;
        }

        statements.push(parse_statement(&mut cursor)?);

        if !cursor.at_line_end()
           && let Some(token) = cursor.peek()
        {
            return Err(ParseError::UnexpectedTrailingTokens { token: token.literal.clone(),
                                                              range: token.range(), });
        }
    }

    Ok(statements)
}
