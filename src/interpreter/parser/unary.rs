use crate::{
    ast::{BinaryOperator, DateSpec, Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{TokenKind, boolean_value, idiom_function},
        parser::{
            binary::binary,
            core::{Cursor, ParseResult, parse_expression},
            literal::{parse_currency_literal, parse_date_literal, parse_number_literal, parse_time_literal,
                      starts_date_literal},
            utils::parse_comma_separated,
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix `-` (negation) and `+`. Unary operators are
/// right-associative and bind looser than `^`, so `-2^2` is `-(2^2)`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "+") unary
///            | power
/// ```
/// # Parameters
/// - `cursor`: Token cursor.
///
/// # Returns
/// An [`Expr::UnaryOp`] or a power-level expression.
pub(crate) fn parse_unary(cursor: &mut Cursor) -> ParseResult<Expr> {
    let op = match cursor.peek_kind() {
        TokenKind::Minus => UnaryOperator::Negate,
        TokenKind::Plus => UnaryOperator::Plus,
        _ => return parse_power(cursor),
    };

    let start = cursor.here();
    cursor.next();
    let expr = cursor.descend(start, parse_unary)?;
    let range = start.merge(expr.range());
    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       range })
}

/// Parses exponentiation with right-associativity: `a ^ b ^ c` is
/// `a ^ (b ^ c)`. The exponent may itself carry a sign (`2 ^ -1`).
///
/// The rule is: `power := primary ("^" unary)?`
fn parse_power(cursor: &mut Cursor) -> ParseResult<Expr> {
    let base = parse_primary(cursor)?;
    if cursor.peek_kind() != TokenKind::Caret {
        return Ok(base);
    }

    let operator = cursor.here();
    cursor.next();
    let exponent = cursor.descend(operator, parse_unary)?;
    Ok(binary(base, BinaryOperator::Pow, exponent))
}

/// Parses a primary (atomic) expression.
///
/// Grammar (simplified):
/// ```text
///     primary := NUMBER suffix? | CURRENCY rate? | TIME ("am" | "pm")?
///              | BOOLEAN | "today" | "tomorrow" | "yesterday"
///              | MONTH DAY ","? YEAR
///              | IDENT "(" args ")" | FUNCTION ("(" args ")" | args)
///              | IDENT | "(" expression ")"
/// ```
/// # Parameters
/// - `cursor`: Token cursor positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary(cursor: &mut Cursor) -> ParseResult<Expr> {
    let Some(token) = cursor.peek() else {
        return Err(cursor.unexpected("an expression"));
    };

    match token.kind {
        TokenKind::Number => parse_number_literal(cursor),
        TokenKind::Currency => parse_currency_literal(cursor),
        TokenKind::Time => parse_time_literal(cursor),
        TokenKind::LParen => parse_grouping(cursor),
        TokenKind::Function => parse_fused_function(cursor),
        TokenKind::Boolean => {
            cursor.next();
            let value = boolean_value(&token.literal).ok_or_else(|| cursor.unexpected("a boolean"))?;
            Ok(Expr::BooleanLiteral { value,
                                      range: token.range() })
        },
        TokenKind::Keyword => {
            let offset_days = match token.literal.to_ascii_lowercase().as_str() {
                "today" => 0,
                "tomorrow" => 1,
                "yesterday" => -1,
                _ => return Err(cursor.unexpected("an expression")),
            };
            cursor.next();
            Ok(Expr::DateLiteral { date:  DateSpec::Relative { offset_days },
                                   range: token.range(), })
        },
        TokenKind::Identifier if starts_date_literal(cursor) => parse_date_literal(cursor),
        TokenKind::Identifier => parse_identifier_or_function(cursor),
        _ => Err(cursor.unexpected("an expression")),
    }
}

/// Parses a parenthesized expression: `"(" expression ")"`.
///
/// # Errors
/// Returns [`ParseError::ExpectedClosingParen`] pointing at the opening
/// parenthesis when the group is not closed.
fn parse_grouping(cursor: &mut Cursor) -> ParseResult<Expr> {
    let open = cursor.expect(TokenKind::LParen, "'('")?.range();
    let expr = cursor.descend(open, parse_expression)?;

    if cursor.peek_kind() == TokenKind::RParen {
        cursor.next();
        Ok(expr)
    } else if cursor.at_line_end() {
        Err(ParseError::ExpectedClosingParen { range: open })
    } else {
        Err(cursor.unexpected("')'"))
    }
}

/// Parses an identifier, which can be:
/// - identifier(arg1, arg2, ...)
/// - identifier
///
/// Function names are stored lower-cased; whether the name exists is decided
/// later against the built-in table.
///
/// # Parameters
/// - `cursor`: Token cursor positioned at an identifier.
///
/// # Returns
/// - [`Expr::FunctionCall`] if followed by parentheses,
/// - [`Expr::Identifier`] otherwise.
fn parse_identifier_or_function(cursor: &mut Cursor) -> ParseResult<Expr> {
    let token = cursor.expect(TokenKind::Identifier, "an identifier")?;

    if cursor.peek_kind() != TokenKind::LParen {
        return Ok(Expr::Identifier { name:  token.literal.clone(),
                                     range: token.range(), });
    }

    cursor.next();
    let arguments = cursor.descend(token.range(), |c| parse_comma_separated(c, parse_expression, TokenKind::RParen))?;
    Ok(Expr::FunctionCall { name: token.literal.to_ascii_lowercase(),
                            arguments,
                            range: token.range().merge(cursor.last_range()) })
}

/// Parses a fused idiom such as `average of 1, 2, 3` or
/// `square root of (16)`.
///
/// Without parentheses, each argument binds as tightly as a prefix operator:
/// `square root of 16 + 9` is `sqrt(16) + 9`.
fn parse_fused_function(cursor: &mut Cursor) -> ParseResult<Expr> {
    let token = cursor.expect(TokenKind::Function, "a function")?;
    let name = idiom_function(&token.literal).ok_or_else(|| ParseError::UnexpectedToken { token: token.literal.clone(),
                                                                                        range: token.range(), })?;

    let arguments = cursor.descend(token.range(), |c| {
                              if c.peek_kind() == TokenKind::LParen {
                                  c.next();
                                  return parse_comma_separated(c, parse_expression, TokenKind::RParen);
                              }
                              let mut arguments = vec![parse_unary(c)?];
                              while c.peek_kind() == TokenKind::Comma {
                                  c.next();
                                  arguments.push(parse_unary(c)?);
                              }
                              Ok(arguments)
                          })?;

    Ok(Expr::FunctionCall { name: name.to_string(),
                            arguments,
                            range: token.range().merge(cursor.last_range()) })
}
