use rust_decimal::Decimal;

use crate::{
    ast::{DateSpec, Expr},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{Cursor, ParseResult},
            unary::parse_unary,
        },
        types::{
            currency::{code_for_symbol, looks_like_code},
            dates::month_from_name,
            units::{lookup_unit, time_unit},
        },
    },
    util::num::parse_decimal_literal,
};

/// Parses a number literal together with whatever suffix turns it into a
/// richer literal.
///
/// ```text
///     NUMBER "%" "of" unary      PercentageOf
///     NUMBER "%"                 percent literal, when no operand follows
///     NUMBER UNIT rate?          Duration, Currency (3-letter code) or Quantity
///     NUMBER
/// ```
///
/// A `%` followed by something that can start an operand is left in place
/// for the multiplicative level to read as modulus.
///
/// # Errors
/// Returns [`ParseError::LiteralOutOfRange`] when the digits do not fit the
/// decimal type.
pub(in crate::interpreter::parser) fn parse_number_literal(cursor: &mut Cursor) -> ParseResult<Expr> {
    let token = cursor.expect(TokenKind::Number, "a number")?;
    let value = read_number(token)?;

    match cursor.peek() {
        Some(next) if next.kind == TokenKind::Percent => {
            let after = cursor.peek_nth(1);
            if after.is_some_and(|t| t.is_keyword("of")) {
                let percent_token = cursor.next();
                cursor.next();
                let percentage = percent_literal(value, token, percent_token)?;
                let of = cursor.descend(token.range(), parse_unary)?;
                let range = token.range().merge(of.range());
                return Ok(Expr::PercentageOf { percentage: Box::new(percentage),
                                               of: Box::new(of),
                                               range });
            }
            if after.is_some_and(can_start_operand) {
                return Ok(number(value, token));
            }
            let percent_token = cursor.next();
            percent_literal(value, token, percent_token)
        },
        Some(next) if is_unit_suffix(cursor, next) => {
            cursor.next();
            let range = token.range().merge(next.range());
            let unit = next.literal.clone();

            let literal = if time_unit(&unit).is_some() {
                Expr::DurationLiteral { amount: value,
                                        unit,
                                        range }
            } else if looks_like_code(&unit) && lookup_unit(&unit).is_none() {
                Expr::CurrencyLiteral { amount: value,
                                        code: unit,
                                        symbol: None,
                                        range }
            } else {
                Expr::QuantityLiteral { amount: value,
                                        unit,
                                        range }
            };
            Ok(parse_rate_suffix(cursor, literal))
        },
        _ => Ok(number(value, token)),
    }
}

/// Parses a symbol-prefixed currency literal such as `$1,200.50`, with an
/// optional rate suffix (`$50 per hour`).
pub(in crate::interpreter::parser) fn parse_currency_literal(cursor: &mut Cursor) -> ParseResult<Expr> {
    let token = cursor.expect(TokenKind::Currency, "a currency amount")?;

    let mut chars = token.literal.chars();
    let symbol = chars.next().map(String::from).unwrap_or_default();
    let digits = chars.as_str();

    let code = code_for_symbol(&symbol).ok_or_else(|| ParseError::UnexpectedToken { token: token.literal.clone(),
                                                                                    range: token.range(), })?;
    let amount = parse_decimal_literal(digits).ok_or_else(|| ParseError::LiteralOutOfRange { literal: token.literal
                                                                                                           .clone(),
                                                                                             range:   token.range(), })?;

    let literal = Expr::CurrencyLiteral { amount,
                                          code: code.to_string(),
                                          symbol: Some(symbol),
                                          range: token.range() };
    Ok(parse_rate_suffix(cursor, literal))
}

/// Parses `H:MM`, `H:MM:SS` and their `am`/`pm` forms into a 24-hour
/// [`Expr::TimeLiteral`].
///
/// # Errors
/// Returns [`ParseError::InvalidTime`] for an hour, minute or second out of
/// range (`25:00`, `13:00 pm`, `9:75`).
pub(in crate::interpreter::parser) fn parse_time_literal(cursor: &mut Cursor) -> ParseResult<Expr> {
    let token = cursor.expect(TokenKind::Time, "a time")?;
    let invalid = || ParseError::InvalidTime { literal: token.literal.clone(),
                                               range:   token.range(), };

    let mut parts = token.literal.split(':').map(str::parse::<u32>);
    let hour = parts.next().and_then(Result::ok).ok_or_else(invalid)?;
    let minute = parts.next().and_then(Result::ok).ok_or_else(invalid)?;
    let second = match parts.next() {
        Some(part) => part.map_err(|_| invalid())?,
        None => 0,
    };

    let meridiem = cursor.peek()
                         .filter(|t| t.is_word("am") || t.is_word("pm"))
                         .map(|t| t.literal.to_ascii_lowercase());

    let hour = match meridiem.as_deref() {
        Some(suffix) => {
            cursor.next();
            if !(1..=12).contains(&hour) {
                return Err(invalid());
            }
            match (suffix, hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                ("pm", 12) => 12,
                (_, h) => h + 12,
            }
        },
        None => hour,
    };

    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid());
    }

    Ok(Expr::TimeLiteral { hour,
                           minute,
                           second,
                           range: token.range().merge(cursor.last_range()) })
}

/// Whether the cursor sits on `MONTH DAY ,? YEAR`.
pub(in crate::interpreter::parser) fn starts_date_literal(cursor: &Cursor) -> bool {
    let is_integer = |token: Option<&Token>| {
        token.is_some_and(|t| t.kind == TokenKind::Number && t.literal.bytes().all(|b| b.is_ascii_digit()))
    };

    let Some(month) = cursor.peek() else {
        return false;
    };
    if month.kind != TokenKind::Identifier || month_from_name(&month.literal).is_none() {
        return false;
    }
    if !is_integer(cursor.peek_nth(1)) {
        return false;
    }
    match cursor.peek_nth(2) {
        Some(t) if t.kind == TokenKind::Comma => is_integer(cursor.peek_nth(3)),
        other => is_integer(other),
    }
}

/// Parses a calendar date such as `Feb 14 2026` or `February 14, 2026`.
///
/// Only the syntactic day range 1..=31 is enforced here; whether the day
/// exists in that month is a checker diagnostic.
///
/// # Errors
/// Returns [`ParseError::InvalidDate`] for a day outside 1..=31 or a year
/// that does not fit.
pub(in crate::interpreter::parser) fn parse_date_literal(cursor: &mut Cursor) -> ParseResult<Expr> {
    let month_token = cursor.expect(TokenKind::Identifier, "a month")?;
    let month = month_from_name(&month_token.literal).ok_or_else(|| cursor.unexpected("a month"))?;

    let day_token = cursor.expect(TokenKind::Number, "a day")?;
    if cursor.peek_kind() == TokenKind::Comma {
        cursor.next();
    }
    let year_token = cursor.expect(TokenKind::Number, "a year")?;
    let range = month_token.range().merge(year_token.range());

    let day = day_token.literal
                       .parse::<u32>()
                       .ok()
                       .filter(|day| (1..=31).contains(day))
                       .ok_or_else(|| ParseError::InvalidDate { details: format!("day {} must be between 1 and 31",
                                                                                 day_token.literal),
                                                                range })?;
    let year = year_token.literal
                         .parse::<i32>()
                         .map_err(|_| ParseError::InvalidDate { details: format!("year {} is not valid",
                                                                                 year_token.literal),
                                                                range })?;

    Ok(Expr::DateLiteral { date: DateSpec::Calendar { month, day, year },
                           range })
}

/// Wraps `amount` in a [`Expr::RateLiteral`] when it is followed by
/// `per TIME_UNIT` or `/ TIME_UNIT`; returns it unchanged otherwise.
fn parse_rate_suffix(cursor: &mut Cursor, amount: Expr) -> Expr {
    let Some(marker) = cursor.peek() else {
        return amount;
    };
    if !(marker.is_keyword("per") || marker.kind == TokenKind::Slash) {
        return amount;
    }
    let Some(unit) = cursor.peek_nth(1) else {
        return amount;
    };
    let followed_by_call = cursor.peek_nth(2).is_some_and(|t| t.kind == TokenKind::LParen);
    if unit.kind != TokenKind::Identifier || time_unit(&unit.literal).is_none() || followed_by_call {
        return amount;
    }

    cursor.next();
    cursor.next();
    let range = amount.range().merge(unit.range());
    Expr::RateLiteral { amount: Box::new(amount),
                        per: unit.literal.clone(),
                        range }
}

fn read_number(token: &Token) -> ParseResult<Decimal> {
    parse_decimal_literal(&token.literal).ok_or_else(|| ParseError::LiteralOutOfRange { literal: token.literal.clone(),
                                                                                        range:   token.range(), })
}

fn number(value: Decimal, token: &Token) -> Expr {
    Expr::NumberLiteral { value,
                          percent: false,
                          range: token.range() }
}

fn percent_literal(value: Decimal, token: &Token, percent: Option<&Token>) -> ParseResult<Expr> {
    let range = percent.map_or_else(|| token.range(), |p| token.range().merge(p.range()));
    let value = value.checked_div(Decimal::ONE_HUNDRED)
                     .ok_or_else(|| ParseError::LiteralOutOfRange { literal: token.literal.clone(),
                                                                    range })?;
    Ok(Expr::NumberLiteral { value,
                             percent: true,
                             range })
}

/// Whether the next identifier reads as the unit of the preceding number
/// rather than the start of something else (`5 kg`, but not `5 max(1, 2)`).
fn is_unit_suffix(cursor: &Cursor, next: &Token) -> bool {
    next.kind == TokenKind::Identifier
    && cursor.peek_nth(1).is_none_or(|t| t.kind != TokenKind::LParen)
}

fn can_start_operand(token: &Token) -> bool {
    match token.kind {
        TokenKind::Number
        | TokenKind::Currency
        | TokenKind::Time
        | TokenKind::Identifier
        | TokenKind::Function
        | TokenKind::Boolean
        | TokenKind::LParen => true,
        TokenKind::Keyword => ["today", "tomorrow", "yesterday"].iter().any(|k| token.is_keyword(k)),
        _ => false,
    }
}
