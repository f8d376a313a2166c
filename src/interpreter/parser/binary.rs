use crate::{
    ast::{BinaryOperator, ComparisonOperator, Expr},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{Cursor, ParseResult},
            unary::parse_unary,
            utils::parse_unit_name,
        },
    },
};

/// Parses a single, non-associative comparison.
///
/// `a < b` is accepted; a second comparison operator after the right operand
/// (`a < b < c`) is a [`ParseError::ChainedComparison`].
///
/// The rule is: `comparison := conversion (cmp_op conversion)?`
///
/// # Parameters
/// - `cursor`: Token cursor.
///
/// # Returns
/// An `Expr::ComparisonOp`, or the conversion-level expression when no
/// comparison operator follows.
pub fn parse_comparison(cursor: &mut Cursor) -> ParseResult<Expr> {
    let left = parse_conversion(cursor)?;

    let Some(op) = token_to_comparison_operator(cursor.peek_kind()) else {
        return Ok(left);
    };
    cursor.next();

    let right = parse_conversion(cursor)?;
    if token_to_comparison_operator(cursor.peek_kind()).is_some() {
        return Err(ParseError::ChainedComparison { range: cursor.here() });
    }

    let range = left.range().merge(right.range());
    Ok(Expr::ComparisonOp { left: Box::new(left),
                            op,
                            right: Box::new(right),
                            range })
}

/// Parses postfix conversions: `expr in UNIT`, `expr to UNIT` and
/// `expr as napkin`. Conversions chain left to right.
///
/// The rule is: `conversion := additive (("in" | "to") UNIT | "as" "napkin")*`
///
/// # Parameters
/// - `cursor`: Token cursor.
///
/// # Returns
/// The additive expression wrapped in zero or more conversion nodes.
pub fn parse_conversion(cursor: &mut Cursor) -> ParseResult<Expr> {
    let mut expr = parse_additive(cursor)?;

    loop {
        let Some(token) = cursor.peek() else { break };

        if token.is_keyword("in") || token.is_keyword("to") {
            cursor.next();
            let target = parse_unit_name(cursor)?;
            let range = expr.range().merge(cursor.last_range());
            expr = Expr::UnitConversion { expr: Box::new(expr),
                                          target,
                                          range };
        } else if token.is_keyword("as") {
            cursor.next();
            match cursor.peek() {
                Some(next) if next.is_keyword("napkin") => {
                    cursor.next();
                },
                _ => return Err(cursor.unexpected("'napkin'")),
            }
            let range = expr.range().merge(cursor.last_range());
            expr = Expr::NapkinConversion { expr: Box::new(expr),
                                            range };
        } else {
            break;
        }
    }

    Ok(expr)
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// # Parameters
/// - `cursor`: Token cursor.
///
/// # Returns
/// An `Expr::BinaryOp` tree representing the parsed expression.
pub fn parse_additive(cursor: &mut Cursor) -> ParseResult<Expr> {
    let mut left = parse_multiplicative(cursor)?;
    while let Some(op) = token_to_binary_operator(cursor.peek_kind())
          && matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    {
        cursor.next();
        let right = parse_multiplicative(cursor)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

/// Parses multiplication-level expressions.
///
/// Handles left-associative operators: `*`, `/` and `%`.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%") unary)*`
///
/// # Parameters
/// - `cursor`: Token cursor.
///
/// # Returns
/// A binary expression tree combining unary-level nodes.
pub fn parse_multiplicative(cursor: &mut Cursor) -> ParseResult<Expr> {
    let mut left = parse_unary(cursor)?;
    while let Some(op) = token_to_binary_operator(cursor.peek_kind())
          && matches!(op, BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod)
    {
        cursor.next();
        let right = parse_unary(cursor)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

pub(in crate::interpreter::parser) fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    let range = left.range().merge(right.range());
    Expr::BinaryOp { left: Box::new(left),
                     op,
                     right: Box::new(right),
                     range }
}

/// Maps a token kind to its arithmetic operator.
///
/// # Example
/// ```
/// use calcmark::{
///     ast::BinaryOperator,
///     interpreter::{lexer::TokenKind, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(TokenKind::Caret), Some(BinaryOperator::Pow));
/// assert_eq!(token_to_binary_operator(TokenKind::Less), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        TokenKind::Caret => Some(BinaryOperator::Pow),
        _ => None,
    }
}

/// Maps a token kind to its comparison operator.
#[must_use]
pub const fn token_to_comparison_operator(kind: TokenKind) -> Option<ComparisonOperator> {
    match kind {
        TokenKind::Less => Some(ComparisonOperator::Less),
        TokenKind::Greater => Some(ComparisonOperator::Greater),
        TokenKind::LessEqual => Some(ComparisonOperator::LessEqual),
        TokenKind::GreaterEqual => Some(ComparisonOperator::GreaterEqual),
        TokenKind::EqualEqual => Some(ComparisonOperator::Equal),
        TokenKind::NotEqual => Some(ComparisonOperator::NotEqual),
        _ => None,
    }
}
