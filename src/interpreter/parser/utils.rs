use crate::{
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{Cursor, ParseResult},
    },
};

/// Parses a comma-separated list of items until a closing token.
///
/// It repeatedly calls `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `cursor`: Token cursor positioned after the opening token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token kind that terminates the list.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the line ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<T>(cursor: &mut Cursor,
                                                               parse_item: impl Fn(&mut Cursor) -> ParseResult<T>,
                                                               closing: TokenKind)
                                                               -> ParseResult<Vec<T>> {
    let open = cursor.last_range();
    let mut items = Vec::new();
    if cursor.peek_kind() == closing {
        cursor.next();
        return Ok(items);
    }
    loop {
        items.push(parse_item(cursor)?);
        match cursor.peek_kind() {
            TokenKind::Comma => {
                cursor.next();
            },
            kind if kind == closing => {
                cursor.next();
                break;
            },
            _ if cursor.at_line_end() && closing == TokenKind::RParen => {
                return Err(ParseError::ExpectedClosingParen { range: open });
            },
            _ => return Err(cursor.unexpected("',' or a closing token")),
        }
    }
    Ok(items)
}

/// Parses the target of a conversion: a unit name or currency code.
///
/// # Errors
/// Returns a `ParseError` when the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_unit_name(cursor: &mut Cursor) -> ParseResult<String> {
    cursor.expect(TokenKind::Identifier, "a unit")
          .map(|token| token.literal.clone())
}
