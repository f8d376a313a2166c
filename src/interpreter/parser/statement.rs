use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{Cursor, ParseResult, parse_expression},
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - an assignment (`name = expression`).
/// - an expression used as a statement.
///
/// # Parameters
/// - `cursor`: Token cursor at the first token of a non-blank line.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement(cursor: &mut Cursor) -> ParseResult<Statement> {
    if let Some(statement) = parse_assignment(cursor)? {
        return Ok(statement);
    }

    let expr = parse_expression(cursor)?;
    let range = expr.range();
    Ok(Statement::Expression { expr, range })
}

/// Parses an assignment of the form `name = expression`.
///
/// Nothing is consumed unless the second token is `=`.
///
/// # Returns
/// - `Ok(Some(Statement::Assignment))` for an assignment,
/// - `Ok(None)` if no assignment is present.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the target is a keyword or boolean word,
/// - the assigned expression fails to parse.
fn parse_assignment(cursor: &mut Cursor) -> ParseResult<Option<Statement>> {
    let (Some(target), Some(assign)) = (cursor.peek(), cursor.peek_nth(1)) else {
        return Ok(None);
    };
    if assign.kind != TokenKind::Assign {
        return Ok(None);
    }

    match target.kind {
        TokenKind::Identifier => {},
        TokenKind::Keyword | TokenKind::Boolean => {
            return Err(ParseError::IdentifierReserved { name:  target.literal.clone(),
                                                        range: target.range(), });
        },
        _ => return Ok(None),
    }

    cursor.next();
    cursor.next();
    let value = parse_expression(cursor)?;
    let range = target.range().merge(value.range());

    Ok(Some(Statement::Assignment { name: target.literal.clone(),
                                    value,
                                    range }))
}
