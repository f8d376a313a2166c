use crate::{
    ast::Statement,
    config::Limits,
    interpreter::{
        lexer::{Token, TokenKind, tokenize_with_limits},
        parser::core::parse_program,
        scope::{NameLookup, undefined_identifiers},
        types::{currency::looks_like_code, units::lookup_unit},
    },
};

/// What a document line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    /// A line that parses to one statement whose names all resolve.
    Calculation,
    /// Prose.
    Markdown,
    /// Empty or whitespace only.
    Blank,
}

/// Relative-date keywords that stand alone as a calculation.
const DATE_KEYWORDS: [&str; 3] = ["today", "tomorrow", "yesterday"];

/// Decides whether a line is a calculation, prose or blank.
///
/// A line is prose unless it fully tokenizes, parses to exactly one statement
/// and every name it reads is already defined in `names`. A number followed
/// by one word that is no unit or code (`2 cats`) is prose too. The answer
/// depends only on the line and `names`.
///
/// # Example
/// ```
/// use std::collections::HashSet;
///
/// use calcmark::interpreter::classifier::{LineType, classify};
///
/// let mut names = HashSet::<String>::new();
/// assert_eq!(classify("total", &names), LineType::Markdown);
///
/// names.insert("total".to_string());
/// assert_eq!(classify("total", &names), LineType::Calculation);
/// assert_eq!(classify("# Budget", &names), LineType::Markdown);
/// assert_eq!(classify("   ", &names), LineType::Blank);
/// ```
#[must_use]
pub fn classify(line: &str, names: &impl NameLookup) -> LineType {
    classify_with_limits(line, names, &Limits::default())
}

/// [`classify`] with explicit lexing and parsing ceilings. A line that
/// exceeds them is prose.
#[must_use]
pub fn classify_with_limits(line: &str, names: &impl NameLookup, limits: &Limits) -> LineType {
    let kind = classify_line(line, names, limits);
    tracing::debug!(line, ?kind, "classified line");
    kind
}

fn classify_line(line: &str, names: &impl NameLookup, limits: &Limits) -> LineType {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineType::Blank;
    }
    if is_markdown_marker(trimmed) {
        return LineType::Markdown;
    }

    let Ok(tokens) = tokenize_with_limits(trimmed, limits) else {
        return LineType::Markdown;
    };
    let meaningful: Vec<&Token> = tokens.iter()
                                        .filter(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
                                        .collect();

    match meaningful.as_slice() {
        [] => LineType::Blank,
        tokens_in_line if tokens_in_line.iter().any(|t| t.kind == TokenKind::Assign) => {
            match parse_program(&tokens, limits).as_deref() {
                Ok([Statement::Assignment { .. }]) => LineType::Calculation,
                _ => LineType::Markdown,
            }
        },
        [single] if !single.kind.is_operator() => classify_single(single, names),
        [count, word] if count.kind == TokenKind::Number && is_bare_noun(word, names) => LineType::Markdown,
        _ => {
            if resolves(&tokens, names, limits) {
                LineType::Calculation
            } else {
                LineType::Markdown
            }
        },
    }
}

/// Headings, quotes, bullets and ordered list items.
fn is_markdown_marker(trimmed: &str) -> bool {
    if trimmed.starts_with('#') || trimmed.starts_with('>') {
        return true;
    }
    if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        return true;
    }

    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && trimmed[digits..].starts_with(". ")
}

fn classify_single(token: &Token, names: &impl NameLookup) -> LineType {
    let calculation = match token.kind {
        TokenKind::Number | TokenKind::Currency | TokenKind::Boolean => true,
        TokenKind::Identifier => names.is_defined(&token.literal),
        TokenKind::Keyword => DATE_KEYWORDS.iter().any(|k| token.is_keyword(k)),
        _ => false,
    };
    if calculation {
        LineType::Calculation
    } else {
        LineType::Markdown
    }
}

/// A word that is neither a known unit, a currency-shaped code nor a defined
/// name. `2 cats` on its own line is a count in prose.
fn is_bare_noun(word: &Token, names: &impl NameLookup) -> bool {
    word.kind == TokenKind::Identifier
    && lookup_unit(&word.literal).is_none()
    && !looks_like_code(&word.literal)
    && !names.is_defined(&word.literal)
}

/// Exactly one statement, and every name it reads is defined.
fn resolves(tokens: &[Token], names: &impl NameLookup, limits: &Limits) -> bool {
    match parse_program(tokens, limits).as_deref() {
        Ok([statement]) => undefined_identifiers(statement.expr(), names).is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn names(defined: &[&str]) -> HashSet<String> {
        defined.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn markdown_markers() {
        let env = names(&[]);
        assert_eq!(classify("- item", &env), LineType::Markdown);
        assert_eq!(classify("* item", &env), LineType::Markdown);
        assert_eq!(classify("1. first", &env), LineType::Markdown);
        assert_eq!(classify("> quoted", &env), LineType::Markdown);
        assert_eq!(classify("-5", &env), LineType::Calculation);
    }

    #[test]
    fn prose_suffix_falls_back_to_markdown() {
        let env = names(&[]);
        assert_eq!(classify("5 + 3 is the answer", &env), LineType::Markdown);
        assert_eq!(classify("5 + 3", &env), LineType::Calculation);
    }

    #[test]
    fn assignments_are_calculations() {
        let env = names(&[]);
        assert_eq!(classify("rent = $1,500", &env), LineType::Calculation);
        assert_eq!(classify("rent = ", &env), LineType::Markdown);
    }

    #[test]
    fn expressions_need_defined_names() {
        assert_eq!(classify("price * 2", &names(&[])), LineType::Markdown);
        assert_eq!(classify("price * 2", &names(&["price"])), LineType::Calculation);
    }

    #[test]
    fn operator_free_multi_token_lines() {
        let env = names(&[]);
        assert_eq!(classify("avg(1, 2, 3)", &env), LineType::Calculation);
        assert_eq!(classify("5 km in miles", &env), LineType::Calculation);
        assert_eq!(classify("The plan for today", &env), LineType::Markdown);
    }

    #[test]
    fn counted_nouns_are_prose() {
        let env = names(&[]);
        assert_eq!(classify("2 cats", &env), LineType::Markdown);
        assert_eq!(classify("3 Bedrooms", &env), LineType::Markdown);
        assert_eq!(classify("5 km", &env), LineType::Calculation);
        assert_eq!(classify("3 days", &env), LineType::Calculation);
        assert_eq!(classify("100 USD", &env), LineType::Calculation);
        assert_eq!(classify("5 XYZ", &env), LineType::Calculation);
        assert_eq!(classify("2 cats + 3 cats", &env), LineType::Calculation);
    }

    #[test]
    fn lone_tokens() {
        let env = names(&[]);
        assert_eq!(classify("42", &env), LineType::Calculation);
        assert_eq!(classify("$100", &env), LineType::Calculation);
        assert_eq!(classify("true", &env), LineType::Calculation);
        assert_eq!(classify("today", &env), LineType::Calculation);
        assert_eq!(classify("per", &env), LineType::Markdown);
    }

    #[test]
    fn lex_failures_are_prose() {
        assert_eq!(classify("what? really", &names(&[])), LineType::Markdown);
    }
}
