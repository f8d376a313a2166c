use std::fmt;

use crate::ast::Range;

/// How serious a diagnostic is.
///
/// Only [`Severity::Error`] should stop a line from being evaluated; the
/// checker itself never blocks anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Style or clarity suggestion.
    Hint,
    /// Probably a mistake, but evaluation may proceed.
    Warning,
    /// Evaluation must not proceed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hint => "hint",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Stable, machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A name used before any assignment or global defines it.
    UndefinedVariable,
    /// Units of different dimensions combined.
    IncompatibleUnits,
    /// Currencies combined without an exchange rate.
    IncompatibleCurrency,
    /// Any other operator/kind combination the type rules reject.
    TypeMismatch,
    /// A calendar literal naming a day that does not exist.
    InvalidDate,
    /// A call to a name outside the builtin table.
    UnknownFunction,
    /// A builtin called with the wrong number of arguments.
    WrongArgumentCount,
    /// A keyword position holding something outside its vocabulary.
    InvalidKeywordArgument,
    /// `/` or `%` by a literal zero.
    DivisionByZero,
    /// A three-letter code that is not an ISO 4217 currency.
    UnknownCurrency,
    /// Binary-base and decimal-base data sizes in one operation.
    MixedDataBase,
}

impl DiagnosticCode {
    /// The code as tooling sees it, e.g. `undefined_variable`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UndefinedVariable => "undefined_variable",
            Self::IncompatibleUnits => "incompatible_units",
            Self::IncompatibleCurrency => "incompatible_currency",
            Self::TypeMismatch => "type_mismatch",
            Self::InvalidDate => "invalid_date",
            Self::UnknownFunction => "unknown_function",
            Self::WrongArgumentCount => "wrong_argument_count",
            Self::InvalidKeywordArgument => "invalid_keyword_argument",
            Self::DivisionByZero => "division_by_zero",
            Self::UnknownCurrency => "unknown_currency",
            Self::MixedDataBase => "mixed_data_base",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A finding of the checker, positioned in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// Stable code for filtering.
    pub code:     DiagnosticCode,
    /// Short, one-line message.
    pub message:  String,
    /// Longer explanation or fix suggestion.
    pub detail:   Option<String>,
    /// Documentation link.
    pub link:     Option<String>,
    /// The source location.
    pub range:    Option<Range>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self { severity,
               code,
               message: message.into(),
               detail: None,
               link: None,
               range: Some(range) }
    }

    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self::new(Severity::Error, code, message, range)
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self::new(Severity::Warning, code, message, range)
    }

    /// Creates a new hint diagnostic (informational, lower severity than
    /// warning).
    #[must_use]
    pub fn hint(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self::new(Severity::Hint, code, message, range)
    }

    /// Attaches a detailed message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attaches a documentation link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Whether this diagnostic blocks evaluation.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(range) => write!(f, "{} at {range} [{}]: {}", self.severity, self.code, self.message)?,
            None => write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?,
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_detail() {
        let d = Diagnostic::warning(DiagnosticCode::DivisionByZero, "Division by zero", Range::point(2, 7))
            .with_detail("The result will be an error at evaluation");
        assert_eq!(d.to_string(),
                   "warning at 2:7 [division_by_zero]: Division by zero (The result will be an error at evaluation)");
        assert!(!d.is_error());
        assert!(Severity::Error > Severity::Warning);
    }
}
