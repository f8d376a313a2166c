use rust_decimal::Decimal;

/// A line/column location in the source text.
///
/// Both fields are 1-based. Columns count Unicode scalar values, not bytes, so
/// a caret rendered under a `€` lands where the user expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line number, starting at 1.
    pub line:   usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and column.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open source range attached to every token, node, error and
/// diagnostic.
///
/// ## Example
/// ```
/// use calcmark::ast::{Position, Range};
///
/// let a = Range::new(Position::new(1, 1), Position::new(1, 3));
/// let b = Range::new(Position::new(1, 6), Position::new(1, 9));
///
/// assert_eq!(a.merge(b), Range::new(Position::new(1, 1), Position::new(1, 9)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// First position covered by the range.
    pub start: Position,
    /// Position just past the last covered character.
    pub end:   Position,
}

impl Range {
    /// Creates a range from two positions.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates an empty range at a single point.
    #[must_use]
    pub const fn point(line: usize, column: usize) -> Self {
        Self { start: Position::new(line, column),
               end:   Position::new(line, column), }
    }

    /// Returns the smallest range covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self { start: self.start.min(other.start),
               end:   self.end.max(other.end), }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start.line, self.start.column)
    }
}

/// Which calendar day a [`Expr::DateLiteral`] names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSpec {
    /// An explicit calendar date such as `Feb 14 2026`.
    Calendar {
        /// Month number, 1 through 12.
        month: u32,
        /// Day of month as written. Only syntactically bounded to 1..=31.
        day:   u32,
        /// Four-digit year as written.
        year:  i32,
    },
    /// `today`, `tomorrow` or `yesterday`, resolved at evaluation time.
    Relative {
        /// Offset in days from the environment's current date.
        offset_days: i64,
    },
}

/// An abstract syntax tree node representing an expression.
///
/// The set of node shapes is closed: the checker, the classifier predicate
/// and the evaluator all match on it exhaustively, so a new variant fails to
/// compile until every pass handles it. Each variant carries the source
/// [`Range`] it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Arithmetic between two operands (`+ - * / % ^`).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Source range.
        range: Range,
    },
    /// A single, non-chained comparison.
    ComparisonOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    ComparisonOperator,
        /// Right operand.
        right: Box<Self>,
        /// Source range.
        range: Range,
    },
    /// Prefix `+` or `-`.
    UnaryOp {
        /// The unary operator to apply.
        op:    UnaryOperator,
        /// The operand expression.
        expr:  Box<Self>,
        /// Source range.
        range: Range,
    },
    /// Reference to a variable by name.
    Identifier {
        /// Name as written.
        name:  String,
        /// Source range.
        range: Range,
    },
    /// A plain number. `percent` is set for `20%` style literals, whose
    /// `value` is already divided by 100.
    NumberLiteral {
        /// The numeric value.
        value:   Decimal,
        /// Whether the literal was written with a trailing `%`.
        percent: bool,
        /// Source range.
        range:   Range,
    },
    /// A money amount, written `$100` or `100 USD`.
    CurrencyLiteral {
        /// The amount.
        amount: Decimal,
        /// ISO 4217 code (or the free-form code the user wrote).
        code:   String,
        /// Leading symbol, when the literal was written with one.
        symbol: Option<String>,
        /// Source range.
        range:  Range,
    },
    /// `true`, `false` and their aliases.
    BooleanLiteral {
        /// The boolean value.
        value: bool,
        /// Source range.
        range: Range,
    },
    /// A calendar or relative date.
    DateLiteral {
        /// Which day the literal names.
        date:  DateSpec,
        /// Source range.
        range: Range,
    },
    /// A wall-clock time, already normalized to 24-hour form.
    TimeLiteral {
        /// Hour, 0 through 23.
        hour:   u32,
        /// Minute, 0 through 59.
        minute: u32,
        /// Second, 0 through 59.
        second: u32,
        /// Source range.
        range:  Range,
    },
    /// An amount of time such as `3 days`.
    DurationLiteral {
        /// The amount.
        amount: Decimal,
        /// Time unit as written.
        unit:   String,
        /// Source range.
        range:  Range,
    },
    /// An amount with a physical or free-form unit such as `5 kg`.
    QuantityLiteral {
        /// The amount.
        amount: Decimal,
        /// Unit as written.
        unit:   String,
        /// Source range.
        range:  Range,
    },
    /// An amount per unit of time, such as `$50 per hour` or `100 MB/s`.
    RateLiteral {
        /// The currency or quantity literal being divided.
        amount: Box<Self>,
        /// The time unit as written.
        per:    String,
        /// Source range.
        range:  Range,
    },
    /// A call to a built-in function.
    FunctionCall {
        /// Canonical function name.
        name:      String,
        /// Argument expressions in source order.
        arguments: Vec<Self>,
        /// Source range.
        range:     Range,
    },
    /// `expr in unit` / `expr to unit`.
    UnitConversion {
        /// The expression being converted.
        expr:   Box<Self>,
        /// Target unit or currency code as written.
        target: String,
        /// Source range.
        range:  Range,
    },
    /// `expr as napkin`.
    NapkinConversion {
        /// The expression being rounded.
        expr:  Box<Self>,
        /// Source range.
        range: Range,
    },
    /// `20% of expr`.
    PercentageOf {
        /// The percentage expression (already a fraction).
        percentage: Box<Self>,
        /// The base the percentage is taken of.
        of:         Box<Self>,
        /// Source range.
        range:      Range,
    },
}

impl Expr {
    /// Gets the source range from `self`.
    /// ## Example
    /// ```
    /// use calcmark::ast::{Expr, Range};
    ///
    /// let expr = Expr::Identifier { name:  "x".to_string(),
    ///                               range: Range::point(5, 1), };
    ///
    /// assert_eq!(expr.range().start.line, 5);
    /// ```
    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::BinaryOp { range, .. }
            | Self::ComparisonOp { range, .. }
            | Self::UnaryOp { range, .. }
            | Self::Identifier { range, .. }
            | Self::NumberLiteral { range, .. }
            | Self::CurrencyLiteral { range, .. }
            | Self::BooleanLiteral { range, .. }
            | Self::DateLiteral { range, .. }
            | Self::TimeLiteral { range, .. }
            | Self::DurationLiteral { range, .. }
            | Self::QuantityLiteral { range, .. }
            | Self::RateLiteral { range, .. }
            | Self::FunctionCall { range, .. }
            | Self::UnitConversion { range, .. }
            | Self::NapkinConversion { range, .. }
            | Self::PercentageOf { range, .. } => *range,
        }
    }

    /// Returns `true` for nodes that are self-contained literals, optionally
    /// negated. Pre-seeded globals must be literals.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        match self {
            Self::NumberLiteral { .. }
            | Self::CurrencyLiteral { .. }
            | Self::BooleanLiteral { .. }
            | Self::DateLiteral { .. }
            | Self::TimeLiteral { .. }
            | Self::DurationLiteral { .. }
            | Self::QuantityLiteral { .. } => true,
            Self::RateLiteral { amount, .. } => amount.is_literal(),
            Self::UnaryOp { expr, .. } => expr.is_literal(),
            _ => false,
        }
    }
}

/// Represents a top-level statement. Each calculation line parses to exactly
/// one.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `name = expression`.
    Assignment {
        /// The name being bound.
        name:  String,
        /// The value expression.
        value: Expr,
        /// Source range of the whole statement.
        range: Range,
    },
    /// A bare expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr:  Expr,
        /// Source range of the whole statement.
        range: Range,
    },
}

impl Statement {
    /// Gets the source range of the statement.
    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::Assignment { range, .. } | Self::Expression { range, .. } => *range,
        }
    }

    /// The expression evaluated by this statement.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        match self {
            Self::Assignment { value, .. } => value,
            Self::Expression { expr, .. } => expr,
        }
    }
}

/// Represents an arithmetic binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`, `×`, `x`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`^`, `**`)
    Pow,
}

/// Represents a comparison operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

impl ComparisonOperator {
    /// Whether the operator only tests (in)equality.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }
}

/// Represents a prefix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Unary plus, kept so ranges stay faithful to the source.
    Plus,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}
