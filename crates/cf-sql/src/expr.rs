//! Scalar expression tree

use chrono::NaiveDate;

/// A literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// NULL
    Null,
    /// Boolean literal
    Boolean(bool),
    /// Integer literal
    Integer(i64),
    /// String literal
    String(String),
    /// Date literal
    Date(NaiveDate),
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Equality (=)
    Eq,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than or equal (>=)
    GtEq,
    /// Logical AND
    And,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Eq => write!(f, "="),
            BinOp::LtEq => write!(f, "<="),
            BinOp::GtEq => write!(f, ">="),
            BinOp::And => write!(f, "AND"),
        }
    }
}

/// Sort key for window ORDER BY clauses
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Expression to sort by
    pub expr: Expr,
    /// Ascending (true) or descending (false)
    pub ascending: bool,
}

/// Scalar expression — a node in a select list, predicate, or window spec
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a column, optionally qualified by a relation alias
    Column {
        /// Relation alias qualifier
        table: Option<String>,
        /// Column name
        column: String,
    },

    /// Literal value
    Literal(Literal),

    /// Binary operation
    BinaryOp {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: BinOp,
        /// Right operand
        right: Box<Expr>,
    },

    /// Function call (MAX, SUBSTR, ...)
    FunctionCall {
        /// Function name (uppercased)
        name: String,
        /// Function arguments
        args: Vec<Expr>,
    },

    /// Searched CASE: WHEN cond THEN result ... [ELSE else] END
    Case {
        /// (condition, result) arms
        arms: Vec<(Expr, Expr)>,
        /// ELSE result
        else_result: Option<Box<Expr>>,
    },

    /// ROW_NUMBER() OVER (PARTITION BY ... ORDER BY ...)
    RowNumber {
        /// PARTITION BY expressions
        partition_by: Vec<Expr>,
        /// ORDER BY keys
        order_by: Vec<SortKey>,
    },
}

impl Expr {
    /// Unqualified column reference
    pub fn col(column: impl Into<String>) -> Self {
        Expr::Column {
            table: None,
            column: column.into(),
        }
    }

    /// Column reference qualified by a relation alias
    pub fn qcol(table: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Column {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// String literal
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    /// Integer literal
    pub fn integer(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    /// Date literal
    pub fn date(value: NaiveDate) -> Self {
        Expr::Literal(Literal::Date(value))
    }

    /// Function call with uppercased name
    pub fn func(name: &str, args: Vec<Expr>) -> Self {
        Expr::FunctionCall {
            name: name.to_uppercase(),
            args,
        }
    }

    /// `self = other`
    pub fn eq(self, other: Expr) -> Self {
        self.binary(BinOp::Eq, other)
    }

    /// `self <= other`
    pub fn lt_eq(self, other: Expr) -> Self {
        self.binary(BinOp::LtEq, other)
    }

    /// `self >= other`
    pub fn gt_eq(self, other: Expr) -> Self {
        self.binary(BinOp::GtEq, other)
    }

    /// `self AND other`
    pub fn and(self, other: Expr) -> Self {
        self.binary(BinOp::And, other)
    }

    /// Ascending sort on this expression
    pub fn asc(self) -> SortKey {
        SortKey {
            expr: self,
            ascending: true,
        }
    }

    fn binary(self, op: BinOp, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }
}

/// Fold expressions into one AND chain.
///
/// Empty input is invalid; callers always have at least one predicate.
pub fn and_all(mut exprs: Vec<Expr>) -> Expr {
    debug_assert!(!exprs.is_empty(), "and_all requires at least one predicate");
    let first = exprs.remove(0);
    exprs.into_iter().fold(first, |acc, e| acc.and(e))
}
