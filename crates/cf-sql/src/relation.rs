//! Relational operators — the nodes of the lazy query tree

use crate::expr::Expr;
use cf_core::QualifiedName;

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Inner join
    Inner,
    /// Left outer join
    Left,
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "INNER"),
            JoinKind::Left => write!(f, "LEFT"),
        }
    }
}

/// A lazy relation — a value describing a query, executed only when its
/// rendered statement is run by the warehouse layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// Scan of a warehouse table
    Table {
        /// Resolved table name
        name: QualifiedName,
    },

    /// Column projection (SELECT clause)
    Project {
        /// Input relation
        input: Box<Relation>,
        /// Projected columns: (output name, expression)
        columns: Vec<(String, Expr)>,
    },

    /// Row filter (WHERE clause)
    Filter {
        /// Input relation
        input: Box<Relation>,
        /// Filter predicate
        predicate: Expr,
    },

    /// Join of two relations with an explicit select list.
    ///
    /// The side aliases are caller-supplied and are the only qualifiers the
    /// ON condition and select list may reference.
    Join {
        /// Left input
        left: Box<Relation>,
        /// Alias for the left input
        left_alias: String,
        /// Right input
        right: Box<Relation>,
        /// Alias for the right input
        right_alias: String,
        /// Join type
        kind: JoinKind,
        /// Join condition
        on: Expr,
        /// Projected columns: (output name, expression)
        columns: Vec<(String, Expr)>,
    },

    /// UNION ALL of two or more inputs with identical column shapes
    UnionAll {
        /// Input relations
        inputs: Vec<Relation>,
    },

    /// Aggregation (GROUP BY)
    Aggregate {
        /// Input relation
        input: Box<Relation>,
        /// Grouping column names from the input
        group_by: Vec<String>,
        /// Aggregate expressions: (output name, expression)
        aggregates: Vec<(String, Expr)>,
    },
}

impl Relation {
    /// Scan a warehouse table
    pub fn table(name: QualifiedName) -> Self {
        Relation::Table { name }
    }

    /// Project columns out of this relation
    pub fn select<S: Into<String>>(self, columns: Vec<(S, Expr)>) -> Self {
        Relation::Project {
            input: Box::new(self),
            columns: columns
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        }
    }

    /// Filter rows of this relation
    pub fn filter(self, predicate: Expr) -> Self {
        Relation::Filter {
            input: Box::new(self),
            predicate,
        }
    }

    /// Join this relation to another
    pub fn join<S: Into<String>>(
        self,
        self_alias: impl Into<String>,
        right: Relation,
        right_alias: impl Into<String>,
        kind: JoinKind,
        on: Expr,
        columns: Vec<(S, Expr)>,
    ) -> Self {
        Relation::Join {
            left: Box::new(self),
            left_alias: self_alias.into(),
            right: Box::new(right),
            right_alias: right_alias.into(),
            kind,
            on,
            columns: columns
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        }
    }

    /// UNION ALL of the given relations.
    ///
    /// Input shapes must match; an empty input set is invalid.
    pub fn union_all(inputs: Vec<Relation>) -> Self {
        debug_assert!(!inputs.is_empty(), "union_all requires at least one input");
        if inputs.len() == 1 {
            return inputs.into_iter().next().unwrap();
        }
        Relation::UnionAll { inputs }
    }

    /// Group this relation and compute aggregates
    pub fn aggregate<G: Into<String>, A: Into<String>>(
        self,
        group_by: Vec<G>,
        aggregates: Vec<(A, Expr)>,
    ) -> Self {
        Relation::Aggregate {
            input: Box::new(self),
            group_by: group_by.into_iter().map(Into::into).collect(),
            aggregates: aggregates
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        }
    }
}
