//! cf-sql - Lazy relational expression tree for Cohortflow
//!
//! Components build `Relation` values describing what to compute; nothing
//! touches the warehouse until [`render`] lowers a tree to a single SELECT
//! statement and something executes it. Building is pure and infallible;
//! the statement text is deterministic for a given tree.

pub mod expr;
pub mod relation;
pub mod render;

pub use expr::{and_all, BinOp, Expr, Literal, SortKey};
pub use relation::{JoinKind, Relation};
pub use render::render;
