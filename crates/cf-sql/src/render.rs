//! Lowering of relation trees to executable SQL.
//!
//! The output is one nested-subquery SELECT statement. Derived inputs get
//! generated `t0..tN` aliases; join inputs keep their caller-supplied
//! aliases. Rendering the same tree twice yields byte-identical text.

use crate::expr::{Expr, Literal, SortKey};
use crate::relation::Relation;
use cf_core::identifier::quote_ident;

/// Lower a relation tree to a single SELECT statement
pub fn render(relation: &Relation) -> String {
    Renderer::default().render_select(relation)
}

#[derive(Default)]
struct Renderer {
    next_alias: usize,
}

impl Renderer {
    fn fresh_alias(&mut self) -> String {
        let alias = format!("t{}", self.next_alias);
        self.next_alias += 1;
        alias
    }

    /// Render a node as a full SELECT statement
    fn render_select(&mut self, rel: &Relation) -> String {
        match rel {
            Relation::Table { name } => format!("SELECT * FROM {}", name.quoted()),

            Relation::Project { input, columns } => {
                let alias = self.fresh_alias();
                format!(
                    "SELECT {} FROM {}",
                    render_select_list(columns),
                    self.render_from(input, &alias)
                )
            }

            Relation::Filter { input, predicate } => {
                let alias = self.fresh_alias();
                format!(
                    "SELECT * FROM {} WHERE {}",
                    self.render_from(input, &alias),
                    render_expr(predicate)
                )
            }

            Relation::Join {
                left,
                left_alias,
                right,
                right_alias,
                kind,
                on,
                columns,
            } => {
                let left_from = self.render_from(left, left_alias);
                let right_from = self.render_from(right, right_alias);
                format!(
                    "SELECT {} FROM {} {} JOIN {} ON {}",
                    render_select_list(columns),
                    left_from,
                    kind,
                    right_from,
                    render_expr(on)
                )
            }

            Relation::UnionAll { inputs } => inputs
                .iter()
                .map(|input| self.render_select(input))
                .collect::<Vec<_>>()
                .join(" UNION ALL "),

            Relation::Aggregate {
                input,
                group_by,
                aggregates,
            } => {
                let alias = self.fresh_alias();
                let from = self.render_from(input, &alias);
                let mut select_list: Vec<String> =
                    group_by.iter().map(|c| quote_ident(c)).collect();
                select_list.extend(
                    aggregates
                        .iter()
                        .map(|(name, expr)| format!("{} AS {}", render_expr(expr), quote_ident(name))),
                );
                let group_clause = if group_by.is_empty() {
                    String::new()
                } else {
                    format!(
                        " GROUP BY {}",
                        group_by
                            .iter()
                            .map(|c| quote_ident(c))
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                };
                format!("SELECT {} FROM {}{}", select_list.join(", "), from, group_clause)
            }
        }
    }

    /// Render a node as a FROM-clause item with the given alias
    fn render_from(&mut self, rel: &Relation, alias: &str) -> String {
        match rel {
            Relation::Table { name } => format!("{} AS {}", name.quoted(), quote_ident(alias)),
            _ => format!("({}) AS {}", self.render_select(rel), quote_ident(alias)),
        }
    }
}

fn render_select_list(columns: &[(String, Expr)]) -> String {
    columns
        .iter()
        .map(|(name, expr)| format!("{} AS {}", render_expr(expr), quote_ident(name)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Column { table, column } => match table {
            Some(table) => format!("{}.{}", quote_ident(table), quote_ident(column)),
            None => quote_ident(column),
        },

        Expr::Literal(literal) => render_literal(literal),

        Expr::BinaryOp { left, op, right } => {
            format!("({} {} {})", render_expr(left), op, render_expr(right))
        }

        Expr::FunctionCall { name, args } => format!(
            "{}({})",
            name,
            args.iter().map(render_expr).collect::<Vec<_>>().join(", ")
        ),

        Expr::Case { arms, else_result } => {
            let mut sql = String::from("CASE");
            for (condition, result) in arms {
                sql.push_str(&format!(
                    " WHEN {} THEN {}",
                    render_expr(condition),
                    render_expr(result)
                ));
            }
            if let Some(else_result) = else_result {
                sql.push_str(&format!(" ELSE {}", render_expr(else_result)));
            }
            sql.push_str(" END");
            sql
        }

        Expr::RowNumber {
            partition_by,
            order_by,
        } => {
            let partition = partition_by
                .iter()
                .map(render_expr)
                .collect::<Vec<_>>()
                .join(", ");
            let order = order_by
                .iter()
                .map(render_sort_key)
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "ROW_NUMBER() OVER (PARTITION BY {} ORDER BY {})",
                partition, order
            )
        }
    }
}

fn render_sort_key(key: &SortKey) -> String {
    format!(
        "{} {}",
        render_expr(&key.expr),
        if key.ascending { "ASC" } else { "DESC" }
    )
}

fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::Null => "NULL".to_string(),
        Literal::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Literal::Integer(n) => n.to_string(),
        Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
        Literal::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
