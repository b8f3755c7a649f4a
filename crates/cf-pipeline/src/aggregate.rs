//! Event aggregation.
//!
//! Takes the canonical events of every source and produces the wide
//! covariate relation: one row per subject, four columns per phenotype.
//! The first-event order is a hard contract: event date ascending, then
//! source priority ascending (lower rank preferred on same-day ties), then
//! code ascending so the survivor is deterministic even on identical
//! (date, priority) pairs.

use crate::extract::{CODE, EVENT_DATE, PHENOTYPE, SOURCE_NAME, SOURCE_PRIORITY, SUBJECT_ID};
use cf_core::CohortColumns;
use cf_sql::{and_all, Expr, JoinKind, Relation};

/// The cohort relation together with its column names
#[derive(Debug, Clone)]
pub struct Cohort {
    /// One row per subject
    pub relation: Relation,
    /// Unique subject identifier
    pub subject_id: String,
    /// Lower window bound (inclusive)
    pub date_of_birth: String,
    /// Upper window bound (inclusive)
    pub study_start_date: String,
}

impl Cohort {
    /// Build a cohort from a relation and the configured column names
    pub fn new(relation: Relation, columns: &CohortColumns) -> Self {
        Self {
            relation,
            subject_id: columns.subject_id.clone(),
            date_of_birth: columns.date_of_birth.clone(),
            study_start_date: columns.study_start_date.clone(),
        }
    }
}

/// Union all events, restrict to each subject's study window, and resolve
/// the single earliest qualifying event per (subject, phenotype).
///
/// Both window bounds are inclusive: an event on the date of birth or on
/// the study start date qualifies. For inner joins the bounds in the ON
/// condition are equivalent to a post-join WHERE.
pub fn first_events(events: Vec<Relation>, cohort: &Cohort) -> Relation {
    let unioned = Relation::union_all(events);

    let on = and_all(vec![
        Expr::qcol("e", SUBJECT_ID).eq(Expr::qcol("c", &cohort.subject_id)),
        Expr::qcol("e", EVENT_DATE).gt_eq(Expr::qcol("c", &cohort.date_of_birth)),
        Expr::qcol("e", EVENT_DATE).lt_eq(Expr::qcol("c", &cohort.study_start_date)),
    ]);

    let windowed = unioned.join(
        "e",
        cohort.relation.clone(),
        "c",
        JoinKind::Inner,
        on,
        vec![
            (SUBJECT_ID, Expr::qcol("e", SUBJECT_ID)),
            (PHENOTYPE, Expr::qcol("e", PHENOTYPE)),
            (EVENT_DATE, Expr::qcol("e", EVENT_DATE)),
            (CODE, Expr::qcol("e", CODE)),
            (SOURCE_NAME, Expr::qcol("e", SOURCE_NAME)),
            (SOURCE_PRIORITY, Expr::qcol("e", SOURCE_PRIORITY)),
        ],
    );

    let ranked = windowed.select(vec![
        (SUBJECT_ID, Expr::col(SUBJECT_ID)),
        (PHENOTYPE, Expr::col(PHENOTYPE)),
        (EVENT_DATE, Expr::col(EVENT_DATE)),
        (CODE, Expr::col(CODE)),
        (SOURCE_NAME, Expr::col(SOURCE_NAME)),
        (SOURCE_PRIORITY, Expr::col(SOURCE_PRIORITY)),
        (
            "rn",
            Expr::RowNumber {
                partition_by: vec![Expr::col(SUBJECT_ID), Expr::col(PHENOTYPE)],
                order_by: vec![
                    Expr::col(EVENT_DATE).asc(),
                    Expr::col(SOURCE_PRIORITY).asc(),
                    Expr::col(CODE).asc(),
                ],
            },
        ),
    ]);

    ranked
        .filter(Expr::col("rn").eq(Expr::integer(1)))
        .select(vec![
            (SUBJECT_ID, Expr::col(SUBJECT_ID)),
            (PHENOTYPE, Expr::col(PHENOTYPE)),
            (EVENT_DATE, Expr::col(EVENT_DATE)),
            (CODE, Expr::col(CODE)),
            (SOURCE_NAME, Expr::col(SOURCE_NAME)),
        ])
}

/// Pivot first events into the wide covariate relation: one row per
/// subject, and for each phenotype a presence flag, first event date,
/// first event code, and first event source.
///
/// Subjects without a qualifying event for a phenotype get NULL in all
/// four of that phenotype's columns, never a missing row. Zero event
/// inputs or zero phenotypes degrade to the bare subject list.
pub fn covariates(events: Vec<Relation>, cohort: &Cohort, phenotypes: &[String]) -> Relation {
    if events.is_empty() || phenotypes.is_empty() {
        return cohort
            .relation
            .clone()
            .select(vec![(SUBJECT_ID, Expr::col(&cohort.subject_id))]);
    }

    let mut labels = phenotypes.to_vec();
    labels.sort();
    labels.dedup();

    let first = first_events(events, cohort);

    // One row per (subject, phenotype) survives resolution, so MAX picks
    // the single non-null value per cell.
    let mut aggregates = Vec::new();
    for label in &labels {
        let pick = |result: Expr| {
            Expr::func(
                "max",
                vec![Expr::Case {
                    arms: vec![(Expr::col(PHENOTYPE).eq(Expr::string(label.clone())), result)],
                    else_result: None,
                }],
            )
        };
        aggregates.push((format!("{label}_flag"), pick(Expr::integer(1))));
        aggregates.push((format!("{label}_date"), pick(Expr::col(EVENT_DATE))));
        aggregates.push((format!("{label}_code"), pick(Expr::col(CODE))));
        aggregates.push((format!("{label}_source"), pick(Expr::col(SOURCE_NAME))));
    }
    let pivoted = first.aggregate(vec![SUBJECT_ID], aggregates);

    let mut columns = vec![(SUBJECT_ID.to_string(), Expr::qcol("c", &cohort.subject_id))];
    for label in &labels {
        for suffix in ["flag", "date", "code", "source"] {
            let column = format!("{label}_{suffix}");
            columns.push((column.clone(), Expr::qcol("p", &column)));
        }
    }

    cohort.relation.clone().join(
        "c",
        pivoted,
        "p",
        JoinKind::Left,
        Expr::qcol("c", &cohort.subject_id).eq(Expr::qcol("p", SUBJECT_ID)),
        columns,
    )
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
