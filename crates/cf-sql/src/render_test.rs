use super::*;
use crate::relation::JoinKind;
use cf_core::{CaseFolding, QualifiedName};
use chrono::NaiveDate;

fn table(name: &str) -> Relation {
    Relation::table(QualifiedName::resolve(name, None, CaseFolding::Preserve).unwrap())
}

fn qualified(schema: &str, name: &str) -> Relation {
    Relation::table(QualifiedName::resolve(name, Some(schema), CaseFolding::Preserve).unwrap())
}

#[test]
fn test_table_scan() {
    assert_eq!(render(&table("events")), "SELECT * FROM \"events\"");
    assert_eq!(
        render(&qualified("raw", "events")),
        "SELECT * FROM \"raw\".\"events\""
    );
}

#[test]
fn test_project() {
    let rel = table("events").select(vec![
        ("subject_id", Expr::col("pid")),
        ("code", Expr::col("diag")),
    ]);
    assert_eq!(
        render(&rel),
        "SELECT \"pid\" AS \"subject_id\", \"diag\" AS \"code\" FROM \"events\" AS \"t0\""
    );
}

#[test]
fn test_filter_with_literals() {
    let rel = table("events").filter(
        Expr::col("code")
            .eq(Expr::string("I10"))
            .and(Expr::col("event_date").gt_eq(Expr::date(
                NaiveDate::from_ymd_opt(2020, 1, 5).unwrap(),
            ))),
    );
    assert_eq!(
        render(&rel),
        "SELECT * FROM \"events\" AS \"t0\" WHERE ((\"code\" = 'I10') AND (\"event_date\" >= DATE '2020-01-05'))"
    );
}

#[test]
fn test_string_literal_escaped() {
    let rel = table("t").filter(Expr::col("name").eq(Expr::string("it's")));
    assert!(render(&rel).contains("'it''s'"));
}

#[test]
fn test_inner_join_with_select_list() {
    let rel = table("events").join(
        "e",
        table("codelist"),
        "l",
        JoinKind::Inner,
        Expr::qcol("e", "code").eq(Expr::qcol("l", "code")),
        vec![
            ("subject_id", Expr::qcol("e", "pid")),
            ("phenotype", Expr::qcol("l", "phenotype")),
        ],
    );
    assert_eq!(
        render(&rel),
        "SELECT \"e\".\"pid\" AS \"subject_id\", \"l\".\"phenotype\" AS \"phenotype\" \
         FROM \"events\" AS \"e\" INNER JOIN \"codelist\" AS \"l\" ON (\"e\".\"code\" = \"l\".\"code\")"
    );
}

#[test]
fn test_left_join() {
    let rel = table("cohort").join(
        "c",
        table("pivot"),
        "p",
        JoinKind::Left,
        Expr::qcol("c", "id").eq(Expr::qcol("p", "subject_id")),
        vec![("subject_id", Expr::qcol("c", "id"))],
    );
    assert!(render(&rel).contains("LEFT JOIN"));
}

#[test]
fn test_union_all() {
    let rel = Relation::union_all(vec![
        table("a").select(vec![("x", Expr::col("x"))]),
        table("b").select(vec![("x", Expr::col("x"))]),
    ]);
    assert_eq!(
        render(&rel),
        "SELECT \"x\" AS \"x\" FROM \"a\" AS \"t0\" UNION ALL SELECT \"x\" AS \"x\" FROM \"b\" AS \"t1\""
    );
}

#[test]
fn test_union_nested_in_from_is_parenthesized() {
    let union = Relation::union_all(vec![
        table("a").select(vec![("x", Expr::col("x"))]),
        table("b").select(vec![("x", Expr::col("x"))]),
    ]);
    let rel = union.filter(Expr::col("x").eq(Expr::integer(1)));
    let sql = render(&rel);
    assert!(sql.starts_with("SELECT * FROM (SELECT"));
    assert!(sql.ends_with("WHERE (\"x\" = 1)"));
}

#[test]
fn test_aggregate() {
    let rel = table("first_events").aggregate(
        vec!["subject_id"],
        vec![(
            "hypertension_flag".to_string(),
            Expr::func(
                "max",
                vec![Expr::Case {
                    arms: vec![(
                        Expr::col("phenotype").eq(Expr::string("hypertension")),
                        Expr::integer(1),
                    )],
                    else_result: None,
                }],
            ),
        )],
    );
    assert_eq!(
        render(&rel),
        "SELECT \"subject_id\", MAX(CASE WHEN (\"phenotype\" = 'hypertension') THEN 1 END) AS \"hypertension_flag\" \
         FROM \"first_events\" AS \"t0\" GROUP BY \"subject_id\""
    );
}

#[test]
fn test_row_number_window() {
    let rel = table("events").select(vec![
        ("subject_id", Expr::col("subject_id")),
        (
            "rn",
            Expr::RowNumber {
                partition_by: vec![Expr::col("subject_id"), Expr::col("phenotype")],
                order_by: vec![
                    Expr::col("event_date").asc(),
                    Expr::col("source_priority").asc(),
                    Expr::col("code").asc(),
                ],
            },
        ),
    ]);
    assert_eq!(
        render(&rel),
        "SELECT \"subject_id\" AS \"subject_id\", \
         ROW_NUMBER() OVER (PARTITION BY \"subject_id\", \"phenotype\" \
         ORDER BY \"event_date\" ASC, \"source_priority\" ASC, \"code\" ASC) AS \"rn\" \
         FROM \"events\" AS \"t0\""
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let rel = table("events")
        .join(
            "e",
            table("cohort"),
            "c",
            JoinKind::Inner,
            Expr::qcol("e", "pid").eq(Expr::qcol("c", "pid")),
            vec![("subject_id", Expr::qcol("e", "pid"))],
        )
        .filter(Expr::col("subject_id").eq(Expr::integer(7)));
    assert_eq!(render(&rel), render(&rel));
}

#[test]
fn test_generated_aliases_do_not_collide() {
    let inner = table("a").select(vec![("x", Expr::col("x"))]);
    let outer = inner
        .filter(Expr::col("x").eq(Expr::integer(1)))
        .select(vec![("x", Expr::col("x"))]);
    let sql = render(&outer);
    assert!(sql.contains("\"t0\""));
    assert!(sql.contains("\"t1\""));
}
