use super::*;
use crate::extract::extract_events;
use cf_core::{CaseFolding, ColumnMapping, QualifiedName};
use cf_db::{DuckDbWarehouse, Warehouse};
use cf_sql::render;

fn table(name: &str) -> Relation {
    Relation::table(QualifiedName::resolve(name, None, CaseFolding::Preserve).unwrap())
}

fn cohort() -> Cohort {
    Cohort::new(
        table("cohort"),
        &CohortColumns {
            subject_id: "pid".to_string(),
            date_of_birth: "dob".to_string(),
            study_start_date: "index_date".to_string(),
        },
    )
}

fn hospital_events() -> Relation {
    extract_events(
        table("hospital"),
        table("codelist_icd10"),
        &ColumnMapping {
            subject_id: "patient".to_string(),
            code: "diag".to_string(),
            event_date: "admitted".to_string(),
        },
        "hospital",
        1,
        None,
    )
}

fn gp_events() -> Relation {
    extract_events(
        table("gp"),
        table("codelist_icd10"),
        &ColumnMapping {
            subject_id: "pid".to_string(),
            code: "code".to_string(),
            event_date: "seen_on".to_string(),
        },
        "gp",
        2,
        None,
    )
}

fn phenotypes(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

async fn warehouse() -> DuckDbWarehouse {
    let db = DuckDbWarehouse::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE cohort (pid INTEGER, dob DATE, index_date DATE); \
         INSERT INTO cohort VALUES \
             (1, DATE '1990-01-01', DATE '2021-01-01'), \
             (2, DATE '1985-06-15', DATE '2021-01-01'), \
             (3, DATE '2000-03-10', DATE '2021-01-01'); \
         CREATE TABLE hospital (patient INTEGER, diag VARCHAR, admitted DATE); \
         CREATE TABLE gp (pid INTEGER, code VARCHAR, seen_on DATE); \
         CREATE TABLE codelist_icd10 (code VARCHAR, phenotype VARCHAR); \
         INSERT INTO codelist_icd10 VALUES \
             ('I10', 'hypertension'), ('I109', 'hypertension'), ('E11', 'diabetes');",
    )
    .await
    .unwrap();
    db
}

async fn wide_rows(db: &DuckDbWarehouse, relation: &Relation) -> cf_db::SampleRows {
    let sql = format!("SELECT * FROM ({}) ORDER BY subject_id", render(relation));
    db.query_sample_rows(&sql, 100).await.unwrap()
}

#[tokio::test]
async fn test_two_source_priority_tie_break() {
    let db = warehouse().await;
    db.execute_batch(
        "INSERT INTO hospital VALUES (1, 'I10', DATE '2020-01-05'); \
         INSERT INTO gp VALUES (1, 'I109', DATE '2020-01-05');",
    )
    .await
    .unwrap();

    let rel = covariates(
        vec![hospital_events(), gp_events()],
        &cohort(),
        &phenotypes(&["hypertension", "diabetes"]),
    );
    let sample = wide_rows(&db, &rel).await;

    // Phenotype columns come out in sorted label order.
    assert_eq!(
        sample.columns,
        vec![
            "subject_id",
            "diabetes_flag",
            "diabetes_date",
            "diabetes_code",
            "diabetes_source",
            "hypertension_flag",
            "hypertension_date",
            "hypertension_code",
            "hypertension_source",
        ]
    );

    // Same-day tie: the lower priority number (hospital) wins.
    assert_eq!(
        sample.rows[0],
        vec!["1", "NULL", "NULL", "NULL", "NULL", "1", "2020-01-05", "I10", "hospital"]
    );
}

#[tokio::test]
async fn test_one_row_per_subject_regardless_of_events() {
    let db = warehouse().await;
    db.execute_batch("INSERT INTO hospital VALUES (1, 'I10', DATE '2020-01-05');")
        .await
        .unwrap();

    let rel = covariates(
        vec![hospital_events(), gp_events()],
        &cohort(),
        &phenotypes(&["hypertension", "diabetes"]),
    );
    let sample = wide_rows(&db, &rel).await;

    assert_eq!(sample.rows.len(), 3);
    // Subjects without any matching event keep their row, all columns NULL.
    for row in &sample.rows[1..] {
        assert!(row[1..].iter().all(|v| v == "NULL"), "expected all NULL: {row:?}");
    }
}

#[tokio::test]
async fn test_window_boundaries_inclusive() {
    let db = warehouse().await;
    db.execute_batch(
        "INSERT INTO gp VALUES \
             (1, 'E11', DATE '2021-01-01'), \
             (2, 'E11', DATE '1985-06-14'), \
             (2, 'E11', DATE '1985-06-15'), \
             (3, 'E11', DATE '2000-03-09'), \
             (3, 'E11', DATE '2021-01-02');",
    )
    .await
    .unwrap();

    let rel = covariates(vec![gp_events()], &cohort(), &phenotypes(&["diabetes"]));
    let sample = wide_rows(&db, &rel).await;

    // Subject 1: event exactly on the study start date is included.
    assert_eq!(sample.rows[0][2], "2021-01-01");
    // Subject 2: the day before birth is excluded, the birth date itself
    // is included and is the earliest qualifying event.
    assert_eq!(sample.rows[1][2], "1985-06-15");
    // Subject 3: both events fall outside the window.
    assert_eq!(sample.rows[2][1..], ["NULL", "NULL", "NULL", "NULL"]);
}

#[tokio::test]
async fn test_code_tie_break_is_lexicographic() {
    let db = warehouse().await;
    db.execute_batch(
        "INSERT INTO hospital VALUES \
             (1, 'I109', DATE '2020-01-05'), \
             (1, 'I10', DATE '2020-01-05');",
    )
    .await
    .unwrap();

    let rel = covariates(vec![hospital_events()], &cohort(), &phenotypes(&["hypertension"]));
    let sample = wide_rows(&db, &rel).await;

    assert_eq!(sample.rows[0][3], "I10");
}

#[tokio::test]
async fn test_date_beats_priority() {
    let db = warehouse().await;
    db.execute_batch(
        "INSERT INTO hospital VALUES (1, 'I10', DATE '2020-01-05'); \
         INSERT INTO gp VALUES (1, 'I10', DATE '2019-01-01');",
    )
    .await
    .unwrap();

    let rel = covariates(
        vec![hospital_events(), gp_events()],
        &cohort(),
        &phenotypes(&["hypertension"]),
    );
    let sample = wide_rows(&db, &rel).await;

    // The earlier event wins even though its source ranks lower.
    assert_eq!(
        sample.rows[0][1..],
        ["1", "2019-01-01", "I10", "gp"]
    );
}

#[tokio::test]
async fn test_first_events_keeps_one_row_per_pair() {
    let db = warehouse().await;
    db.execute_batch(
        "INSERT INTO hospital VALUES \
             (1, 'I10', DATE '2020-01-05'), \
             (1, 'I109', DATE '2020-02-01'), \
             (1, 'E11', DATE '2020-03-01'); \
         INSERT INTO gp VALUES (1, 'I10', DATE '2020-06-01');",
    )
    .await
    .unwrap();

    let rel = first_events(vec![hospital_events(), gp_events()], &cohort());
    let count = db.query_count(&render(&rel)).await.unwrap();

    // Three hypertension events collapse to one; one diabetes event stays.
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_same_code_under_two_phenotypes() {
    let db = warehouse().await;
    db.execute_batch(
        "INSERT INTO codelist_icd10 VALUES ('E11', 'metabolic'); \
         INSERT INTO gp VALUES (1, 'E11', DATE '2020-04-01');",
    )
    .await
    .unwrap();

    let rel = covariates(
        vec![gp_events()],
        &cohort(),
        &phenotypes(&["diabetes", "metabolic"]),
    );
    let sample = wide_rows(&db, &rel).await;

    // One raw row, two codelist entries: both phenotypes get the event.
    assert_eq!(sample.rows[0][1], "1");
    assert_eq!(sample.rows[0][5], "1");
}

#[tokio::test]
async fn test_repeated_execution_is_deterministic() {
    let db = warehouse().await;
    db.execute_batch(
        "INSERT INTO hospital VALUES (1, 'I10', DATE '2020-01-05'), (2, 'E11', DATE '2019-05-05'); \
         INSERT INTO gp VALUES (1, 'I109', DATE '2020-01-05'), (3, 'E11', DATE '2020-07-07');",
    )
    .await
    .unwrap();

    let rel = covariates(
        vec![hospital_events(), gp_events()],
        &cohort(),
        &phenotypes(&["hypertension", "diabetes"]),
    );

    assert_eq!(render(&rel), render(&rel));
    let first = wide_rows(&db, &rel).await;
    let second = wide_rows(&db, &rel).await;
    assert_eq!(first.rows, second.rows);
}

#[tokio::test]
async fn test_degrades_to_subject_list() {
    let db = warehouse().await;

    let rel = covariates(vec![], &cohort(), &phenotypes(&["hypertension"]));
    let sample = wide_rows(&db, &rel).await;
    assert_eq!(sample.columns, vec!["subject_id"]);
    assert_eq!(sample.rows.len(), 3);

    let rel = covariates(vec![gp_events()], &cohort(), &[]);
    let count = db.query_count(&render(&rel)).await.unwrap();
    assert_eq!(count, 3);
}
