use super::*;
use crate::duckdb::DuckDbWarehouse;
use cf_core::CaseFolding;

fn name(table: &str) -> QualifiedName {
    QualifiedName::resolve(table, None, CaseFolding::Preserve).unwrap()
}

async fn seeded_db() -> DuckDbWarehouse {
    let db = DuckDbWarehouse::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE src AS SELECT * FROM (VALUES (1, 'a'), (2, 'b'), (3, 'c')) t(id, label)",
    )
    .await
    .unwrap();
    db
}

#[tokio::test]
async fn test_materialize_creates_table() {
    let db = seeded_db().await;
    let relation = Relation::table(name("src"));

    let handle = materialize(&db, &relation, &name("copy"), MaterializeOptions::default())
        .await
        .unwrap();

    assert_eq!(handle.name().to_string(), "copy");
    assert!(db.relation_exists(&name("copy")).await.unwrap());
    assert_eq!(db.query_count("SELECT * FROM copy").await.unwrap(), 3);
    assert!(handle.definition().contains("\"src\""));
}

#[tokio::test]
async fn test_materialize_existing_without_overwrite_fails_untouched() {
    let db = seeded_db().await;
    let relation = Relation::table(name("src"));

    materialize(&db, &relation, &name("copy"), MaterializeOptions::default())
        .await
        .unwrap();

    // A second call without overwrite fails naming the target and issues
    // zero mutating statements: the first table keeps its contents.
    let empty = Relation::table(name("src")).filter(
        cf_sql::Expr::col("id").eq(cf_sql::Expr::integer(999)),
    );
    let err = materialize(&db, &empty, &name("copy"), MaterializeOptions::default())
        .await
        .unwrap_err();

    match err {
        DbError::TableAlreadyExists(target) => assert_eq!(target, "copy"),
        other => panic!("expected TableAlreadyExists, got {other}"),
    }
    assert_eq!(db.query_count("SELECT * FROM copy").await.unwrap(), 3);
}

#[tokio::test]
async fn test_materialize_overwrite_is_idempotent() {
    let db = seeded_db().await;
    let relation = Relation::table(name("src"));
    let options = MaterializeOptions {
        overwrite: true,
        temporary: false,
    };

    materialize(&db, &relation, &name("copy"), options).await.unwrap();
    let first = db
        .query_sample_rows("SELECT * FROM copy ORDER BY id", 10)
        .await
        .unwrap();

    materialize(&db, &relation, &name("copy"), options).await.unwrap();
    let second = db
        .query_sample_rows("SELECT * FROM copy ORDER BY id", 10)
        .await
        .unwrap();

    assert_eq!(first.rows, second.rows);
}

#[tokio::test]
async fn test_materialize_temporary_strips_schema() {
    let db = seeded_db().await;
    let relation = Relation::table(name("src"));
    let target = QualifiedName::resolve("scratch", Some("derived"), CaseFolding::Preserve).unwrap();

    let handle = materialize(
        &db,
        &relation,
        &target,
        MaterializeOptions {
            overwrite: false,
            temporary: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(handle.name().schema(), None);
    assert_eq!(db.query_count("SELECT * FROM scratch").await.unwrap(), 3);
}

#[tokio::test]
async fn test_handle_relation_composes() {
    let db = seeded_db().await;
    let relation = Relation::table(name("src"));

    let handle = materialize(&db, &relation, &name("copy"), MaterializeOptions::default())
        .await
        .unwrap();

    // The handle re-enters the lazy layer: materialize a second table from
    // the first one's relation.
    let again = materialize(
        &db,
        &handle.relation(),
        &name("copy_of_copy"),
        MaterializeOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        db.query_count(&format!("SELECT * FROM {}", again.name().quoted()))
            .await
            .unwrap(),
        3
    );
}
