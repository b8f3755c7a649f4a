//! Event extraction.
//!
//! One extraction covers one source table and one code field: raw rows are
//! inner-joined against a staged codelist on code equality, so rows whose
//! code matches no codelist entry drop out silently. The canonical event
//! shape is fixed here and consumed by the aggregator.

use cf_core::ColumnMapping;
use cf_sql::{Expr, JoinKind, Relation};

/// Canonical event column: subject identifier
pub const SUBJECT_ID: &str = "subject_id";
/// Canonical event column: normalized clinical code
pub const CODE: &str = "code";
/// Canonical event column: phenotype label from the codelist
pub const PHENOTYPE: &str = "phenotype";
/// Canonical event column: event date
pub const EVENT_DATE: &str = "event_date";
/// Canonical event column: source name
pub const SOURCE_NAME: &str = "source_name";
/// Canonical event column: source tie-break rank
pub const SOURCE_PRIORITY: &str = "source_priority";

/// Project one source's raw rows into canonical event tuples.
///
/// `code_width` truncates the source's codes before matching, mirroring
/// the normalization applied to the codelist at load time. Sources with
/// several code fields are extracted once per field and unioned by the
/// caller.
pub fn extract_events(
    source: Relation,
    codelist: Relation,
    mapping: &ColumnMapping,
    source_name: &str,
    priority: u32,
    code_width: Option<usize>,
) -> Relation {
    let raw_code = Expr::qcol("s", &mapping.code);
    let code = match code_width {
        Some(width) => Expr::func(
            "substr",
            vec![raw_code, Expr::integer(1), Expr::integer(width as i64)],
        ),
        None => raw_code,
    };

    source.join(
        "s",
        codelist,
        "l",
        JoinKind::Inner,
        code.clone().eq(Expr::qcol("l", CODE)),
        vec![
            (SUBJECT_ID, Expr::qcol("s", &mapping.subject_id)),
            (CODE, code),
            (PHENOTYPE, Expr::qcol("l", PHENOTYPE)),
            (EVENT_DATE, Expr::qcol("s", &mapping.event_date)),
            (SOURCE_NAME, Expr::string(source_name)),
            (SOURCE_PRIORITY, Expr::integer(i64::from(priority))),
        ],
    )
}
