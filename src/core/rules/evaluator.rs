//! Mandatory-column resolution
//!
//! Seeds the system-computed columns every derived row carries, then
//! resolves the pair's mandatory catalog rules against the source row.
//! The first unresolvable mandatory field rejects the whole (source row,
//! target table) pair.

use crate::config::EtlConfig;
use crate::domain::{CatalogRule, Row, RowFailure, RuleKind};
use chrono::Local;

/// Build the mandatory columns for one (source table, target table) pair.
///
/// # Errors
///
/// Fails with [`RowFailure::MandatoryFieldMissing`] naming the source
/// column when a mandatory rule's field is absent or null. The caller
/// skips this pair and continues with the row's remaining target tables.
pub fn mandatory_columns(
    rules: &[&CatalogRule],
    source_row: &Row,
    etl: &EtlConfig,
) -> Result<Row, RowFailure> {
    let now = Local::now().naive_local();

    let mut columns = Row::new();
    columns.set("update_date", now);
    columns.set("download_date", now);
    columns.set("import_date", now);
    columns.set("sourcesystem_cd", etl.sourcesystem_cd.clone());
    columns.set("upload_id", etl.upload_id);

    for rule in rules.iter().filter(|r| r.kind() == RuleKind::Mandatory) {
        match source_row.get(&rule.source_column) {
            Some(value) if !value.is_null() => {
                columns.set(rule.target_column.clone(), value.clone());
            }
            _ => return Err(RowFailure::MandatoryFieldMissing(rule.source_column.clone())),
        }
    }

    Ok(columns)
}
