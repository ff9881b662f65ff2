//! Patient dimension transformer
//!
//! Patient rows are single-row-per-source-row: every merge rule whose
//! source field carries a value folds into the same in-flight row, unlike
//! observation rows which fan out.

use crate::core::rules::{finish_row, Pipeline, RowOutcome};
use crate::domain::{CatalogRule, Result, Row, RuleKind};

/// Merge the pair's merge-rule fields into the mandatory columns and
/// process the result into a patient_dimension candidate row.
pub async fn process(
    pipeline: &mut Pipeline,
    mandatory: Row,
    source_row: &Row,
    rules: &[&CatalogRule],
    source_table: &str,
    target_table: &str,
    outcome: &mut RowOutcome,
) -> Result<()> {
    let mut row = mandatory;

    // Merge-rule fields are optional: absent values are skipped silently.
    for rule in rules.iter().filter(|r| r.kind() == RuleKind::Merge) {
        if let Some(value) = source_row.get(&rule.source_column) {
            if !value.is_null() {
                row.set(rule.target_column.clone(), value.clone());
            }
        }
    }

    finish_row(pipeline, row, source_row, source_table, target_table, outcome).await
}
