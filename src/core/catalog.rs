//! Catalog store
//!
//! Loads and indexes the declarative mapping rules that drive every
//! transformation decision. The catalog is loaded once at run start and is
//! read-only thereafter.

use crate::adapters::database::StorageEngine;
use crate::domain::{CastorError, CatalogRule, Result, Value};

/// Query for the relevant catalog rows: ignored and standby rules are
/// excluded, as are rules without a resolved target.
const CATALOG_QUERY: &str = "SELECT * FROM data_catalog \
     WHERE sw_ignore = 0 AND stand_by = 0 \
     AND target_table IS NOT NULL AND target_column IS NOT NULL \
     ORDER BY target_table";

/// The loaded data catalog, sorted by target table.
#[derive(Debug, Clone)]
pub struct Catalog {
    rules: Vec<CatalogRule>,
}

impl Catalog {
    /// Load the catalog from the warehouse.
    pub async fn load(warehouse: &dyn StorageEngine) -> Result<Self> {
        let rows = warehouse.fetch_rows(CATALOG_QUERY).await?;

        let mut rules = Vec::with_capacity(rows.len());
        for row in &rows {
            let source_table = required_text(row.get("table_name"), "table_name")?;
            let source_column = required_text(row.get("column_name"), "column_name")?;
            let target_table = required_text(row.get("target_table"), "target_table")?;
            let target_column = required_text(row.get("target_column"), "target_column")?;

            rules.push(CatalogRule {
                source_table,
                source_column,
                target_table,
                target_column,
                concept_code: optional_text(row.get("concept_cd")),
                modifier_code: optional_text(row.get("modifier_cd")),
            });
        }

        if rules.is_empty() {
            return Err(CastorError::Catalog(
                "Data catalog has no active rules".to_string(),
            ));
        }

        tracing::info!(rules = rules.len(), "Data catalog received");
        Ok(Self::from_rules(rules))
    }

    /// Build a catalog from already-materialized rules, sorting by target
    /// table the way the loaded catalog is sorted.
    pub fn from_rules(mut rules: Vec<CatalogRule>) -> Self {
        rules.sort_by(|a, b| a.target_table.cmp(&b.target_table));
        Self { rules }
    }

    /// All rules, in target-table order.
    pub fn rules(&self) -> &[CatalogRule] {
        &self.rules
    }

    /// Distinct source tables, in first-seen order. These drive which
    /// registry tables are extracted.
    pub fn source_tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !tables.contains(&rule.source_table.as_str()) {
                tables.push(&rule.source_table);
            }
        }
        tables
    }

    /// Distinct target tables fed by the source table, in catalog order.
    pub fn target_tables_for(&self, source_table: &str) -> Vec<&str> {
        let mut tables: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if rule.source_table == source_table
                && !tables.contains(&rule.target_table.as_str())
            {
                tables.push(&rule.target_table);
            }
        }
        tables
    }

    /// Rules for one (source table, target table) pair.
    pub fn rules_for_pair(&self, source_table: &str, target_table: &str) -> Vec<&CatalogRule> {
        self.rules
            .iter()
            .filter(|r| r.source_table == source_table && r.target_table == target_table)
            .collect()
    }
}

fn required_text(value: Option<&Value>, column: &str) -> Result<String> {
    match value {
        Some(Value::Text(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(CastorError::Catalog(format!(
            "Catalog row is missing '{column}'"
        ))),
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Text(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(source: &str, column: &str, target: &str, target_col: &str) -> CatalogRule {
        CatalogRule {
            source_table: source.to_string(),
            source_column: column.to_string(),
            target_table: target.to_string(),
            target_column: target_col.to_string(),
            concept_code: None,
            modifier_code: None,
        }
    }

    #[test]
    fn test_from_rules_sorts_by_target_table() {
        let catalog = Catalog::from_rules(vec![
            rule("visits", "pain", "observation_fact", "nval_num"),
            rule("visits", "code", "concept_dimension", "concept_cd"),
        ]);

        assert_eq!(catalog.rules()[0].target_table, "concept_dimension");
        assert_eq!(catalog.rules()[1].target_table, "observation_fact");
    }

    #[test]
    fn test_source_tables_first_seen_order() {
        let catalog = Catalog::from_rules(vec![
            rule("visits", "a", "concept_dimension", "x"),
            rule("patients", "b", "concept_dimension", "y"),
            rule("visits", "c", "patient_dimension", "z"),
        ]);

        assert_eq!(catalog.source_tables(), vec!["visits", "patients"]);
    }

    #[test]
    fn test_target_tables_for_source() {
        let catalog = Catalog::from_rules(vec![
            rule("visits", "a", "observation_fact", "x"),
            rule("visits", "b", "concept_dimension", "y"),
            rule("patients", "c", "patient_dimension", "z"),
        ]);

        assert_eq!(
            catalog.target_tables_for("visits"),
            vec!["concept_dimension", "observation_fact"]
        );
        assert_eq!(
            catalog.target_tables_for("patients"),
            vec!["patient_dimension"]
        );
        assert!(catalog.target_tables_for("unknown").is_empty());
    }

    #[test]
    fn test_rules_for_pair() {
        let catalog = Catalog::from_rules(vec![
            rule("visits", "a", "observation_fact", "x"),
            rule("visits", "b", "observation_fact", "y"),
            rule("visits", "c", "concept_dimension", "z"),
        ]);

        let pair = catalog.rules_for_pair("visits", "observation_fact");
        assert_eq!(pair.len(), 2);
        assert!(pair.iter().all(|r| r.target_table == "observation_fact"));
    }
}
