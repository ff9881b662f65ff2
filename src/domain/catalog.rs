//! Data catalog rules
//!
//! The data catalog is the declarative mapping that drives the whole
//! pipeline: each rule names a source column and the warehouse column it
//! feeds, optionally tagged with clinical concept/modifier codes.

/// The no-modifier sentinel. A rule carrying this marker contributes an
/// optional merged field instead of fanning out into its own fact row.
pub const NO_MODIFIER: &str = "@";

/// How a catalog rule participates in row assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Both codes absent: the source field must resolve or the whole
    /// (source table, target table) pair is rejected.
    Mandatory,
    /// Modifier is the no-modifier sentinel: merge the field into the
    /// in-flight row when present, skip silently when absent.
    Merge,
    /// Anything else: produces an independent fact row.
    Fact,
}

/// One row of the data catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRule {
    /// Registry table the value is read from
    pub source_table: String,
    /// Registry column the value is read from
    pub source_column: String,
    /// Warehouse table the value is written to
    pub target_table: String,
    /// Warehouse column the value is written to
    pub target_column: String,
    /// Clinical concept code, when the rule describes a fact
    pub concept_code: Option<String>,
    /// Concept qualifier code, or [`NO_MODIFIER`] for merge rules
    pub modifier_code: Option<String>,
}

impl CatalogRule {
    /// Classify the rule by its code tags.
    pub fn kind(&self) -> RuleKind {
        match (&self.concept_code, &self.modifier_code) {
            (None, None) => RuleKind::Mandatory,
            (_, Some(modifier)) if modifier == NO_MODIFIER => RuleKind::Merge,
            _ => RuleKind::Fact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(concept: Option<&str>, modifier: Option<&str>) -> CatalogRule {
        CatalogRule {
            source_table: "visits".to_string(),
            source_column: "pain_level".to_string(),
            target_table: "observation_fact".to_string(),
            target_column: "nval_num".to_string(),
            concept_code: concept.map(String::from),
            modifier_code: modifier.map(String::from),
        }
    }

    #[test]
    fn test_mandatory_when_both_codes_absent() {
        assert_eq!(rule(None, None).kind(), RuleKind::Mandatory);
    }

    #[test]
    fn test_merge_on_no_modifier_sentinel() {
        assert_eq!(rule(None, Some("@")).kind(), RuleKind::Merge);
        assert_eq!(rule(Some("C:PAIN"), Some("@")).kind(), RuleKind::Merge);
    }

    #[test]
    fn test_fact_otherwise() {
        assert_eq!(rule(Some("C:PAIN"), Some("M:SEV")).kind(), RuleKind::Fact);
        assert_eq!(rule(None, Some("M:SEV")).kind(), RuleKind::Fact);
        // Concept code alone still fans out.
        assert_eq!(rule(Some("C:PAIN"), None).kind(), RuleKind::Fact);
    }
}
