//! Translation cache
//!
//! In-memory dictionary of source-language → target-language text, loaded
//! from the warehouse `dictionary` table on first use and grown lazily: a
//! cache miss calls the remote translation service and writes the new pair
//! behind itself through the batch writer. Entries are never evicted
//! within a run; the warehouse stays the durable copy.

use crate::adapters::database::StorageEngine;
use crate::adapters::translator::TranslationService;
use crate::core::load::batch::BatchWriter;
use crate::domain::{Result, Row, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// True when the text contains at least one Hebrew letter (U+05D0–U+05EA,
/// the range the registry's free-text fields use).
pub fn contains_hebrew(text: &str) -> bool {
    text.chars().any(|c| ('\u{05D0}'..='\u{05EA}').contains(&c))
}

/// Lazily-loaded dictionary with remote fallback.
pub struct TranslationCache {
    warehouse: Arc<dyn StorageEngine>,
    service: Arc<dyn TranslationService>,
    entries: Option<HashMap<String, String>>,
}

impl TranslationCache {
    pub fn new(warehouse: Arc<dyn StorageEngine>, service: Arc<dyn TranslationService>) -> Self {
        Self {
            warehouse,
            service,
            entries: None,
        }
    }

    /// Translate every Hebrew text value in the row, leaving other values
    /// untouched. Column order is preserved.
    pub async fn translate_row(&mut self, row: Row, writer: &mut BatchWriter) -> Result<Row> {
        let cells: Vec<(String, Value)> = row
            .iter()
            .map(|(col, value)| (col.to_string(), value.clone()))
            .collect();

        let mut translated = Row::new();
        for (column, value) in cells {
            match value {
                Value::Text(text) if contains_hebrew(&text) => {
                    let english = self.translate_text(&text, writer).await?;
                    translated.set(column, english);
                }
                other => translated.set(column, other),
            }
        }
        Ok(translated)
    }

    /// Translate one text, serving repeats from the in-memory dictionary.
    ///
    /// A miss calls the remote service once and appends the new pair to
    /// both the dictionary cache and the warehouse `dictionary` queue.
    async fn translate_text(&mut self, text: &str, writer: &mut BatchWriter) -> Result<String> {
        self.ensure_loaded().await?;
        let entries = self.entries.as_mut().expect("loaded above");

        if let Some(english) = entries.get(text) {
            return Ok(english.clone());
        }

        let english = self.service.translate(text).await?;
        entries.insert(text.to_string(), english.clone());

        let mut new_entry = Row::new();
        new_entry.set("he", text);
        new_entry.set("en", english.clone());
        writer.enqueue(new_entry, "dictionary").await?;

        Ok(english)
    }

    async fn ensure_loaded(&mut self) -> Result<()> {
        if self.entries.is_some() {
            return Ok(());
        }

        let rows = self.warehouse.fetch_rows("SELECT * FROM dictionary").await?;
        let mut entries = HashMap::with_capacity(rows.len());
        for row in &rows {
            if let (Some(Value::Text(he)), Some(Value::Text(en))) =
                (row.get("he"), row.get("en"))
            {
                entries.insert(he.clone(), en.clone());
            }
        }

        tracing::debug!(entries = entries.len(), "Loaded warehouse dictionary");
        self.entries = Some(entries);
        Ok(())
    }
}
