//! Encounter registrar
//!
//! Observation facts are grouped by care event through a date-keyed
//! encounter id. The registrar keeps the `encounters` table in memory,
//! loaded on first use; unseen dates get `max(existing ids) + 1` and the
//! new entry is written behind through the batch writer.

use crate::adapters::database::StorageEngine;
use crate::core::load::batch::BatchWriter;
use crate::domain::{Result, Row, Value};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Date → encounter id assignment with monotonic allocation.
pub struct EncounterRegistrar {
    warehouse: Arc<dyn StorageEngine>,
    entries: Option<HashMap<NaiveDate, i64>>,
    max_id: i64,
}

impl EncounterRegistrar {
    pub fn new(warehouse: Arc<dyn StorageEngine>) -> Self {
        Self {
            warehouse,
            entries: None,
            max_id: 0,
        }
    }

    /// Return the encounter id for the date, allocating a new one for
    /// unseen dates.
    ///
    /// New entries are appended to the in-memory table and to the
    /// `encounters` write queue. Single-threaded use assumed; the
    /// registrar is owned by the coordinator.
    pub async fn assign(&mut self, date: NaiveDate, writer: &mut BatchWriter) -> Result<i64> {
        self.ensure_loaded().await?;
        let entries = self.entries.as_mut().expect("loaded above");

        if let Some(encounter_num) = entries.get(&date) {
            return Ok(*encounter_num);
        }

        let encounter_num = self.max_id + 1;
        self.max_id = encounter_num;
        entries.insert(date, encounter_num);

        let mut new_entry = Row::new();
        new_entry.set("date", date);
        new_entry.set("encounter_num", encounter_num);
        writer.enqueue(new_entry, "encounters").await?;

        tracing::debug!(%date, encounter_num, "Assigned new encounter");
        Ok(encounter_num)
    }

    async fn ensure_loaded(&mut self) -> Result<()> {
        if self.entries.is_some() {
            return Ok(());
        }

        let rows = self.warehouse.fetch_rows("SELECT * FROM encounters").await?;
        let mut entries = HashMap::with_capacity(rows.len());
        let mut max_id = 0;
        for row in &rows {
            let date = match row.get("date") {
                Some(Value::Timestamp(ts)) => ts.date(),
                Some(Value::Text(s)) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    Ok(date) => date,
                    Err(_) => {
                        tracing::warn!(value = %s, "Skipping encounter with unparseable date");
                        continue;
                    }
                },
                _ => {
                    tracing::warn!("Skipping encounter without a date");
                    continue;
                }
            };

            let encounter_num = match row.get("encounter_num") {
                Some(Value::Number(n)) => *n as i64,
                _ => {
                    tracing::warn!(%date, "Skipping encounter without a number");
                    continue;
                }
            };

            max_id = max_id.max(encounter_num);
            entries.insert(date, encounter_num);
        }

        tracing::debug!(entries = entries.len(), max_id, "Loaded encounters table");
        self.entries = Some(entries);
        self.max_id = max_id;
        Ok(())
    }
}

/// Rebuild the `encounters` table from scratch.
///
/// Collects every `Entry_Date` across the extracted source tables, dedups
/// and sorts the dates, assigns ids 1..N in date order, and bulk-saves the
/// result. Returns the number of encounters written.
pub async fn rebuild_from_sources(
    warehouse: &dyn StorageEngine,
    source_tables: &[(String, Vec<Row>)],
) -> Result<usize> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for (_, rows) in source_tables {
        for row in rows {
            if let Some(Value::Timestamp(ts)) = row.get("Entry_Date") {
                dates.insert(ts.date());
            }
        }
    }

    let encounters: Vec<Row> = dates
        .iter()
        .enumerate()
        .map(|(idx, date)| {
            let mut row = Row::new();
            row.set("date", *date);
            row.set("encounter_num", (idx + 1) as i64);
            row
        })
        .collect();

    warehouse.save_rows(&encounters, "encounters").await?;
    tracing::info!(encounters = encounters.len(), "Encounters table updated");
    Ok(encounters.len())
}
