//! End-to-end run tests: catalog-driven extraction, soft-delete query
//! shaping, summary accounting, dry-run, and the encounters rebuild.

mod common;

use castor::core::load::LoadCoordinator;
use castor::domain::{Row, Value};
use chrono::NaiveDate;
use common::{test_config, InMemoryEngine, ScriptedTranslator};
use std::sync::Arc;
use tempfile::TempDir;

fn catalog_row(
    source_table: &str,
    source_column: &str,
    target_table: &str,
    target_column: &str,
    concept_cd: Option<&str>,
    modifier_cd: Option<&str>,
) -> Row {
    let mut row = Row::new();
    row.set("table_name", source_table);
    row.set("column_name", source_column);
    row.set("target_table", target_table);
    row.set("target_column", target_column);
    row.set("concept_cd", concept_cd.map(String::from));
    row.set("modifier_cd", modifier_cd.map(String::from));
    row
}

fn warehouse_with_catalog(catalog_rows: Vec<Row>) -> InMemoryEngine {
    InMemoryEngine::new()
        .with_table(
            "data_catalog",
            &[
                "table_name",
                "column_name",
                "target_table",
                "target_column",
                "concept_cd",
                "modifier_cd",
            ],
            &[],
            catalog_rows,
        )
        .with_table("dictionary", &["he", "en"], &["he", "en"], vec![])
        .with_table(
            "encounters",
            &["date", "encounter_num"],
            &["date", "encounter_num"],
            vec![],
        )
        .with_table(
            "exceptions",
            &[
                "log_file_id",
                "target_table",
                "org_table",
                "target_col",
                "org_col",
                "row_json",
            ],
            &[],
            vec![],
        )
        .with_table(
            "concept_dimension",
            &[
                "patient_num",
                "concept_desc",
                "name_char",
                "update_date",
                "download_date",
                "import_date",
                "sourcesystem_cd",
                "upload_id",
            ],
            &["patient_num", "name_char"],
            vec![],
        )
        .with_table(
            "observation_fact",
            &[
                "encounter_num",
                "patient_num",
                "start_date",
                "concept_cd",
                "modifier_cd",
                "nval_num",
                "valtype_cd",
                "update_date",
                "download_date",
                "import_date",
                "sourcesystem_cd",
                "upload_id",
            ],
            &["patient_num", "concept_cd", "encounter_num"],
            vec![],
        )
}

fn visit(patient: &str, date: NaiveDate, pain: Option<f64>, desc: &str) -> Row {
    let mut row = Row::new();
    row.set("patient_id", patient);
    row.set("Entry_Date", date);
    row.set("pain_level", pain);
    row.set("concept_desc", desc);
    row.set("Delete_Date", Value::Null);
    row
}

fn standard_catalog() -> Vec<Row> {
    vec![
        catalog_row(
            "visits",
            "patient_id",
            "concept_dimension",
            "patient_num",
            None,
            None,
        ),
        catalog_row(
            "visits",
            "concept_desc",
            "concept_dimension",
            "concept_desc",
            None,
            None,
        ),
        catalog_row(
            "visits",
            "patient_id",
            "observation_fact",
            "patient_num",
            None,
            None,
        ),
        catalog_row(
            "visits",
            "Entry_Date",
            "observation_fact",
            "start_date",
            None,
            None,
        ),
        catalog_row(
            "visits",
            "pain_level",
            "observation_fact",
            "nval_num",
            Some("C:PAIN"),
            Some("M:SEV"),
        ),
    ]
}

fn source_with_visits(rows: Vec<Row>) -> InMemoryEngine {
    InMemoryEngine::new().with_table(
        "visits",
        &[
            "patient_id",
            "Entry_Date",
            "pain_level",
            "concept_desc",
            "Delete_Date",
        ],
        &[],
        rows,
    )
}

#[tokio::test]
async fn test_full_run_routes_rows_and_reports_counts() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let warehouse = Arc::new(warehouse_with_catalog(standard_catalog()));
    let source = Arc::new(source_with_visits(vec![
        visit("P1", date, Some(4.0), "כאב"),
        // pain_level null: the fact rule fails alone, the concept row
        // still lands.
        visit("P2", date, None, "fever"),
    ]));
    let translator = Arc::new(ScriptedTranslator::new().with_translation("כאב", "pain"));
    let log_dir = TempDir::new().unwrap();

    let coordinator = LoadCoordinator::with_collaborators(
        test_config(log_dir.path()),
        warehouse.clone(),
        source.clone(),
        translator,
    );
    let summary = coordinator.execute().await.unwrap();

    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.tables.len(), 1);
    let visits = &summary.tables[0];
    assert_eq!(visits.source_table, "visits");
    // Two concept rows and one observation row saved; one fan-out failure.
    assert_eq!(
        visits.saved,
        vec![
            ("concept_dimension".to_string(), 2),
            ("observation_fact".to_string(), 1),
        ]
    );
    assert_eq!(visits.failed, vec![("observation_fact".to_string(), 1)]);
    assert!(!summary.is_successful());

    // The warehouse received the translated concept row.
    let concepts = warehouse.saved_rows("concept_dimension");
    assert_eq!(concepts.len(), 2);
    assert_eq!(
        concepts[0].get("name_char"),
        Some(&Value::Text("pain".into()))
    );

    // One recoverable failure recorded for the null pain_level.
    let exceptions = warehouse.saved_rows("exceptions");
    assert_eq!(exceptions.len(), 1);
    assert_eq!(
        exceptions[0].get("org_col"),
        Some(&Value::Text("pain_level".into()))
    );
}

#[tokio::test]
async fn test_soft_delete_column_shapes_the_extraction_query() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let warehouse = Arc::new(warehouse_with_catalog(vec![
        catalog_row(
            "visits",
            "patient_id",
            "concept_dimension",
            "patient_num",
            None,
            None,
        ),
        catalog_row(
            "visits",
            "concept_desc",
            "concept_dimension",
            "concept_desc",
            None,
            None,
        ),
        catalog_row(
            "patients",
            "patient_id",
            "concept_dimension",
            "patient_num",
            None,
            None,
        ),
        catalog_row(
            "patients",
            "name",
            "concept_dimension",
            "concept_desc",
            None,
            None,
        ),
    ]));

    // visits carries Delete_Date; patients does not.
    let source = Arc::new(
        source_with_visits(vec![visit("P1", date, None, "checkup")]).with_table(
            "patients",
            &["patient_id", "name"],
            &[],
            vec![[("patient_id", "P2"), ("name", "Dana")].into_iter().collect()],
        ),
    );
    let log_dir = TempDir::new().unwrap();

    let coordinator = LoadCoordinator::with_collaborators(
        test_config(log_dir.path()),
        warehouse,
        source.clone(),
        Arc::new(ScriptedTranslator::new()),
    );
    coordinator.execute().await.unwrap();

    let queries = source.queries();
    assert!(queries
        .iter()
        .any(|q| q == "SELECT * FROM \"visits\" WHERE \"Delete_Date\" IS NULL"));
    assert!(queries.iter().any(|q| q == "SELECT * FROM \"patients\""));
}

#[tokio::test]
async fn test_dry_run_skips_warehouse_writes() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let warehouse = Arc::new(warehouse_with_catalog(standard_catalog()));
    let source = Arc::new(source_with_visits(vec![visit("P1", date, Some(2.0), "flu")]));
    let log_dir = TempDir::new().unwrap();

    let mut config = test_config(log_dir.path());
    config.application.dry_run = true;

    let coordinator = LoadCoordinator::with_collaborators(
        config,
        warehouse.clone(),
        source,
        Arc::new(ScriptedTranslator::new()),
    );
    let summary = coordinator.execute().await.unwrap();

    // Rows are processed and counted but nothing reaches storage.
    assert_eq!(summary.total_saved(), 2);
    assert!(warehouse.saved_rows("concept_dimension").is_empty());
    assert!(warehouse.saved_rows("observation_fact").is_empty());
}

#[tokio::test]
async fn test_rebuild_encounters_assigns_ids_in_date_order() {
    let warehouse = Arc::new(warehouse_with_catalog(standard_catalog()));

    let d1 = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let d2 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let d3 = NaiveDate::from_ymd_opt(2023, 11, 20).unwrap();
    // d1 appears twice across rows and must be deduplicated.
    let source = Arc::new(source_with_visits(vec![
        visit("P1", d1, Some(1.0), "a"),
        visit("P2", d2, Some(2.0), "b"),
        visit("P3", d1, Some(3.0), "c"),
        visit("P4", d3, Some(4.0), "d"),
    ]));
    let log_dir = TempDir::new().unwrap();

    let coordinator = LoadCoordinator::with_collaborators(
        test_config(log_dir.path()),
        warehouse.clone(),
        source,
        Arc::new(ScriptedTranslator::new()),
    );
    let count = coordinator.rebuild_encounters().await.unwrap();
    assert_eq!(count, 3);

    let encounters = warehouse.saved_rows("encounters");
    assert_eq!(encounters.len(), 3);
    // Sorted by date: 2023-11-20, 2024-01-05, 2024-02-01 get ids 1..3.
    assert_eq!(encounters[0].get("date"), Some(&Value::from(d3)));
    assert_eq!(encounters[0].get("encounter_num"), Some(&Value::Number(1.0)));
    assert_eq!(encounters[1].get("date"), Some(&Value::from(d1)));
    assert_eq!(encounters[1].get("encounter_num"), Some(&Value::Number(2.0)));
    assert_eq!(encounters[2].get("date"), Some(&Value::from(d2)));
    assert_eq!(encounters[2].get("encounter_num"), Some(&Value::Number(3.0)));
}
