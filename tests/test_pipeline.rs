//! Integration test: ingestion through training on a CKD-shaped CSV

mod common;

use ckd_predict::error::CkdError;
use ckd_predict::preprocessing::schema::CANONICAL_COLUMNS;
use ckd_predict::preprocessing::{median, Cleaner, ColumnValues, Ingestor};
use ckd_predict::training::{PipelineConfig, TrainEngine};
use common::{ckd_csv, CsvOptions};

#[test]
fn test_ingest_drops_id_and_renames() {
    let csv = ckd_csv(&CsvOptions::default());
    let table = Ingestor::new().read_csv(csv.as_bytes()).unwrap();

    assert_eq!(table.n_rows(), 200);
    assert_eq!(table.n_columns(), 25);
    let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, CANONICAL_COLUMNS.to_vec());
}

#[test]
fn test_ingest_renames_positionally() {
    // arbitrary headers are replaced by the canonical names in order
    let csv = ckd_csv(&CsvOptions { with_id: false, ..Default::default() });
    let renamed = csv.replacen("age,bp", "Age (years),Blood Pressure", 1);
    let table = Ingestor::new().read_csv(renamed.as_bytes()).unwrap();
    assert!(table.column("age").is_some());
    assert!(table.column("bp").is_some());
}

#[test]
fn test_ingest_wrong_column_count() {
    let csv = ckd_csv(&CsvOptions::default());
    let truncated: String = csv
        .lines()
        .map(|line| {
            let mut fields: Vec<&str> = line.split(',').collect();
            fields.remove(3);
            fields.join(",") + "\n"
        })
        .collect();

    let err = Ingestor::new().read_csv(truncated.as_bytes()).unwrap_err();
    assert!(matches!(err, CkdError::ShapeMismatch { .. }), "got {:?}", err);
}

#[test]
fn test_imputed_values_equal_median_of_non_missing() {
    let csv = ckd_csv(&CsvOptions::default());
    let table = Ingestor::new().read_csv(csv.as_bytes()).unwrap();

    let mut expected = Vec::new();
    for name in ["pcv", "wc", "rc"] {
        let parsed: Vec<Option<f64>> = match &table.column(name).unwrap().values {
            ColumnValues::Text(cells) => cells
                .iter()
                .map(|c| c.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
            ColumnValues::Numeric(cells) => cells.clone(),
        };
        let present: Vec<f64> = parsed.iter().flatten().copied().collect();
        assert!(present.len() < parsed.len(), "{} should have gaps", name);
        expected.push((name, parsed, median(&present).unwrap()));
    }

    let cleaned = Cleaner::default().clean(table).unwrap();
    for (name, parsed, med) in expected {
        assert_eq!(cleaned.medians[name], med);
        let column = cleaned.column(name).unwrap();
        for (value, original) in column.iter().zip(&parsed) {
            match original {
                Some(v) => assert_eq!(value, v),
                None => assert_eq!(*value, med),
            }
        }
    }
}

#[test]
fn test_na_tokens_are_median_filled() {
    let csv = ckd_csv(&CsvOptions::default());
    let with_na: String = csv
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let mut fields: Vec<&str> = line.split(',').collect();
            // age follows the id column
            match i {
                3 => fields[1] = "NA",
                8 => fields[1] = "NaN",
                21 => fields[1] = "null",
                _ => {}
            }
            fields.join(",") + "\n"
        })
        .collect();

    let table = Ingestor::new().read_csv(with_na.as_bytes()).unwrap();
    let ages = match &table.column("age").unwrap().values {
        ColumnValues::Numeric(cells) => cells.clone(),
        other => panic!("age should stay numeric, got {:?}", other.column_type()),
    };
    assert_eq!(ages.iter().filter(|a| a.is_none()).count(), 3);
    let present: Vec<f64> = ages.iter().flatten().copied().collect();
    let med = median(&present).unwrap();

    let cleaned = Cleaner::default().clean(table).unwrap();
    assert_eq!(cleaned.medians["age"], med);
    assert_eq!(cleaned.imputed_counts["age"], 3);
    assert!(!cleaned.encoders.contains_key("age"));
    let column = cleaned.column("age").unwrap();
    for row in [2, 7, 20] {
        assert_eq!(column[row], med);
    }
}

#[test]
fn test_missing_categories_get_their_own_code() {
    // rbc is blank on every tenth row starting at row 4
    let csv = ckd_csv(&CsvOptions::default());
    let table = Ingestor::new().read_csv(csv.as_bytes()).unwrap();
    let cleaned = Cleaner::default().clean(table).unwrap();

    let encoder = &cleaned.encoders["rbc"];
    let rbc = cleaned.column("rbc").unwrap();
    for (i, code) in rbc.iter().enumerate() {
        if i % 10 == 4 {
            assert_eq!(*code, encoder.missing_code());
        } else {
            assert!(*code < encoder.missing_code());
        }
    }
}

#[test]
fn test_labels_trimmed_before_encoding() {
    let csv = ckd_csv(&CsvOptions::default());
    let table = Ingestor::new().read_csv(csv.as_bytes()).unwrap();
    let cleaned = Cleaner::default().clean(table).unwrap();
    assert_eq!(
        cleaned.encoders["classification"].classes(),
        &["ckd".to_string(), "notckd".to_string()]
    );
}

#[test]
fn test_training_is_deterministic() {
    let csv = ckd_csv(&CsvOptions::default());
    let engine = TrainEngine::new(PipelineConfig::default());

    let first = engine.fit_csv(csv.as_bytes()).unwrap();
    let second = engine.fit_csv(csv.as_bytes()).unwrap();

    assert_eq!(first.report.forest.accuracy, second.report.forest.accuracy);
    assert_eq!(first.report.booster.accuracy, second.report.booster.accuracy);
    assert_eq!(first.report.selected_features, second.report.selected_features);
    assert_eq!(first.report.booster_eval_history, second.report.booster_eval_history);
}

#[test]
fn test_id_column_does_not_change_results() {
    let engine = TrainEngine::default();
    let with_id = engine
        .fit_csv(ckd_csv(&CsvOptions::default()).as_bytes())
        .unwrap();
    let without_id = engine
        .fit_csv(ckd_csv(&CsvOptions { with_id: false, ..Default::default() }).as_bytes())
        .unwrap();

    assert_eq!(with_id.report.forest.accuracy, without_id.report.forest.accuracy);
    assert_eq!(with_id.report.booster.accuracy, without_id.report.booster.accuracy);
}

#[test]
fn test_report_contents() {
    let trained = TrainEngine::default()
        .fit_csv(ckd_csv(&CsvOptions::default()).as_bytes())
        .unwrap();
    let report = &trained.report;

    assert_eq!(report.n_test, 40);
    assert_eq!(report.n_train, 160);
    assert_eq!(report.feature_names.len(), 24);
    assert_eq!(report.selected_features.len(), 10);
    assert_eq!(report.booster_eval_history.len(), 100);
    for accuracy in [report.forest.accuracy, report.booster.accuracy] {
        assert!((0.0..=1.0).contains(&accuracy));
    }
    // the synthetic classes are well separated
    assert!(report.forest.accuracy > 0.85, "forest accuracy {}", report.forest.accuracy);
    assert!(report.booster.accuracy > 0.85, "booster accuracy {}", report.booster.accuracy);
    assert_eq!(trained.forest.n_trees(), 30);
    assert_eq!(trained.booster.n_rounds(), 100);
}

#[test]
fn test_clean_numeric_input_needs_no_coercion() {
    let csv = ckd_csv(&CsvOptions {
        dirty_numeric: false,
        dirty_labels: false,
        ..Default::default()
    });
    let trained = TrainEngine::default().fit_csv(csv.as_bytes()).unwrap();
    assert!(trained.report.cleaning.medians.contains_key("pcv"));
}

#[test]
fn test_empty_upload_is_ingestion_error() {
    let err = TrainEngine::default().fit_csv(b"").unwrap_err();
    assert!(matches!(err, CkdError::Ingestion(_) | CkdError::ShapeMismatch { .. }));
}
