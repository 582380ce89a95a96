//! Column coercion, imputation and categorical encoding
//!
//! The pass runs in a fixed order: coerce the configured columns to numbers,
//! fill numeric gaps with per-column medians, then label-encode every text
//! column. Text gaps are not filled; they take their own code after the sorted
//! classes. Fill values and encoders are fitted fresh on every call.

use crate::error::{CkdError, Result};
use ndarray::{Array1, Array2};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::encoder::LabelEncoder;
use super::imputer::Imputer;
use super::ingest::{ColumnValues, RawColumn, RawTable};
use super::PreprocessingConfig;

/// Fully numeric table with no missing values
#[derive(Debug, Clone)]
pub struct CleanedTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
    /// Median used per numeric column
    pub medians: BTreeMap<String, f64>,
    /// Encoder fitted per text column
    pub encoders: BTreeMap<String, LabelEncoder>,
    /// Number of numeric cells filled per column
    pub imputed_counts: BTreeMap<String, usize>,
}

/// Per-run cleaning statistics exposed in training reports
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningSummary {
    pub medians: BTreeMap<String, f64>,
    pub categories: BTreeMap<String, Vec<String>>,
    pub imputed_cells: usize,
}

impl CleanedTable {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Split into a row-major feature matrix, the label vector and the feature names
    pub fn features_and_label(&self, label: &str) -> Result<(Array2<f64>, Array1<f64>, Vec<String>)> {
        let label_idx = self
            .names
            .iter()
            .position(|n| n == label)
            .ok_or_else(|| CkdError::ColumnNotFound(label.to_string()))?;

        let feature_idx: Vec<usize> = (0..self.names.len()).filter(|&i| i != label_idx).collect();
        let feature_names = feature_idx.iter().map(|&i| self.names[i].clone()).collect();

        let cols: Vec<&[f64]> = feature_idx.iter().map(|&i| self.columns[i].as_slice()).collect();
        let x = Array2::from_shape_fn((self.n_rows, cols.len()), |(r, c)| cols[c][r]);
        let y = Array1::from_vec(self.columns[label_idx].clone());

        Ok((x, y, feature_names))
    }

    pub fn summary(&self) -> CleaningSummary {
        CleaningSummary {
            medians: self.medians.clone(),
            categories: self
                .encoders
                .iter()
                .map(|(name, enc)| (name.clone(), enc.classes().to_vec()))
                .collect(),
            imputed_cells: self.imputed_counts.values().sum(),
        }
    }
}

/// Runs the cleaning pass over a raw table
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: PreprocessingConfig,
}

impl Cleaner {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    pub fn clean(&self, table: RawTable) -> Result<CleanedTable> {
        let n_rows = table.n_rows();
        let mut columns = table.into_columns();

        for column in columns.iter_mut() {
            if self.config.coerce_columns.iter().any(|c| *c == column.name) {
                Self::coerce_numeric(column);
            }
        }

        let mut medians = BTreeMap::new();
        let mut imputed_counts = BTreeMap::new();

        for column in columns.iter_mut() {
            let ColumnValues::Numeric(cells) = &mut column.values else {
                continue;
            };
            let mut imputer = Imputer::new();
            let filled = imputer
                .fit_transform(cells)
                .map_err(|e| Self::column_error(&column.name, e))?;
            if let Some(m) = imputer.fill_value() {
                medians.insert(column.name.clone(), m);
            }
            if filled > 0 {
                imputed_counts.insert(column.name.clone(), filled);
            }
        }

        let mut encoders = BTreeMap::new();
        let mut names = Vec::with_capacity(columns.len());
        let mut numeric = Vec::with_capacity(columns.len());

        for column in columns {
            let RawColumn { name, values } = column;
            let codes = match values {
                ColumnValues::Numeric(cells) => cells.into_iter().flatten().collect(),
                ColumnValues::Text(cells) => {
                    let (encoder, codes) = self.encode_text(&name, cells)?;
                    encoders.insert(name.clone(), encoder);
                    codes
                }
            };
            names.push(name);
            numeric.push(codes);
        }

        Ok(CleanedTable {
            names,
            columns: numeric,
            n_rows,
            medians,
            encoders,
            imputed_counts,
        })
    }

    /// Trim and label-encode one text column; missing cells keep their own code
    fn encode_text(&self, name: &str, mut cells: Vec<Option<String>>) -> Result<(LabelEncoder, Vec<f64>)> {
        if self.config.trim_text {
            for cell in cells.iter_mut().flatten() {
                let trimmed = cell.trim();
                if trimmed.len() != cell.len() {
                    *cell = trimmed.to_string();
                }
            }
        }

        let mut encoder = LabelEncoder::new();
        let codes = encoder.fit_transform(&cells)?;
        debug!(
            column = %name,
            classes = encoder.classes().len(),
            missing = cells.iter().filter(|c| c.is_none()).count(),
            "Encoded categorical column"
        );
        Ok((encoder, codes))
    }

    /// Parse text cells as numbers; unparsable cells become missing
    fn coerce_numeric(column: &mut RawColumn) {
        if let ColumnValues::Text(cells) = &column.values {
            let parsed: Vec<Option<f64>> = cells
                .iter()
                .map(|c| c.as_deref().and_then(|s| s.trim().parse::<f64>().ok()))
                .collect();
            debug!(
                column = %column.name,
                invalid = parsed.iter().zip(cells).filter(|(p, c)| p.is_none() && c.is_some()).count(),
                "Coerced column to numeric"
            );
            column.values = ColumnValues::Numeric(parsed);
        }
    }

    fn column_error(name: &str, err: CkdError) -> CkdError {
        match err {
            CkdError::Preprocessing(msg) => CkdError::Preprocessing(format!("column `{}`: {}", name, msg)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(values: &[Option<&str>]) -> ColumnValues {
        ColumnValues::Text(values.iter().map(|v| v.map(str::to_string)).collect())
    }

    fn table() -> RawTable {
        RawTable::new(vec![
            RawColumn {
                name: "pcv".to_string(),
                values: text(&[Some("44"), Some("\t?"), Some("38"), None, Some("41")]),
            },
            RawColumn {
                name: "bp".to_string(),
                values: ColumnValues::Numeric(vec![Some(80.0), None, Some(70.0), Some(90.0), Some(60.0)]),
            },
            RawColumn {
                name: "htn".to_string(),
                values: text(&[Some("yes"), Some("no"), None, Some(" yes"), Some("no")]),
            },
            RawColumn {
                name: "classification".to_string(),
                values: text(&[Some("ckd"), Some("ckd\t"), Some("notckd"), Some("notckd"), Some("ckd")]),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_coerce_and_median_fill() {
        let cleaned = Cleaner::default().clean(table()).unwrap();
        // non-missing pcv: 44, 38, 41 -> median 41
        assert_eq!(cleaned.medians["pcv"], 41.0);
        assert_eq!(cleaned.column("pcv").unwrap(), &[44.0, 41.0, 38.0, 41.0, 41.0]);
        // non-missing bp: 80, 70, 90, 60 -> median 75
        assert_eq!(cleaned.column("bp").unwrap()[1], 75.0);
        assert_eq!(cleaned.imputed_counts["pcv"], 2);
    }

    #[test]
    fn test_text_columns_encoded_after_trim() {
        let cleaned = Cleaner::default().clean(table()).unwrap();
        assert_eq!(cleaned.column("classification").unwrap(), &[0.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(cleaned.encoders["htn"].classes(), &["no".to_string(), "yes".to_string()]);
        // the missing htn cell is coded after "no" and "yes"
        assert_eq!(cleaned.column("htn").unwrap(), &[1.0, 0.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_text_cells_are_not_imputed() {
        let table = RawTable::new(vec![RawColumn {
            name: "htn".to_string(),
            values: text(&[Some("yes"), Some("no"), None, Some("no")]),
        }])
        .unwrap();
        let cleaned = Cleaner::default().clean(table).unwrap();
        assert_eq!(cleaned.column("htn").unwrap(), &[1.0, 0.0, 2.0, 0.0]);
        assert!(cleaned.imputed_counts.get("htn").is_none());
        assert_eq!(cleaned.summary().imputed_cells, 0);
    }

    #[test]
    fn test_without_trim_keeps_variants() {
        let config = PreprocessingConfig::default().with_trim_text(false);
        let cleaned = Cleaner::new(config).clean(table()).unwrap();
        assert_eq!(cleaned.encoders["classification"].classes().len(), 3);
    }

    #[test]
    fn test_uncoerced_text_column_is_encoded() {
        let config = PreprocessingConfig::default().with_coerce_columns(Vec::<String>::new());
        let cleaned = Cleaner::new(config).clean(table()).unwrap();
        assert!(cleaned.encoders.contains_key("pcv"));
        assert!(cleaned.medians.get("pcv").is_none());
    }

    #[test]
    fn test_features_and_label() {
        let cleaned = Cleaner::default().clean(table()).unwrap();
        let (x, y, names) = cleaned.features_and_label("classification").unwrap();
        assert_eq!(x.dim(), (5, 3));
        assert_eq!(y.len(), 5);
        assert_eq!(names, vec!["pcv", "bp", "htn"]);
        assert!(cleaned.features_and_label("missing").is_err());
    }

    #[test]
    fn test_all_missing_numeric_column_fails() {
        let table = RawTable::new(vec![RawColumn {
            name: "wc".to_string(),
            values: text(&[Some("?"), None]),
        }])
        .unwrap();
        let err = Cleaner::default().clean(table).unwrap_err();
        assert!(err.to_string().contains("wc"));
    }
}
