//! CSV ingestion into the raw CKD table

use crate::error::{CkdError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::io::Cursor;
use tracing::debug;

use super::schema::{is_id_column, CANONICAL_COLUMNS, MISSING_TOKENS};
use super::ColumnType;

/// Cell values of a single column as inferred by the CSV reader
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnValues::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValues::Numeric(_) => ColumnType::Numeric,
            ColumnValues::Text(_) => ColumnType::Categorical,
        }
    }
}

/// A named raw column
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub values: ColumnValues,
}

/// Uploaded table after id removal and canonical renaming
#[derive(Debug, Clone)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    n_rows: usize,
}

/// Per-column summary used by the `info` command
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    pub count: usize,
    pub null_count: usize,
    pub unique_count: usize,
}

impl RawTable {
    /// Build a table from already-named columns; all columns must have the same length
    pub fn new(columns: Vec<RawColumn>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(CkdError::shape(
                format!("{} rows", n_rows),
                format!("{} rows in column `{}`", bad.values.len(), bad.name),
            ));
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<RawColumn> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn summary(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .map(|col| {
                let unique_count = match &col.values {
                    ColumnValues::Numeric(v) => {
                        let mut bits: Vec<u64> = v.iter().flatten().map(|x| x.to_bits()).collect();
                        bits.sort_unstable();
                        bits.dedup();
                        bits.len()
                    }
                    ColumnValues::Text(v) => {
                        let mut vals: Vec<&str> = v.iter().flatten().map(|s| s.as_str()).collect();
                        vals.sort_unstable();
                        vals.dedup();
                        vals.len()
                    }
                };
                ColumnSummary {
                    name: col.name.clone(),
                    dtype: col.values.column_type(),
                    count: col.values.len(),
                    null_count: col.values.null_count(),
                    unique_count,
                }
            })
            .collect()
    }
}

/// Parses uploads and maps them onto the canonical schema
#[derive(Debug, Clone, Default)]
pub struct Ingestor;

impl Ingestor {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV bytes, drop the id column, rename to the canonical schema
    pub fn read_csv(&self, bytes: &[u8]) -> Result<RawTable> {
        let null_values: Vec<PlSmallStr> = MISSING_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .map_parse_options(|opts| opts.with_null_values(Some(NullValues::AllColumns(null_values.clone()))))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        debug!(rows = df.height(), columns = df.width(), "Parsed CSV upload");
        self.from_dataframe(&df)
    }

    /// Map a parsed frame onto the canonical schema
    pub fn from_dataframe(&self, df: &DataFrame) -> Result<RawTable> {
        let kept: Vec<&Column> = df
            .get_columns()
            .iter()
            .filter(|c| !is_id_column(c.name().as_str()))
            .collect();

        if kept.len() != CANONICAL_COLUMNS.len() {
            return Err(CkdError::shape(
                format!("{} columns", CANONICAL_COLUMNS.len()),
                format!("{} columns", kept.len()),
            ));
        }

        let columns = kept
            .into_iter()
            .zip(CANONICAL_COLUMNS)
            .map(|(column, name)| {
                Ok(RawColumn {
                    name: name.to_string(),
                    values: Self::column_values(column.as_materialized_series())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        RawTable::new(columns)
    }

    fn column_values(series: &Series) -> Result<ColumnValues> {
        match series.dtype() {
            DataType::String => {
                let values = series
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect();
                Ok(ColumnValues::Text(values))
            }
            _ => {
                let cast = series.cast(&DataType::Float64)?;
                Ok(ColumnValues::Numeric(cast.f64()?.into_iter().collect()))
            }
        }
    }
}
