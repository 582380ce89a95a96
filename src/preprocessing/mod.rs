//! Data preprocessing module
//!
//! Turns an uploaded CKD table into model-ready matrices:
//! - CSV ingestion onto the canonical 25-column schema
//! - Numeric coercion and median imputation
//! - Label encoding of categorical columns
//! - ANOVA F-score feature selection
//! - Standard scaling

mod config;
mod encoder;
mod imputer;
mod scaler;
pub mod cleaner;
pub mod feature_selection;
pub mod ingest;
pub mod schema;

pub use cleaner::{CleanedTable, Cleaner, CleaningSummary};
pub use config::PreprocessingConfig;
pub use encoder::LabelEncoder;
pub use feature_selection::{f_classif, FeatureSelector};
pub use imputer::{median, Imputer};
pub use ingest::{ColumnSummary, ColumnValues, Ingestor, RawColumn, RawTable};
pub use scaler::{Scaler, ScalerParams};

use serde::{Deserialize, Serialize};

/// Column data type after ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}
