//! Preprocessing configuration

use serde::{Deserialize, Serialize};

use super::schema::COERCED_COLUMNS;

/// Configuration for the cleaning pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Columns parsed as numbers, unparsable cells becoming missing
    pub coerce_columns: Vec<String>,

    /// Trim surrounding whitespace from text cells before encoding
    pub trim_text: bool,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            coerce_columns: COERCED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            trim_text: true,
        }
    }
}

impl PreprocessingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the coerced column list
    pub fn with_coerce_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.coerce_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to toggle whitespace trimming
    pub fn with_trim_text(mut self, trim: bool) -> Self {
        self.trim_text = trim;
        self
    }
}
