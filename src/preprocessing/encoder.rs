//! Categorical label encoding

use crate::error::{CkdError, Result};
use serde::{Deserialize, Serialize};

/// Maps distinct string values, sorted, to codes 0..N-1.
///
/// Missing cells are not a class of their own in `classes`; they encode to N,
/// one past the last string class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit<S: AsRef<str>>(&mut self, cells: &[Option<S>]) -> &mut Self {
        let mut classes: Vec<String> = cells
            .iter()
            .flatten()
            .map(|v| v.as_ref().to_string())
            .collect();
        classes.sort();
        classes.dedup();
        self.classes = classes;
        self
    }

    pub fn transform<S: AsRef<str>>(&self, cells: &[Option<S>]) -> Result<Vec<f64>> {
        cells
            .iter()
            .map(|cell| match cell {
                None => Ok(self.missing_code()),
                Some(v) => {
                    let v = v.as_ref();
                    self.classes
                        .binary_search_by(|c| c.as_str().cmp(v))
                        .map(|idx| idx as f64)
                        .map_err(|_| CkdError::InvalidInput(format!("unseen category `{}`", v)))
                }
            })
            .collect()
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, cells: &[Option<S>]) -> Result<Vec<f64>> {
        self.fit(cells);
        self.transform(cells)
    }

    /// Fitted classes; the position of each class is its code
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code given to missing cells
    pub fn missing_code(&self) -> f64 {
        self.classes.len() as f64
    }
}
