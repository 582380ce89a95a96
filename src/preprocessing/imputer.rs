//! Missing value imputation for numeric columns

use crate::error::{CkdError, Result};

/// Single-column median imputer, fitted and applied within one cleaning pass
#[derive(Debug, Clone, Default)]
pub struct Imputer {
    fill: Option<f64>,
}

impl Imputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the median of the non-missing cells
    pub fn fit(&mut self, cells: &[Option<f64>]) -> Result<&mut Self> {
        let present: Vec<f64> = cells.iter().flatten().copied().collect();
        let fill = median(&present).ok_or_else(|| {
            CkdError::Preprocessing("column has no values to impute from".to_string())
        })?;
        self.fill = Some(fill);
        Ok(self)
    }

    /// Fill missing cells in place, returning how many were filled
    pub fn transform(&self, cells: &mut [Option<f64>]) -> Result<usize> {
        let fill = self.fill.ok_or(CkdError::ModelNotFitted)?;
        let mut filled = 0;
        for cell in cells.iter_mut().filter(|c| c.is_none()) {
            *cell = Some(fill);
            filled += 1;
        }
        Ok(filled)
    }

    pub fn fit_transform(&mut self, cells: &mut [Option<f64>]) -> Result<usize> {
        self.fit(cells)?;
        self.transform(cells)
    }

    pub fn fill_value(&self) -> Option<f64> {
        self.fill
    }
}

/// Median with the even-length average convention
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
