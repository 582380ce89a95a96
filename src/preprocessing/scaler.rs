//! Feature standardization

use crate::error::{CkdError, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Parameters for one fitted column
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScalerParams {
    pub center: f64, // mean
    pub scale: f64,  // population std, 1.0 for constant columns
}

/// Standard scaler: (x - mean) / std with statistics from the fitting matrix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scaler {
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit per-column mean and standard deviation
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(CkdError::Preprocessing("cannot fit scaler on zero rows".to_string()));
        }

        self.params = x
            .axis_iter(Axis(1))
            .map(|col| {
                let mean = col.mean().unwrap_or(0.0);
                let std = col.std(0.0);
                ScalerParams {
                    center: mean,
                    scale: if std == 0.0 || !std.is_finite() { 1.0 } else { std },
                }
            })
            .collect();

        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the fitted parameters to a matrix with the same column count
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(CkdError::ModelNotFitted);
        }
        if x.ncols() != self.params.len() {
            return Err(CkdError::shape(
                format!("{} features", self.params.len()),
                format!("{} features", x.ncols()),
            ));
        }

        let mut result = x.clone();
        for (mut col, params) in result.axis_iter_mut(Axis(1)).zip(&self.params) {
            col.mapv_inplace(|v| (v - params.center) / params.scale);
        }
        Ok(result)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn params(&self) -> &[ScalerParams] {
        &self.params
    }
}
