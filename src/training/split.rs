//! Seeded train/test split

use crate::error::{CkdError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Row indices of one train/test partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Feature and label matrices of both partitions
#[derive(Debug, Clone)]
pub struct SplitData {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

impl TrainTestSplit {
    /// Shuffle `0..n_samples` and hold out the first `ceil(test_size * n)` rows
    pub fn new(n_samples: usize, test_size: f64, seed: u64) -> Result<Self> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(CkdError::InvalidInput(format!(
                "test_size must be in (0, 1), got {}",
                test_size
            )));
        }

        let n_test = (test_size * n_samples as f64).ceil() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(CkdError::Training(format!(
                "{} rows cannot be split into non-empty train and test sets",
                n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let train_indices = indices.split_off(n_test);
        Ok(Self {
            train_indices,
            test_indices: indices,
        })
    }

    /// Materialize both partitions
    pub fn apply(&self, x: &Array2<f64>, y: &Array1<f64>) -> SplitData {
        SplitData {
            x_train: x.select(Axis(0), &self.train_indices),
            x_test: x.select(Axis(0), &self.test_indices),
            y_train: y.select(Axis(0), &self.train_indices),
            y_test: y.select(Axis(0), &self.test_indices),
        }
    }
}
