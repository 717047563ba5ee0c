//! Module for standardizing MNIST features.
//!
//! Standardization subtracts the mean and divides by the standard deviation of
//! every pixel in a reference set, usually the normalized training images. The
//! parameters serialize so the same transform can be applied at test time.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardizationParams {
    pub mean: f64,
    pub std_dev: f64,
}

impl StandardizationParams {
    /// Computes the population mean and standard deviation over all values.
    ///
    /// An empty input gives a mean of 0 and a standard deviation of 1.
    pub fn fit(features: ArrayView2<'_, f64>) -> Self {
        let Some(mean) = features.mean() else {
            return Self {
                mean: 0.0,
                std_dev: 1.0,
            };
        };
        let std_dev = features.std(0.0);

        Self { mean, std_dev }
    }

    /// Standardization formula: (x - mean) / std_dev
    pub fn standardize(&self, features: &Array2<f64>) -> Array2<f64> {
        // Avoid division by zero
        let std_dev = if self.std_dev == 0.0 { 1.0 } else { self.std_dev };
        features.mapv(|x| (x - self.mean) / std_dev)
    }
}
