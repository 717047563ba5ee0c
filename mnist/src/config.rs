//! Where the four dataset archives live.

use crate::dataset::SplitKind;
use crate::error::MnistError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "MNIST_DATA_DIR";

/// Location of the MNIST archives. Fields missing from a JSON file take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub data_dir: PathBuf,
    pub train_images: String,
    pub train_labels: String,
    pub test_images: String,
    pub test_labels: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            train_images: "train-images-idx3-ubyte.gz".to_string(),
            train_labels: "train-labels-idx1-ubyte.gz".to_string(),
            test_images: "t10k-images-idx3-ubyte.gz".to_string(),
            test_labels: "t10k-labels-idx1-ubyte.gz".to_string(),
        }
    }
}

impl DatasetConfig {
    /// Reads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MnistError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| MnistError::io(path, e))?;
        serde_json::from_str(&json).map_err(|source| MnistError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The defaults, with `data_dir` taken from `MNIST_DATA_DIR` when it is set.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => config.with_data_dir(dir),
            _ => config,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Paths of the images and labels archives for `kind`.
    ///
    /// # Arguments
    /// * `kind` - The split whose archives are wanted
    ///
    /// # Returns
    /// * `(images_path, labels_path)`, both joined onto `data_dir`
    pub fn paths(&self, kind: SplitKind) -> (PathBuf, PathBuf) {
        let (images, labels) = match kind {
            SplitKind::Train => (&self.train_images, &self.train_labels),
            SplitKind::Test => (&self.test_images, &self.test_labels),
        };
        (self.data_dir.join(images), self.data_dir.join(labels))
    }
}
