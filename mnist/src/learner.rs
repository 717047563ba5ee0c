//! The contract between the loader and whatever framework trains on its tensors.
//!
//! This crate does not train anything. It prepares tensors in the shape and range
//! a dense classifier expects and hands them to a [`Learner`].

use crate::dataset::{MnistDataset, Split};
use crate::error::MnistError;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Parameters passed through to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Size of each training batch
    pub batch_size: usize,
    /// Number of passes over the training split
    pub epochs: u32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: 128,
            epochs: 10,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), MnistError> {
        if self.batch_size == 0 {
            return Err(MnistError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(MnistError::InvalidConfig(
                "epochs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Normalized images (`n x 784`) paired with one-hot labels (`n x 10`).
#[derive(Debug, Clone, Copy)]
pub struct TrainingData<'a> {
    pub images: ArrayView2<'a, f64>,
    pub labels: ArrayView2<'a, f64>,
}

impl TrainingData<'_> {
    pub fn len(&self) -> usize {
        self.images.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.images.nrows() == 0
    }
}

/// Owned tensors backing a [`TrainingData`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSplit {
    pub images: Array2<f64>,
    pub labels: Array2<f64>,
}

impl PreparedSplit {
    pub fn view(&self) -> TrainingData<'_> {
        TrainingData {
            images: self.images.view(),
            labels: self.labels.view(),
        }
    }
}

impl Split {
    /// Normalizes the images and one-hot encodes the labels.
    pub fn prepare(&self) -> Result<PreparedSplit, MnistError> {
        Ok(PreparedSplit {
            images: self.features(),
            labels: self.targets()?,
        })
    }
}

/// Loss and accuracy reported by a learner on a labelled split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
}

/// A model-training component consuming prepared tensors.
pub trait Learner {
    type Model;
    type Error: From<MnistError>;

    fn train(
        &mut self,
        train: TrainingData<'_>,
        validation: Option<TrainingData<'_>>,
        config: &TrainingConfig,
    ) -> Result<Self::Model, Self::Error>;

    fn evaluate(
        &self,
        model: &Self::Model,
        data: TrainingData<'_>,
    ) -> Result<Evaluation, Self::Error>;
}

/// Trains on the training split, validating against the test split, then evaluates on it.
pub fn fit_and_evaluate<L: Learner>(
    learner: &mut L,
    dataset: &MnistDataset,
    config: &TrainingConfig,
) -> Result<(L::Model, Evaluation), L::Error> {
    config.validate()?;
    let train = dataset.train.prepare()?;
    let test = dataset.test.prepare()?;

    log::info!(
        "training on {} examples (batch size {}, {} epochs)",
        train.images.nrows(),
        config.batch_size,
        config.epochs
    );
    let model = learner.train(train.view(), Some(test.view()), config)?;
    let evaluation = learner.evaluate(&model, test.view())?;
    log::info!(
        "test loss {:.4}, accuracy {:.2}%",
        evaluation.loss,
        evaluation.accuracy * 100.0
    );

    Ok((model, evaluation))
}
