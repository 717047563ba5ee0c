pub mod config;
pub mod dataset;
pub mod error;
pub mod idx;
pub mod learner;
pub mod standardize;
pub mod tensor;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::config::DatasetConfig;
pub use crate::dataset::{MnistDataset, Split, SplitKind};
pub use crate::error::{ErrorKind, FormatError, MnistError};
pub use crate::idx::{decode, load, load_with_progress, ArchiveKind, IdxArchive, IdxHeader};
pub use crate::learner::{
    fit_and_evaluate, Evaluation, Learner, PreparedSplit, TrainingConfig, TrainingData,
};
pub use crate::standardize::StandardizationParams;
pub use crate::tensor::{
    class_of, flatten, flatten_images, normalize, one_hot, reshape_images, IMAGE_COLS,
    IMAGE_ROWS, NUM_CLASSES, PIXELS_PER_IMAGE,
};
