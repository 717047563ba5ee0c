//! Paired image and label splits of the MNIST dataset.

use crate::config::DatasetConfig;
use crate::error::MnistError;
use crate::idx::{self, ArchiveKind, IdxArchive};
use crate::tensor::{self, IMAGE_COLS, IMAGE_ROWS, NUM_CLASSES, PIXELS_PER_IMAGE};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Which half of the dataset a split comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    Train,
    Test,
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitKind::Train => f.write_str("train"),
            SplitKind::Test => f.write_str("test"),
        }
    }
}

/// Images and their labels, row `i` of `images` belonging to `labels[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    images: Array2<u8>,
    labels: Array1<u8>,
}

/// Creates a progress bar with a consistent style
pub(crate) fn create_progress_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

impl Split {
    /// Pairs an `n x 784` image tensor with `n` labels.
    ///
    /// # Returns
    /// * `Err(MnistError::DataMismatch)` if the counts differ or images are not 784 pixels wide
    pub fn new(images: Array2<u8>, labels: Array1<u8>) -> Result<Self, MnistError> {
        if images.ncols() != PIXELS_PER_IMAGE {
            return Err(MnistError::DataMismatch(format!(
                "Images have {} pixels, expected {}",
                images.ncols(),
                PIXELS_PER_IMAGE
            )));
        }
        if images.nrows() != labels.len() {
            return Err(MnistError::DataMismatch(format!(
                "Number of images ({}) does not match number of labels ({})",
                images.nrows(),
                labels.len()
            )));
        }
        Ok(Self { images, labels })
    }

    /// Pairs a decoded image archive with a decoded label archive.
    pub fn from_archives(images: IdxArchive, labels: IdxArchive) -> Result<Self, MnistError> {
        if images.kind() != ArchiveKind::Images || labels.kind() != ArchiveKind::Labels {
            return Err(MnistError::DataMismatch(format!(
                "Expected an images and a labels archive, got {} and {}",
                images.kind(),
                labels.kind()
            )));
        }
        let count = images.count();
        let images = tensor::flatten_images(images.into_data(), count)?;
        Self::new(images, Array1::from_vec(labels.into_data()))
    }

    /// Loads a split from a pair of gzip-compressed archives.
    pub fn load(
        images_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
    ) -> Result<Self, MnistError> {
        Self::load_with_progress(
            images_path,
            labels_path,
            &ProgressBar::hidden(),
            &ProgressBar::hidden(),
        )
    }

    /// Loads a split, reporting each archive's progress on its own bar.
    ///
    /// # Arguments
    /// * `images_path` - Path to the gzip-compressed images archive
    /// * `labels_path` - Path to the gzip-compressed labels archive
    /// * `images_progress` - Progress bar for the images archive
    /// * `labels_progress` - Progress bar for the labels archive
    ///
    /// # Returns
    /// * `Ok(Split)` with every image paired to its label
    /// * `Err(MnistError::SplitMismatch)` naming both archives if their item counts differ
    /// * `Err(MnistError)` from [`idx::load_with_progress`] if either archive fails to load
    pub fn load_with_progress(
        images_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
        images_progress: &ProgressBar,
        labels_progress: &ProgressBar,
    ) -> Result<Self, MnistError> {
        let (images_path, labels_path) = (images_path.as_ref(), labels_path.as_ref());
        let images = idx::load_with_progress(images_path, ArchiveKind::Images, images_progress)?;
        let labels = idx::load_with_progress(labels_path, ArchiveKind::Labels, labels_progress)?;

        if images.count() != labels.count() {
            return Err(MnistError::SplitMismatch {
                images: images_path.to_path_buf(),
                labels: labels_path.to_path_buf(),
                images_count: images.count(),
                labels_count: labels.count(),
            });
        }
        Self::from_archives(images, labels)
    }

    /// Loads the `kind` split named by `config`, adding its progress bars to `multi_progress`.
    pub fn load_from_config(
        config: &DatasetConfig,
        kind: SplitKind,
        multi_progress: &MultiProgress,
    ) -> Result<Self, MnistError> {
        let style = create_progress_style(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {bytes:>9}/{total_bytes:9} {msg}",
        );
        let images_progress = multi_progress.add(ProgressBar::new(0));
        let labels_progress = multi_progress.add(ProgressBar::new(0));
        images_progress.set_style(style.clone());
        labels_progress.set_style(style);

        let (images_path, labels_path) = config.paths(kind);
        let split =
            Self::load_with_progress(images_path, labels_path, &images_progress, &labels_progress)?;
        log::info!("loaded {} split with {} examples", kind, split.len());
        Ok(split)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Raw pixels, one 784-byte row per image.
    pub fn images(&self) -> ArrayView2<'_, u8> {
        self.images.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, u8> {
        self.labels.view()
    }

    /// The `index`th image as a 28x28 grid.
    pub fn image(&self, index: usize) -> Option<ArrayView2<'_, u8>> {
        if index >= self.len() {
            return None;
        }
        self.images
            .index_axis(Axis(0), index)
            .into_shape_with_order((IMAGE_ROWS, IMAGE_COLS))
            .ok()
    }

    pub fn label(&self, index: usize) -> Option<u8> {
        self.labels.get(index).copied()
    }

    /// All images as an `n x 28 x 28` tensor.
    pub fn grid(&self) -> Result<Array3<u8>, MnistError> {
        tensor::reshape_images(self.images.iter().copied().collect(), self.len())
    }

    /// Normalized pixels, `n x 784`, in `0.0..=1.0`.
    pub fn features(&self) -> Array2<f64> {
        tensor::normalize(&self.images)
    }

    /// One-hot labels, `n x 10`.
    pub fn targets(&self) -> Result<Array2<f64>, MnistError> {
        tensor::one_hot(self.labels.view(), NUM_CLASSES)
    }

    /// Number of occurrences of each label value.
    pub fn label_histogram(&self) -> BTreeMap<u8, usize> {
        let mut histogram = BTreeMap::new();
        for &label in &self.labels {
            *histogram.entry(label).or_insert(0) += 1;
        }
        histogram
    }

    /// A copy of this split in random order, keeping each image with its label.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Split {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        Split {
            images: self.images.select(Axis(0), &indices),
            labels: self.labels.select(Axis(0), &indices),
        }
    }

    /// Consecutive aligned batches of at most `batch_size` items.
    ///
    /// # Returns
    /// * `Err(MnistError::InvalidConfig)` if `batch_size` is zero
    pub fn batches(
        &self,
        batch_size: usize,
    ) -> Result<impl Iterator<Item = (ArrayView2<'_, u8>, ArrayView1<'_, u8>)> + '_, MnistError>
    {
        if batch_size == 0 {
            return Err(MnistError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(self
            .images
            .axis_chunks_iter(Axis(0), batch_size)
            .zip(self.labels.axis_chunks_iter(Axis(0), batch_size)))
    }
}

/// The training and test splits.
#[derive(Debug, Clone, PartialEq)]
pub struct MnistDataset {
    pub train: Split,
    pub test: Split,
}

impl MnistDataset {
    /// Loads all four archives named by `config`, drawing a progress bar per archive.
    pub fn load(config: &DatasetConfig) -> Result<Self, MnistError> {
        let multi_progress = MultiProgress::new();
        let train = Split::load_from_config(config, SplitKind::Train, &multi_progress)?;
        let test = Split::load_from_config(config, SplitKind::Test, &multi_progress)?;
        Ok(Self { train, test })
    }

    pub fn split(&self, kind: SplitKind) -> &Split {
        match kind {
            SplitKind::Train => &self.train,
            SplitKind::Test => &self.test,
        }
    }
}
