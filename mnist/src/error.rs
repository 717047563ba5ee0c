//! Error types shared by every stage of the loader.

use std::path::PathBuf;
use thiserror::Error;

/// Problems found while decoding the bytes of an IDX archive.
///
/// These carry no path; [`MnistError::Format`] attaches the archive they came from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected a {expected}-byte header, found only {actual} bytes")]
    TruncatedHeader { expected: usize, actual: usize },
    #[error("Invalid magic number for {kind} file: expected {expected:#010x}, got {actual:#010x}")]
    InvalidMagicNumber {
        kind: &'static str,
        expected: u32,
        actual: u32,
    },
    #[error(
        "Invalid image dimensions: expected {expected} pixels, got {actual} pixels ({rows}x{cols})"
    )]
    InvalidDimensions {
        expected: usize,
        actual: usize,
        rows: usize,
        cols: usize,
    },
    #[error("payload of {len} bytes is not a positive multiple of the {item_size}-byte item size")]
    MisalignedPayload { len: usize, item_size: usize },
    #[error("header declares {declared} items but the payload holds {actual}")]
    CountMismatch { declared: usize, actual: usize },
}

/// Errors that can occur while handling MNIST data
#[derive(Debug, Error)]
pub enum MnistError {
    /// The archive could not be opened, read or gzip-decoded
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The decompressed archive does not follow the IDX layout
    #[error("malformed archive {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    /// Images and labels that should pair up do not
    #[error("Data mismatch: {0}")]
    DataMismatch(String),
    /// A flat buffer cannot be viewed with the requested shape
    #[error("cannot shape {actual} bytes as {count} images of {item_size} pixels")]
    Shape {
        count: usize,
        item_size: usize,
        actual: usize,
    },
    /// The images and labels archives of one split hold different numbers of items
    #[error(
        "{} holds {images_count} images but {} holds {labels_count} labels",
        images.display(),
        labels.display()
    )]
    SplitMismatch {
        images: PathBuf,
        labels: PathBuf,
        images_count: usize,
        labels_count: usize,
    },
    /// A label does not name one of the expected classes
    #[error("label {label} at index {index} is outside the range 0..{num_classes}")]
    LabelOutOfRange {
        index: usize,
        label: u8,
        num_classes: usize,
    },
    #[error("failed to load configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of [`MnistError`] for callers that only care which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    Value,
    Config,
}

impl MnistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MnistError::Io { .. } => ErrorKind::Io,
            MnistError::Format { .. }
            | MnistError::DataMismatch(_)
            | MnistError::Shape { .. }
            | MnistError::SplitMismatch { .. } => ErrorKind::Format,
            MnistError::LabelOutOfRange { .. } => ErrorKind::Value,
            MnistError::Config { .. } | MnistError::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MnistError::Io {
            path: path.into(),
            source,
        }
    }
}
