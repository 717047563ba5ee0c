//! IDX archive reader for the MNIST dataset.
//!
//! MNIST ships as four gzip-compressed IDX files. Each starts with a big-endian
//! header (magic number, item count and, for images, the row and column counts)
//! followed by one unsigned byte per pixel or label. This module decompresses an
//! archive, checks the header against the payload and hands back the raw bytes
//! in file order.

use crate::error::{FormatError, MnistError};
use crate::tensor::{IMAGE_COLS, IMAGE_ROWS, PIXELS_PER_IMAGE};
use flate2::read::GzDecoder;
use indicatif::ProgressBar;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const IMAGE_MAGIC_NUMBER: u32 = 0x0000_0803;
pub const LABEL_MAGIC_NUMBER: u32 = 0x0000_0801;

/// Which of the two IDX layouts an archive uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Images,
    Labels,
}

impl ArchiveKind {
    pub const fn magic(self) -> u32 {
        match self {
            ArchiveKind::Images => IMAGE_MAGIC_NUMBER,
            ArchiveKind::Labels => LABEL_MAGIC_NUMBER,
        }
    }

    /// Number of bytes preceding the payload.
    pub const fn header_size(self) -> usize {
        match self {
            ArchiveKind::Images => 16,
            ArchiveKind::Labels => 8,
        }
    }

    /// Number of payload bytes making up one item.
    pub const fn item_size(self) -> usize {
        match self {
            ArchiveKind::Images => PIXELS_PER_IMAGE,
            ArchiveKind::Labels => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ArchiveKind::Images => "images",
            ArchiveKind::Labels => "labels",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header fields of an IDX archive. Label archives report 1x1 items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdxHeader {
    pub magic: u32,
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
}

/// A decoded archive: its header and the payload bytes in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxArchive {
    kind: ArchiveKind,
    header: IdxHeader,
    data: Vec<u8>,
}

impl IdxArchive {
    pub fn kind(&self) -> ArchiveKind {
        self.kind
    }

    pub fn header(&self) -> &IdxHeader {
        &self.header
    }

    /// Number of items, equal to `data().len() / kind().item_size()`.
    pub fn count(&self) -> usize {
        self.header.count
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Reads a big-endian `u32` at `offset`. The caller has checked the header length.
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buffer = [0u8; 4];
    buffer.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_be_bytes(buffer)
}

fn parse_header(bytes: &[u8], kind: ArchiveKind) -> Result<IdxHeader, FormatError> {
    let header_size = kind.header_size();
    if bytes.len() < header_size {
        return Err(FormatError::TruncatedHeader {
            expected: header_size,
            actual: bytes.len(),
        });
    }

    let magic = read_u32(bytes, 0);
    if magic != kind.magic() {
        return Err(FormatError::InvalidMagicNumber {
            kind: kind.name(),
            expected: kind.magic(),
            actual: magic,
        });
    }

    let count = read_u32(bytes, 4) as usize;
    let (rows, cols) = match kind {
        ArchiveKind::Images => (read_u32(bytes, 8) as usize, read_u32(bytes, 12) as usize),
        ArchiveKind::Labels => (1, 1),
    };

    if kind == ArchiveKind::Images && (rows, cols) != (IMAGE_ROWS, IMAGE_COLS) {
        return Err(FormatError::InvalidDimensions {
            expected: PIXELS_PER_IMAGE,
            actual: rows * cols,
            rows,
            cols,
        });
    }

    Ok(IdxHeader {
        magic,
        count,
        rows,
        cols,
    })
}

/// Decodes an already decompressed IDX archive.
///
/// The payload must be a positive multiple of the item size and must hold exactly
/// the number of items the header declares; nothing is silently truncated.
pub fn decode(bytes: &[u8], kind: ArchiveKind) -> Result<IdxArchive, FormatError> {
    let header = parse_header(bytes, kind)?;
    let payload = &bytes[kind.header_size()..];
    let item_size = kind.item_size();

    if payload.is_empty() || payload.len() % item_size != 0 {
        return Err(FormatError::MisalignedPayload {
            len: payload.len(),
            item_size,
        });
    }

    let items = payload.len() / item_size;
    if items != header.count {
        return Err(FormatError::CountMismatch {
            declared: header.count,
            actual: items,
        });
    }

    Ok(IdxArchive {
        kind,
        header,
        data: payload.to_vec(),
    })
}

/// Reads and decodes the gzip-compressed IDX archive at `path`.
///
/// # Errors
/// * [`MnistError::Io`] if the file is missing, unreadable or not valid gzip
/// * [`MnistError::Format`] if the decompressed bytes break the IDX layout
pub fn load(path: impl AsRef<Path>, kind: ArchiveKind) -> Result<IdxArchive, MnistError> {
    load_with_progress(path, kind, &ProgressBar::hidden())
}

/// Like [`load`], advancing `progress` by the compressed bytes consumed.
///
/// # Arguments
/// * `path` - Path to the gzip-compressed archive
/// * `kind` - Whether the archive holds images or labels
/// * `progress` - Bar whose length is set to the compressed file size
///
/// # Returns
/// * `Ok(IdxArchive)` holding the validated header and payload
/// * [`MnistError::Io`] if the file cannot be opened, read or gunzipped
/// * [`MnistError::Format`] if the decompressed bytes break the IDX layout
pub fn load_with_progress(
    path: impl AsRef<Path>,
    kind: ArchiveKind,
    progress: &ProgressBar,
) -> Result<IdxArchive, MnistError> {
    let path = path.as_ref();
    let bytes = read_gzip(path, progress)?;

    let archive = decode(&bytes, kind).map_err(|source| MnistError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "decoded {} {} from {} ({} bytes)",
        archive.count(),
        kind,
        path.display(),
        bytes.len()
    );
    progress.finish_with_message(format!("{} {kind} loaded", archive.count()));
    Ok(archive)
}

fn read_gzip(path: &Path, progress: &ProgressBar) -> Result<Vec<u8>, MnistError> {
    let file = File::open(path).map_err(|e| MnistError::io(path, e))?;
    let compressed_len = file.metadata().map_err(|e| MnistError::io(path, e))?.len();
    progress.set_length(compressed_len);
    progress.set_message(format!("Loading {}...", path.display()));

    let mut decoder = GzDecoder::new(progress.wrap_read(file));
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| MnistError::io(path, e))?;
    Ok(bytes)
}
