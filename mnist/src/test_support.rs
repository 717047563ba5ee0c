//! Helpers for writing small IDX archives in tests.

use crate::idx::ArchiveKind;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;

/// Builds the uncompressed bytes of an IDX archive.
pub(crate) fn idx_bytes(kind: ArchiveKind, count: u32, data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(kind.header_size() + data.len());
    bytes.extend_from_slice(&kind.magic().to_be_bytes());
    bytes.extend_from_slice(&count.to_be_bytes());
    if kind == ArchiveKind::Images {
        // Add image dimensions (28x28)
        bytes.extend_from_slice(&28u32.to_be_bytes());
        bytes.extend_from_slice(&28u32.to_be_bytes());
    }
    bytes.extend_from_slice(data);
    bytes
}

pub(crate) fn write_gz(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?;
    Ok(())
}

pub(crate) fn write_archive(
    path: &Path,
    kind: ArchiveKind,
    count: u32,
    data: &[u8],
) -> std::io::Result<()> {
    write_gz(path, &idx_bytes(kind, count, data))
}

/// `count` images where every pixel of image `i` has the value `i`.
pub(crate) fn striped_images(count: usize) -> Vec<u8> {
    (0..count)
        .flat_map(|i| std::iter::repeat(i as u8).take(784))
        .collect()
}
