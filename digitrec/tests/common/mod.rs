use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;

pub fn write_gz(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?;
    Ok(())
}

/// Writes a gzip-compressed IDX images archive where image `i` is filled with the value `i * 10`.
pub fn write_images(path: &Path, count: u32) -> std::io::Result<()> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x0803u32.to_be_bytes());
    bytes.extend_from_slice(&count.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    for i in 0..count {
        bytes.extend(std::iter::repeat((i * 10) as u8).take(784));
    }
    write_gz(path, &bytes)
}

pub fn write_labels(path: &Path, labels: &[u8]) -> std::io::Result<()> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x0801u32.to_be_bytes());
    bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    bytes.extend_from_slice(labels);
    write_gz(path, &bytes)
}

/// Writes both splits under their standard archive names.
pub fn write_dataset(dir: &Path, train_labels: &[u8], test_labels: &[u8]) -> std::io::Result<()> {
    write_images(
        &dir.join("train-images-idx3-ubyte.gz"),
        train_labels.len() as u32,
    )?;
    write_labels(&dir.join("train-labels-idx1-ubyte.gz"), train_labels)?;
    write_images(
        &dir.join("t10k-images-idx3-ubyte.gz"),
        test_labels.len() as u32,
    )?;
    write_labels(&dir.join("t10k-labels-idx1-ubyte.gz"), test_labels)?;
    Ok(())
}
