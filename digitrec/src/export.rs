//! Writes dataset images out as PNG files for visual inspection.

use anyhow::{Context, Result};
use image::GrayImage;
use mnist::{Split, SplitKind, IMAGE_COLS, IMAGE_ROWS};
use ndarray::ArrayView2;
use std::path::{Path, PathBuf};

fn save_image(image: ArrayView2<'_, u8>, path: &Path) -> Result<()> {
    let pixels: Vec<u8> = image.iter().copied().collect();
    let img = GrayImage::from_raw(IMAGE_COLS as u32, IMAGE_ROWS as u32, pixels)
        .context("Image buffer does not hold 28x28 pixels")?;
    img.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Saves the first `count` images of `split` into `out_dir`, returning the files written.
///
/// Files are named `<split>_<index>_label<digit>.png`.
pub fn export_images(
    split: &Split,
    kind: SplitKind,
    count: usize,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let count = count.min(split.len());
    let mut written = Vec::with_capacity(count);
    for index in 0..count {
        let (Some(image), Some(label)) = (split.image(index), split.label(index)) else {
            break;
        };
        let path = out_dir.join(format!("{kind}_{index}_label{label}.png"));
        save_image(image, &path)?;
        println!("{kind} image {index} label: {label}");
        written.push(path);
    }
    Ok(written)
}
