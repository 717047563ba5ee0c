//! Pure shaping steps from raw archive bytes to model-ready tensors.
//!
//! None of these functions mutate their input: reshaping takes ownership of the
//! buffer and reinterprets it without copying, normalization and encoding build
//! new arrays.

use crate::error::MnistError;
use ndarray::{Array, Array2, Array3, ArrayBase, ArrayView1, Data, Dimension};

pub const IMAGE_ROWS: usize = 28;
pub const IMAGE_COLS: usize = 28;
pub const PIXELS_PER_IMAGE: usize = IMAGE_ROWS * IMAGE_COLS;
pub const NUM_CLASSES: usize = 10;

fn check_image_buffer(flat: &[u8], count: usize) -> Result<(), MnistError> {
    count
        .checked_mul(PIXELS_PER_IMAGE)
        .filter(|&expected| expected == flat.len())
        .map(|_| ())
        .ok_or_else(|| shape_error(flat.len(), count))
}

fn shape_error(actual: usize, count: usize) -> MnistError {
    MnistError::Shape {
        count,
        item_size: PIXELS_PER_IMAGE,
        actual,
    }
}

/// Views `count` images as a `count x 28 x 28` tensor.
pub fn reshape_images(flat: Vec<u8>, count: usize) -> Result<Array3<u8>, MnistError> {
    check_image_buffer(&flat, count)?;
    let actual = flat.len();
    Array3::from_shape_vec((count, IMAGE_ROWS, IMAGE_COLS), flat)
        .map_err(|_| shape_error(actual, count))
}

/// Views `count` images as a `count x 784` tensor, one row per image.
pub fn flatten_images(flat: Vec<u8>, count: usize) -> Result<Array2<u8>, MnistError> {
    check_image_buffer(&flat, count)?;
    let actual = flat.len();
    Array2::from_shape_vec((count, PIXELS_PER_IMAGE), flat)
        .map_err(|_| shape_error(actual, count))
}

/// Inverse of [`reshape_images`]: the pixels in logical (row-major) order.
pub fn flatten(images: &Array3<u8>) -> Vec<u8> {
    images.iter().copied().collect()
}

/// Scales pixel intensities from `0..=255` to `0.0..=1.0`.
pub fn normalize<S, D>(images: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = u8>,
    D: Dimension,
{
    images.mapv(|pixel| f64::from(pixel) / 255.0)
}

/// One-hot encodes `labels` into a `len x num_classes` tensor of zeros and ones.
///
/// # Errors
/// [`MnistError::LabelOutOfRange`] for the first label that is not below `num_classes`.
pub fn one_hot(labels: ArrayView1<'_, u8>, num_classes: usize) -> Result<Array2<f64>, MnistError> {
    let mut encoded = Array2::zeros((labels.len(), num_classes));
    for (index, (&label, mut row)) in labels.iter().zip(encoded.rows_mut()).enumerate() {
        let class = usize::from(label);
        if class >= num_classes {
            return Err(MnistError::LabelOutOfRange {
                index,
                label,
                num_classes,
            });
        }
        row[class] = 1.0;
    }
    Ok(encoded)
}

/// Gets the class with the highest score, the inverse of [`one_hot`] for one row.
pub fn class_of(row: ArrayView1<'_, f64>) -> Option<usize> {
    row.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::striped_images;
    use approx::assert_relative_eq;
    use ndarray::{array, Axis};

    #[test]
    fn test_reshape_images_shape() {
        let images = reshape_images(striped_images(3), 3).unwrap();
        assert_eq!(images.shape(), &[3, 28, 28]);
        assert_eq!(images[[2, 27, 27]], 2);
        assert_eq!(images[[1, 0, 0]], 1);
    }

    #[test]
    fn test_reshape_is_lossless() {
        let flat: Vec<u8> = (0..2 * 784).map(|i| (i % 251) as u8).collect();
        let images = reshape_images(flat.clone(), 2).unwrap();

        assert_eq!(images[[0, 1, 0]], flat[28]);
        assert_eq!(flatten(&images), flat);
    }

    #[test]
    fn test_flatten_images_rows() {
        let images = flatten_images(striped_images(4), 4).unwrap();
        assert_eq!(images.dim(), (4, 784));
        assert!(images.index_axis(Axis(0), 3).iter().all(|&p| p == 3));
    }

    #[test]
    fn test_reshape_rejects_wrong_length() {
        let error = reshape_images(vec![0u8; 784 + 1], 1).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);

        let error = flatten_images(vec![0u8; 784], 2).unwrap_err();
        assert!(matches!(
            error,
            MnistError::Shape {
                count: 2,
                actual: 784,
                ..
            }
        ));
    }

    #[test]
    fn test_reshape_rejects_overflowing_count() {
        let count = usize::MAX / 100;

        let error = reshape_images(vec![0u8; 4], count).unwrap_err();
        assert!(matches!(
            error,
            MnistError::Shape { count: c, actual: 4, .. } if c == count
        ));

        let error = flatten_images(vec![0u8; 784], count).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_normalize_range_and_values() {
        let pixels = array![[0u8, 51, 255], [128, 1, 254]];
        let normalized = normalize(&pixels);

        assert_eq!(normalized.dim(), pixels.dim());
        for (&x, &y) in pixels.iter().zip(normalized.iter()) {
            assert!((0.0..=1.0).contains(&y));
            assert_eq!(y, f64::from(x) / 255.0);
        }
        assert_relative_eq!(normalized[[0, 1]], 0.2, epsilon = 1e-12);
        assert_eq!(normalized[[0, 2]], 1.0);
    }

    #[test]
    fn test_normalize_leaves_input_untouched() {
        let images = reshape_images(striped_images(2), 2).unwrap();
        let before = images.clone();
        let first = normalize(&images);
        let second = normalize(&images);

        assert_eq!(images, before);
        assert_eq!(first, second);
        assert_eq!(first.shape(), &[2, 28, 28]);
    }

    #[test]
    fn test_one_hot_rows_sum_to_one() {
        let labels = [7u8, 2, 1, 0, 9];
        let encoded = one_hot(ArrayView1::from(&labels), NUM_CLASSES).unwrap();

        assert_eq!(encoded.dim(), (5, 10));
        for (row, &label) in encoded.rows().into_iter().zip(labels.iter()) {
            assert_eq!(row.sum(), 1.0);
            assert_eq!(row[usize::from(label)], 1.0);
            assert_eq!(class_of(row), Some(usize::from(label)));
        }
    }

    #[test]
    fn test_one_hot_rejects_out_of_range_label() {
        let labels = [3u8, 10, 4];
        let error = one_hot(ArrayView1::from(&labels), NUM_CLASSES).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Value);
        match error {
            MnistError::LabelOutOfRange {
                index,
                label,
                num_classes,
            } => {
                assert_eq!(index, 1);
                assert_eq!(label, 10);
                assert_eq!(num_classes, 10);
            }
            other => panic!("Expected LabelOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_one_hot_smaller_class_count() {
        let labels = [0u8, 1, 1];
        let encoded = one_hot(ArrayView1::from(&labels), 2).unwrap();
        assert_eq!(encoded, array![[1.0, 0.0], [0.0, 1.0], [0.0, 1.0]]);

        assert!(one_hot(ArrayView1::from(&[2u8]), 2).is_err());
    }

    #[test]
    fn test_class_of_empty_row() {
        let empty: [f64; 0] = [];
        assert_eq!(class_of(ArrayView1::from(&empty)), None);
    }
}
