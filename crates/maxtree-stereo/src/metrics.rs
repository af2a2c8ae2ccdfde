//! Disparity map scoring against ground truth

use crate::error::{StereoResult, check_size};
use maxtree_core::GrayImage;

/// Accuracy of a disparity map
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisparityStats {
    /// Mean absolute difference over the scored pixels
    pub mean_abs_error: f64,
    /// Fraction of scored pixels off by more than the bad-pixel threshold
    pub bad_pixel_ratio: f64,
    /// Number of scored pixels
    pub pixel_count: usize,
}

/// Score `disparity` against `ground_truth`
///
/// Ground-truth pixels equal to 0 carry no measurement and are skipped.
/// A pixel is bad when its absolute error exceeds `bad_threshold`.
///
/// # Errors
///
/// Returns [`StereoError::DimensionMismatch`](crate::StereoError::DimensionMismatch)
/// if the two images differ in size.
pub fn evaluate_disparity(
    disparity: &GrayImage,
    ground_truth: &GrayImage,
    bad_threshold: u8,
) -> StereoResult<DisparityStats> {
    check_size(
        "disparity/ground truth",
        ground_truth.dimensions(),
        disparity.dimensions(),
    )?;

    let mut total_error = 0u64;
    let mut bad = 0usize;
    let mut count = 0usize;
    for (&d, &g) in disparity.data().iter().zip(ground_truth.data()) {
        if g == 0 {
            continue;
        }
        let error = d.abs_diff(g);
        total_error += u64::from(error);
        if error > bad_threshold {
            bad += 1;
        }
        count += 1;
    }

    if count == 0 {
        return Ok(DisparityStats::default());
    }
    Ok(DisparityStats {
        mean_abs_error: total_error as f64 / count as f64,
        bad_pixel_ratio: bad as f64 / count as f64,
        pixel_count: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores() {
        let disparity = GrayImage::from_vec(4, 1, vec![2, 5, 9, 7]).unwrap();
        let truth = GrayImage::from_vec(4, 1, vec![2, 4, 0, 1]).unwrap();
        let stats = evaluate_disparity(&disparity, &truth, 1).unwrap();
        assert_eq!(stats.pixel_count, 3);
        assert!((stats.mean_abs_error - 7.0 / 3.0).abs() < 1e-12);
        assert!((stats.bad_pixel_ratio - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_ground_truth() {
        let image = GrayImage::new(3, 3).unwrap();
        let stats = evaluate_disparity(&image, &image, 1).unwrap();
        assert_eq!(stats, DisparityStats::default());
    }

    #[test]
    fn test_size_mismatch() {
        let a = GrayImage::new(3, 3).unwrap();
        let b = GrayImage::new(3, 2).unwrap();
        assert!(evaluate_disparity(&a, &b, 1).is_err());
    }
}
