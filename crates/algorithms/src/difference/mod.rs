//! Dissimilarity map computation between aligned image pairs
//!
//! Two interchangeable comparison modes:
//! - **Absolute**: per-pixel absolute intensity difference
//! - **Structural**: windowed SSIM, reported as dissimilarity
//!
//! Both operate on grayscale-reduced copies of the aligned images and emit
//! scores on a common 0-255 scale so the segmenter's thresholds apply to
//! either mode.

mod absolute;
mod ssim;

pub use absolute::{absolute_difference, AbsoluteDiff, AbsoluteDiffParams};
pub use ssim::{structural_difference, Ssim, SsimParams, SsimScore};

use serde::{Deserialize, Serialize};
use terradiff_core::raster::{Raster, RasterImage};
use terradiff_core::Result;

/// How the dissimilarity between the two images is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Per-pixel absolute intensity difference
    #[default]
    Absolute,
    /// Structural similarity (SSIM) over Gaussian-weighted windows
    Structural,
}

/// Dissimilarity map plus the run-level similarity score backing the
/// quality label.
#[derive(Debug, Clone)]
pub struct Dissimilarity {
    /// Per-pixel dissimilarity on a 0-255 scale; higher = more different
    pub map: Raster<f64>,
    /// Fraction of agreement in [0, 1]: mean SSIM for structural mode,
    /// mean normalized intensity agreement for absolute mode
    pub similarity: f64,
}

/// Compute the dissimilarity map for an aligned pair in the given mode
pub fn compare(
    before: &RasterImage,
    after: &RasterImage,
    mode: ComparisonMode,
    ssim: &SsimParams,
) -> Result<Dissimilarity> {
    let gray_before = before.to_gray();
    let gray_after = after.to_gray();

    match mode {
        ComparisonMode::Absolute => {
            let map = absolute_difference(&gray_before, &gray_after)?;
            let mean_diff = map.data().iter().sum::<f64>() / map.len() as f64;
            Ok(Dissimilarity {
                map,
                similarity: 1.0 - mean_diff / 255.0,
            })
        }
        ComparisonMode::Structural => {
            let SsimScore { dissimilarity, mean_ssim } =
                structural_difference(&gray_before, &gray_after, ssim)?;
            Ok(Dissimilarity {
                map: dissimilarity,
                similarity: mean_ssim,
            })
        }
    }
}
