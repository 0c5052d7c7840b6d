//! Thresholding policies for dissimilarity maps
//!
//! All policies consume a 0-255 dissimilarity map and emit a binary mask
//! (0 = unchanged, 255 = changed):
//! - **Fixed**: global cutoff, `value > t` marks change
//! - **Otsu**: automatic global cutoff maximizing between-class variance
//!   over a 256-bin histogram
//! - **Adaptive**: per-cell cutoff from the local window mean plus an
//!   offset, for scenes with uneven residual brightness

use crate::maybe_rayon::*;
use crate::segment::{CHANGED, UNCHANGED};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use terradiff_core::raster::Raster;
use terradiff_core::{Error, Result};

/// Threshold policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Global fixed cutoff (`threshold_value`)
    #[default]
    Fixed,
    /// Otsu automatic global cutoff
    Otsu,
    /// Local-mean adaptive cutoff (`adaptive_window`, `adaptive_offset`)
    Adaptive,
}

/// Parameters for the thresholding stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Policy to apply
    pub mode: ThresholdMode,
    /// Cutoff for [`ThresholdMode::Fixed`], on the 0-255 scale
    pub value: u8,
    /// Window side for [`ThresholdMode::Adaptive`]; odd
    pub adaptive_window: usize,
    /// Offset above the local mean for [`ThresholdMode::Adaptive`]
    pub adaptive_offset: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            mode: ThresholdMode::Fixed,
            value: 25,
            adaptive_window: 11,
            adaptive_offset: 5.0,
        }
    }
}

/// Threshold a dissimilarity map into a binary change mask
pub fn threshold(map: &Raster<f64>, params: &ThresholdParams) -> Result<Raster<u8>> {
    if map.is_empty() {
        return Err(Error::InvariantViolation(
            "cannot threshold an empty dissimilarity map".to_string(),
        ));
    }

    match params.mode {
        ThresholdMode::Fixed => Ok(apply_global(map, params.value as f64)),
        ThresholdMode::Otsu => Ok(apply_global(map, otsu_level(map) as f64)),
        ThresholdMode::Adaptive => {
            adaptive_threshold(map, params.adaptive_window, params.adaptive_offset)
        }
    }
}

/// Mark cells strictly above `cutoff` as changed
fn apply_global(map: &Raster<f64>, cutoff: f64) -> Raster<u8> {
    let mask = map
        .data()
        .mapv(|v| if v > cutoff { CHANGED } else { UNCHANGED });
    Raster::from_array(mask)
}

/// Otsu's threshold over a 256-bin histogram of the map.
///
/// Returns the bin maximizing between-class variance; cells strictly above
/// the returned level are classified as changed.
pub fn otsu_level(map: &Raster<f64>) -> u8 {
    let mut histogram = [0u64; 256];
    for &v in map.data().iter() {
        let bin = v.clamp(0.0, 255.0).round() as usize;
        histogram[bin] += 1;
    }

    let total = map.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &n)| i as f64 * n as f64)
        .sum();

    let mut best_level = 0u8;
    let mut best_variance = 0.0_f64;
    let mut background_count = 0.0;
    let mut background_sum = 0.0;

    for (level, &n) in histogram.iter().enumerate() {
        background_count += n as f64;
        if background_count == 0.0 {
            continue;
        }
        let foreground_count = total - background_count;
        if foreground_count == 0.0 {
            break;
        }
        background_sum += level as f64 * n as f64;

        let mean_background = background_sum / background_count;
        let mean_foreground = (total_sum - background_sum) / foreground_count;
        let between = background_count * foreground_count
            * (mean_background - mean_foreground).powi(2);

        if between > best_variance {
            best_variance = between;
            best_level = level as u8;
        }
    }

    best_level
}

/// Adaptive thresholding: a cell is changed when it exceeds the mean of
/// its local window by more than `offset`. Windows at the frame edge
/// average over the in-bounds cells only.
fn adaptive_threshold(map: &Raster<f64>, window: usize, offset: f64) -> Result<Raster<u8>> {
    if window % 2 == 0 || window == 0 {
        return Err(Error::InvalidParameter {
            name: "adaptive_window",
            value: window.to_string(),
            reason: "adaptive threshold window must be odd".to_string(),
        });
    }

    let (rows, cols) = map.shape();
    let r = (window / 2) as isize;

    let mask_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![UNCHANGED; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let mut sum = 0.0;
                let mut count = 0usize;
                for dr in -r..=r {
                    let nr = row as isize + dr;
                    if nr < 0 || nr >= rows as isize {
                        continue;
                    }
                    for dc in -r..=r {
                        let nc = col as isize + dc;
                        if nc < 0 || nc >= cols as isize {
                            continue;
                        }
                        sum += unsafe { map.get_unchecked(nr as usize, nc as usize) };
                        count += 1;
                    }
                }
                let local_mean = sum / count as f64;
                let v = unsafe { map.get_unchecked(row, col) };
                if v > local_mean + offset {
                    *out = CHANGED;
                }
            }
            row_data
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), mask_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(Raster::from_array(array))
}
