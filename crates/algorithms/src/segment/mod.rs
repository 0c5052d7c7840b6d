//! Segmentation: dissimilarity map -> binary change mask
//!
//! Thresholding (fixed, Otsu or adaptive) produces the raw mask; a
//! morphological close merges nearby changed pixels into coherent regions
//! and a following open removes isolated specks. Close-before-open is the
//! required ordering: the reverse erases small genuine regions before they
//! can be merged.

mod threshold;

pub use threshold::{otsu_level, threshold, ThresholdMode, ThresholdParams};

use crate::morphology::{closing, opening, StructuringElement};
use serde::{Deserialize, Serialize};
use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

/// Mask value for a changed cell
pub const CHANGED: u8 = 255;
/// Mask value for an unchanged cell
pub const UNCHANGED: u8 = 0;

/// Morphological cleanup applied after thresholding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphologyParams {
    /// Structuring element for both passes
    pub element: StructuringElement,
    /// Close (dilate-then-erode) iterations; merges nearby changed pixels
    pub close_iterations: usize,
    /// Open (erode-then-dilate) iterations; removes isolated noise
    pub open_iterations: usize,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            element: StructuringElement::Square(1),
            close_iterations: 2,
            open_iterations: 1,
        }
    }
}

/// Parameters for the full segmentation stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentParams {
    /// Thresholding policy
    pub threshold: ThresholdParams,
    /// Post-threshold cleanup
    pub morphology: MorphologyParams,
}

/// Segmentation algorithm
#[derive(Debug, Clone, Default)]
pub struct Segment;

impl Algorithm for Segment {
    type Input = Raster<f64>;
    type Output = Raster<u8>;
    type Params = SegmentParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Segment"
    }

    fn description(&self) -> &'static str {
        "Threshold a dissimilarity map and denoise the binary mask"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        segment(&input, &params)
    }
}

/// Threshold the dissimilarity map and apply morphological cleanup
pub fn segment(map: &Raster<f64>, params: &SegmentParams) -> Result<Raster<u8>> {
    let mask = threshold(map, &params.threshold)?;
    clean_mask(&mask, &params.morphology)
}

/// Apply close-then-open denoising to a binary mask
pub fn clean_mask(mask: &Raster<u8>, params: &MorphologyParams) -> Result<Raster<u8>> {
    let closed = closing(mask, &params.element, params.close_iterations)?;
    opening(&closed, &params.element, params.open_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(cells: &[(usize, usize)], rows: usize, cols: usize) -> Raster<u8> {
        let mut mask = Raster::filled(rows, cols, UNCHANGED);
        for &(r, c) in cells {
            mask.set(r, c, CHANGED).unwrap();
        }
        mask
    }

    #[test]
    fn test_isolated_pixel_removed() {
        // Single true cell surrounded by false must vanish after cleanup
        let mask = mask_from(&[(5, 5)], 11, 11);
        let cleaned = clean_mask(&mask, &MorphologyParams::default()).unwrap();
        assert_eq!(cleaned.count_where(|v| v == CHANGED), 0);
    }

    #[test]
    fn test_nearby_cells_merge_after_close() {
        // Two true cells one pixel apart must bridge into one run
        let mask = mask_from(&[(5, 4), (5, 6)], 11, 11);
        let params = MorphologyParams::default();
        let closed = closing(&mask, &params.element, params.close_iterations).unwrap();

        assert_eq!(closed.get(5, 4).unwrap(), CHANGED);
        assert_eq!(closed.get(5, 5).unwrap(), CHANGED);
        assert_eq!(closed.get(5, 6).unwrap(), CHANGED);
    }

    #[test]
    fn test_solid_block_survives_cleanup() {
        let mut mask = Raster::filled(30, 30, UNCHANGED);
        for r in 10..20 {
            for c in 10..20 {
                mask.set(r, c, CHANGED).unwrap();
            }
        }

        let cleaned = clean_mask(&mask, &MorphologyParams::default()).unwrap();
        // Interior intact
        for r in 11..19 {
            for c in 11..19 {
                assert_eq!(cleaned.get(r, c).unwrap(), CHANGED);
            }
        }
        // No spill far outside the block
        assert_eq!(cleaned.get(5, 5).unwrap(), UNCHANGED);
        assert_eq!(cleaned.get(25, 25).unwrap(), UNCHANGED);
    }

    #[test]
    fn test_segment_end_to_end_fixed_threshold() {
        let mut map = Raster::filled(30, 30, 0.0);
        for r in 5..12 {
            for c in 5..12 {
                map.set(r, c, 200.0).unwrap();
            }
        }
        // speck below and above threshold, both far from the block
        map.set(2, 20, 10.0).unwrap();
        map.set(20, 20, 200.0).unwrap();

        let mask = segment(&map, &SegmentParams::default()).unwrap();
        assert_eq!(mask.get(8, 8).unwrap(), CHANGED);
        assert_eq!(mask.get(2, 20).unwrap(), UNCHANGED);
        // isolated bright speck removed by the open pass
        assert_eq!(mask.get(20, 20).unwrap(), UNCHANGED);
    }
}
