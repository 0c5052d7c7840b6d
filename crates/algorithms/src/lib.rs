//! # TerraDiff Algorithms
//!
//! Change-detection pipeline stages for TerraDiff.
//!
//! ## Available Stage Categories
//!
//! - **align**: Resample the after image into the before image's frame
//! - **difference**: Dissimilarity maps (absolute intensity, SSIM)
//! - **segment**: Thresholding and morphological mask cleanup
//! - **morphology**: Binary erode/dilate/open/close primitives
//! - **regions**: Connected-component extraction with a noise floor
//! - **quantify**: Change percentage from the final mask

pub mod align;
pub mod difference;
pub mod morphology;
pub mod quantify;
pub mod regions;
pub mod segment;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::align::{align_to_reference, Align};
    pub use crate::difference::{
        absolute_difference, compare, structural_difference, ComparisonMode, Dissimilarity,
        SsimParams,
    };
    pub use crate::morphology::{closing, dilate, erode, opening, StructuringElement};
    pub use crate::quantify::change_percentage;
    pub use crate::regions::{extract_regions, BoundingBox, Region, RegionParams};
    pub use crate::segment::{
        segment, threshold, MorphologyParams, SegmentParams, ThresholdMode, ThresholdParams,
        CHANGED, UNCHANGED,
    };
    pub use terradiff_core::prelude::*;
}
