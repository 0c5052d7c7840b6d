//! Change quantification
//!
//! Reduces the final post-morphology mask to a single percentage. The
//! figure is independent of the region-level area filter: morphology has
//! already removed the noise the filter targets, and the percentage must
//! reflect every surviving changed cell.

use crate::segment::UNCHANGED;
use terradiff_core::raster::Raster;
use terradiff_core::{Error, Result};

/// Fraction of changed cells in the mask, as a percentage rounded to two
/// decimal places.
pub fn change_percentage(mask: &Raster<u8>) -> Result<f64> {
    if mask.is_empty() {
        return Err(Error::InvariantViolation(
            "cannot quantify an empty mask".to_string(),
        ));
    }

    let changed = mask.count_where(|v| v != UNCHANGED);
    Ok(round2(changed as f64 / mask.len() as f64 * 100.0))
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
