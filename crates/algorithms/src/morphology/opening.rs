//! Morphological opening (erosion followed by dilation)
//!
//! Removes specks smaller than the structuring element while restoring the
//! footprint of larger regions. With `iterations = n`, erosion runs n times
//! before dilation runs n times.

use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

use super::dilate::dilate;
use super::element::StructuringElement;
use super::erode::erode;

/// Parameters for morphological opening
#[derive(Debug, Clone)]
pub struct OpeningParams {
    /// Structuring element shape
    pub element: StructuringElement,
    /// Number of erosion passes before the matching dilation passes
    pub iterations: usize,
}

impl Default for OpeningParams {
    fn default() -> Self {
        Self {
            element: StructuringElement::default(),
            iterations: 1,
        }
    }
}

/// Opening algorithm
#[derive(Debug, Clone, Default)]
pub struct Opening;

impl Algorithm for Opening {
    type Input = Raster<u8>;
    type Output = Raster<u8>;
    type Params = OpeningParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Opening"
    }

    fn description(&self) -> &'static str {
        "Morphological opening (erosion then dilation) to drop small specks"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        opening(&input, &params.element, params.iterations)
    }
}

/// Perform morphological opening on a mask
pub fn opening(
    mask: &Raster<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> Result<Raster<u8>> {
    if iterations == 0 {
        return Err(Error::InvalidParameter {
            name: "iterations",
            value: "0".to_string(),
            reason: "opening needs at least one iteration".to_string(),
        });
    }

    let mut current = erode(mask, element)?;
    for _ in 1..iterations {
        current = erode(&current, element)?;
    }
    for _ in 0..iterations {
        current = dilate(&current, element)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{CHANGED, UNCHANGED};

    #[test]
    fn test_opening_removes_speck() {
        let mut mask = Raster::filled(9, 9, UNCHANGED);
        mask.set(4, 4, CHANGED).unwrap();

        let result = opening(&mask, &StructuringElement::Square(1), 1).unwrap();
        assert_eq!(result.count_where(|v| v == CHANGED), 0);
    }

    #[test]
    fn test_opening_restores_large_block() {
        let mut mask = Raster::filled(11, 11, UNCHANGED);
        for r in 3..8 {
            for c in 3..8 {
                mask.set(r, c, CHANGED).unwrap();
            }
        }

        let result = opening(&mask, &StructuringElement::Square(1), 1).unwrap();
        assert_eq!(result.count_where(|v| v == CHANGED), 25);
    }

    #[test]
    fn test_opening_zero_iterations_rejected() {
        let mask = Raster::filled(5, 5, UNCHANGED);
        assert!(opening(&mask, &StructuringElement::Square(1), 0).is_err());
    }
}
