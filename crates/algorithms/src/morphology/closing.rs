//! Morphological closing (dilation followed by erosion)
//!
//! Bridges small gaps between nearby changed cells so that fragmented
//! change shows up as coherent regions. With `iterations = n`, dilation
//! runs n times before erosion runs n times.

use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

use super::dilate::dilate;
use super::element::StructuringElement;
use super::erode::erode;

/// Parameters for morphological closing
#[derive(Debug, Clone)]
pub struct ClosingParams {
    /// Structuring element shape
    pub element: StructuringElement,
    /// Number of dilation passes before the matching erosion passes
    pub iterations: usize,
}

impl Default for ClosingParams {
    fn default() -> Self {
        Self {
            element: StructuringElement::default(),
            iterations: 1,
        }
    }
}

/// Closing algorithm
#[derive(Debug, Clone, Default)]
pub struct Closing;

impl Algorithm for Closing {
    type Input = Raster<u8>;
    type Output = Raster<u8>;
    type Params = ClosingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Closing"
    }

    fn description(&self) -> &'static str {
        "Morphological closing (dilation then erosion) to bridge small gaps"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        closing(&input, &params.element, params.iterations)
    }
}

/// Perform morphological closing on a mask
pub fn closing(
    mask: &Raster<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> Result<Raster<u8>> {
    if iterations == 0 {
        return Err(Error::InvalidParameter {
            name: "iterations",
            value: "0".to_string(),
            reason: "closing needs at least one iteration".to_string(),
        });
    }

    let mut current = dilate(mask, element)?;
    for _ in 1..iterations {
        current = dilate(&current, element)?;
    }
    for _ in 0..iterations {
        current = erode(&current, element)?;
    }
    Ok(current)
}
