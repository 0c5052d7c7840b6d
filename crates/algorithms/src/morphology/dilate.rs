//! Binary dilation
//!
//! A cell becomes changed when any cell under the structuring element is
//! changed. Expands changed regions and bridges small gaps.

use crate::maybe_rayon::*;
use crate::segment::{CHANGED, UNCHANGED};
use ndarray::Array2;
use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

use super::element::StructuringElement;

/// Parameters for binary dilation
#[derive(Debug, Clone, Default)]
pub struct DilateParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct Dilate;

impl Algorithm for Dilate {
    type Input = Raster<u8>;
    type Output = Raster<u8>;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Binary dilation (any changed cell under the structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        dilate(&input, &params.element)
    }
}

/// Perform binary dilation on a mask.
///
/// Out-of-bounds neighbors count as unchanged, so dilation never invents
/// change from beyond the frame edge.
pub fn dilate(mask: &Raster<u8>, element: &StructuringElement) -> Result<Raster<u8>> {
    element.validate()?;

    let (rows, cols) = mask.shape();
    let offsets = element.offsets();

    let output_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![UNCHANGED; cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                for &(dr, dc) in &offsets {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let v = unsafe { mask.get_unchecked(nr as usize, nc as usize) };
                    if v != UNCHANGED {
                        *out = CHANGED;
                        break;
                    }
                }
            }

            row_data
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(Raster::from_array(array))
}
