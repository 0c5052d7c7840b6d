//! Binary erosion
//!
//! A cell survives only when every cell under the structuring element is
//! changed. Shrinks changed regions and deletes specks smaller than the
//! element.

use crate::maybe_rayon::*;
use crate::segment::{CHANGED, UNCHANGED};
use ndarray::Array2;
use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

use super::element::StructuringElement;

/// Parameters for binary erosion
#[derive(Debug, Clone, Default)]
pub struct ErodeParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Erosion algorithm
#[derive(Debug, Clone, Default)]
pub struct Erode;

impl Algorithm for Erode {
    type Input = Raster<u8>;
    type Output = Raster<u8>;
    type Params = ErodeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Erode"
    }

    fn description(&self) -> &'static str {
        "Binary erosion (all cells under the structuring element changed)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        erode(&input, &params.element)
    }
}

/// Perform binary erosion on a mask.
///
/// Out-of-bounds neighbors count as changed, so regions touching the frame
/// edge are not eaten from outside the image.
pub fn erode(mask: &Raster<u8>, element: &StructuringElement) -> Result<Raster<u8>> {
    element.validate()?;

    let (rows, cols) = mask.shape();
    let offsets = element.offsets();

    let output_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![UNCHANGED; cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                let center = unsafe { mask.get_unchecked(row, col) };
                if center == UNCHANGED {
                    continue;
                }

                let mut survives = true;
                for &(dr, dc) in &offsets {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let v = unsafe { mask.get_unchecked(nr as usize, nc as usize) };
                    if v == UNCHANGED {
                        survives = false;
                        break;
                    }
                }

                if survives {
                    *out = CHANGED;
                }
            }

            row_data
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), output_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(Raster::from_array(array))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erode_removes_single_cell() {
        let mut mask = Raster::filled(7, 7, UNCHANGED);
        mask.set(3, 3, CHANGED).unwrap();

        let result = erode(&mask, &StructuringElement::Square(1)).unwrap();
        assert_eq!(result.count_where(|v| v == CHANGED), 0);
    }

    #[test]
    fn test_erode_shrinks_block_rim() {
        let mut mask = Raster::filled(9, 9, UNCHANGED);
        for r in 2..7 {
            for c in 2..7 {
                mask.set(r, c, CHANGED).unwrap();
            }
        }

        let result = erode(&mask, &StructuringElement::Square(1)).unwrap();
        // 5x5 block erodes to its 3x3 core
        for r in 3..6 {
            for c in 3..6 {
                assert_eq!(result.get(r, c).unwrap(), CHANGED);
            }
        }
        assert_eq!(result.get(2, 2).unwrap(), UNCHANGED);
        assert_eq!(result.get(6, 6).unwrap(), UNCHANGED);
    }

    #[test]
    fn test_erode_keeps_frame_edge_regions() {
        // Block flush with the corner: the frame must not eat it
        let mut mask = Raster::filled(9, 9, UNCHANGED);
        for r in 0..4 {
            for c in 0..4 {
                mask.set(r, c, CHANGED).unwrap();
            }
        }

        let result = erode(&mask, &StructuringElement::Square(1)).unwrap();
        assert_eq!(result.get(0, 0).unwrap(), CHANGED);
        assert_eq!(result.get(2, 2).unwrap(), CHANGED);
        // inner rim facing unchanged cells still erodes
        assert_eq!(result.get(3, 3).unwrap(), UNCHANGED);
    }
}
