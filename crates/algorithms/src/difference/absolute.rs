//! Per-pixel absolute intensity difference

use crate::maybe_rayon::*;
use ndarray::Array2;
use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

/// Parameters for absolute differencing. The operation has no tunables;
/// the struct exists for the [`Algorithm`] registration.
#[derive(Debug, Clone, Default)]
pub struct AbsoluteDiffParams;

/// Absolute difference algorithm
#[derive(Debug, Clone, Default)]
pub struct AbsoluteDiff;

impl Algorithm for AbsoluteDiff {
    type Input = (Raster<f64>, Raster<f64>);
    type Output = Raster<f64>;
    type Params = AbsoluteDiffParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "AbsoluteDiff"
    }

    fn description(&self) -> &'static str {
        "Per-pixel absolute intensity difference between two grayscale planes"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        absolute_difference(&input.0, &input.1)
    }
}

/// Compute `|before - after|` per pixel.
///
/// Inputs are grayscale planes on a 0-255 scale; the output stays on that
/// scale. Both rasters must share dimensions (the aligner guarantees this;
/// a mismatch here is an aligner defect, not a policy violation).
pub fn absolute_difference(before: &Raster<f64>, after: &Raster<f64>) -> Result<Raster<f64>> {
    let (rows, cols) = before.shape();
    if after.shape() != (rows, cols) {
        return Err(Error::SizeMismatch {
            er: rows,
            ec: cols,
            ar: after.rows(),
            ac: after.cols(),
        });
    }

    let diff_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut diffs = Vec::with_capacity(cols);
            for col in 0..cols {
                let b = unsafe { before.get_unchecked(row, col) };
                let a = unsafe { after.get_unchecked(row, col) };
                diffs.push((a - b).abs());
            }
            diffs
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), diff_data)
        .map_err(|e| Error::Other(e.to_string()))?;
    Ok(Raster::from_array(array))
}
