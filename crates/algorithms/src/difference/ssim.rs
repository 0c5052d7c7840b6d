//! Windowed structural similarity (SSIM)
//!
//! Local means, variances and covariance are taken over a Gaussian-weighted
//! square window, computed with a separable kernel (row pass then column
//! pass). Window statistics near the frame edge renormalize over the
//! in-bounds weights, so a constant plane keeps its value everywhere and
//! identical inputs score exactly 1.0.

use crate::maybe_rayon::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use terradiff_core::raster::Raster;
use terradiff_core::{Algorithm, Error, Result};

/// Stabilization constants from the SSIM definition, for 8-bit dynamic range
const C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// Parameters for the structural comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsimParams {
    /// Side of the square comparison window; odd. Clamped down to the
    /// largest odd window that fits the smaller image dimension.
    pub window_size: usize,
    /// Standard deviation of the Gaussian window weights
    pub sigma: f64,
}

impl Default for SsimParams {
    fn default() -> Self {
        Self {
            window_size: 7,
            sigma: 1.5,
        }
    }
}

/// Result of a structural comparison
#[derive(Debug, Clone)]
pub struct SsimScore {
    /// Per-pixel dissimilarity `(1 - SSIM) / 2` rescaled to 0-255
    pub dissimilarity: Raster<f64>,
    /// Mean SSIM over the map; 1.0 means identical
    pub mean_ssim: f64,
}

/// SSIM algorithm
#[derive(Debug, Clone, Default)]
pub struct Ssim;

impl Algorithm for Ssim {
    type Input = (Raster<f64>, Raster<f64>);
    type Output = SsimScore;
    type Params = SsimParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Ssim"
    }

    fn description(&self) -> &'static str {
        "Gaussian-windowed structural similarity between two grayscale planes"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        structural_difference(&input.0, &input.1, &params)
    }
}

/// Compute the SSIM dissimilarity map between two grayscale planes.
///
/// `SSIM = ((2·μ1·μ2 + C1)·(2·σ12 + C2)) / ((μ1² + μ2² + C1)·(σ1² + σ2² + C2))`
/// per pixel, with all statistics Gaussian-weighted over the window.
pub fn structural_difference(
    before: &Raster<f64>,
    after: &Raster<f64>,
    params: &SsimParams,
) -> Result<SsimScore> {
    let (rows, cols) = before.shape();
    if after.shape() != (rows, cols) {
        return Err(Error::SizeMismatch {
            er: rows,
            ec: cols,
            ar: after.rows(),
            ac: after.cols(),
        });
    }
    if params.window_size % 2 == 0 || params.window_size == 0 {
        return Err(Error::InvalidParameter {
            name: "window_size",
            value: params.window_size.to_string(),
            reason: "SSIM window must be odd".to_string(),
        });
    }
    if !(params.sigma > 0.0) {
        return Err(Error::InvalidParameter {
            name: "sigma",
            value: params.sigma.to_string(),
            reason: "Gaussian sigma must be positive".to_string(),
        });
    }

    let window = effective_window(params.window_size, rows.min(cols));
    let kernel = gaussian_kernel(window, params.sigma);

    let x = before.data();
    let y = after.data();

    let mu1 = gaussian_filter(x, &kernel)?;
    let mu2 = gaussian_filter(y, &kernel)?;
    let xx = gaussian_filter(&(x * x), &kernel)?;
    let yy = gaussian_filter(&(y * y), &kernel)?;
    let xy = gaussian_filter(&(x * y), &kernel)?;

    let mut dissimilarity = Array2::<f64>::zeros((rows, cols));
    let mut ssim_sum = 0.0;

    for row in 0..rows {
        for col in 0..cols {
            let m1 = mu1[(row, col)];
            let m2 = mu2[(row, col)];
            let sigma1_sq = xx[(row, col)] - m1 * m1;
            let sigma2_sq = yy[(row, col)] - m2 * m2;
            let sigma12 = xy[(row, col)] - m1 * m2;

            let ssim = ((2.0 * m1 * m2 + C1) * (2.0 * sigma12 + C2))
                / ((m1 * m1 + m2 * m2 + C1) * (sigma1_sq + sigma2_sq + C2));
            ssim_sum += ssim;
            dissimilarity[(row, col)] = (255.0 * (1.0 - ssim) / 2.0).clamp(0.0, 255.0);
        }
    }

    Ok(SsimScore {
        dissimilarity: Raster::from_array(dissimilarity),
        mean_ssim: ssim_sum / (rows * cols) as f64,
    })
}

/// Largest odd window not exceeding the smaller image dimension
fn effective_window(requested: usize, min_dim: usize) -> usize {
    if requested <= min_dim {
        requested
    } else if min_dim % 2 == 1 {
        min_dim
    } else {
        min_dim.saturating_sub(1).max(1)
    }
}

/// Normalized 1D Gaussian kernel of odd length
fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    let half = (size / 2) as isize;
    let mut kernel: Vec<f64> = (-half..=half)
        .map(|d| {
            let d = d as f64;
            (-d * d / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Separable Gaussian filter: row pass then column pass.
///
/// Edge windows renormalize over the in-bounds kernel weights.
fn gaussian_filter(src: &Array2<f64>, kernel: &[f64]) -> Result<Array2<f64>> {
    let horizontal = convolve_rows(src, kernel)?;
    convolve_cols(&horizontal, kernel)
}

fn convolve_rows(src: &Array2<f64>, kernel: &[f64]) -> Result<Array2<f64>> {
    let (rows, cols) = src.dim();
    let half = (kernel.len() / 2) as isize;

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = vec![0.0; cols];
            for (col, out_col) in out.iter_mut().enumerate() {
                let mut acc = 0.0;
                let mut weight = 0.0;
                for (k, &w) in kernel.iter().enumerate() {
                    let c = col as isize + k as isize - half;
                    if c >= 0 && (c as usize) < cols {
                        acc += w * src[(row, c as usize)];
                        weight += w;
                    }
                }
                *out_col = acc / weight;
            }
            out
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}

fn convolve_cols(src: &Array2<f64>, kernel: &[f64]) -> Result<Array2<f64>> {
    let (rows, cols) = src.dim();
    let half = (kernel.len() / 2) as isize;

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = vec![0.0; cols];
            for (col, out_col) in out.iter_mut().enumerate() {
                let mut acc = 0.0;
                let mut weight = 0.0;
                for (k, &w) in kernel.iter().enumerate() {
                    let r = row as isize + k as isize - half;
                    if r >= 0 && (r as usize) < rows {
                        acc += w * src[(r as usize, col)];
                        weight += w;
                    }
                }
                *out_col = acc / weight;
            }
            out
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(7, 1.5);
        assert_eq!(k.len(), 7);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for i in 0..3 {
            assert!((k[i] - k[6 - i]).abs() < 1e-12);
        }
        assert!(k[3] > k[2] && k[2] > k[1] && k[1] > k[0]);
    }

    #[test]
    fn test_identical_planes_score_one() {
        let mut plane = Raster::filled(16, 16, 128.0);
        plane.set(4, 4, 20.0).unwrap();
        plane.set(10, 12, 240.0).unwrap();

        let score = structural_difference(&plane, &plane, &SsimParams::default()).unwrap();
        assert_eq!(score.mean_ssim, 1.0);
        assert!(score.dissimilarity.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_plane_survives_edge_renormalization() {
        let plane = Raster::filled(9, 9, 64.0);
        let filtered = gaussian_filter(plane.data(), &gaussian_kernel(7, 1.5)).unwrap();
        for &v in filtered.iter() {
            assert!((v - 64.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_disjoint_planes_score_low() {
        let before = Raster::filled(32, 32, 0.0);
        let after = Raster::filled(32, 32, 255.0);

        let score = structural_difference(&before, &after, &SsimParams::default()).unwrap();
        assert!(score.mean_ssim < 0.05, "got {}", score.mean_ssim);
        // dissimilarity must be high and within scale
        for &v in score.dissimilarity.data().iter() {
            assert!((0.0..=255.0).contains(&v));
            assert!(v > 100.0);
        }
    }

    #[test]
    fn test_window_clamped_to_small_images() {
        let before = Raster::filled(5, 40, 10.0);
        let after = Raster::filled(5, 40, 10.0);
        // requested 7 exceeds 5 rows; must clamp instead of erroring
        let score = structural_difference(&before, &after, &SsimParams::default()).unwrap();
        assert_eq!(score.mean_ssim, 1.0);
        assert_eq!(effective_window(7, 5), 5);
        assert_eq!(effective_window(7, 6), 5);
        assert_eq!(effective_window(7, 40), 7);
    }

    #[test]
    fn test_even_window_rejected() {
        let plane = Raster::filled(16, 16, 0.0);
        let err = structural_difference(
            &plane,
            &plane,
            &SsimParams {
                window_size: 8,
                sigma: 1.5,
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "window_size", .. }));
    }

    #[test]
    fn test_localized_change_stays_localized() {
        let before = Raster::filled(40, 40, 100.0);
        let mut after = before.clone();
        for r in 10..16 {
            for c in 10..16 {
                after.set(r, c, 220.0).unwrap();
            }
        }

        let score = structural_difference(&before, &after, &SsimParams::default()).unwrap();
        // Inside the changed block: strongly dissimilar
        assert!(score.dissimilarity.get(12, 12).unwrap() > 30.0);
        // Far corner: untouched by a 7-wide window
        assert_eq!(score.dissimilarity.get(35, 35).unwrap(), 0.0);
    }
}
