//! Dissimilarity-map-to-heatmap rendering using color schemes.

use crate::scheme::{evaluate, ColorScheme, Rgb};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use terradiff_core::raster::Raster;

/// Parameters for colormap rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColormapParams {
    /// Color scheme to use.
    pub scheme: ColorScheme,
    /// Minimum map value for normalization. Values below this clamp.
    pub min: f64,
    /// Maximum map value for normalization. Values above this clamp.
    pub max: f64,
}

impl Default for ColormapParams {
    fn default() -> Self {
        // Dissimilarity maps are on a fixed 0-255 scale in both comparison
        // modes; a fixed domain keeps identical inputs rendering identically.
        Self {
            scheme: ColorScheme::Jet,
            min: 0.0,
            max: 255.0,
        }
    }
}

/// Render a dissimilarity map as an RGB heatmap.
///
/// Each cell is normalized into the configured domain and pushed through
/// the scheme's interpolation.
pub fn render_colormap(map: &Raster<f64>, params: &ColormapParams) -> RgbImage {
    let (rows, cols) = map.shape();
    let range = params.max - params.min;
    let inv_range = if range.abs() > f64::EPSILON {
        1.0 / range
    } else {
        1.0
    };

    let mut out = RgbImage::new(cols as u32, rows as u32);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let v = unsafe { map.get_unchecked(y as usize, x as usize) };
        let t = (v - params.min) * inv_range;
        let Rgb { r, g, b } = evaluate(params.scheme, t);
        *pixel = image::Rgb([r, g, b]);
    }
    out
}
