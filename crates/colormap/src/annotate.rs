//! Annotated-highlight rendering
//!
//! Starts from the after image, blends a highlight color over the changed
//! cells of each retained region, then draws bounding-box outlines. Cells
//! are collected into a membership overlay first so overlapping bounding
//! boxes never blend a cell twice.

use crate::scheme::Rgb;
use image::RgbImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use terradiff_algorithms::regions::Region;
use terradiff_algorithms::segment::UNCHANGED;
use terradiff_core::raster::{Raster, RasterImage};
use terradiff_core::{Error, Result};

/// Parameters for annotated rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateParams {
    /// Highlight color blended over changed cells
    pub highlight: Rgb,
    /// Highlight opacity in [0, 1]
    pub opacity: f64,
    /// Bounding-box outline color
    pub outline: Rgb,
    /// Outline thickness in pixels
    pub outline_thickness: u32,
}

impl Default for AnnotateParams {
    fn default() -> Self {
        Self {
            highlight: Rgb::new(255, 0, 0),
            opacity: 0.3,
            outline: Rgb::new(255, 0, 0),
            outline_thickness: 2,
        }
    }
}

/// Render the after image with retained regions highlighted and outlined.
pub fn annotate_regions(
    after: &RasterImage,
    mask: &Raster<u8>,
    regions: &[Region],
    params: &AnnotateParams,
) -> Result<RgbImage> {
    let (width, height) = after.dimensions();
    if mask.shape() != (height as usize, width as usize) {
        return Err(Error::SizeMismatch {
            er: height as usize,
            ec: width as usize,
            ar: mask.rows(),
            ac: mask.cols(),
        });
    }
    if !(0.0..=1.0).contains(&params.opacity) {
        return Err(Error::InvalidParameter {
            name: "opacity",
            value: params.opacity.to_string(),
            reason: "highlight opacity must lie in [0, 1]".to_string(),
        });
    }

    let mut out = after.as_rgb().clone();

    // Membership overlay: changed cells inside any retained bbox
    let mut highlight = Array2::<bool>::from_elem(mask.shape(), false);
    for region in regions {
        let top = region.bbox.y as usize;
        let left = region.bbox.x as usize;
        let bottom = (top + region.bbox.height as usize).min(mask.rows());
        let right = (left + region.bbox.width as usize).min(mask.cols());
        for r in top..bottom {
            for c in left..right {
                if unsafe { mask.get_unchecked(r, c) } != UNCHANGED {
                    highlight[(r, c)] = true;
                }
            }
        }
    }

    let alpha = params.opacity;
    for ((r, c), &hit) in highlight.indexed_iter() {
        if !hit {
            continue;
        }
        let pixel = out.get_pixel_mut(c as u32, r as u32);
        pixel.0 = blend(pixel.0, params.highlight, alpha);
    }

    for region in regions {
        draw_outline(&mut out, region, params);
    }

    Ok(out)
}

/// Alpha-blend `top` over `base` at the given opacity
fn blend(base: [u8; 3], top: Rgb, alpha: f64) -> [u8; 3] {
    let mix = |b: u8, t: u8| ((1.0 - alpha) * b as f64 + alpha * t as f64).round() as u8;
    [mix(base[0], top.r), mix(base[1], top.g), mix(base[2], top.b)]
}

/// Draw the bounding-box outline, thickened inward so it stays in frame
fn draw_outline(out: &mut RgbImage, region: &Region, params: &AnnotateParams) {
    let (width, height) = out.dimensions();
    let color = image::Rgb([params.outline.r, params.outline.g, params.outline.b]);

    let x0 = region.bbox.x;
    let y0 = region.bbox.y;
    let x1 = (region.bbox.x + region.bbox.width).min(width);
    let y1 = (region.bbox.y + region.bbox.height).min(height);

    for t in 0..params.outline_thickness {
        // top and bottom edges
        for x in x0..x1 {
            if y0 + t < height {
                out.put_pixel(x, y0 + t, color);
            }
            if y1 > t + 1 {
                out.put_pixel(x, y1 - t - 1, color);
            }
        }
        // left and right edges
        for y in y0..y1 {
            if x0 + t < width {
                out.put_pixel(x0 + t, y, color);
            }
            if x1 > t + 1 {
                out.put_pixel(x1 - t - 1, y, color);
            }
        }
    }
}
