//! Decoded, normalized photo buffer

use crate::error::{Error, Result};
use crate::raster::Raster;
use image::RgbImage;

/// A decoded, normalized 3-channel 8-bit image.
///
/// Produced by the decoder (grayscale promoted, alpha dropped) or by the
/// aligner. Immutable once constructed; width and height are non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    data: RgbImage,
}

impl RasterImage {
    /// Wrap an RGB buffer, rejecting empty dimensions
    pub fn from_rgb(data: RgbImage) -> Result<Self> {
        if data.width() == 0 || data.height() == 0 {
            return Err(Error::InvariantViolation(format!(
                "image dimensions {}x{} must be non-zero",
                data.width(),
                data.height()
            )));
        }
        Ok(Self { data })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.data.dimensions()
    }

    /// Borrow the underlying RGB buffer
    pub fn as_rgb(&self) -> &RgbImage {
        &self.data
    }

    /// Consume into the underlying RGB buffer
    pub fn into_rgb(self) -> RgbImage {
        self.data
    }

    /// Reduce to a grayscale intensity plane on a 0-255 scale.
    ///
    /// Uses the Rec.601 luma weights (0.299 R + 0.587 G + 0.114 B), the
    /// same reduction the comparison stages assume.
    pub fn to_gray(&self) -> Raster<f64> {
        let (width, height) = self.data.dimensions();
        let mut gray = Raster::new(height as usize, width as usize);
        for (x, y, pixel) in self.data.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            // (x, y) bounded by the image dimensions used to size the grid
            unsafe { gray.set_unchecked(y as usize, x as usize, luma) };
        }
        gray
    }
}
