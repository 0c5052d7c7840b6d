//! Dimension alignment between an image pair
//!
//! Downstream stages require pixel-for-pixel correspondence. When the two
//! images disagree on dimensions, the *after* image is resampled into the
//! *before* image's frame (never the reverse) so the reference frame stays
//! stable across runs.

use image::imageops::{self, FilterType};
use terradiff_core::raster::RasterImage;
use terradiff_core::{Algorithm, Error, Result};

/// Alignment algorithm (resize-to-reference)
#[derive(Debug, Clone, Default)]
pub struct Align;

/// Parameters for alignment. The interpolation is fixed to bilinear for
/// determinism; there is nothing to tune.
#[derive(Debug, Clone, Default)]
pub struct AlignParams;

impl Algorithm for Align {
    type Input = (RasterImage, RasterImage);
    type Output = (RasterImage, RasterImage);
    type Params = AlignParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Align"
    }

    fn description(&self) -> &'static str {
        "Resample the after image into the before image's frame (bilinear)"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        let (before, after) = input;
        let after = align_to_reference(&before, after)?;
        Ok((before, after))
    }
}

/// Resize `subject` to `reference`'s dimensions with bilinear interpolation.
///
/// When the dimensions already match, `subject` is returned untouched
/// (byte-identical). Always succeeds for valid inputs; the `Result` return
/// only guards the non-empty invariant of the resampled buffer.
pub fn align_to_reference(reference: &RasterImage, subject: RasterImage) -> Result<RasterImage> {
    if reference.dimensions() == subject.dimensions() {
        return Ok(subject);
    }

    let (width, height) = reference.dimensions();
    let resized = imageops::resize(subject.as_rgb(), width, height, FilterType::Triangle);
    RasterImage::from_rgb(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RasterImage {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        RasterImage::from_rgb(img).unwrap()
    }

    #[test]
    fn test_matching_dimensions_pass_through() {
        let reference = solid(64, 48, [10, 20, 30]);
        let subject = solid(64, 48, [40, 50, 60]);
        let before = subject.clone();

        let aligned = align_to_reference(&reference, subject).unwrap();
        assert_eq!(aligned, before);
    }

    #[test]
    fn test_resizes_to_reference_frame() {
        let reference = solid(64, 48, [0, 0, 0]);
        let subject = solid(128, 96, [200, 100, 50]);

        let aligned = align_to_reference(&reference, subject).unwrap();
        assert_eq!(aligned.dimensions(), (64, 48));
        // A solid image stays solid under bilinear resampling
        assert_eq!(aligned.as_rgb().get_pixel(30, 20).0, [200, 100, 50]);
    }

    #[test]
    fn test_reference_is_never_resized() {
        let reference = solid(64, 48, [1, 2, 3]);
        let subject = solid(32, 32, [9, 9, 9]);

        let (before, after) = Align
            .execute((reference.clone(), subject), AlignParams)
            .unwrap();
        assert_eq!(before, reference);
        assert_eq!(after.dimensions(), (64, 48));
    }
}
