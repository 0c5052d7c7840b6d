//! Image decoding, validation and encoding
//!
//! Uses the `image` crate's PNG and JPEG codecs. Decoding is pure: the
//! byte ceiling is checked before the codec runs, the dimension window
//! after, and color layouts are normalized to 3-channel RGB (grayscale
//! promoted, alpha dropped).

use crate::error::{Error, Result};
use crate::raster::RasterImage;
use image::{ColorType, DynamicImage, ImageFormat, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// MIME type of encoded heatmap buffers
pub const HEATMAP_MIME: &str = "image/png";

/// Limits applied while decoding an input image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum encoded file size in bytes
    pub max_file_size_bytes: u64,
    /// Minimum accepted width/height in pixels
    pub min_dimension: u32,
    /// Maximum accepted width/height in pixels
    pub max_dimension: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            min_dimension: 100,
            max_dimension: 5000,
        }
    }
}

/// Read and validate an image file into a [`RasterImage`]
pub fn read_image<P: AsRef<Path>>(path: P, limits: &DecodeLimits) -> Result<RasterImage> {
    let meta = fs::metadata(path.as_ref())?;
    if meta.len() > limits.max_file_size_bytes {
        return Err(Error::ImageTooLarge {
            actual: meta.len(),
            limit: limits.max_file_size_bytes,
        });
    }
    let bytes = fs::read(path.as_ref())?;
    decode_image(&bytes, limits)
}

/// Decode and validate an in-memory image buffer into a [`RasterImage`]
pub fn read_image_from_buffer(data: &[u8], limits: &DecodeLimits) -> Result<RasterImage> {
    if data.len() as u64 > limits.max_file_size_bytes {
        return Err(Error::ImageTooLarge {
            actual: data.len() as u64,
            limit: limits.max_file_size_bytes,
        });
    }
    decode_image(data, limits)
}

/// Internal: decode bytes, enforce the dimension window, normalize color
fn decode_image(data: &[u8], limits: &DecodeLimits) -> Result<RasterImage> {
    let decoded =
        image::load_from_memory(data).map_err(|e| Error::InvalidImage(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    if width < limits.min_dimension
        || height < limits.min_dimension
        || width > limits.max_dimension
        || height > limits.max_dimension
    {
        return Err(Error::DimensionOutOfRange {
            width,
            height,
            min: limits.min_dimension,
            max: limits.max_dimension,
        });
    }

    let rgb = normalize_color(decoded)?;
    RasterImage::from_rgb(rgb)
}

/// Normalize a decoded image to 3-channel 8-bit RGB.
///
/// Grayscale layouts are promoted to three equal channels; alpha layouts
/// have the alpha channel discarded, not composited.
fn normalize_color(decoded: DynamicImage) -> Result<RgbImage> {
    match decoded.color() {
        ColorType::L8
        | ColorType::L16
        | ColorType::La8
        | ColorType::La16
        | ColorType::Rgb8
        | ColorType::Rgb16
        | ColorType::Rgba8
        | ColorType::Rgba16 => Ok(decoded.to_rgb8()),
        other => Err(Error::UnsupportedColorFormat(format!("{other:?}"))),
    }
}

/// Encode an RGB buffer as PNG, the heatmap delivery format
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::RenderFailed(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{LumaA, Rgba};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_rejects_oversized_buffer_without_decoding() {
        let limits = DecodeLimits::default();
        // 11 MiB of garbage; the size check must fire before the codec
        let data = vec![0u8; 11 * 1024 * 1024];
        match read_image_from_buffer(&data, &limits) {
            Err(Error::ImageTooLarge { actual, limit }) => {
                assert_eq!(actual, 11 * 1024 * 1024);
                assert_eq!(limit, 10 * 1024 * 1024);
            }
            other => panic!("expected ImageTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_undersized_dimensions() {
        let limits = DecodeLimits::default();
        let img = DynamicImage::new_rgb8(50, 50);
        match read_image_from_buffer(&png_bytes(img), &limits) {
            Err(Error::DimensionOutOfRange { width, height, min, .. }) => {
                assert_eq!((width, height), (50, 50));
                assert_eq!(min, 100);
            }
            other => panic!("expected DimensionOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_corrupt_bytes() {
        let limits = DecodeLimits::default();
        let err = read_image_from_buffer(b"not an image at all", &limits).unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn test_promotes_grayscale_to_rgb() {
        let limits = DecodeLimits::default();
        let mut gray = image::GrayImage::new(120, 120);
        gray.put_pixel(3, 4, image::Luma([77]));
        let decoded =
            read_image_from_buffer(&png_bytes(DynamicImage::ImageLuma8(gray)), &limits).unwrap();

        let px = decoded.as_rgb().get_pixel(3, 4);
        assert_eq!(px.0, [77, 77, 77]);
    }

    #[test]
    fn test_drops_alpha_without_blending() {
        let limits = DecodeLimits::default();
        let mut rgba = image::RgbaImage::new(120, 120);
        // fully transparent red must stay red, not blend toward background
        rgba.put_pixel(0, 0, Rgba([200, 10, 20, 0]));
        let decoded =
            read_image_from_buffer(&png_bytes(DynamicImage::ImageRgba8(rgba)), &limits).unwrap();

        assert_eq!(decoded.as_rgb().get_pixel(0, 0).0, [200, 10, 20]);
    }

    #[test]
    fn test_promotes_gray_alpha() {
        let limits = DecodeLimits::default();
        let mut la = image::GrayAlphaImage::new(110, 110);
        la.put_pixel(1, 1, LumaA([99, 128]));
        let decoded =
            read_image_from_buffer(&png_bytes(DynamicImage::ImageLumaA8(la)), &limits).unwrap();

        assert_eq!(decoded.as_rgb().get_pixel(1, 1).0, [99, 99, 99]);
    }

    #[test]
    fn test_encode_png_round_trip() {
        let limits = DecodeLimits::default();
        let mut img = RgbImage::new(150, 130);
        img.put_pixel(10, 20, image::Rgb([1, 2, 3]));
        let bytes = encode_png(&img).unwrap();

        let decoded = read_image_from_buffer(&bytes, &limits).unwrap();
        assert_eq!(decoded.dimensions(), (150, 130));
        assert_eq!(decoded.as_rgb().get_pixel(10, 20).0, [1, 2, 3]);
    }
}
