//! Raster grid and decoded image types

mod element;
mod grid;
mod image;

pub use element::RasterElement;
pub use grid::Raster;
pub use image::RasterImage;
