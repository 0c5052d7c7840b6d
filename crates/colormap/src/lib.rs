//! # TerraDiff Colormap
//!
//! Color mapping and heatmap rendering for TerraDiff.
//!
//! Two rendering strategies cover the pipeline's render modes: a
//! perceptual color map applied to the dissimilarity map
//! ([`render_colormap`]) and an annotated overlay highlighting retained
//! regions on the after image ([`annotate_regions`]).

mod annotate;
mod render;
mod scheme;

pub use annotate::{annotate_regions, AnnotateParams};
pub use render::{render_colormap, ColormapParams};
pub use scheme::{evaluate, ColorScheme, ColorStop, Rgb};
