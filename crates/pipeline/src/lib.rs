//! # TerraDiff Pipeline
//!
//! End-to-end change detection for one image pair: decode and validate,
//! align, compute a dissimilarity map, segment it into a change mask,
//! extract regions, quantify, and render a heatmap.
//!
//! ## Usage
//!
//! ```ignore
//! use terradiff_pipeline::{ChangeDetector, DetectorConfig};
//!
//! let detector = ChangeDetector::new(DetectorConfig::default())?;
//! let outcome = detector.detect_files("before.png", "after.png")?;
//! println!("{:.2}% changed", outcome.change_percentage);
//! ```

mod config;
mod detector;
mod outcome;

pub use config::{DetectorConfig, RenderMode};
pub use detector::ChangeDetector;
pub use outcome::{AnalysisOutcome, Quality};

// Re-export the stage-level vocabulary callers configure against.
pub use terradiff_algorithms::difference::ComparisonMode;
pub use terradiff_algorithms::regions::{BoundingBox, Region};
pub use terradiff_algorithms::segment::ThresholdMode;
pub use terradiff_colormap::ColorScheme;
pub use terradiff_core::{Error, Result};
