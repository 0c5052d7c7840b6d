//! Detector configuration
//!
//! One explicit configuration struct replaces the scattered module-level
//! constants of older change-detection tooling. Defaults match the most
//! capable variant: fixed threshold 25 on the 0-255 scale, 3x3 close x2 /
//! open x1 cleanup, 100 px² region noise floor, 10 MiB upload ceiling and
//! a [100, 5000] px dimension window.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use terradiff_algorithms::difference::{ComparisonMode, SsimParams};
use terradiff_algorithms::regions::RegionParams;
use terradiff_algorithms::segment::{
    MorphologyParams, SegmentParams, ThresholdMode, ThresholdParams,
};
use terradiff_colormap::{AnnotateParams, ColormapParams, ColorScheme};
use terradiff_core::io::DecodeLimits;
use terradiff_core::{Error, Result};

/// How the heatmap artifact is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Perceptual color map over the dissimilarity map
    #[default]
    Colormap,
    /// After image with highlighted regions and bounding boxes
    Annotated,
}

/// Full configuration for a [`ChangeDetector`](crate::ChangeDetector)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Dissimilarity measure between the aligned pair
    pub comparison_mode: ComparisonMode,
    /// Threshold policy converting the map into a mask
    pub threshold_mode: ThresholdMode,
    /// Cutoff for the fixed threshold policy, 0-255 scale
    pub threshold_value: u8,
    /// Window side for the adaptive threshold policy; odd
    pub adaptive_window: usize,
    /// Offset above the local mean for the adaptive policy
    pub adaptive_offset: f64,
    /// Post-threshold morphological cleanup
    pub morphology: MorphologyParams,
    /// Regions below this pixel count are discarded
    pub min_region_area: usize,
    /// SSIM comparison window side; odd
    pub ssim_window_size: usize,
    /// SSIM Gaussian window sigma
    pub ssim_sigma: f64,
    /// Heatmap rendering strategy
    pub render_mode: RenderMode,
    /// Color scheme for [`RenderMode::Colormap`]
    pub colormap: ColorScheme,
    /// Highlight/outline styling for [`RenderMode::Annotated`]
    pub annotate: AnnotateParams,
    /// Decoder byte-size ceiling
    pub max_file_size_bytes: u64,
    /// Decoder minimum accepted width/height
    pub min_dimension: u32,
    /// Decoder maximum accepted width/height
    pub max_dimension: u32,
    /// Wall-clock budget for one run; checked at stage boundaries
    pub timeout: Option<Duration>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let threshold = ThresholdParams::default();
        let limits = DecodeLimits::default();
        let ssim = SsimParams::default();
        Self {
            comparison_mode: ComparisonMode::default(),
            threshold_mode: threshold.mode,
            threshold_value: threshold.value,
            adaptive_window: threshold.adaptive_window,
            adaptive_offset: threshold.adaptive_offset,
            morphology: MorphologyParams::default(),
            min_region_area: RegionParams::default().min_area,
            ssim_window_size: ssim.window_size,
            ssim_sigma: ssim.sigma,
            render_mode: RenderMode::default(),
            colormap: ColorScheme::default(),
            annotate: AnnotateParams::default(),
            max_file_size_bytes: limits.max_file_size_bytes,
            min_dimension: limits.min_dimension,
            max_dimension: limits.max_dimension,
            timeout: None,
        }
    }
}

impl DetectorConfig {
    /// Reject configurations no stage could accept
    pub fn validate(&self) -> Result<()> {
        if self.min_dimension == 0 || self.min_dimension > self.max_dimension {
            return Err(Error::InvalidParameter {
                name: "min_dimension",
                value: self.min_dimension.to_string(),
                reason: format!(
                    "dimension window [{}, {}] is empty",
                    self.min_dimension, self.max_dimension
                ),
            });
        }
        if self.ssim_window_size % 2 == 0 || self.ssim_window_size == 0 {
            return Err(Error::InvalidParameter {
                name: "ssim_window_size",
                value: self.ssim_window_size.to_string(),
                reason: "SSIM window must be odd".to_string(),
            });
        }
        if self.adaptive_window % 2 == 0 || self.adaptive_window == 0 {
            return Err(Error::InvalidParameter {
                name: "adaptive_window",
                value: self.adaptive_window.to_string(),
                reason: "adaptive threshold window must be odd".to_string(),
            });
        }
        self.morphology.element.validate()?;
        Ok(())
    }

    /// Decoder limits for stage 1
    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_file_size_bytes: self.max_file_size_bytes,
            min_dimension: self.min_dimension,
            max_dimension: self.max_dimension,
        }
    }

    /// SSIM parameters for the structural comparison
    pub fn ssim_params(&self) -> SsimParams {
        SsimParams {
            window_size: self.ssim_window_size,
            sigma: self.ssim_sigma,
        }
    }

    /// Segmentation parameters (threshold + morphology)
    pub fn segment_params(&self) -> SegmentParams {
        SegmentParams {
            threshold: ThresholdParams {
                mode: self.threshold_mode,
                value: self.threshold_value,
                adaptive_window: self.adaptive_window,
                adaptive_offset: self.adaptive_offset,
            },
            morphology: self.morphology.clone(),
        }
    }

    /// Region extraction parameters
    pub fn region_params(&self) -> RegionParams {
        RegionParams {
            min_area: self.min_region_area,
        }
    }

    /// Colormap rendering parameters
    pub fn colormap_params(&self) -> ColormapParams {
        ColormapParams {
            scheme: self.colormap,
            ..ColormapParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = DetectorConfig::default();
        assert_eq!(config.threshold_value, 25);
        assert_eq!(config.min_region_area, 100);
        assert_eq!(config.ssim_window_size, 7);
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.min_dimension, 100);
        assert_eq!(config.max_dimension, 5000);
        assert_eq!(config.morphology.close_iterations, 2);
        assert_eq!(config.morphology.open_iterations, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_dimension_window() {
        let config = DetectorConfig {
            min_dimension: 6000,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_even_windows() {
        let config = DetectorConfig {
            ssim_window_size: 8,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectorConfig {
            adaptive_window: 12,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
