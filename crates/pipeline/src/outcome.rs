//! Terminal pipeline artifact

use serde::{Deserialize, Serialize};
use terradiff_algorithms::regions::Region;

/// Confidence label derived from the comparison method's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Near-identical scenes; the percentage is highly trustworthy
    Excellent,
    /// Good structural agreement outside the changed regions
    Good,
    /// Substantial disagreement; review the heatmap before trusting numbers
    Fair,
    /// The pair barely resembles each other; likely misregistered inputs
    Poor,
}

impl Quality {
    /// Derive the label from a similarity score in [0, 1]
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 0.95 {
            Quality::Excellent
        } else if similarity >= 0.80 {
            Quality::Good
        } else if similarity >= 0.50 {
            Quality::Fair
        } else {
            Quality::Poor
        }
    }
}

/// Everything one pipeline run produces.
///
/// Created once per run and immutable afterwards; the caller owns
/// persistence and presentation.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Share of changed cells in the final mask, 0.0-100.0, 2 decimals
    pub change_percentage: f64,
    /// Encoded heatmap artifact
    pub heatmap: Vec<u8>,
    /// MIME type of `heatmap`
    pub heatmap_mime: &'static str,
    /// Wall-clock processing time in seconds, 2 decimals
    pub processing_time: f64,
    /// Retained change regions in discovery order
    pub regions: Vec<Region>,
    /// Run-level similarity score in [0, 1] backing `quality`
    pub similarity: f64,
    /// Confidence label derived from `similarity`
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_bands() {
        assert_eq!(Quality::from_similarity(1.0), Quality::Excellent);
        assert_eq!(Quality::from_similarity(0.95), Quality::Excellent);
        assert_eq!(Quality::from_similarity(0.90), Quality::Good);
        assert_eq!(Quality::from_similarity(0.60), Quality::Fair);
        assert_eq!(Quality::from_similarity(0.10), Quality::Poor);
    }
}
