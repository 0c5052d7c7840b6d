//! The change-detection pipeline orchestrator
//!
//! Runs decode -> align -> difference -> segment -> regions -> quantify ->
//! render to completion for one image pair. The run is synchronous and
//! CPU-bound; a caller-supplied timeout is honored at stage boundaries, and
//! a run that fails at any stage yields no partial outcome.

use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

use terradiff_algorithms::align::align_to_reference;
use terradiff_algorithms::difference::compare;
use terradiff_algorithms::quantify::{change_percentage, round2};
use terradiff_algorithms::regions::extract_regions;
use terradiff_algorithms::segment::segment;
use terradiff_colormap::{annotate_regions, render_colormap};
use terradiff_core::io::{self, HEATMAP_MIME};
use terradiff_core::raster::RasterImage;
use terradiff_core::{Error, Result};

use crate::config::{DetectorConfig, RenderMode};
use crate::outcome::{AnalysisOutcome, Quality};

/// Stage-boundary deadline derived from the configured timeout
struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    fn start(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Fail the run if the budget is spent. Called between stages only, so
    /// cancellation never exposes a partially-built artifact.
    fn check(&self, stage: &'static str) -> Result<()> {
        let Some(budget) = self.budget else {
            return Ok(());
        };
        let elapsed = self.start.elapsed();
        if elapsed >= budget {
            debug!(stage, ?elapsed, "timeout at stage boundary");
            return Err(Error::Timeout {
                elapsed_secs: elapsed.as_secs_f64(),
                budget_secs: budget.as_secs_f64(),
            });
        }
        Ok(())
    }

    fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// One configured pipeline instance.
///
/// Stateless across runs: every invocation owns its intermediates, so a
/// single detector may serve many threads concurrently.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    config: DetectorConfig,
}

impl ChangeDetector {
    /// Build a detector, rejecting configurations no stage could accept
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the pipeline over two image files
    pub fn detect_files<P: AsRef<Path>>(&self, before: P, after: P) -> Result<AnalysisOutcome> {
        let deadline = Deadline::start(self.config.timeout);
        deadline.check("decode")?;
        let limits = self.config.decode_limits();
        let before = io::read_image(before, &limits)?;
        let after = io::read_image(after, &limits)?;
        self.run(before, after, deadline)
    }

    /// Run the pipeline over two in-memory image buffers
    pub fn detect_buffers(&self, before: &[u8], after: &[u8]) -> Result<AnalysisOutcome> {
        let deadline = Deadline::start(self.config.timeout);
        deadline.check("decode")?;
        let limits = self.config.decode_limits();
        let before = io::read_image_from_buffer(before, &limits)?;
        let after = io::read_image_from_buffer(after, &limits)?;
        self.run(before, after, deadline)
    }

    fn run(
        &self,
        before: RasterImage,
        after: RasterImage,
        deadline: Deadline,
    ) -> Result<AnalysisOutcome> {
        debug!(
            before_w = before.width(),
            before_h = before.height(),
            after_w = after.width(),
            after_h = after.height(),
            "decoded pair"
        );

        deadline.check("align")?;
        let after = align_to_reference(&before, after)?;

        deadline.check("difference")?;
        let dissimilarity = compare(
            &before,
            &after,
            self.config.comparison_mode,
            &self.config.ssim_params(),
        )?;
        debug!(
            mode = ?self.config.comparison_mode,
            similarity = dissimilarity.similarity,
            "dissimilarity map ready"
        );

        deadline.check("segment")?;
        let mask = segment(&dissimilarity.map, &self.config.segment_params())?;

        deadline.check("regions")?;
        let regions = extract_regions(&mask, &self.config.region_params())?;
        debug!(retained = regions.len(), "regions extracted");

        deadline.check("quantify")?;
        let percentage = change_percentage(&mask)?;

        deadline.check("render")?;
        let rendered = match self.config.render_mode {
            RenderMode::Colormap => {
                render_colormap(&dissimilarity.map, &self.config.colormap_params())
            }
            RenderMode::Annotated => {
                annotate_regions(&after, &mask, &regions, &self.config.annotate)?
            }
        };
        let heatmap = io::encode_png(&rendered)?;

        let processing_time = round2(deadline.elapsed_secs());
        debug!(percentage, processing_time, "run complete");

        Ok(AnalysisOutcome {
            change_percentage: percentage,
            heatmap,
            heatmap_mime: HEATMAP_MIME,
            processing_time,
            regions,
            similarity: dissimilarity.similarity,
            quality: Quality::from_similarity(dissimilarity.similarity),
        })
    }
}
