//! TerraDiff CLI - Image change detection

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use terradiff_core::io::{read_image, DecodeLimits};
use terradiff_pipeline::{
    ChangeDetector, ComparisonMode, ColorScheme, DetectorConfig, RenderMode, ThresholdMode,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "terradiff")]
#[command(author, version, about = "Image change detection", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two images and write the heatmap
    Compare {
        /// Before image (reference frame)
        before: PathBuf,
        /// After image (resampled to the before frame if needed)
        after: PathBuf,
        /// Output heatmap file (PNG)
        #[arg(short, long, default_value = "heatmap.png")]
        out: PathBuf,
        /// Comparison mode: absolute, structural
        #[arg(short, long, default_value = "absolute")]
        mode: String,
        /// Threshold mode: fixed, otsu, adaptive
        #[arg(long, default_value = "fixed")]
        threshold_mode: String,
        /// Fixed threshold cutoff on the 0-255 scale
        #[arg(short, long, default_value = "25")]
        threshold: u8,
        /// Minimum region area in pixels
        #[arg(long, default_value = "100")]
        min_region_area: usize,
        /// SSIM window side (odd)
        #[arg(long, default_value = "7")]
        ssim_window: usize,
        /// Render mode: colormap, annotated
        #[arg(short, long, default_value = "colormap")]
        render: String,
        /// Color scheme for colormap rendering: jet, grayscale, divergent
        #[arg(long, default_value = "jet")]
        scheme: String,
        /// Abort the run after this many seconds
        #[arg(long)]
        timeout_secs: Option<f64>,
    },
    /// Show information about an image file
    Info {
        /// Input image
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn parse_comparison_mode(s: &str) -> Result<ComparisonMode> {
    match s.to_lowercase().as_str() {
        "absolute" | "abs" => Ok(ComparisonMode::Absolute),
        "structural" | "ssim" => Ok(ComparisonMode::Structural),
        _ => anyhow::bail!("Unknown comparison mode: {}. Use absolute or structural.", s),
    }
}

fn parse_threshold_mode(s: &str) -> Result<ThresholdMode> {
    match s.to_lowercase().as_str() {
        "fixed" => Ok(ThresholdMode::Fixed),
        "otsu" => Ok(ThresholdMode::Otsu),
        "adaptive" => Ok(ThresholdMode::Adaptive),
        _ => anyhow::bail!("Unknown threshold mode: {}. Use fixed, otsu, or adaptive.", s),
    }
}

fn parse_render_mode(s: &str) -> Result<RenderMode> {
    match s.to_lowercase().as_str() {
        "colormap" | "heat" => Ok(RenderMode::Colormap),
        "annotated" | "boxes" => Ok(RenderMode::Annotated),
        _ => anyhow::bail!("Unknown render mode: {}. Use colormap or annotated.", s),
    }
}

fn parse_scheme(s: &str) -> Result<ColorScheme> {
    match s.to_lowercase().as_str() {
        "jet" => Ok(ColorScheme::Jet),
        "grayscale" | "gray" => Ok(ColorScheme::Grayscale),
        "divergent" => Ok(ColorScheme::Divergent),
        _ => anyhow::bail!("Unknown color scheme: {}. Use jet, grayscale, or divergent.", s),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Compare {
            before,
            after,
            out,
            mode,
            threshold_mode,
            threshold,
            min_region_area,
            ssim_window,
            render,
            scheme,
            timeout_secs,
        } => {
            let config = DetectorConfig {
                comparison_mode: parse_comparison_mode(&mode)?,
                threshold_mode: parse_threshold_mode(&threshold_mode)?,
                threshold_value: threshold,
                min_region_area,
                ssim_window_size: ssim_window,
                render_mode: parse_render_mode(&render)?,
                colormap: parse_scheme(&scheme)?,
                timeout: timeout_secs.map(Duration::from_secs_f64),
                ..DetectorConfig::default()
            };
            let detector =
                ChangeDetector::new(config).context("Invalid detector configuration")?;

            let pb = spinner("Comparing images...");
            let outcome = detector
                .detect_files(&before, &after)
                .context("Change detection failed")?;
            pb.finish_and_clear();

            std::fs::write(&out, &outcome.heatmap)
                .with_context(|| format!("Failed to write heatmap to {}", out.display()))?;

            println!("Change: {:.2}%", outcome.change_percentage);
            println!("Quality: {:?} (similarity {:.4})", outcome.quality, outcome.similarity);
            println!("Regions: {}", outcome.regions.len());
            for (i, region) in outcome.regions.iter().enumerate() {
                info!(
                    "  #{}: {} px at ({}, {}) {}x{}",
                    i + 1,
                    region.area,
                    region.bbox.x,
                    region.bbox.y,
                    region.bbox.width,
                    region.bbox.height
                );
            }
            println!("Heatmap saved to: {}", out.display());
            println!("  Processing time: {:.2}s", outcome.processing_time);
        }

        Commands::Info { input } => {
            let pb = spinner("Decoding image...");
            let image = read_image(&input, &DecodeLimits::default())
                .context("Failed to decode image")?;
            pb.finish_and_clear();

            println!("File: {}", input.display());
            println!(
                "Dimensions: {} x {} ({} pixels)",
                image.width(),
                image.height(),
                image.width() as u64 * image.height() as u64
            );
            println!("Channels: 3 (normalized RGB)");
        }
    }

    Ok(())
}
