//! Command-line interface for headless mosaic rendering

use crate::io::configuration::{
    DEFAULT_HOVER_SIZE, DEFAULT_TILE_ALPHA, DEFAULT_TILE_COLUMNS, HOVER_SUFFIX, MAX_SURFACE_WIDTH,
    OUTPUT_SUFFIX, TILES_PER_STEP,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{SampleSet, load_rgba, save_png};
use crate::io::progress::RenderProgress;
use crate::render::blend::CompositeMode;
use crate::render::renderer::{MosaicRenderer, RenderConfig};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mosaicker")]
#[command(
    author,
    version,
    about = "Render randomized photo mosaics with hover magnification"
)]
/// Command-line arguments for the mosaic renderer
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source image to mosaic
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory of sample images composited into tiles
    #[arg(short, long, value_name = "DIR")]
    pub samples: PathBuf,

    /// Output PNG path (defaults to <source>_mosaic.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of tile columns
    #[arg(short, long, default_value_t = DEFAULT_TILE_COLUMNS)]
    pub columns: u32,

    /// Alpha applied when compositing sample images into tiles
    #[arg(short, long, default_value_t = DEFAULT_TILE_ALPHA)]
    pub alpha: f32,

    /// Compositing mode for sample images
    #[arg(short = 'm', long, default_value_t = CompositeMode::SoftLight)]
    pub composite: CompositeMode,

    /// Skip per-tile color fills and keep the full source as a base layer
    #[arg(long)]
    pub no_pixelate: bool,

    /// Maximum surface width in pixels
    #[arg(short = 'w', long, default_value_t = MAX_SURFACE_WIDTH)]
    pub max_width: u32,

    /// Magnified hover preview size in pixels
    #[arg(long, default_value_t = DEFAULT_HOVER_SIZE)]
    pub hover_size: u32,

    /// Export a hover snapshot for a pointer position, e.g. --hover 130,42
    #[arg(long, value_name = "X,Y", value_parser = parse_pointer)]
    pub hover: Option<(f32, f32)>,

    /// Random seed for reproducible tile selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export the incremental fill as an animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Launch the interactive viewer instead of rendering to a file
    #[arg(short = 'I', long)]
    pub interactive: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Check if tiles are backed by sampled color fills
    pub const fn pixelated(&self) -> bool {
        !self.no_pixelate
    }

    /// Build the clamped render configuration from the arguments
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            tile_columns: self.columns,
            tile_alpha: self.alpha,
            composite: self.composite,
            hover_size: self.hover_size,
            pixelated: self.pixelated(),
            max_width: self.max_width,
        }
        .sanitized()
    }
}

/// Parse an "X,Y" pointer position argument
fn parse_pointer(value: &str) -> std::result::Result<(f32, f32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x = x
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid X coordinate '{x}': {e}"))?;
    let y = y
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid Y coordinate '{y}': {e}"))?;
    Ok((x, y))
}

/// Runs one headless render job from CLI arguments
pub struct MosaicJob {
    cli: Cli,
}

impl MosaicJob {
    /// Create a job from parsed CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Render the mosaic and write all requested outputs
    ///
    /// # Errors
    ///
    /// Returns an error if image loading, rendering, or any export fails.
    // Allow print for user feedback on written outputs
    #[allow(clippy::print_stderr)]
    pub fn process(&self) -> Result<()> {
        let source = load_rgba(&self.cli.source)?;
        let samples = SampleSet::load_dir(&self.cli.samples)?;

        let mut renderer =
            MosaicRenderer::new(&source, &samples, self.cli.render_config(), self.cli.seed)?;
        if self.cli.visualize {
            renderer.enable_visualization();
        }

        let progress = self
            .cli
            .should_show_progress()
            .then(|| RenderProgress::new(&self.cli.source, renderer.tiles_total()));

        loop {
            let more = renderer.step(TILES_PER_STEP);
            if let Some(ref bar) = progress {
                bar.update(renderer.tiles_drawn());
            }
            if !more {
                break;
            }
        }
        if let Some(ref bar) = progress {
            bar.finish();
        }

        let output_path = self
            .cli
            .output
            .clone()
            .unwrap_or_else(|| Self::derived_path(&self.cli.source, OUTPUT_SUFFIX, "png"));
        let snapshot = renderer.snapshot().unwrap_or(renderer.surface_pixels());
        save_png(snapshot, &output_path)?;
        if !self.cli.quiet {
            eprintln!("Wrote {}", output_path.display());
        }

        if let Some(pointer) = self.cli.hover {
            renderer.magnify_at(&samples, pointer);
            let hover_path = Self::derived_path(&self.cli.source, HOVER_SUFFIX, "png");
            save_png(renderer.surface_pixels(), &hover_path)?;
            if !self.cli.quiet {
                eprintln!("Wrote {}", hover_path.display());
            }
        }

        if self.cli.visualize {
            let viz_path = Self::derived_path(&self.cli.source, "_visualization", "gif");
            renderer.export_visualization(viz_path.to_str().ok_or_else(|| {
                invalid_parameter(
                    "visualization_path",
                    &viz_path.display(),
                    &"path is not valid UTF-8",
                )
            })?)?;
            if !self.cli.quiet {
                eprintln!("Wrote {}", viz_path.display());
            }
        }

        Ok(())
    }

    fn derived_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

        input_path
            .parent()
            .map_or_else(|| PathBuf::from(&name), |parent| parent.join(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pointer_accepts_whitespace() {
        assert_eq!(parse_pointer("130, 42.5"), Ok((130.0, 42.5)));
        assert!(parse_pointer("130").is_err());
        assert!(parse_pointer("a,b").is_err());
    }

    #[test]
    fn test_derived_path_keeps_parent_directory() {
        let path = MosaicJob::derived_path(Path::new("shots/city.png"), OUTPUT_SUFFIX, "png");
        assert_eq!(path, PathBuf::from("shots/city_mosaic.png"));
    }

    #[test]
    fn test_render_config_is_sanitized() {
        let cli = Cli::parse_from([
            "mosaicker",
            "city.png",
            "--samples",
            "samples",
            "--columns",
            "9999",
        ]);
        assert_eq!(
            cli.render_config().tile_columns,
            crate::io::configuration::MAX_TILE_COLUMNS
        );
        assert!(cli.pixelated());
    }
}
