//! Mosaic render pass: an explicit render context with a deterministic
//! tile queue
//!
//! All per-render state (configuration snapshot, grid dimensions, color
//! grid, placement record, surface) lives in [`MosaicRenderer`]; nothing is
//! ambient. Tiles are drawn from a precomputed queue in column-outer,
//! row-inner order, in chunks pulled by the caller, so the surface fills
//! incrementally while completion order stays deterministic.

use crate::io::configuration::{
    DEFAULT_HOVER_SIZE, DEFAULT_TILE_ALPHA, DEFAULT_TILE_COLUMNS, GIF_FRAME_DELAY_MS,
    MAX_HOVER_SIZE, MAX_SURFACE_WIDTH, MAX_TILE_COLUMNS, MIN_HOVER_SIZE, MIN_TILE_COLUMNS,
    TILES_PER_STEP,
};
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::SampleSet;
use crate::io::visualization::FillCapture;
use crate::render::blend::CompositeMode;
use crate::render::magnifier::magnified_tile;
use crate::render::sampler::ColorGrid;
use crate::render::surface::Surface;
use crate::spatial::TileGrid;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// User-adjustable rendering parameters
///
/// The configuration surface (CLI parsing, viewer widgets) is responsible
/// for clamping values to valid bounds via [`RenderConfig::sanitized`]
/// before they reach the renderer; the renderer assumes valid bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Number of tile columns
    pub tile_columns: u32,
    /// Alpha applied when compositing sample images into tiles
    pub tile_alpha: f32,
    /// Compositing mode for sample images
    pub composite: CompositeMode,
    /// Magnified hover preview size in pixels
    pub hover_size: u32,
    /// Whether tiles are backed by sampled color fills; when disabled the
    /// full source image is drawn once as a base layer instead
    pub pixelated: bool,
    /// Upper bound on the output surface width in pixels
    pub max_width: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_columns: DEFAULT_TILE_COLUMNS,
            tile_alpha: DEFAULT_TILE_ALPHA,
            composite: CompositeMode::SoftLight,
            hover_size: DEFAULT_HOVER_SIZE,
            pixelated: true,
            max_width: MAX_SURFACE_WIDTH,
        }
    }
}

impl RenderConfig {
    /// Clamp all values to their valid bounds
    pub fn sanitized(self) -> Self {
        Self {
            tile_columns: self.tile_columns.clamp(MIN_TILE_COLUMNS, MAX_TILE_COLUMNS),
            tile_alpha: self.tile_alpha.clamp(0.0, 1.0),
            composite: self.composite,
            hover_size: self.hover_size.clamp(MIN_HOVER_SIZE, MAX_HOVER_SIZE),
            pixelated: self.pixelated,
            max_width: self.max_width.clamp(MIN_TILE_COLUMNS, MAX_SURFACE_WIDTH),
        }
    }
}

/// Seeded random sample selector
///
/// Seeding per render makes tile selection reproducible for testing; the
/// default is an OS-entropy seed for non-deterministic output.
pub struct SampleSelector {
    rng: StdRng,
}

impl SampleSelector {
    /// Create a selector, seeded when a seed is pinned
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self { rng }
    }

    /// Pick a uniformly random index below `len`
    ///
    /// Callers guarantee a non-empty range; the render pass rejects empty
    /// sample sets before any selection happens.
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Per-tile record of which sample image was drawn where
///
/// Rebuilt fresh on every render; lookups outside the grid or for tiles not
/// yet drawn yield `None` and are tolerated, never an error.
#[derive(Debug, Clone)]
pub struct PlacementRecord {
    cells: Array2<Option<usize>>,
}

impl PlacementRecord {
    fn new(columns: u32, rows: u32) -> Self {
        Self {
            cells: Array2::from_elem((rows as usize, columns as usize), None),
        }
    }

    /// Sample index recorded for the tile at (`col`, `row`), if any
    pub fn get(&self, col: u32, row: u32) -> Option<usize> {
        self.cells
            .get((row as usize, col as usize))
            .copied()
            .flatten()
    }

    fn record(&mut self, col: u32, row: u32, sample: usize) {
        if let Some(cell) = self.cells.get_mut((row as usize, col as usize)) {
            *cell = Some(sample);
        }
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the record holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether every cell has a recorded sample
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// One full mosaic render over a source image
///
/// Construction samples the color grid, prepares the surface and the tile
/// queue, and pre-scales every sample image to the tile size; [`step`]
/// then drains the queue cooperatively.
///
/// [`step`]: MosaicRenderer::step
pub struct MosaicRenderer {
    config: RenderConfig,
    grid: TileGrid,
    colors: ColorGrid,
    placements: PlacementRecord,
    surface: Surface,
    scaled_samples: Vec<RgbaImage>,
    tiles: Vec<(u32, u32)>,
    cursor: usize,
    selector: SampleSelector,
    capture: Option<FillCapture>,
}

impl MosaicRenderer {
    /// Start a new render pass
    ///
    /// # Errors
    ///
    /// Returns an error if the sample set is empty (random selection would
    /// be undefined) or the derived grid has no rows for this source.
    pub fn new(
        source: &RgbaImage,
        samples: &SampleSet,
        config: RenderConfig,
        seed: Option<u64>,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(MosaicError::EmptySampleSet);
        }

        let grid = TileGrid::derive(
            source.width(),
            source.height(),
            config.tile_columns,
            config.max_width,
        );
        if grid.rows() == 0 {
            return Err(invalid_parameter(
                "tile_columns",
                &config.tile_columns,
                &"derived grid has zero rows for this source aspect ratio",
            ));
        }

        let colors = ColorGrid::sample(source, &grid);

        let mut surface = Surface::new(grid.surface_width(), grid.surface_height());
        if !config.pixelated {
            // Base layer: the full source scaled to the surface, drawn once
            let base = imageops::resize(
                source,
                grid.surface_width(),
                grid.surface_height(),
                FilterType::Triangle,
            );
            surface.composite_image(&base, 0, 0, 1.0, CompositeMode::SourceOver);
        }

        let tile_size = grid.tile_size();
        let scaled_samples = samples
            .iter()
            .map(|sample| imageops::resize(sample, tile_size, tile_size, FilterType::Triangle))
            .collect();

        let tiles = (0..grid.columns())
            .flat_map(|col| (0..grid.rows()).map(move |row| (col, row)))
            .collect();

        Ok(Self {
            config,
            grid,
            placements: PlacementRecord::new(grid.columns(), grid.rows()),
            colors,
            surface,
            scaled_samples,
            tiles,
            cursor: 0,
            selector: SampleSelector::new(seed),
            capture: None,
        })
    }

    /// Adjust the hover magnification size for subsequent pointer events
    ///
    /// Hover size is the one configuration value that applies immediately,
    /// without restarting the render.
    pub const fn set_hover_size(&mut self, hover_size: u32) {
        self.config.hover_size = hover_size;
    }

    /// Record tile placements for later GIF export
    pub fn enable_visualization(&mut self) {
        self.capture = Some(FillCapture::new(
            self.grid.columns(),
            self.grid.rows(),
            self.colors.iter(),
        ));
    }

    /// Draw up to `budget` tiles from the queue
    ///
    /// Returns `true` while tiles remain, `false` once the pass is complete.
    /// The baseline snapshot is taken when the final tile lands.
    pub fn step(&mut self, budget: usize) -> bool {
        let end = self.cursor.saturating_add(budget).min(self.tiles.len());
        while self.cursor < end {
            if let Some(&(col, row)) = self.tiles.get(self.cursor) {
                self.draw_tile(col, row);
            }
            self.cursor += 1;
            if self.cursor == self.tiles.len() {
                self.surface.snapshot();
            }
        }
        self.cursor < self.tiles.len()
    }

    /// Drain the tile queue to completion
    pub fn run(&mut self) {
        while self.step(TILES_PER_STEP) {}
    }

    fn draw_tile(&mut self, col: u32, row: u32) {
        let (x, y) = self.grid.origin_of(col, row);

        if self.config.pixelated
            && let Some(color) = self.colors.get(col, row)
        {
            self.surface.fill_rect(x, y, self.grid.tile_size(), color);
        }

        let index = self.selector.pick(self.scaled_samples.len());
        self.placements.record(col, row, index);
        if let Some(capture) = &mut self.capture
            && let Some(color) = self.colors.get(col, row)
        {
            capture.record(col, row, color);
        }

        if let Some(sample) = self.scaled_samples.get(index) {
            self.surface.composite_image(
                sample,
                i64::from(x),
                i64::from(y),
                self.config.tile_alpha,
                self.config.composite,
            );
        }
    }

    /// Redraw one tile magnified under the pointer
    ///
    /// Restores the baseline snapshot, then draws the recorded sample for
    /// the tile under `pointer` scaled to the configured hover size and
    /// clamped inside the surface. Returns whether the surface changed; a
    /// missing baseline (no completed pass yet) or a missing placement
    /// entry degrades to a restore-only or full no-op.
    pub fn magnify_at(&mut self, samples: &SampleSet, pointer: (f32, f32)) -> bool {
        if !self.surface.restore() {
            return false;
        }

        let Some(target) = magnified_tile(
            pointer,
            &self.grid,
            self.config.hover_size,
            self.surface.width(),
            self.surface.height(),
        ) else {
            return true;
        };
        let Some(index) = self.placements.get(target.col, target.row) else {
            return true;
        };
        let Some(sample) = samples.get(index) else {
            return true;
        };

        let magnified = imageops::resize(sample, target.size, target.size, FilterType::Triangle);
        self.surface.composite_image(
            &magnified,
            target.origin.0,
            target.origin.1,
            1.0,
            CompositeMode::SourceOver,
        );
        true
    }

    /// Export the recorded fill order as an animated GIF
    ///
    /// # Errors
    ///
    /// Returns an error if visualization was never enabled or encoding
    /// fails.
    pub fn export_visualization(&self, output_path: &str) -> Result<()> {
        match &self.capture {
            Some(capture) => capture.export_gif(output_path, GIF_FRAME_DELAY_MS),
            None => Err(invalid_parameter(
                "visualization",
                &output_path,
                &"visualization capture was not enabled for this render",
            )),
        }
    }

    /// Configuration snapshot this pass was started with
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Derived tile grid for this pass
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Per-tile fill colors for this pass
    pub const fn colors(&self) -> &ColorGrid {
        &self.colors
    }

    /// Per-tile sample placements recorded so far
    pub const fn placements(&self) -> &PlacementRecord {
        &self.placements
    }

    /// Current surface pixels
    pub const fn surface_pixels(&self) -> &RgbaImage {
        self.surface.pixels()
    }

    /// Baseline snapshot of the completed tile pass, if taken
    pub const fn snapshot(&self) -> Option<&RgbaImage> {
        self.surface.baseline()
    }

    /// Whether every tile has been drawn
    pub const fn is_complete(&self) -> bool {
        self.cursor >= self.tiles.len()
    }

    /// Total number of tiles in this pass
    pub const fn tiles_total(&self) -> usize {
        self.tiles.len()
    }

    /// Number of tiles drawn so far
    pub const fn tiles_drawn(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_sanitize_clamps_bounds() {
        let config = RenderConfig {
            tile_columns: 1000,
            tile_alpha: 3.0,
            composite: CompositeMode::Multiply,
            hover_size: 5,
            pixelated: false,
            max_width: 50_000,
        }
        .sanitized();
        assert_eq!(config.tile_columns, MAX_TILE_COLUMNS);
        assert!((config.tile_alpha - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.hover_size, MIN_HOVER_SIZE);
        assert_eq!(config.max_width, MAX_SURFACE_WIDTH);
    }

    #[test]
    fn test_seeded_selector_is_deterministic() {
        let mut a = SampleSelector::new(Some(7));
        let mut b = SampleSelector::new(Some(7));
        let picks_a: Vec<usize> = (0..32).map(|_| a.pick(13)).collect();
        let picks_b: Vec<usize> = (0..32).map(|_| b.pick(13)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&p| p < 13));
    }
}
