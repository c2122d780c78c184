//! Rendering constants and runtime configuration defaults

// Configuration surface bounds; the renderer assumes values inside them
/// Smallest allowed tile column count
pub const MIN_TILE_COLUMNS: u32 = 2;
/// Largest allowed tile column count
pub const MAX_TILE_COLUMNS: u32 = 200;
/// Default tile column count
pub const DEFAULT_TILE_COLUMNS: u32 = 50;

/// Default alpha applied when compositing sample images into tiles
pub const DEFAULT_TILE_ALPHA: f32 = 1.0;

/// Smallest allowed hover magnification size in pixels
pub const MIN_HOVER_SIZE: u32 = 30;
/// Largest allowed hover magnification size in pixels
pub const MAX_HOVER_SIZE: u32 = 400;
/// Default hover magnification size in pixels
pub const DEFAULT_HOVER_SIZE: u32 = 200;
/// Hover size slider increment in the viewer
pub const HOVER_SIZE_STEP: u32 = 10;

/// Upper bound on the output surface width in pixels
pub const MAX_SURFACE_WIDTH: u32 = 1000;

// Cooperative scheduling settings
/// Number of tiles drawn per cooperative render step
pub const TILES_PER_STEP: usize = 64;
/// Delay before the first tile chunk, so a loading indicator can appear
pub const RENDER_START_DELAY_MS: u64 = 4;

// Output settings
/// Suffix added to mosaic output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Suffix added to hover snapshot filenames
pub const HOVER_SUFFIX: &str = "_hover";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 5;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;
