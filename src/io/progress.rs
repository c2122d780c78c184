//! Progress display for the tile render pass

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static TILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} tiles")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks tile completion for one render pass
pub struct RenderProgress {
    bar: ProgressBar,
}

impl RenderProgress {
    /// Create a progress bar sized to the tile count
    pub fn new(source: &Path, total_tiles: usize) -> Self {
        let bar = ProgressBar::new(total_tiles as u64);
        bar.set_style(TILE_STYLE.clone());
        bar.set_message(
            source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        );
        Self { bar }
    }

    /// Report the number of tiles drawn so far
    pub fn update(&self, tiles_drawn: usize) {
        self.bar.set_position(tiles_drawn as u64);
    }

    /// Mark the render as finished and release the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
