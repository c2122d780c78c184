//! Output surface: an owned RGBA pixel buffer with baseline snapshot support
//!
//! The surface is mutated only by the render pass and the hover magnifier.
//! Once a tile pass completes it is snapshotted into a baseline image so the
//! magnifier can cheaply restore the tiled view before drawing an overlay.

use crate::render::blend::{CompositeMode, composite_pixel};
use image::{Rgba, RgbaImage};

/// Mutable pixel surface for one render
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    baseline: Option<RgbaImage>,
}

impl Surface {
    /// Create a fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            baseline: None,
        }
    }

    /// Surface width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Surface height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Current surface pixels
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Fill a rectangle with a solid color, clipped to the surface
    pub fn fill_rect(&mut self, x: u32, y: u32, size: u32, color: Rgba<u8>) {
        let x_end = x.saturating_add(size).min(self.pixels.width());
        let y_end = y.saturating_add(size).min(self.pixels.height());
        for py in y..y_end {
            for px in x..x_end {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }

    /// Composite an image onto the surface at the given origin
    ///
    /// Compositing is restricted to the drawn image's extent; destination
    /// pixels outside it are untouched by every mode. Pixels falling
    /// outside the surface are clipped.
    pub fn composite_image(
        &mut self,
        img: &RgbaImage,
        origin_x: i64,
        origin_y: i64,
        alpha: f32,
        mode: CompositeMode,
    ) {
        let width = i64::from(self.pixels.width());
        let height = i64::from(self.pixels.height());

        for (sx, sy, &src) in img.enumerate_pixels() {
            let tx = origin_x + i64::from(sx);
            let ty = origin_y + i64::from(sy);
            if tx < 0 || ty < 0 || tx >= width || ty >= height {
                continue;
            }
            let dst = *self.pixels.get_pixel(tx as u32, ty as u32);
            self.pixels
                .put_pixel(tx as u32, ty as u32, composite_pixel(dst, src, mode, alpha));
        }
    }

    /// Snapshot the current pixels as the baseline image
    pub fn snapshot(&mut self) {
        self.baseline = Some(self.pixels.clone());
    }

    /// The baseline snapshot taken when the last tile pass completed
    pub const fn baseline(&self) -> Option<&RgbaImage> {
        self.baseline.as_ref()
    }

    /// Restore the surface to the baseline snapshot
    ///
    /// Returns `false` (leaving the surface untouched) when no snapshot has
    /// been taken yet.
    pub fn restore(&mut self) -> bool {
        match &self.baseline {
            Some(baseline) => {
                self.pixels.clone_from(baseline);
                true
            }
            None => false,
        }
    }
}
