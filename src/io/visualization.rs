//! Frame capture and GIF generation for the incremental tile fill
//!
//! Records tile placement events during a render pass and replays them as
//! an animated GIF at tile-grid resolution (one pixel per tile, using the
//! tile fill colors), so the fill order is visible without re-running the
//! compositing pipeline.

use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{MosaicError, Result};
use image::{Frame, Rgba, RgbaImage};

/// A single tile placement event
#[derive(Debug, Clone)]
pub struct TileFill {
    /// Tile column
    pub col: u32,
    /// Tile row
    pub row: u32,
    /// Fill color recorded for the tile
    pub color: Rgba<u8>,
}

/// Captures tile placements for fill-order visualization
pub struct FillCapture {
    placements: Vec<TileFill>,
    columns: u32,
    rows: u32,
    empty_color: Rgba<u8>,
}

impl FillCapture {
    /// Create a capture for a grid of the given dimensions
    ///
    /// The average of the supplied tile colors is used as the empty color
    /// so unfilled cells read as neutral background.
    pub fn new<'a>(columns: u32, rows: u32, colors: impl Iterator<Item = &'a Rgba<u8>>) -> Self {
        let mut sums = [0u64; 4];
        let mut count = 0u64;
        for color in colors {
            for (sum, channel) in sums.iter_mut().zip(color.0.iter()) {
                *sum += u64::from(*channel);
            }
            count += 1;
        }
        let empty_color = if count == 0 {
            Rgba([128, 128, 128, 255])
        } else {
            Rgba([
                (sums[0] / count) as u8,
                (sums[1] / count) as u8,
                (sums[2] / count) as u8,
                (sums[3] / count) as u8,
            ])
        };

        Self {
            placements: Vec::with_capacity(columns as usize * rows as usize),
            columns,
            rows,
            empty_color,
        }
    }

    /// Record a tile placement
    pub fn record(&mut self, col: u32, row: u32, color: Rgba<u8>) {
        self.placements.push(TileFill { col, row, color });
    }

    /// Total number of recorded placement events
    pub const fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Export the captured fill as a GIF with automatic frame skipping
    ///
    /// Skips frames when the requested frame rate exceeds what GIF viewers
    /// reliably support, keeping the apparent animation speed.
    ///
    /// # Errors
    ///
    /// Returns an error if no placements were captured, file system
    /// operations fail, or GIF encoding fails.
    pub fn export_gif(&self, output_path: &str, frame_delay_ms: u32) -> Result<()> {
        if self.placements.is_empty() {
            return Err(MosaicError::InvalidParameter {
                parameter: "visualization",
                value: String::new(),
                reason: "no tile placements captured".to_string(),
            });
        }

        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor);

        if let Some(parent) = std::path::Path::new(output_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| MosaicError::FileSystem {
            path: output_path.into(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| MosaicError::ImageExport {
                path: output_path.into(),
                source: e,
            })?;

        Ok(())
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Vec<Frame> {
        let mut canvas = RgbaImage::from_pixel(self.columns, self.rows, self.empty_color);
        let mut frames = vec![Self::render_frame(&canvas, delay_ms)];

        let mut frame_count = 0;
        for placement in &self.placements {
            if placement.col < self.columns && placement.row < self.rows {
                canvas.put_pixel(placement.col, placement.row, placement.color);
                frame_count += 1;
                if frame_count % skip_factor == 0 {
                    frames.push(Self::render_frame(&canvas, delay_ms));
                }
            }
        }

        if frame_count % skip_factor != 0 {
            frames.push(Self::render_frame(&canvas, delay_ms));
        }

        // Final frame displays longer for better visibility
        let final_frame_delay = delay_ms * 25;
        if let Some(last) = frames.last().map(|f| f.buffer().clone()) {
            frames.push(Frame::from_parts(
                last,
                0,
                0,
                image::Delay::from_numer_denom_ms(final_frame_delay, 1),
            ));
        }

        frames
    }

    fn render_frame(canvas: &RgbaImage, delay_ms: u32) -> Frame {
        Frame::from_parts(
            canvas.clone(),
            0,
            0,
            image::Delay::from_numer_denom_ms(delay_ms, 1),
        )
    }
}
