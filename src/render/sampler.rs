//! Tile color sampling via low-resolution resampling of the source image
//!
//! A conceptual low-resolution copy of the source is produced at
//! `width = columns`, `height = rows`, and each pixel of that downsample
//! becomes one tile's fill color. Sampled colors are forced fully opaque:
//! the configured tile alpha applies only to sample-image compositing,
//! never to the fill color.

use crate::spatial::TileGrid;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use ndarray::Array2;

/// Ordered grid of per-tile fill colors, one per cell, row-major
#[derive(Debug, Clone)]
pub struct ColorGrid {
    cells: Array2<Rgba<u8>>,
}

impl ColorGrid {
    /// Downsample the source image into one opaque color per tile
    ///
    /// Assumes a fully decoded source and a grid with at least one row;
    /// degenerate grids are rejected before sampling by the render pass.
    pub fn sample(source: &RgbaImage, grid: &TileGrid) -> Self {
        let downsampled = imageops::resize(
            source,
            grid.columns(),
            grid.rows(),
            FilterType::Triangle,
        );

        let cells = Array2::from_shape_fn(
            (grid.rows() as usize, grid.columns() as usize),
            |(row, col)| {
                let pixel = downsampled.get_pixel(col as u32, row as u32);
                Rgba([pixel[0], pixel[1], pixel[2], 255])
            },
        );

        Self { cells }
    }

    /// Fill color for the tile at (`col`, `row`), if inside the grid
    pub fn get(&self, col: u32, row: u32) -> Option<Rgba<u8>> {
        self.cells.get((row as usize, col as usize)).copied()
    }

    /// Total number of cells (columns x rows)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cell colors in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Rgba<u8>> {
        self.cells.iter()
    }
}
