//! Hover magnifier geometry
//!
//! Pointer positions snap down to the enclosing tile's top-left corner. The
//! magnified rectangle is centered on the tile's footprint via a symmetric
//! inset offset, then clamped per axis so it never extends outside the
//! surface: the right/bottom edge is pulled in first, and only then is the
//! left/top edge pushed back to zero if the first clamp underflowed.

use crate::spatial::TileGrid;

/// A tile target resolved from a pointer position, with the clamped
/// magnified rectangle to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnifiedTile {
    /// Tile column under the pointer
    pub col: u32,
    /// Tile row under the pointer
    pub row: u32,
    /// Top-left corner of the magnified rectangle on the surface
    pub origin: (i64, i64),
    /// Edge length of the magnified rectangle in pixels
    pub size: u32,
}

/// Resolve the tile under a pointer position and its magnified rectangle
///
/// Returns `None` when the pointer lies outside the tile grid.
pub fn magnified_tile(
    pointer: (f32, f32),
    grid: &TileGrid,
    hover_size: u32,
    surface_width: u32,
    surface_height: u32,
) -> Option<MagnifiedTile> {
    let (col, row) = grid.tile_at(pointer.0, pointer.1)?;
    let tile = grid.tile_size() as f32;
    let (x, y) = grid.origin_of(col, row);

    let ratio = hover_size as f32 / tile;
    let size = tile * ratio;
    let inset = (1.0 - ratio) * tile / 2.0;

    let dx = clamp_axis_offset(x as f32, inset, size, surface_width as f32);
    let dy = clamp_axis_offset(y as f32, inset, size, surface_height as f32);

    Some(MagnifiedTile {
        col,
        row,
        origin: (
            (x as f32 + dx).round() as i64,
            (y as f32 + dy).round() as i64,
        ),
        size: size.round() as u32,
    })
}

/// Clamp the centering offset along one axis
///
/// The far edge is clamped first; if that pushes the origin below zero, the
/// near edge wins and the origin lands exactly on the surface boundary.
fn clamp_axis_offset(origin: f32, inset: f32, size: f32, extent: f32) -> f32 {
    let mut offset = inset;
    if origin + offset + size > extent {
        offset = extent - size - origin;
    }
    if origin + offset < 0.0 {
        offset = -origin;
    }
    offset
}
