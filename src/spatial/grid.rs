//! Tile grid geometry derived from the source image and configuration
//!
//! All grid quantities are computed once per render: the column count comes
//! from configuration, the row count follows the source aspect ratio, and
//! the tile size divides the surface width with ceiling rounding so the
//! rightmost column may overhang the surface and is clipped when drawn.

/// Derived tile-grid dimensions for a single render
///
/// Row count is `floor(columns * aspect)` where `aspect` is source height
/// over source width; tile size is `ceil(max_width / columns)`. The surface
/// is `max_width` wide and exactly `rows * tile_size` tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_size: u32,
    surface_width: u32,
    surface_height: u32,
}

impl TileGrid {
    /// Derive grid dimensions from source dimensions and configuration
    pub fn derive(source_width: u32, source_height: u32, columns: u32, max_width: u32) -> Self {
        let aspect = f64::from(source_height) / f64::from(source_width);
        let tile_size = max_width.div_ceil(columns);
        let rows = (f64::from(columns) * aspect).floor() as u32;

        Self {
            columns,
            rows,
            tile_size,
            surface_width: max_width,
            surface_height: rows * tile_size,
        }
    }

    /// Number of tile columns
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of one square tile in pixels
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Output surface width in pixels
    pub const fn surface_width(&self) -> u32 {
        self.surface_width
    }

    /// Output surface height in pixels
    pub const fn surface_height(&self) -> u32 {
        self.surface_height
    }

    /// Total number of tiles in the grid
    pub const fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Row-major index of the tile at (`col`, `row`)
    pub const fn index_of(&self, col: u32, row: u32) -> usize {
        col as usize + row as usize * self.columns as usize
    }

    /// Pixel origin (top-left corner) of the tile at (`col`, `row`)
    pub const fn origin_of(&self, col: u32, row: u32) -> (u32, u32) {
        (col * self.tile_size, row * self.tile_size)
    }

    /// Tile coordinates enclosing a pixel position, if any
    ///
    /// Positions outside the surface or below the last tile row snap to
    /// `None` rather than clamping, so callers can treat out-of-grid
    /// pointer events as a no-op.
    pub fn tile_at(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        if x < 0.0 || y < 0.0 || self.tile_size == 0 {
            return None;
        }
        let col = (x / self.tile_size as f32).floor() as u32;
        let row = (y / self.tile_size as f32).floor() as u32;
        (col < self.columns && row < self.rows).then_some((col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario from a 1000x500 source at 50 columns: aspect 0.5 gives
    // 25 rows, 20px tiles, and a 1000x500 surface.
    #[test]
    fn test_derive_reference_scenario() {
        let grid = TileGrid::derive(1000, 500, 50, 1000);
        assert_eq!(grid.columns(), 50);
        assert_eq!(grid.rows(), 25);
        assert_eq!(grid.tile_size(), 20);
        assert_eq!(grid.surface_width(), 1000);
        assert_eq!(grid.surface_height(), 500);
        assert_eq!(grid.tile_count(), 1250);
    }

    #[test]
    fn test_tile_size_ceiling_covers_surface_width() {
        for columns in 2..=200 {
            let grid = TileGrid::derive(800, 600, columns, 1000);
            let covered = grid.tile_size() * columns;
            assert!(covered >= 1000, "columns={columns} leaves surface uncovered");
            assert!(
                covered < 1000 + grid.tile_size(),
                "columns={columns} overshoots by a full tile"
            );
        }
    }

    #[test]
    fn test_index_is_row_major() {
        let grid = TileGrid::derive(1000, 500, 50, 1000);
        assert_eq!(grid.index_of(0, 0), 0);
        assert_eq!(grid.index_of(3, 0), 3);
        assert_eq!(grid.index_of(0, 1), 50);
        assert_eq!(grid.index_of(7, 2), 107);
    }

    #[test]
    fn test_tile_at_snaps_to_enclosing_tile() {
        let grid = TileGrid::derive(1000, 500, 50, 1000);
        assert_eq!(grid.tile_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(grid.tile_at(19.9, 19.9), Some((0, 0)));
        assert_eq!(grid.tile_at(20.0, 0.0), Some((1, 0)));
        assert_eq!(grid.tile_at(999.0, 499.0), Some((49, 24)));
    }

    #[test]
    fn test_tile_at_rejects_out_of_grid_positions() {
        let grid = TileGrid::derive(1000, 500, 50, 1000);
        assert_eq!(grid.tile_at(-1.0, 10.0), None);
        assert_eq!(grid.tile_at(10.0, -0.1), None);
        assert_eq!(grid.tile_at(10.0, 500.0), None);
        assert_eq!(grid.tile_at(1000.5, 10.0), None);
    }

    #[test]
    fn test_extreme_aspect_ratio_can_produce_zero_rows() {
        // A source 10x wider than tall at 2 columns has no full tile row
        let grid = TileGrid::derive(2000, 200, 2, 1000);
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.tile_count(), 0);
    }
}
