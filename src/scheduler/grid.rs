//! Tile grid geometry and placement status

use crate::io::error::invalid_parameter;
use crate::raster::Coord;

/// Grid position of a tile; `gx` counts columns, `gy` counts rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Column index in the tile grid
    pub gx: usize,
    /// Row index in the tile grid
    pub gy: usize,
}

impl TileCoord {
    /// Create a tile coordinate
    pub const fn new(gx: usize, gy: usize) -> Self {
        Self { gx, gy }
    }

    /// Whether this is the seed tile at the grid origin
    pub const fn is_origin(self) -> bool {
        self.gx == 0 && self.gy == 0
    }
}

/// Lifecycle of a tile in the scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TileStatus {
    /// Not yet claimed by any worker
    #[default]
    Unclaimed,
    /// Claimed by a worker and being processed
    InProgress,
    /// Fully written to the output image
    Done,
}

/// Partition of the output image into overlapping patch placements
///
/// Tiles advance by the chunk stride (patch size minus overlap) but each
/// writes a full patch-sized rectangle, so adjacent placements share their
/// overlap strips.
#[derive(Debug, Clone, Copy)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    chunk: usize,
}

impl TileGrid {
    /// Partition a `width x height` output into tiles with the given chunk
    /// stride
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension or the stride is zero
    pub fn new(width: usize, height: usize, chunk: usize) -> crate::Result<Self> {
        if chunk == 0 {
            return Err(invalid_parameter(
                "chunk",
                &chunk,
                &"tile stride must be positive",
            ));
        }

        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "dimensions",
                &format!("{width}x{height}"),
                &"output dimensions must be positive",
            ));
        }

        Ok(Self {
            cols: width.div_ceil(chunk),
            rows: height.div_ceil(chunk),
            chunk,
        })
    }

    /// Number of tile columns
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of tile rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Chunk stride between adjacent tile anchors
    pub const fn chunk(&self) -> usize {
        self.chunk
    }

    /// Total number of tiles in the grid
    pub const fn tile_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Output-image anchor of a tile
    pub const fn anchor(&self, tile: TileCoord) -> Coord {
        Coord::new((tile.gx * self.chunk) as i32, (tile.gy * self.chunk) as i32)
    }

    /// Overlap-dependency ancestors of a tile: left, top, and top-left
    ///
    /// All returned tiles must be `Done` before `tile` may start matching.
    pub fn ancestors(&self, tile: TileCoord) -> impl Iterator<Item = TileCoord> {
        let left = (tile.gx > 0).then(|| TileCoord::new(tile.gx - 1, tile.gy));
        let top = (tile.gy > 0).then(|| TileCoord::new(tile.gx, tile.gy - 1));
        let diagonal =
            (tile.gx > 0 && tile.gy > 0).then(|| TileCoord::new(tile.gx - 1, tile.gy - 1));

        left.into_iter().chain(top).chain(diagonal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_round_up() {
        let grid = TileGrid::new(64, 64, 12).unwrap();
        assert_eq!((grid.cols(), grid.rows()), (6, 6));
        assert_eq!(grid.tile_count(), 36);
    }

    #[test]
    fn test_unit_chunk_gives_one_tile_per_pixel() {
        let grid = TileGrid::new(6, 5, 1).unwrap();
        assert_eq!((grid.cols(), grid.rows()), (6, 5));
    }

    #[test]
    fn test_anchor_advances_by_chunk_stride() {
        let grid = TileGrid::new(64, 64, 12).unwrap();
        assert_eq!(grid.anchor(TileCoord::new(2, 3)), Coord::new(24, 36));
    }

    #[test]
    fn test_zero_stride_is_rejected() {
        assert!(TileGrid::new(10, 10, 0).is_err());
    }

    #[test]
    fn test_origin_has_no_ancestors() {
        let grid = TileGrid::new(32, 32, 8).unwrap();
        assert_eq!(grid.ancestors(TileCoord::new(0, 0)).count(), 0);
        assert_eq!(grid.ancestors(TileCoord::new(1, 0)).count(), 1);
        assert_eq!(grid.ancestors(TileCoord::new(0, 1)).count(), 1);
        assert_eq!(grid.ancestors(TileCoord::new(2, 2)).count(), 3);
    }
}
