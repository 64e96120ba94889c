#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level representation for Tideline: the immutable tile grid, the decoder
//! that produces it from a level image, and the collision queries every
//! entity runs against it.

pub mod collision;
pub mod level;

pub use level::{decode_level, load_level, Level, LevelFormatError, LevelSet};

use tideline_core::PASSABLE_TILE;

/// Rectangular grid of tile type codes, origin top-left, immutable after load.
///
/// The grid also records the tile size and the viewport height it was
/// decoded for, so the collision queries can stay free functions of the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_size: f32,
    viewport_height: f32,
    tiles: Vec<u8>,
}

impl TileGrid {
    /// Builds a grid from row-major tile rows.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(
        rows: Vec<Vec<u8>>,
        tile_size: f32,
        viewport_height: f32,
    ) -> Result<Self, LevelFormatError> {
        let row_count = rows.len();
        let column_count = rows.first().map_or(0, Vec::len);
        if row_count == 0 || column_count == 0 {
            return Err(LevelFormatError::EmptyImage {
                width: u32::try_from(column_count).unwrap_or(u32::MAX),
                height: u32::try_from(row_count).unwrap_or(u32::MAX),
            });
        }

        let mut tiles = Vec::with_capacity(row_count * column_count);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != column_count {
                return Err(LevelFormatError::RaggedRows {
                    row: index,
                    expected: column_count,
                    found: row.len(),
                });
            }
            tiles.extend(row);
        }

        Ok(Self {
            columns: u32::try_from(column_count).map_err(|_| LevelFormatError::TooLarge)?,
            rows: u32::try_from(row_count).map_err(|_| LevelFormatError::TooLarge)?,
            tile_size,
            viewport_height,
            tiles,
        })
    }

    /// Builds a grid from row-major tiles whose count matches the dimensions.
    pub(crate) fn from_tiles(
        columns: u32,
        rows: u32,
        tiles: Vec<u8>,
        tile_size: f32,
        viewport_height: f32,
    ) -> Self {
        debug_assert_eq!(tiles.len(), columns as usize * rows as usize);
        Self {
            columns,
            rows,
            tile_size,
            viewport_height,
            tiles,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Height of the viewport the grid was loaded for, in world units.
    #[must_use]
    pub const fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Tile type at the provided indices, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, column: i64, row: i64) -> Option<u8> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.tiles.get(index).copied()
    }

    /// Iterator over the tile rows, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.tiles.chunks(self.columns as usize)
    }

    /// Number of passable tiles, mostly useful for diagnostics.
    #[must_use]
    pub fn passable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| **tile == PASSABLE_TILE).count()
    }
}
