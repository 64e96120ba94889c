//! Level decoding and the ordered set of levels a session plays through.
//!
//! A level image encodes one tile per pixel. The red channel carries the
//! tile type; values at or above [`TILE_TYPE_LIMIT`] are clamped to tile
//! type 0. The green channel carries spawn markers: [`CRAB_MARKER`] places a
//! crab at that tile and [`PLAYER_SPAWN_MARKER`] places the player. Other
//! green values are ignored.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tideline_core::{EnemyKind, EnemySpawn, GameConfig, TilePosition, TILE_TYPE_LIMIT};
use tracing::{info, warn};

use crate::TileGrid;

/// Green channel value that places a crab.
pub const CRAB_MARKER: u8 = 0;

/// Green channel value that places the player. The first marker in row-major order wins.
pub const PLAYER_SPAWN_MARKER: u8 = 100;

/// Player spawn used when a level image carries no player marker.
pub const DEFAULT_PLAYER_SPAWN: TilePosition = TilePosition::new(1, 1);

/// Reasons a level cannot be loaded. Loading failures are fatal to that level.
#[derive(Debug, Error)]
pub enum LevelFormatError {
    /// The image or tile rows had a zero dimension.
    #[error("level image must not be empty, got {width}x{height}")]
    EmptyImage {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },
    /// Tile rows passed to [`TileGrid::from_rows`] had different lengths.
    #[error("row {row} has {found} tiles but row 0 has {expected}")]
    RaggedRows {
        /// Index of the first mismatching row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the mismatching row.
        found: usize,
    },
    /// The grid dimensions do not fit the tile index type.
    #[error("level dimensions exceed the addressable grid")]
    TooLarge,
    /// A level file or directory could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A level file could not be decoded as an image.
    #[error("failed to decode level image {}: {source}", .path.display())]
    Image {
        /// Path that failed.
        path: PathBuf,
        /// Underlying decoder failure.
        #[source]
        source: image::ImageError,
    },
    /// A level set was requested without any levels.
    #[error("no level images were provided")]
    NoLevels,
}

/// One decoded level. Read-only to everything except the loader.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    grid: TileGrid,
    enemy_spawns: Vec<EnemySpawn>,
    player_spawn: TilePosition,
    player_spawn_is_default: bool,
    max_scroll_offset: f32,
    max_vertical_extent: f32,
}

impl Level {
    /// Assembles a level from an already-built grid and spawn list.
    ///
    /// The scroll bounds are derived from the grid and the configured viewport.
    #[must_use]
    pub fn new(
        grid: TileGrid,
        enemy_spawns: Vec<EnemySpawn>,
        player_spawn: Option<TilePosition>,
        config: &GameConfig,
    ) -> Self {
        let hidden_columns = grid.columns().saturating_sub(config.tiles_in_width);
        let max_scroll_offset = hidden_columns as f32 * grid.tile_size();
        let max_vertical_extent = grid.height();
        Self {
            enemy_spawns,
            player_spawn: player_spawn.unwrap_or(DEFAULT_PLAYER_SPAWN),
            player_spawn_is_default: player_spawn.is_none(),
            max_scroll_offset,
            max_vertical_extent,
            grid,
        }
    }

    /// Tile grid of the level.
    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Enemy spawn descriptors in row-major image order.
    #[must_use]
    pub fn enemy_spawns(&self) -> &[EnemySpawn] {
        &self.enemy_spawns
    }

    /// Tile the player spawns on.
    #[must_use]
    pub fn player_spawn(&self) -> TilePosition {
        self.player_spawn
    }

    /// Whether the level lacked a player marker and fell back to the default spawn.
    #[must_use]
    pub fn player_spawn_is_default(&self) -> bool {
        self.player_spawn_is_default
    }

    /// Largest horizontal scroll offset in world units.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f32 {
        self.max_scroll_offset
    }

    /// Height of the level in world units.
    #[must_use]
    pub fn max_vertical_extent(&self) -> f32 {
        self.max_vertical_extent
    }
}

/// Decodes a level image into its tile grid and spawn descriptors.
///
/// This is a pure function of the pixels and the configuration; the
/// resulting [`Level`] holds no reference to the image.
pub fn decode_level(image: &RgbImage, config: &GameConfig) -> Result<Level, LevelFormatError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(LevelFormatError::EmptyImage { width, height });
    }

    let mut tiles = Vec::with_capacity(width as usize * height as usize);
    let mut enemy_spawns = Vec::new();
    let mut player_spawn = None;

    for (column, row, pixel) in image.enumerate_pixels() {
        let [red, green, _] = pixel.0;
        tiles.push(if red >= TILE_TYPE_LIMIT { 0 } else { red });

        let tile = TilePosition::new(column, row);
        match green {
            CRAB_MARKER => enemy_spawns.push(EnemySpawn {
                kind: EnemyKind::Crab,
                tile,
            }),
            PLAYER_SPAWN_MARKER if player_spawn.is_none() => player_spawn = Some(tile),
            _ => {}
        }
    }

    let grid = TileGrid::from_tiles(width, height, tiles, config.tile_size(), config.game_height());
    if height > config.tiles_in_height {
        warn!(
            rows = height,
            visible_rows = config.tiles_in_height,
            "level_taller_than_viewport"
        );
    }
    if player_spawn.is_none() {
        warn!(
            column = DEFAULT_PLAYER_SPAWN.column(),
            row = DEFAULT_PLAYER_SPAWN.row(),
            "level_missing_player_spawn"
        );
    }

    Ok(Level::new(grid, enemy_spawns, player_spawn, config))
}

/// Reads and decodes a single level image from disk.
pub fn load_level(path: &Path, config: &GameConfig) -> Result<Level, LevelFormatError> {
    let reader = ImageReader::open(path).map_err(|source| LevelFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| LevelFormatError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let level = decode_level(&decoded.to_rgb8(), config)?;
    info!(
        path = %path.display(),
        columns = level.grid().columns(),
        rows = level.grid().rows(),
        passable = level.grid().passable_count(),
        enemies = level.enemy_spawns().len(),
        "level_decoded"
    );
    Ok(level)
}

/// Ordered levels and the index of the one being played.
#[derive(Clone, Debug)]
pub struct LevelSet {
    levels: Vec<Level>,
    current: usize,
}

impl LevelSet {
    /// Builds a level set from decoded levels, starting at the first.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, LevelFormatError> {
        if levels.is_empty() {
            return Err(LevelFormatError::NoLevels);
        }
        Ok(Self { levels, current: 0 })
    }

    /// Loads every `.png` in `dir`, ordered by file name.
    pub fn load_dir(dir: &Path, config: &GameConfig) -> Result<Self, LevelFormatError> {
        let io_error = |source| LevelFormatError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let is_png = path
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case("png"));
            if is_png && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let levels = paths
            .iter()
            .map(|path| load_level(path, config))
            .collect::<Result<Vec<_>, _>>()?;
        info!(dir = %dir.display(), count = levels.len(), "level_set_loaded");
        Self::from_levels(levels)
    }

    /// Level currently being played.
    #[must_use]
    pub fn current(&self) -> &Level {
        &self.levels[self.current]
    }

    /// Index of the level currently being played.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Levels in play order.
    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// Number of levels in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; a level set holds at least one level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Moves to the next level, wrapping to the first after the last.
    ///
    /// Returns `true` when the set wrapped around.
    pub fn advance(&mut self) -> bool {
        self.current += 1;
        if self.current >= self.levels.len() {
            self.current = 0;
            return true;
        }
        false
    }
}
