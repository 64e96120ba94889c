//! Stateless geometric predicates over a [`TileGrid`].
//!
//! Every query takes the grid by shared reference and never mutates it, so
//! entities may call them in any order within a tick. Coordinates outside the
//! grid resolve to "solid": the world boundary blocks movement instead of
//! letting entities leave the level.
//!
//! Clearance is tested by sampling the four corners of a rectangle. This only
//! detects every wall when entities are smaller than one tile; an obstacle
//! narrower than an entity can slip between two sampled corners.

use tideline_core::{Hitbox, PASSABLE_TILE};

use crate::TileGrid;

/// Gap kept between an entity and the solid tile it is snapped against.
pub const SNAP_EPSILON: f32 = 1.0;

/// Reports whether the tile at the provided indices blocks movement.
///
/// Indices outside the grid are solid.
#[must_use]
pub fn is_tile_solid(grid: &TileGrid, column: i64, row: i64) -> bool {
    grid.tile(column, row)
        .map_or(true, |tile| tile != PASSABLE_TILE)
}

/// Reports whether the world-space point lies inside a solid tile.
///
/// Points left or right of the grid, above zero, or at or below the viewport
/// height are solid.
#[must_use]
pub fn is_point_solid(grid: &TileGrid, x: f32, y: f32) -> bool {
    if !(x >= 0.0 && x < grid.width()) {
        return true;
    }
    if !(y >= 0.0 && y < grid.viewport_height()) {
        return true;
    }

    let column = (x / grid.tile_size()).floor() as i64;
    let row = (y / grid.tile_size()).floor() as i64;
    is_tile_solid(grid, column, row)
}

/// Reports whether a rectangle placed at `(x, y)` has none of its corners in a solid tile.
#[must_use]
pub fn can_move_to(grid: &TileGrid, x: f32, y: f32, width: f32, height: f32) -> bool {
    !is_point_solid(grid, x, y)
        && !is_point_solid(grid, x + width, y + height)
        && !is_point_solid(grid, x + width, y)
        && !is_point_solid(grid, x, y + height)
}

/// Reports whether the hitbox translated by `(dx, dy)` is clear.
#[must_use]
pub fn can_move_by(grid: &TileGrid, hitbox: &Hitbox, dx: f32, dy: f32) -> bool {
    can_move_to(grid, hitbox.x + dx, hitbox.y + dy, hitbox.width, hitbox.height)
}

/// X coordinate that leaves the hitbox flush against the wall it was moving into.
///
/// Moving right, the right edge stops [`SNAP_EPSILON`] short of the next tile
/// boundary past the current right edge. Moving left, the left edge aligns to
/// the left boundary of the tile it currently occupies.
#[must_use]
pub fn snap_to_wall_x(grid: &TileGrid, hitbox: &Hitbox, x_speed: f32) -> f32 {
    let tile_size = grid.tile_size();
    if x_speed > 0.0 {
        let tile = (hitbox.right() / tile_size).floor();
        tile * tile_size + tile_size - hitbox.width - SNAP_EPSILON
    } else {
        (hitbox.x / tile_size).floor() * tile_size
    }
}

/// Y coordinate that leaves the hitbox resting on a floor or tucked under a ceiling.
///
/// Falling, the bottom edge stops [`SNAP_EPSILON`] above the next tile
/// boundary past the current bottom edge. Rising, the top edge aligns to the
/// top boundary of the tile it currently occupies.
#[must_use]
pub fn snap_to_floor_or_ceiling(grid: &TileGrid, hitbox: &Hitbox, vertical_speed: f32) -> f32 {
    let tile_size = grid.tile_size();
    if vertical_speed > 0.0 {
        let tile = (hitbox.bottom() / tile_size).floor();
        tile * tile_size + tile_size - hitbox.height - SNAP_EPSILON
    } else {
        (hitbox.y / tile_size).floor() * tile_size
    }
}

/// Reports whether the pixel row right under either bottom corner is solid.
#[must_use]
pub fn is_on_ground(grid: &TileGrid, hitbox: &Hitbox) -> bool {
    let below = hitbox.bottom() + 1.0;
    is_point_solid(grid, hitbox.x, below) || is_point_solid(grid, hitbox.right(), below)
}

/// Reports whether there is solid ground one unit below the leading edge after moving by `x_speed`.
#[must_use]
pub fn is_floor_ahead(grid: &TileGrid, hitbox: &Hitbox, x_speed: f32) -> bool {
    let below = hitbox.bottom() + 1.0;
    if x_speed > 0.0 {
        is_point_solid(grid, hitbox.right() + x_speed, below)
    } else {
        is_point_solid(grid, hitbox.x + x_speed, below)
    }
}

/// Reports whether a walkable floor with clear headroom connects the two hitboxes on `row`.
///
/// Every tile from the left hitbox's column up to, but not including, the
/// right hitbox's column must be passable on `row` and solid on the row
/// beneath it. The result does not depend on argument order.
#[must_use]
pub fn has_line_of_sight(grid: &TileGrid, row: i64, first: &Hitbox, second: &Hitbox) -> bool {
    let tile_size = grid.tile_size();
    let first_column = (first.x / tile_size).floor() as i64;
    let second_column = (second.x / tile_size).floor() as i64;
    let (start, end) = if first_column <= second_column {
        (first_column, second_column)
    } else {
        (second_column, first_column)
    };

    (start..end).all(|column| {
        !is_tile_solid(grid, column, row) && is_tile_solid(grid, column, row + 1)
    })
}

/// Tile row containing the top edge of the hitbox.
#[must_use]
pub fn tile_row_of(grid: &TileGrid, hitbox: &Hitbox) -> i64 {
    (hitbox.y / grid.tile_size()).floor() as i64
}
