#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tideline simulation.
//!
//! This crate defines the data model that connects adapters, the level world,
//! and the per-tick systems. Adapters submit [`Command`] values once per
//! frame, the playing session executes them against the current level, and
//! broadcasts [`Event`] values describing what happened during the tick. The
//! render collaborator consumes a [`FrameSnapshot`] after each tick and never
//! participates in physics or behavior decisions.

pub mod config;

pub use config::{
    AnimationConfig, CameraConfig, ConfigError, CrabConfig, GameConfig, PhysicsConfig,
    PlayerConfig, Size,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tile type that is not solid. Every other tile type blocks movement.
pub const PASSABLE_TILE: u8 = 11;

/// Exclusive upper bound of the tile types a level image may encode.
///
/// Red channel values at or above this bound are normalised to tile type 0.
pub const TILE_TYPE_LIMIT: u8 = 48;

/// Intents delivered by the input collaborator before a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intents {
    /// Whether the move-left control is held.
    pub left: bool,
    /// Whether the move-right control is held.
    pub right: bool,
    /// Whether the jump control is held.
    pub jump: bool,
    /// Whether an attack was pressed on this frame.
    pub attack: bool,
}

impl Intents {
    /// Intents with every control released.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            left: false,
            right: false,
            jump: false,
            attack: false,
        }
    }
}

/// Commands that express every mutation the surrounding game loop may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by one fixed step using the provided intents.
    Tick {
        /// Input intents sampled before the tick.
        intents: Intents,
    },
    /// Flips the pause flag. Paused sessions ignore ticks.
    TogglePause,
    /// Releases every held movement intent, e.g. after the window lost focus.
    FocusLost,
    /// Restores the player and every enemy of the current level to spawn.
    ResetAll,
    /// Replaces the current level with the next one in the level set.
    LoadNextLevel,
}

/// Events broadcast by the playing session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// The player touched the ground after being airborne.
    PlayerLanded,
    /// An enemy attack connected with the player.
    PlayerDamaged {
        /// Damage applied by the attack.
        amount: u32,
        /// Player health remaining after the attack.
        health: u32,
    },
    /// A player attack connected with an enemy that survived the hit.
    EnemyHit {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Enemy health remaining after the hit.
        health: u32,
    },
    /// A player attack reduced an enemy's health to zero.
    EnemyKilled {
        /// Identifier of the enemy that started dying.
        enemy: EnemyId,
    },
    /// The player's health reached zero.
    GameOver,
    /// Every enemy of the current level has been defeated.
    LevelCompleted {
        /// Index of the completed level within the level set.
        level_index: usize,
    },
    /// A level became the active level.
    LevelLoaded {
        /// Index of the loaded level within the level set.
        level_index: usize,
    },
    /// The level set wrapped around after its last level.
    AllLevelsCompleted,
    /// The pause flag changed.
    PauseToggled {
        /// Pause flag after the toggle.
        paused: bool,
    },
}

/// Location of a single tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    column: u32,
    row: u32,
}

impl TilePosition {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Top-left corner of the tile expressed in world units.
    #[must_use]
    pub fn world_origin(&self, tile_size: f32) -> (f32, f32) {
        (self.column as f32 * tile_size, self.row as f32 * tile_size)
    }
}

/// Reasons a hitbox can be rejected at construction.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum HitboxError {
    /// A coordinate or dimension was NaN or infinite.
    #[error("hitbox components must be finite (x={x}, y={y}, width={width}, height={height})")]
    NonFinite {
        /// Requested left edge.
        x: f32,
        /// Requested top edge.
        y: f32,
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
    /// The width or height was zero or negative.
    #[error("hitbox dimensions must be positive (width={width}, height={height})")]
    Degenerate {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

/// Axis-aligned rectangle used for both collision and combat overlap tests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Left edge in world units.
    pub x: f32,
    /// Top edge in world units.
    pub y: f32,
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
}

impl Hitbox {
    /// Creates a hitbox, rejecting non-finite or non-positive components.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, HitboxError> {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(HitboxError::NonFinite {
                x,
                y,
                width,
                height,
            });
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(HitboxError::Degenerate { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Right edge in world units.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge in world units.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center in world units.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Reports whether the two rectangles overlap with a non-empty area.
    #[must_use]
    pub fn intersects(&self, other: &Hitbox) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Horizontal direction an entity faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward decreasing x.
    Left,
    /// Facing toward increasing x.
    #[default]
    Right,
}

impl Facing {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Signed unit multiplier for horizontal speeds.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Unique identifier assigned to an enemy, stable for the lifetime of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy archetypes a level image can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground-bound crab that patrols toward the player and pinches at melee range.
    Crab,
}

/// Spawn descriptor decoded from a level image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Archetype to spawn.
    pub kind: EnemyKind,
    /// Tile whose top-left corner anchors the enemy hitbox.
    pub tile: TilePosition,
}

/// Behavior states of an AI-controlled entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Waiting for the player to come into view.
    #[default]
    Idle,
    /// Walking toward the player.
    Moving,
    /// Playing an attack swing.
    Attacking,
    /// Staggered after taking damage.
    Hit,
    /// Playing the death animation; terminal until reset.
    Dead,
}

/// Animation states of the player entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAnimation {
    /// Standing still on the ground.
    #[default]
    Idle,
    /// Walking on the ground.
    Running,
    /// Rising after a jump.
    Jumping,
    /// Falling.
    Falling,
    /// Swinging an attack.
    Attacking,
}

/// Player state consumed by the render collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Collision rectangle in world units.
    pub hitbox: Hitbox,
    /// Direction the player faces.
    pub facing: Facing,
    /// Animation to display.
    pub animation: PlayerAnimation,
    /// Frame index within the animation.
    pub animation_frame: u32,
    /// Remaining health.
    pub health: u32,
    /// Whether the player stands on solid ground.
    pub on_ground: bool,
}

/// Enemy state consumed by the render collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Collision rectangle in world units.
    pub hitbox: Hitbox,
    /// Direction the enemy faces.
    pub facing: Facing,
    /// Behavior state, which doubles as the animation to display.
    pub state: EnemyState,
    /// Frame index within the animation.
    pub animation_frame: u32,
    /// Remaining health.
    pub health: u32,
}

/// Everything the render collaborator needs after a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Index of the active level within the level set.
    pub level_index: usize,
    /// Horizontal world-to-viewport translation.
    pub scroll_offset: f32,
    /// Player state.
    pub player: PlayerSnapshot,
    /// Enemies that are alive or still playing their death animation, ordered by id.
    pub enemies: Vec<EnemySnapshot>,
    /// Whether the session is paused.
    pub paused: bool,
    /// Whether the player has died.
    pub game_over: bool,
    /// Whether every enemy of the level has been defeated.
    pub level_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitbox_rejects_degenerate_dimensions() {
        assert_eq!(
            Hitbox::new(0.0, 0.0, 0.0, 4.0),
            Err(HitboxError::Degenerate {
                width: 0.0,
                height: 4.0
            })
        );
        assert!(matches!(
            Hitbox::new(f32::NAN, 0.0, 4.0, 4.0),
            Err(HitboxError::NonFinite { .. })
        ));
        assert!(Hitbox::new(-3.0, 2.0, 4.0, 4.0).is_ok());
    }

    #[test]
    fn touching_hitboxes_do_not_intersect() {
        let left = Hitbox::new(0.0, 0.0, 10.0, 10.0).expect("hitbox");
        let right = Hitbox::new(10.0, 0.0, 10.0, 10.0).expect("hitbox");
        let overlapping = Hitbox::new(9.5, 9.5, 1.0, 1.0).expect("hitbox");

        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }

    #[test]
    fn tile_position_converts_to_world_units() {
        assert_eq!(TilePosition::new(5, 3).world_origin(32.0), (160.0, 96.0));
    }

    #[test]
    fn facing_flips_and_signs() {
        assert_eq!(Facing::Left.flipped(), Facing::Right);
        assert!((Facing::Left.sign() + 1.0).abs() < f32::EPSILON);
        assert!((Facing::Right.sign() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn frame_snapshot_survives_bincode() {
        let hitbox = Hitbox::new(12.0, 40.0, 20.0, 27.0).expect("hitbox");
        let snapshot = FrameSnapshot {
            level_index: 1,
            scroll_offset: 64.0,
            player: PlayerSnapshot {
                hitbox,
                facing: Facing::Left,
                animation: PlayerAnimation::Running,
                animation_frame: 2,
                health: 85,
                on_ground: true,
            },
            enemies: vec![EnemySnapshot {
                id: EnemyId::new(3),
                kind: EnemyKind::Crab,
                hitbox,
                facing: Facing::Right,
                state: EnemyState::Hit,
                animation_frame: 1,
                health: 0,
            }],
            paused: false,
            game_over: false,
            level_completed: false,
        };

        let bytes = bincode::serialize(&snapshot).expect("serialize");
        let restored: FrameSnapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, snapshot);
    }
}
