//! Immutable game-scale configuration threaded through every constructor.
//!
//! Lengths and speeds are stored in unscaled sprite pixels and multiplied by
//! [`GameConfig::scale`] when read through the accessor methods, so changing
//! the scale keeps the game's proportions intact.

use serde::Deserialize;
use thiserror::Error;

/// Width and height pair expressed in unscaled sprite pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Vertical motion tuning shared by every entity.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration added per tick while airborne.
    pub gravity: f32,
    /// Vertical speed applied when a jump starts. Must be negative.
    pub jump_speed: f32,
    /// Largest downward speed an airborne entity can reach.
    pub terminal_fall_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.04,
            jump_speed: -2.25,
            terminal_fall_speed: 3.0,
        }
    }
}

/// Player tuning.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal distance covered per tick while a move intent is held.
    pub speed: f32,
    /// Collision rectangle size.
    pub hitbox: Size,
    /// Health at spawn.
    pub max_health: u32,
    /// Attack rectangle size.
    pub attack_box: Size,
    /// Gap between the hitbox and the attack rectangle, also used as its vertical inset.
    pub attack_offset: f32,
    /// Damage a connecting attack deals to an enemy.
    pub attack_damage: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            hitbox: Size::new(20.0, 27.0),
            max_health: 100,
            attack_box: Size::new(20.0, 20.0),
            attack_offset: 10.0,
            attack_damage: 10,
        }
    }
}

/// Crab enemy tuning.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrabConfig {
    /// Horizontal distance covered per tick while moving.
    pub speed: f32,
    /// Collision rectangle size.
    pub hitbox: Size,
    /// Health at spawn.
    pub max_health: u32,
    /// Damage a connecting pinch deals to the player.
    pub attack_damage: u32,
    /// Attack rectangle size.
    pub attack_box: Size,
    /// Distance the attack rectangle extends left of the hitbox.
    pub attack_box_offset: f32,
    /// Detection radius measured in tiles.
    pub sight_range_tiles: f32,
    /// Melee reach measured in tiles.
    pub attack_range_tiles: f32,
}

impl Default for CrabConfig {
    fn default() -> Self {
        Self {
            speed: 0.35,
            hitbox: Size::new(22.0, 19.0),
            max_health: 10,
            attack_damage: 15,
            attack_box: Size::new(82.0, 19.0),
            attack_box_offset: 30.0,
            sight_range_tiles: 5.0,
            attack_range_tiles: 1.0,
        }
    }
}

/// Animation pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Simulation ticks each animation frame stays on screen.
    pub ticks_per_frame: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { ticks_per_frame: 25 }
    }
}

/// Horizontal dead zone of the camera, as fractions of the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Left edge of the dead zone.
    pub left_border: f32,
    /// Right edge of the dead zone.
    pub right_border: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            left_border: 0.2,
            right_border: 0.8,
        }
    }
}

/// Reasons a configuration is rejected by [`GameConfig::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The scale factor was not a positive finite number.
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f32),
    /// The tile size or viewport dimension was zero.
    #[error("{field} must be greater than zero")]
    ZeroDimension {
        /// Name of the offending field.
        field: &'static str,
    },
    /// An entity hitbox does not fit strictly inside a single tile.
    #[error("{entity} hitbox {width}x{height} must be positive and smaller than a tile of {tile_size}")]
    HitboxDoesNotFitTile {
        /// Entity the hitbox belongs to.
        entity: &'static str,
        /// Scaled hitbox width.
        width: f32,
        /// Scaled hitbox height.
        height: f32,
        /// Scaled tile size.
        tile_size: f32,
    },
    /// The jump speed would not move an entity upward.
    #[error("jump_speed must be negative, got {0}")]
    NonNegativeJump(f32),
    /// A speed was negative, non-finite, or fast enough to skip a whole tile per tick.
    #[error("{field} must be within [0, tile size), got {value}")]
    SpeedOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Scaled value.
        value: f32,
    },
    /// The camera dead zone is empty or extends past the viewport.
    #[error("camera borders must satisfy 0 <= left < right <= 1, got {left}..{right}")]
    InvalidCameraBorders {
        /// Left border fraction.
        left: f32,
        /// Right border fraction.
        right: f32,
    },
}

/// Immutable game-scale configuration.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of a tile in unscaled sprite pixels.
    pub tiles_default_size: u32,
    /// Factor applied to every unscaled length.
    pub scale: f32,
    /// Number of tiles visible horizontally.
    pub tiles_in_width: u32,
    /// Number of tiles visible vertically.
    pub tiles_in_height: u32,
    /// Vertical motion tuning.
    pub physics: PhysicsConfig,
    /// Player tuning.
    pub player: PlayerConfig,
    /// Crab enemy tuning.
    pub crab: CrabConfig,
    /// Animation pacing.
    pub animation: AnimationConfig,
    /// Camera dead zone.
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tiles_default_size: 32,
            scale: 2.0,
            tiles_in_width: 26,
            tiles_in_height: 14,
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            crab: CrabConfig::default(),
            animation: AnimationConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl GameConfig {
    /// Edge length of a tile in world units.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tiles_default_size as f32 * self.scale
    }

    /// Viewport width in world units.
    #[must_use]
    pub fn game_width(&self) -> f32 {
        self.tiles_in_width as f32 * self.tile_size()
    }

    /// Viewport height in world units.
    #[must_use]
    pub fn game_height(&self) -> f32 {
        self.tiles_in_height as f32 * self.tile_size()
    }

    /// Scales an unscaled length into world units.
    #[must_use]
    pub fn scaled(&self, value: f32) -> f32 {
        value * self.scale
    }

    /// Scales an unscaled size into world units.
    #[must_use]
    pub fn scaled_size(&self, size: Size) -> Size {
        Size::new(self.scaled(size.width), self.scaled(size.height))
    }

    /// Per-tick gravity in world units.
    #[must_use]
    pub fn gravity(&self) -> f32 {
        self.scaled(self.physics.gravity)
    }

    /// Jump impulse in world units per tick.
    #[must_use]
    pub fn jump_speed(&self) -> f32 {
        self.scaled(self.physics.jump_speed)
    }

    /// Terminal fall speed in world units per tick.
    #[must_use]
    pub fn terminal_fall_speed(&self) -> f32 {
        self.scaled(self.physics.terminal_fall_speed)
    }

    /// Checks the invariants the collision model relies on.
    ///
    /// Corner sampling only detects walls reliably when every hitbox is
    /// smaller than a tile and no entity travels a full tile in one tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        for (field, value) in [
            ("tiles_default_size", self.tiles_default_size),
            ("tiles_in_width", self.tiles_in_width),
            ("tiles_in_height", self.tiles_in_height),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDimension { field });
            }
        }

        let tile_size = self.tile_size();
        for (entity, size) in [("player", self.player.hitbox), ("crab", self.crab.hitbox)] {
            let scaled = self.scaled_size(size);
            let fits = |extent: f32| extent.is_finite() && extent > 0.0 && extent < tile_size;
            if !fits(scaled.width) || !fits(scaled.height) {
                return Err(ConfigError::HitboxDoesNotFitTile {
                    entity,
                    width: scaled.width,
                    height: scaled.height,
                    tile_size,
                });
            }
        }

        if !self.physics.jump_speed.is_finite() || self.physics.jump_speed >= 0.0 {
            return Err(ConfigError::NonNegativeJump(self.physics.jump_speed));
        }

        for (field, value) in [
            ("physics.gravity", self.gravity()),
            ("physics.terminal_fall_speed", self.terminal_fall_speed()),
            ("physics.jump_speed", -self.jump_speed()),
            ("player.speed", self.scaled(self.player.speed)),
            ("crab.speed", self.scaled(self.crab.speed)),
        ] {
            if !value.is_finite() || value < 0.0 || value >= tile_size {
                return Err(ConfigError::SpeedOutOfRange { field, value });
            }
        }

        let CameraConfig {
            left_border,
            right_border,
        } = self.camera;
        if !(0.0..=1.0).contains(&left_border)
            || !(0.0..=1.0).contains(&right_border)
            || left_border >= right_border
        {
            return Err(ConfigError::InvalidCameraBorders {
                left: left_border,
                right: right_border,
            });
        }

        Ok(())
    }
}
