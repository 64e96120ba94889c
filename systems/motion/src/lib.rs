#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic kinematic state machine shared by every entity.
//!
//! [`EntityMotion`] owns a hitbox, a velocity and the intent flags of one
//! entity and resolves them against the tile grid once per tick: horizontal
//! intent first, then gravity and jumps, then a ground re-check. Entity
//! kinds compose an `EntityMotion` and expose it through the [`Motion`]
//! capability trait instead of inheriting from it.

pub mod animation;
mod player;

pub use animation::AnimationClock;
pub use player::{Player, PlayerTick};

use glam::Vec2;
use tideline_core::{GameConfig, Hitbox};
use tideline_world::{
    collision::{
        can_move_by, can_move_to, is_on_ground, snap_to_floor_or_ceiling, snap_to_wall_x,
    },
    TileGrid,
};

/// Capability shared by every simulated entity kind.
pub trait Motion {
    /// Intent type the entity accepts before resolving its motion.
    type Intent;

    /// Records the intent for the next call to [`Motion::resolve_motion`].
    fn apply_intent(&mut self, intent: Self::Intent);

    /// Advances the entity by one tick against the grid.
    fn resolve_motion(&mut self, grid: &TileGrid) -> MotionOutcome;

    /// Read-only access to the underlying kinematic state.
    fn body(&self) -> &EntityMotion;
}

/// Movement intents understood by [`EntityMotion`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    /// Whether the entity wants to walk left.
    pub left: bool,
    /// Whether the entity wants to walk right.
    pub right: bool,
    /// Whether the entity wants to jump.
    pub jump: bool,
}

/// Speeds and accelerations an entity moves with, in world units per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    /// Horizontal distance covered per tick while walking.
    pub speed: f32,
    /// Downward acceleration added per airborne tick.
    pub gravity: f32,
    /// Vertical speed applied when a jump starts.
    pub jump_speed: f32,
    /// Largest downward speed.
    pub terminal_fall_speed: f32,
}

impl MotionTuning {
    /// Builds tuning from the configuration and an unscaled walking speed.
    #[must_use]
    pub fn from_config(config: &GameConfig, unscaled_speed: f32) -> Self {
        Self {
            speed: config.scaled(unscaled_speed),
            gravity: config.gravity(),
            jump_speed: config.jump_speed(),
            terminal_fall_speed: config.terminal_fall_speed(),
        }
    }
}

/// What happened while resolving one tick of motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionOutcome {
    /// A horizontal move was stopped by a wall.
    pub blocked_horizontally: bool,
    /// A jump started this tick.
    pub jumped: bool,
    /// A fall ended on solid ground this tick.
    pub landed: bool,
    /// A rise was stopped by a ceiling this tick.
    pub bumped_head: bool,
    /// The entity lost ground support without jumping and falls from the next tick.
    pub left_ground: bool,
}

/// Kinematic state of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityMotion {
    hitbox: Hitbox,
    velocity: Vec2,
    airborne: bool,
    intent: MoveIntent,
    attacking: bool,
    tuning: MotionTuning,
}

impl EntityMotion {
    /// Creates a grounded, motionless entity occupying `hitbox`.
    #[must_use]
    pub fn new(hitbox: Hitbox, tuning: MotionTuning) -> Self {
        Self {
            hitbox,
            velocity: Vec2::ZERO,
            airborne: false,
            intent: MoveIntent::default(),
            attacking: false,
            tuning,
        }
    }

    /// Current collision rectangle.
    #[must_use]
    pub fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    /// Speeds the entity moves with.
    #[must_use]
    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    /// Horizontal speed resolved during the last tick, zero when blocked.
    #[must_use]
    pub fn x_speed(&self) -> f32 {
        self.velocity.x
    }

    /// Vertical speed; negative while rising.
    #[must_use]
    pub fn air_speed(&self) -> f32 {
        self.velocity.y
    }

    /// Whether the entity is jumping or falling.
    #[must_use]
    pub fn in_air(&self) -> bool {
        self.airborne
    }

    /// Whether the entity stands on solid ground. Never true together with [`Self::in_air`].
    #[must_use]
    pub fn on_ground(&self) -> bool {
        !self.airborne
    }

    /// Whether the move-left intent is held.
    #[must_use]
    pub fn moving_left(&self) -> bool {
        self.intent.left
    }

    /// Whether the move-right intent is held.
    #[must_use]
    pub fn moving_right(&self) -> bool {
        self.intent.right
    }

    /// Whether exactly one horizontal intent is held.
    #[must_use]
    pub fn is_walking(&self) -> bool {
        self.intent.left != self.intent.right
    }

    /// Whether the attack overlay flag is set.
    #[must_use]
    pub fn attacking(&self) -> bool {
        self.attacking
    }

    /// Sets the attack overlay flag. Movement keeps resolving while it is set.
    pub fn set_attacking(&mut self, attacking: bool) {
        self.attacking = attacking;
    }

    /// Makes the entity airborne with the provided vertical speed.
    pub fn launch(&mut self, air_speed: f32) {
        self.airborne = true;
        self.velocity.y = air_speed.min(self.tuning.terminal_fall_speed);
    }

    /// Releases every held movement intent.
    pub fn clear_intent(&mut self) {
        self.intent = MoveIntent::default();
    }

    /// Moves the entity to `(x, y)`, stops it, and re-derives ground support.
    pub fn place_at(&mut self, grid: &TileGrid, x: f32, y: f32) {
        self.hitbox.x = x;
        self.hitbox.y = y;
        self.velocity = Vec2::ZERO;
        self.airborne = false;
        self.intent = MoveIntent::default();
        self.attacking = false;
        self.settle(grid);
    }

    /// Marks the entity airborne when nothing supports it.
    pub fn settle(&mut self, grid: &TileGrid) {
        if !self.airborne && !is_on_ground(grid, &self.hitbox) {
            self.airborne = true;
            self.velocity.y = 0.0;
        }
    }

    /// Resolves one tick of motion against the grid.
    pub fn step(&mut self, grid: &TileGrid) -> MotionOutcome {
        let mut outcome = MotionOutcome::default();

        let mut x_speed = 0.0;
        if self.intent.left {
            x_speed -= self.tuning.speed;
        }
        if self.intent.right {
            x_speed += self.tuning.speed;
        }
        self.velocity.x = x_speed;
        if x_speed != 0.0 {
            outcome.blocked_horizontally = !self.move_horizontally(grid, x_speed);
        }

        if self.intent.jump && !self.airborne {
            self.airborne = true;
            self.velocity.y = self.tuning.jump_speed;
            outcome.jumped = true;
        }

        if self.airborne {
            self.move_vertically(grid, &mut outcome);
        }

        if !self.airborne && !is_on_ground(grid, &self.hitbox) {
            self.airborne = true;
            self.velocity.y = 0.0;
            outcome.left_ground = true;
        }

        outcome
    }

    fn move_horizontally(&mut self, grid: &TileGrid, x_speed: f32) -> bool {
        if can_move_by(grid, &self.hitbox, x_speed, 0.0) {
            self.hitbox.x += x_speed;
            return true;
        }

        let snapped = snap_to_wall_x(grid, &self.hitbox, x_speed);
        if can_move_to(grid, snapped, self.hitbox.y, self.hitbox.width, self.hitbox.height) {
            self.hitbox.x = snapped;
        }
        self.velocity.x = 0.0;
        false
    }

    fn move_vertically(&mut self, grid: &TileGrid, outcome: &mut MotionOutcome) {
        let air_speed = self.velocity.y;
        if can_move_by(grid, &self.hitbox, 0.0, air_speed) {
            self.hitbox.y += air_speed;
            self.velocity.y = (air_speed + self.tuning.gravity).min(self.tuning.terminal_fall_speed);
            return;
        }

        let snapped = snap_to_floor_or_ceiling(grid, &self.hitbox, air_speed);
        if can_move_to(grid, self.hitbox.x, snapped, self.hitbox.width, self.hitbox.height) {
            self.hitbox.y = snapped;
        }
        self.velocity.y = 0.0;
        if air_speed > 0.0 {
            self.airborne = false;
            outcome.landed = true;
        } else {
            outcome.bumped_head = true;
        }
    }
}

impl Motion for EntityMotion {
    type Intent = MoveIntent;

    fn apply_intent(&mut self, intent: MoveIntent) {
        self.intent = intent;
    }

    fn resolve_motion(&mut self, grid: &TileGrid) -> MotionOutcome {
        self.step(grid)
    }

    fn body(&self) -> &EntityMotion {
        self
    }
}
