use tideline_core::{
    Facing, GameConfig, Hitbox, HitboxError, Intents, PlayerAnimation, PlayerSnapshot,
    TilePosition,
};
use tideline_world::TileGrid;

use crate::{AnimationClock, EntityMotion, Motion, MotionOutcome, MotionTuning, MoveIntent};

const ATTACK_SWING_FRAME: u32 = 1;

fn frame_count(animation: PlayerAnimation) -> u32 {
    match animation {
        PlayerAnimation::Idle => 5,
        PlayerAnimation::Running => 6,
        PlayerAnimation::Jumping => 3,
        PlayerAnimation::Falling => 1,
        PlayerAnimation::Attacking => 3,
    }
}

/// Result of advancing the player by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerTick {
    /// Motion resolved this tick.
    pub outcome: MotionOutcome,
    /// Attack rectangle to test against enemies, present once per swing.
    pub attack_box: Option<Hitbox>,
}

/// Player-controlled entity composed around an [`EntityMotion`].
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    body: EntityMotion,
    spawn: (f32, f32),
    facing: Facing,
    animation: PlayerAnimation,
    clock: AnimationClock,
    health: u32,
    max_health: u32,
    attack_width: f32,
    attack_height: f32,
    attack_offset: f32,
    attack_damage: u32,
    attack_held: bool,
    attack_checked: bool,
}

impl Player {
    /// Creates a player standing at the top-left corner of `spawn`.
    ///
    /// The player starts airborne when nothing supports it at the spawn tile.
    pub fn new(
        config: &GameConfig,
        grid: &TileGrid,
        spawn: TilePosition,
    ) -> Result<Self, HitboxError> {
        let (x, y) = spawn.world_origin(config.tile_size());
        let size = config.scaled_size(config.player.hitbox);
        let hitbox = Hitbox::new(x, y, size.width, size.height)?;
        let attack = config.scaled_size(config.player.attack_box);

        let tuning = MotionTuning::from_config(config, config.player.speed);
        let mut body = EntityMotion::new(hitbox, tuning);
        body.settle(grid);

        Ok(Self {
            body,
            spawn: (x, y),
            facing: Facing::Right,
            animation: PlayerAnimation::Idle,
            clock: AnimationClock::new(config.animation.ticks_per_frame),
            health: config.player.max_health,
            max_health: config.player.max_health,
            attack_width: attack.width,
            attack_height: attack.height,
            attack_offset: config.scaled(config.player.attack_offset),
            attack_damage: config.player.attack_damage,
            attack_held: false,
            attack_checked: false,
        })
    }

    /// Current collision rectangle.
    #[must_use]
    pub fn hitbox(&self) -> &Hitbox {
        self.body.hitbox()
    }

    /// Direction the player faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Animation the player is showing.
    #[must_use]
    pub const fn animation(&self) -> PlayerAnimation {
        self.animation
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Whether health reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Whether an attack swing is in progress.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.body.attacking()
    }

    /// Damage a connecting swing deals to an enemy.
    #[must_use]
    pub const fn attack_damage(&self) -> u32 {
        self.attack_damage
    }

    /// Attack rectangle in front of the player for its current facing.
    #[must_use]
    pub fn attack_box(&self) -> Hitbox {
        let hitbox = self.body.hitbox();
        let x = match self.facing {
            Facing::Right => hitbox.right() + self.attack_offset,
            Facing::Left => hitbox.x - self.attack_offset - self.attack_width,
        };
        Hitbox {
            x,
            y: hitbox.y + self.attack_offset,
            width: self.attack_width,
            height: self.attack_height,
        }
    }

    /// Reduces health by `amount`, saturating at zero, and returns what is left.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Releases every held control, including the attack latch.
    pub fn release_intents(&mut self) {
        self.body.clear_intent();
        self.attack_held = false;
    }

    /// Returns to the spawn point with full health and no swing in progress.
    pub fn reset(&mut self, grid: &TileGrid) {
        let (x, y) = self.spawn;
        self.body.place_at(grid, x, y);
        self.health = self.max_health;
        self.facing = Facing::Right;
        self.animation = PlayerAnimation::Idle;
        self.clock.restart();
        self.attack_held = false;
        self.attack_checked = false;
    }

    /// Moves the spawn point to the top-left corner of `tile` and resets there.
    pub fn respawn_at(&mut self, grid: &TileGrid, tile: TilePosition) {
        self.spawn = tile.world_origin(grid.tile_size());
        self.reset(grid);
    }

    /// Advances motion, facing, animation, and the attack swing by one tick.
    pub fn update(&mut self, grid: &TileGrid) -> PlayerTick {
        let outcome = self.body.step(grid);

        if self.body.moving_left() && !self.body.moving_right() {
            self.facing = Facing::Left;
        } else if self.body.moving_right() && !self.body.moving_left() {
            self.facing = Facing::Right;
        }
        self.refresh_animation();

        let mut attack_box = None;
        if self.body.attacking() && !self.attack_checked && self.clock.frame() == ATTACK_SWING_FRAME
        {
            self.attack_checked = true;
            attack_box = Some(self.attack_box());
        }

        if self.clock.advance(frame_count(self.animation))
            && self.animation == PlayerAnimation::Attacking
        {
            self.body.set_attacking(false);
            self.attack_checked = false;
            self.refresh_animation();
        }

        PlayerTick {
            outcome,
            attack_box,
        }
    }

    /// State handed to the render collaborator.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            hitbox: *self.body.hitbox(),
            facing: self.facing,
            animation: self.animation,
            animation_frame: self.clock.frame(),
            health: self.health,
            on_ground: self.body.on_ground(),
        }
    }

    fn refresh_animation(&mut self) {
        let next = if self.body.attacking() {
            PlayerAnimation::Attacking
        } else if self.body.in_air() {
            if self.body.air_speed() < 0.0 {
                PlayerAnimation::Jumping
            } else {
                PlayerAnimation::Falling
            }
        } else if self.body.is_walking() {
            PlayerAnimation::Running
        } else {
            PlayerAnimation::Idle
        };

        if next != self.animation {
            self.animation = next;
            if next == PlayerAnimation::Attacking {
                self.clock.restart_at(ATTACK_SWING_FRAME);
            } else {
                self.clock.restart();
            }
        }
    }
}

impl Motion for Player {
    type Intent = Intents;

    fn apply_intent(&mut self, intents: Intents) {
        self.body.apply_intent(MoveIntent {
            left: intents.left,
            right: intents.right,
            jump: intents.jump,
        });

        let pressed = intents.attack && !self.attack_held;
        self.attack_held = intents.attack;
        if pressed && !self.body.attacking() {
            self.body.set_attacking(true);
            self.attack_checked = false;
        }
    }

    fn resolve_motion(&mut self, grid: &TileGrid) -> MotionOutcome {
        self.update(grid).outcome
    }

    fn body(&self) -> &EntityMotion {
        &self.body
    }
}
