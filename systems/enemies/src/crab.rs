use tideline_core::{
    EnemyId, EnemyKind, EnemySnapshot, EnemyState, Facing, GameConfig, Hitbox, HitboxError,
    TilePosition,
};
use tideline_system_motion::{
    AnimationClock, EntityMotion, Motion, MotionOutcome, MotionTuning, MoveIntent,
};
use tideline_world::{
    collision::{has_line_of_sight, is_floor_ahead, tile_row_of},
    TileGrid,
};

const ATTACK_STRIKE_FRAME: u32 = 3;

fn frame_count(state: EnemyState) -> u32 {
    match state {
        EnemyState::Idle => 9,
        EnemyState::Moving => 6,
        EnemyState::Attacking => 7,
        EnemyState::Hit => 4,
        EnemyState::Dead => 5,
    }
}

/// Outcome of a player attack landing on a crab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The crab survived with the remaining health.
    Wounded(u32),
    /// The crab's health reached zero and it started dying.
    Killed,
}

/// Ground-bound enemy that walks toward a visible player and pinches at melee range.
#[derive(Clone, Debug, PartialEq)]
pub struct Crab {
    id: EnemyId,
    body: EntityMotion,
    spawn: (f32, f32),
    facing: Facing,
    state: EnemyState,
    clock: AnimationClock,
    health: u32,
    max_health: u32,
    attack_damage: u32,
    attack_width: f32,
    attack_height: f32,
    attack_offset: f32,
    sight_range: f32,
    attack_range: f32,
    attack_checked: bool,
    active: bool,
}

impl Crab {
    /// Creates an idle crab whose hitbox is anchored at the top-left corner of `tile`.
    pub fn new(
        id: EnemyId,
        config: &GameConfig,
        grid: &TileGrid,
        tile: TilePosition,
    ) -> Result<Self, HitboxError> {
        let crab = &config.crab;
        let (x, y) = tile.world_origin(config.tile_size());
        let size = config.scaled_size(crab.hitbox);
        let attack = config.scaled_size(crab.attack_box);
        let mut body = EntityMotion::new(
            Hitbox::new(x, y, size.width, size.height)?,
            MotionTuning::from_config(config, crab.speed),
        );
        body.settle(grid);

        Ok(Self {
            id,
            body,
            spawn: (x, y),
            facing: Facing::Left,
            state: EnemyState::Idle,
            clock: AnimationClock::new(config.animation.ticks_per_frame),
            health: crab.max_health,
            max_health: crab.max_health,
            attack_damage: crab.attack_damage,
            attack_width: attack.width,
            attack_height: attack.height,
            attack_offset: config.scaled(crab.attack_box_offset),
            sight_range: crab.sight_range_tiles * config.tile_size(),
            attack_range: crab.attack_range_tiles * config.tile_size(),
            attack_checked: false,
            active: true,
        })
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Current collision rectangle.
    #[must_use]
    pub fn hitbox(&self) -> &Hitbox {
        self.body.hitbox()
    }

    /// Behavior state.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Direction the crab faces and walks in.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Whether the crab can still act or be hit.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.active && self.state != EnemyState::Dead
    }

    /// Whether the crab is alive or still playing its death animation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Pinch rectangle, centered on the hitbox and extended on both sides.
    #[must_use]
    pub fn attack_box(&self) -> Hitbox {
        let hitbox = self.body.hitbox();
        Hitbox {
            x: hitbox.x - self.attack_offset,
            y: hitbox.y,
            width: self.attack_width,
            height: self.attack_height,
        }
    }

    /// Applies a player hit.
    ///
    /// A hit taken while already staggered still deals damage but does not
    /// restart the stagger. Dead or inactive crabs ignore hits.
    pub fn take_hit(&mut self, damage: u32) -> Option<HitOutcome> {
        if !self.is_alive() {
            return None;
        }

        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.body.clear_intent();
            self.enter(EnemyState::Dead);
            return Some(HitOutcome::Killed);
        }

        if self.state != EnemyState::Hit {
            self.body.clear_intent();
            self.enter(EnemyState::Hit);
        }
        Some(HitOutcome::Wounded(self.health))
    }

    /// Runs one tick of behavior, motion, and animation.
    ///
    /// Returns the damage dealt to the player when a pinch connects.
    pub fn update(&mut self, grid: &TileGrid, player: &Hitbox) -> Option<u32> {
        if !self.active {
            return None;
        }
        if self.state == EnemyState::Dead {
            if self.clock.advance(frame_count(EnemyState::Dead)) {
                self.active = false;
            }
            return None;
        }

        let mut damage = None;
        let mut walk = None;
        if self.body.on_ground() {
            match self.state {
                EnemyState::Idle => {
                    if self.can_see(grid, player) {
                        self.turn_towards(player);
                        self.enter(EnemyState::Moving);
                    }
                }
                EnemyState::Moving => {
                    if !self.can_see(grid, player) {
                        self.enter(EnemyState::Idle);
                    } else {
                        self.turn_towards(player);
                        if self.in_attack_range(player) {
                            self.enter(EnemyState::Attacking);
                        } else {
                            walk = self.walk_direction(grid);
                        }
                    }
                }
                EnemyState::Attacking => {
                    if !self.attack_checked && self.clock.frame() == ATTACK_STRIKE_FRAME {
                        self.attack_checked = true;
                        if self.attack_box().intersects(player) {
                            damage = Some(self.attack_damage);
                        }
                    }
                }
                EnemyState::Hit | EnemyState::Dead => {}
            }
        }

        self.apply_intent(walk);
        let _ = self.resolve_motion(grid);

        if self.clock.advance(frame_count(self.state))
            && matches!(self.state, EnemyState::Attacking | EnemyState::Hit)
        {
            self.enter(EnemyState::Idle);
        }

        damage
    }

    /// Returns to the spawn point, idle and at full health.
    pub fn reset(&mut self, grid: &TileGrid) {
        let (x, y) = self.spawn;
        self.body.place_at(grid, x, y);
        self.health = self.max_health;
        self.facing = Facing::Left;
        self.active = true;
        self.enter(EnemyState::Idle);
    }

    /// State handed to the render collaborator.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: EnemyKind::Crab,
            hitbox: *self.body.hitbox(),
            facing: self.facing,
            state: self.state,
            animation_frame: self.clock.frame(),
            health: self.health,
        }
    }

    fn enter(&mut self, state: EnemyState) {
        self.state = state;
        self.clock.restart();
        self.attack_checked = false;
        self.body.set_attacking(state == EnemyState::Attacking);
    }

    fn horizontal_distance(&self, player: &Hitbox) -> f32 {
        (player.center_x() - self.body.hitbox().center_x()).abs()
    }

    fn can_see(&self, grid: &TileGrid, player: &Hitbox) -> bool {
        let row = tile_row_of(grid, self.body.hitbox());
        row == tile_row_of(grid, player)
            && self.horizontal_distance(player) <= self.sight_range
            && has_line_of_sight(grid, row, self.body.hitbox(), player)
    }

    fn in_attack_range(&self, player: &Hitbox) -> bool {
        self.horizontal_distance(player) <= self.attack_range
    }

    fn turn_towards(&mut self, player: &Hitbox) {
        self.facing = if player.center_x() < self.body.hitbox().center_x() {
            Facing::Left
        } else {
            Facing::Right
        };
    }

    fn walk_direction(&mut self, grid: &TileGrid) -> Option<Facing> {
        let step = self.facing.sign() * self.speed();
        if is_floor_ahead(grid, self.body.hitbox(), step) {
            Some(self.facing)
        } else {
            self.facing = self.facing.flipped();
            None
        }
    }

    fn speed(&self) -> f32 {
        self.body.tuning().speed
    }
}

impl Motion for Crab {
    type Intent = Option<Facing>;

    fn apply_intent(&mut self, walk: Option<Facing>) {
        self.body.apply_intent(MoveIntent {
            left: walk == Some(Facing::Left),
            right: walk == Some(Facing::Right),
            jump: false,
        });
    }

    fn resolve_motion(&mut self, grid: &TileGrid) -> MotionOutcome {
        let outcome = self.body.step(grid);
        if outcome.blocked_horizontally {
            self.facing = self.facing.flipped();
        }
        outcome
    }

    fn body(&self) -> &EntityMotion {
        &self.body
    }
}
