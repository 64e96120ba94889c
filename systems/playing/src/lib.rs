#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Playing session that advances the simulation one fixed step at a time.
//!
//! Every tick runs in a fixed order so identical command streams always
//! produce identical snapshots: player motion, the player's attack against
//! enemies, enemy behavior and motion, enemy damage against the player, the
//! camera, and finally the level completion check.

use thiserror::Error;
use tideline_core::{
    Command, ConfigError, Event, FrameSnapshot, GameConfig, HitboxError, Intents,
};
use tideline_system_camera::CameraWindow;
use tideline_system_enemies::{EnemyManager, EnemyStrike};
use tideline_system_motion::{Motion, Player};
use tideline_world::{Level, LevelSet};
use tracing::{debug, info};

/// Reasons a playing session cannot start.
#[derive(Debug, Error)]
pub enum PlayingError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// An entity could not be placed at its spawn point.
    #[error("entity could not be spawned: {0}")]
    Spawn(#[from] HitboxError),
}

/// Authoritative state of a game in progress.
#[derive(Debug)]
pub struct Playing {
    levels: LevelSet,
    rosters: Vec<EnemyManager>,
    player: Player,
    enemies: EnemyManager,
    camera: CameraWindow,
    paused: bool,
    game_over: bool,
    level_completed: bool,
    strikes: Vec<EnemyStrike>,
}

impl Playing {
    /// Validates the configuration and starts on the current level of `levels`.
    ///
    /// The enemy roster of every level is spawned up front so later level
    /// transitions cannot fail.
    pub fn new(config: GameConfig, levels: LevelSet) -> Result<Self, PlayingError> {
        config.validate()?;

        let rosters = levels
            .iter()
            .map(|level| EnemyManager::load(&config, level))
            .collect::<Result<Vec<_>, _>>()?;

        let level = levels.current();
        let player = Player::new(&config, level.grid(), level.player_spawn())?;
        let enemies = rosters
            .get(levels.current_index())
            .cloned()
            .unwrap_or_default();
        let camera = CameraWindow::new(&config, level.max_scroll_offset());

        info!(
            levels = levels.len(),
            level_index = levels.current_index(),
            enemies = enemies.len(),
            "playing_started"
        );

        Ok(Self {
            levels,
            rosters,
            player,
            enemies,
            camera,
            paused: false,
            game_over: false,
            level_completed: false,
            strikes: Vec::new(),
        })
    }

    /// Executes a single command and records the resulting events.
    pub fn apply(&mut self, command: Command, out: &mut Vec<Event>) {
        match command {
            Command::Tick { intents } => self.tick(intents, out),
            Command::TogglePause => {
                self.paused = !self.paused;
                out.push(Event::PauseToggled {
                    paused: self.paused,
                });
            }
            Command::FocusLost => self.player.release_intents(),
            Command::ResetAll => self.reset_all(),
            Command::LoadNextLevel => self.load_next_level(out),
        }
    }

    /// Player, enemies, and flags as of the last processed command.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            level_index: self.levels.current_index(),
            scroll_offset: self.camera.offset(),
            player: self.player.snapshot(),
            enemies: self.enemies.snapshots(),
            paused: self.paused,
            game_over: self.game_over,
            level_completed: self.level_completed,
        }
    }

    /// Level currently being played.
    #[must_use]
    pub fn level(&self) -> &Level {
        self.levels.current()
    }

    /// The player entity.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Enemies of the current level.
    #[must_use]
    pub fn enemies(&self) -> &EnemyManager {
        &self.enemies
    }

    /// Whether ticks are currently ignored because of the pause flag.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the player has died.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether every enemy of the level has been defeated.
    #[must_use]
    pub const fn is_level_completed(&self) -> bool {
        self.level_completed
    }

    fn tick(&mut self, intents: Intents, out: &mut Vec<Event>) {
        if self.paused || self.game_over || self.level_completed {
            return;
        }
        let grid = self.levels.current().grid();

        self.player.apply_intent(intents);
        let player_tick = self.player.update(grid);
        if player_tick.outcome.landed {
            out.push(Event::PlayerLanded);
        }

        if let Some(attack_box) = player_tick.attack_box {
            self.enemies
                .check_hit(&attack_box, self.player.attack_damage(), out);
        }

        self.strikes.clear();
        self.enemies
            .update(grid, self.player.hitbox(), &mut self.strikes);
        for strike in &self.strikes {
            let health = self.player.take_damage(strike.damage);
            debug!(
                enemy = strike.enemy.get(),
                amount = strike.damage,
                health,
                "player_damaged"
            );
            out.push(Event::PlayerDamaged {
                amount: strike.damage,
                health,
            });
            if self.player.is_dead() {
                self.game_over = true;
                info!(level_index = self.levels.current_index(), "game_over");
                out.push(Event::GameOver);
                break;
            }
        }

        self.camera.update(self.player.hitbox().x);

        if !self.game_over && self.enemies.all_defeated() {
            self.level_completed = true;
            info!(level_index = self.levels.current_index(), "level_completed");
            out.push(Event::LevelCompleted {
                level_index: self.levels.current_index(),
            });
        }
    }

    fn reset_all(&mut self) {
        let level = self.levels.current();
        self.player.reset(level.grid());
        self.enemies.reset_all(level.grid());
        self.camera.reset(level.max_scroll_offset());
        self.paused = false;
        self.game_over = false;
        self.level_completed = false;
        info!(level_index = self.levels.current_index(), "level_reset");
    }

    fn load_next_level(&mut self, out: &mut Vec<Event>) {
        if self.levels.advance() {
            info!("all_levels_completed");
            out.push(Event::AllLevelsCompleted);
        }

        let index = self.levels.current_index();
        let level = self.levels.current();
        self.enemies = self.rosters.get(index).cloned().unwrap_or_default();
        self.player.respawn_at(level.grid(), level.player_spawn());
        self.camera.reset(level.max_scroll_offset());
        self.paused = false;
        self.game_over = false;
        self.level_completed = false;

        info!(
            level_index = index,
            enemies = self.enemies.len(),
            "level_loaded"
        );
        out.push(Event::LevelLoaded { level_index: index });
    }
}
