#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy system that owns every AI entity of the current level.
//!
//! Enemies live in an arena indexed by [`EnemyId`]; they never hold a
//! reference back to the manager or the level and receive the grid and the
//! player's hitbox as call parameters each tick.

mod crab;

pub use crab::{Crab, HitOutcome};

use tideline_core::{EnemyId, EnemyKind, EnemySnapshot, Event, GameConfig, Hitbox, HitboxError};
use tideline_world::{Level, TileGrid};
use tracing::debug;

/// Damage an enemy attack dealt to the player during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStrike {
    /// Enemy whose attack connected.
    pub enemy: EnemyId,
    /// Damage to apply to the player.
    pub damage: u32,
}

/// Owns the enemies of the current level and advances them in id order.
#[derive(Clone, Debug, Default)]
pub struct EnemyManager {
    crabs: Vec<Crab>,
}

impl EnemyManager {
    /// Spawns one enemy per spawn descriptor of `level`, ids assigned in descriptor order.
    pub fn load(config: &GameConfig, level: &Level) -> Result<Self, HitboxError> {
        let mut crabs = Vec::with_capacity(level.enemy_spawns().len());
        for (index, spawn) in level.enemy_spawns().iter().enumerate() {
            let id = EnemyId::new(u32::try_from(index).unwrap_or(u32::MAX));
            match spawn.kind {
                EnemyKind::Crab => crabs.push(Crab::new(id, config, level.grid(), spawn.tile)?),
            }
        }
        Ok(Self { crabs })
    }

    /// Number of enemies spawned for the level, dead ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.crabs.len()
    }

    /// Whether the level spawned no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crabs.is_empty()
    }

    /// Number of enemies that can still act.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.crabs.iter().filter(|crab| crab.is_alive()).count()
    }

    /// Whether the level had enemies and all of them finished dying.
    #[must_use]
    pub fn all_defeated(&self) -> bool {
        !self.is_empty() && self.crabs.iter().all(|crab| !crab.is_active())
    }

    /// Looks up an enemy by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Crab> {
        self.crabs.get(id.get() as usize)
    }

    /// Runs behavior then motion for every enemy, recording attacks that hit the player.
    pub fn update(&mut self, grid: &TileGrid, player: &Hitbox, strikes: &mut Vec<EnemyStrike>) {
        for crab in &mut self.crabs {
            if let Some(damage) = crab.update(grid, player) {
                strikes.push(EnemyStrike {
                    enemy: crab.id(),
                    damage,
                });
            }
        }
    }

    /// Applies a player attack to every living enemy the attack box overlaps.
    pub fn check_hit(&mut self, attack_box: &Hitbox, damage: u32, out: &mut Vec<Event>) {
        for crab in &mut self.crabs {
            if !crab.is_alive() || !attack_box.intersects(crab.hitbox()) {
                continue;
            }
            match crab.take_hit(damage) {
                Some(HitOutcome::Wounded(health)) => out.push(Event::EnemyHit {
                    enemy: crab.id(),
                    health,
                }),
                Some(HitOutcome::Killed) => {
                    debug!(enemy = crab.id().get(), "enemy_killed");
                    out.push(Event::EnemyKilled { enemy: crab.id() });
                }
                None => {}
            }
        }
    }

    /// Restores every enemy to its spawn point and initial state.
    pub fn reset_all(&mut self, grid: &TileGrid) {
        for crab in &mut self.crabs {
            crab.reset(grid);
        }
    }

    /// Snapshots of enemies that are alive or still playing their death animation.
    #[must_use]
    pub fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.crabs
            .iter()
            .filter(|crab| crab.is_active())
            .map(Crab::snapshot)
            .collect()
    }
}
