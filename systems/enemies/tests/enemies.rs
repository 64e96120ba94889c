use tideline_core::{
    CrabConfig, EnemyId, EnemyKind, EnemySpawn, EnemyState, Event, Facing, GameConfig, Hitbox,
    TilePosition, PASSABLE_TILE,
};
use tideline_system_enemies::{Crab, EnemyManager, EnemyStrike};
use tideline_system_motion::Motion;
use tideline_world::{Level, TileGrid};

fn floor_level(config: &GameConfig, columns: usize, rows: usize, spawn: TilePosition) -> Level {
    let mut tiles = vec![vec![PASSABLE_TILE; columns]; rows - 1];
    tiles.push(vec![0; columns]);
    let grid =
        TileGrid::from_rows(tiles, config.tile_size(), config.game_height()).expect("grid builds");
    Level::new(
        grid,
        vec![EnemySpawn {
            kind: EnemyKind::Crab,
            tile: spawn,
        }],
        None,
        config,
    )
}

fn nowhere() -> Hitbox {
    Hitbox::new(0.0, 0.0, 1.0, 1.0).expect("hitbox")
}

/// Player hitbox standing on the floor of `floor_level` with its left edge at `x`.
fn standing_player(config: &GameConfig, rows: usize, x: f32) -> Hitbox {
    let size = config.scaled_size(config.player.hitbox);
    let floor = (rows - 1) as f32 * config.tile_size();
    Hitbox::new(x, floor - 1.0 - size.height, size.width, size.height).expect("hitbox")
}

fn settle(manager: &mut EnemyManager, grid: &TileGrid) {
    let mut strikes = Vec::new();
    for _ in 0..500 {
        let crab = manager.get(EnemyId::new(0)).expect("crab");
        if crab.body().on_ground() {
            return;
        }
        manager.update(grid, &nowhere(), &mut strikes);
    }
    panic!("crab never landed");
}

#[test]
fn crab_spawns_at_marker_tile_origin() {
    let config = GameConfig {
        scale: 1.0,
        ..GameConfig::default()
    };
    let level = floor_level(&config, 10, 5, TilePosition::new(5, 3));

    let manager = EnemyManager::load(&config, &level).expect("enemies load");

    let crab = manager.get(EnemyId::new(0)).expect("crab");
    assert_eq!((crab.hitbox().x, crab.hitbox().y), (160.0, 96.0));
    assert_eq!(crab.state(), EnemyState::Idle);
}

#[test]
fn killed_crab_stops_moving_and_disappears_after_dying() {
    let config = GameConfig::default();
    let level = floor_level(&config, 12, 3, TilePosition::new(5, 1));
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    let spawned = *manager.get(EnemyId::new(0)).expect("crab").hitbox();
    assert!(manager
        .get(EnemyId::new(0))
        .expect("crab")
        .body()
        .in_air());

    let mut events = Vec::new();
    manager.check_hit(&spawned, config.crab.max_health, &mut events);

    assert_eq!(
        events,
        vec![Event::EnemyKilled {
            enemy: EnemyId::new(0)
        }]
    );
    assert_eq!(manager.alive_count(), 0);
    assert!(!manager.all_defeated());

    let mut strikes = Vec::new();
    let death_ticks = 5 * config.animation.ticks_per_frame;
    for _ in 0..death_ticks - 1 {
        manager.update(grid, &nowhere(), &mut strikes);
    }
    let crab = manager.get(EnemyId::new(0)).expect("crab");
    assert_eq!(crab.state(), EnemyState::Dead);
    assert_eq!(*crab.hitbox(), spawned);
    assert_eq!(manager.snapshots().len(), 1);

    manager.update(grid, &nowhere(), &mut strikes);
    assert!(manager.snapshots().is_empty());
    assert!(manager.all_defeated());
    assert!(strikes.is_empty());

    events.clear();
    manager.check_hit(&spawned, 10, &mut events);
    assert!(events.is_empty());
}

#[test]
fn crab_walks_towards_a_visible_player() {
    let config = GameConfig::default();
    let level = floor_level(&config, 12, 3, TilePosition::new(8, 1));
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    settle(&mut manager, grid);
    let start = manager.get(EnemyId::new(0)).expect("crab").hitbox().x;
    let player = standing_player(&config, 3, 200.0);

    let mut strikes = Vec::new();
    for _ in 0..10 {
        manager.update(grid, &player, &mut strikes);
    }

    let crab = manager.get(EnemyId::new(0)).expect("crab");
    assert_eq!(crab.state(), EnemyState::Moving);
    assert_eq!(crab.facing(), Facing::Left);
    assert!(crab.hitbox().x < start);
    assert!(strikes.is_empty());
}

#[test]
fn crab_goes_idle_when_the_player_leaves_its_row() {
    let config = GameConfig::default();
    let level = floor_level(&config, 12, 3, TilePosition::new(8, 1));
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    settle(&mut manager, grid);
    let player = standing_player(&config, 3, 200.0);

    let mut strikes = Vec::new();
    for _ in 0..10 {
        manager.update(grid, &player, &mut strikes);
    }
    assert_eq!(
        manager.get(EnemyId::new(0)).expect("crab").state(),
        EnemyState::Moving
    );

    let airborne = Hitbox { y: 4.0, ..player };
    manager.update(grid, &airborne, &mut strikes);
    let stopped = *manager.get(EnemyId::new(0)).expect("crab").hitbox();
    for _ in 0..20 {
        manager.update(grid, &airborne, &mut strikes);
    }

    let crab = manager.get(EnemyId::new(0)).expect("crab");
    assert_eq!(crab.state(), EnemyState::Idle);
    assert_eq!(*crab.hitbox(), stopped);
}

#[test]
fn moving_crab_turns_back_at_a_ledge() {
    let config = GameConfig {
        crab: CrabConfig {
            attack_range_tiles: 0.25,
            ..CrabConfig::default()
        },
        ..GameConfig::default()
    };
    let tile = config.tile_size();
    let mut tiles = vec![vec![PASSABLE_TILE; 10]; 2];
    let mut floor = vec![0; 10];
    floor[5] = PASSABLE_TILE;
    tiles.push(floor);
    let grid = TileGrid::from_rows(tiles, tile, config.game_height()).expect("grid builds");
    let level = Level::new(
        grid,
        vec![EnemySpawn {
            kind: EnemyKind::Crab,
            tile: TilePosition::new(2, 1),
        }],
        None,
        &config,
    );
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    settle(&mut manager, grid);
    let over_pit = standing_player(&config, 3, 5.0 * tile);

    let mut strikes = Vec::new();
    for _ in 0..400 {
        manager.update(grid, &over_pit, &mut strikes);
    }
    let edge = *manager.get(EnemyId::new(0)).expect("crab").hitbox();
    for _ in 0..50 {
        manager.update(grid, &over_pit, &mut strikes);
    }

    let crab = manager.get(EnemyId::new(0)).expect("crab");
    assert_eq!(crab.state(), EnemyState::Moving);
    assert_eq!(crab.facing(), Facing::Left);
    assert!(crab.body().on_ground());
    assert_eq!(*crab.hitbox(), edge);
    assert!(edge.right() < 5.0 * tile);
    assert!(edge.right() > 5.0 * tile - 2.0);
    assert!(edge.bottom() < 2.0 * tile);
}

#[test]
fn walking_crab_turns_around_at_a_wall() {
    let config = GameConfig::default();
    let tile = config.tile_size();
    let mut tiles = vec![vec![PASSABLE_TILE; 8]; 2];
    tiles[1][3] = 0;
    tiles.push(vec![0; 8]);
    let grid = TileGrid::from_rows(tiles, tile, config.game_height()).expect("grid builds");
    let mut crab =
        Crab::new(EnemyId::new(0), &config, &grid, TilePosition::new(5, 1)).expect("crab");
    for _ in 0..500 {
        if crab.body().on_ground() {
            break;
        }
        crab.apply_intent(None);
        let _ = crab.resolve_motion(&grid);
    }
    assert!(crab.body().on_ground());
    assert_eq!(crab.facing(), Facing::Left);

    let mut blocked = false;
    for _ in 0..400 {
        crab.apply_intent(Some(Facing::Left));
        if crab.resolve_motion(&grid).blocked_horizontally {
            blocked = true;
            break;
        }
    }

    assert!(blocked);
    assert_eq!(crab.facing(), Facing::Right);
    assert!((crab.hitbox().x - 4.0 * tile).abs() < f32::EPSILON);
    assert!(crab.body().on_ground());
}

#[test]
fn crab_ignores_a_player_on_another_row() {
    let config = GameConfig::default();
    let level = floor_level(&config, 12, 3, TilePosition::new(8, 1));
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    settle(&mut manager, grid);
    let player = Hitbox::new(400.0, 4.0, 40.0, 40.0).expect("hitbox");

    let mut strikes = Vec::new();
    for _ in 0..50 {
        manager.update(grid, &player, &mut strikes);
    }

    assert_eq!(
        manager.get(EnemyId::new(0)).expect("crab").state(),
        EnemyState::Idle
    );
}

#[test]
fn crab_pinches_an_adjacent_player_once_per_swing() {
    let config = GameConfig::default();
    let level = floor_level(&config, 12, 3, TilePosition::new(8, 1));
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    settle(&mut manager, grid);
    let player = standing_player(&config, 3, 460.0);

    let mut strikes = Vec::new();
    for _ in 0..100 {
        manager.update(grid, &player, &mut strikes);
    }

    assert_eq!(
        strikes,
        vec![EnemyStrike {
            enemy: EnemyId::new(0),
            damage: config.crab.attack_damage,
        }]
    );
    assert_eq!(
        manager.get(EnemyId::new(0)).expect("crab").state(),
        EnemyState::Attacking
    );
}

#[test]
fn hits_during_stagger_deal_damage_without_restarting_it() {
    let config = GameConfig::default();
    let level = floor_level(&config, 12, 3, TilePosition::new(5, 1));
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    settle(&mut manager, grid);
    let target = *manager.get(EnemyId::new(0)).expect("crab").hitbox();
    let stagger_ticks = 4 * config.animation.ticks_per_frame;
    let mut events = Vec::new();
    let mut strikes = Vec::new();

    manager.check_hit(&target, 4, &mut events);
    for _ in 0..stagger_ticks / 2 {
        manager.update(grid, &nowhere(), &mut strikes);
    }
    manager.check_hit(&target, 4, &mut events);

    assert_eq!(
        events,
        vec![
            Event::EnemyHit {
                enemy: EnemyId::new(0),
                health: 6
            },
            Event::EnemyHit {
                enemy: EnemyId::new(0),
                health: 2
            },
        ]
    );

    for _ in stagger_ticks / 2..stagger_ticks {
        manager.update(grid, &nowhere(), &mut strikes);
    }
    let crab = manager.get(EnemyId::new(0)).expect("crab");
    assert_eq!(crab.state(), EnemyState::Idle);
    assert_eq!(crab.health(), 2);
}

#[test]
fn reset_all_revives_and_returns_to_spawn() {
    let config = GameConfig::default();
    let level = floor_level(&config, 12, 3, TilePosition::new(5, 1));
    let grid = level.grid();
    let mut manager = EnemyManager::load(&config, &level).expect("enemies load");
    let spawned = *manager.get(EnemyId::new(0)).expect("crab").hitbox();
    settle(&mut manager, grid);
    let landed = *manager.get(EnemyId::new(0)).expect("crab").hitbox();
    let mut events = Vec::new();
    manager.check_hit(&landed, 100, &mut events);
    assert_eq!(manager.alive_count(), 0);

    manager.reset_all(grid);

    let crab = manager.get(EnemyId::new(0)).expect("crab");
    assert_eq!(*crab.hitbox(), spawned);
    assert_eq!(crab.state(), EnemyState::Idle);
    assert_eq!(crab.health(), config.crab.max_health);
    assert_eq!(manager.alive_count(), 1);
    assert!(!manager.all_defeated());
}
