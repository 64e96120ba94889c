use image::{Rgb, RgbImage};
use tideline_core::{Command, EnemyState, Event, GameConfig, Intents, PlayerAnimation, PASSABLE_TILE};
use tideline_system_playing::Playing;
use tideline_world::{decode_level, Level, LevelSet};

const NO_MARKER: u8 = 255;

/// Thirty columns of open air over a solid floor, the player spawning at
/// column 2 and a crab one tile to its right.
fn arena(config: &GameConfig) -> Level {
    let mut image = RgbImage::from_pixel(30, 5, Rgb([PASSABLE_TILE, NO_MARKER, 0]));
    for column in 0..30 {
        image.put_pixel(column, 4, Rgb([0, NO_MARKER, 0]));
    }
    image.put_pixel(2, 3, Rgb([PASSABLE_TILE, 100, 0]));
    image.put_pixel(3, 3, Rgb([PASSABLE_TILE, 0, 0]));
    decode_level(&image, config).expect("level decodes")
}

fn session(levels: usize) -> Playing {
    let config = GameConfig::default();
    let levels = LevelSet::from_levels((0..levels).map(|_| arena(&config)).collect())
        .expect("levels");
    Playing::new(config, levels).expect("session starts")
}

fn tick(playing: &mut Playing, intents: Intents, events: &mut Vec<Event>) {
    playing.apply(Command::Tick { intents }, events);
}

fn attack() -> Intents {
    Intents {
        attack: true,
        ..Intents::idle()
    }
}

#[test]
fn idle_player_next_to_a_crab_eventually_dies() {
    let mut playing = session(1);
    let mut events = Vec::new();

    for _ in 0..3_000 {
        tick(&mut playing, Intents::idle(), &mut events);
    }

    let damage: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::PlayerDamaged { amount, health } => Some((*amount, *health)),
            _ => None,
        })
        .collect();
    assert_eq!(damage.len(), 7);
    assert!(damage.iter().all(|(amount, _)| *amount == 15));
    assert_eq!(damage.last(), Some(&(15, 0)));
    assert_eq!(
        events.iter().filter(|event| **event == Event::GameOver).count(),
        1
    );
    assert!(playing.snapshot().game_over);

    let frozen = playing.snapshot();
    tick(&mut playing, attack(), &mut events);
    assert_eq!(playing.snapshot(), frozen);

    playing.apply(Command::ResetAll, &mut events);
    let snapshot = playing.snapshot();
    assert!(!snapshot.game_over);
    assert_eq!(snapshot.player.health, 100);
    assert_eq!(snapshot.enemies.len(), 1);
    assert_eq!(snapshot.enemies[0].state, EnemyState::Idle);
}

#[test]
fn killing_the_only_crab_completes_the_level() {
    let mut playing = session(2);
    let mut events = Vec::new();

    for _ in 0..60 {
        tick(&mut playing, Intents::idle(), &mut events);
    }
    tick(&mut playing, attack(), &mut events);

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyKilled { .. })));
    assert_eq!(playing.snapshot().player.animation, PlayerAnimation::Attacking);
    assert_eq!(playing.snapshot().enemies[0].state, EnemyState::Dead);
    assert!(!playing.is_level_completed());

    for _ in 0..200 {
        tick(&mut playing, Intents::idle(), &mut events);
    }

    assert!(events.contains(&Event::LevelCompleted { level_index: 0 }));
    let snapshot = playing.snapshot();
    assert!(snapshot.level_completed);
    assert!(snapshot.enemies.is_empty());
}

#[test]
fn next_level_wraps_after_the_last_one() {
    let mut playing = session(2);
    let mut events = Vec::new();

    playing.apply(Command::LoadNextLevel, &mut events);
    assert_eq!(events, vec![Event::LevelLoaded { level_index: 1 }]);
    assert_eq!(playing.snapshot().level_index, 1);

    events.clear();
    playing.apply(Command::LoadNextLevel, &mut events);
    assert_eq!(
        events,
        vec![
            Event::AllLevelsCompleted,
            Event::LevelLoaded { level_index: 0 }
        ]
    );
    assert_eq!(playing.enemies().alive_count(), 1);
    assert!((playing.snapshot().scroll_offset).abs() < f32::EPSILON);
}

#[test]
fn camera_follows_a_player_walking_right() {
    let mut playing = session(1);
    let mut events = Vec::new();
    let max_offset = playing.level().max_scroll_offset();
    assert!(max_offset > 0.0);

    for _ in 0..2_000 {
        tick(
            &mut playing,
            Intents {
                right: true,
                ..Intents::idle()
            },
            &mut events,
        );
        let offset = playing.snapshot().scroll_offset;
        assert!((0.0..=max_offset).contains(&offset));
    }

    assert!(playing.snapshot().scroll_offset > 0.0);
}

#[test]
fn pause_toggles_and_focus_loss_releases_the_attack_latch() {
    let mut playing = session(1);
    let mut events = Vec::new();

    playing.apply(Command::TogglePause, &mut events);
    playing.apply(Command::TogglePause, &mut events);
    assert_eq!(
        events,
        vec![
            Event::PauseToggled { paused: true },
            Event::PauseToggled { paused: false }
        ]
    );

    for _ in 0..60 {
        tick(&mut playing, attack(), &mut events);
    }
    assert!(!playing.player().is_attacking());

    playing.apply(Command::FocusLost, &mut events);
    tick(&mut playing, attack(), &mut events);
    assert!(playing.player().is_attacking());
}
