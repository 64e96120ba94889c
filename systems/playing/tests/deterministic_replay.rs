use image::{Rgb, RgbImage};
use tideline_core::{Command, Event, FrameSnapshot, GameConfig, Intents, PASSABLE_TILE};
use tideline_system_playing::Playing;
use tideline_world::{decode_level, LevelSet};

const NO_MARKER: u8 = 255;

/// Forty columns with a floor, a raised ledge, a pit, and three crabs.
fn level_image() -> RgbImage {
    let mut image = RgbImage::from_pixel(40, 6, Rgb([PASSABLE_TILE, NO_MARKER, 0]));
    for column in 0..40 {
        if !(20..23).contains(&column) {
            image.put_pixel(column, 5, Rgb([0, NO_MARKER, 0]));
        }
    }
    for column in 12..16 {
        image.put_pixel(column, 3, Rgb([7, NO_MARKER, 0]));
    }
    image.put_pixel(1, 4, Rgb([PASSABLE_TILE, 100, 0]));
    for column in [6, 14, 30] {
        let row = if column == 14 { 2 } else { 4 };
        image.put_pixel(column, row, Rgb([PASSABLE_TILE, 0, 0]));
    }
    image
}

fn script() -> Vec<Command> {
    let mut commands = Vec::new();
    for tick in 0_u32..4_000 {
        let intents = Intents {
            left: tick % 700 > 600,
            right: tick % 700 < 450,
            jump: tick % 97 < 3,
            attack: tick % 40 == 0,
        };
        commands.push(Command::Tick { intents });
        if tick == 1_500 {
            commands.push(Command::TogglePause);
        }
        if tick == 1_560 {
            commands.push(Command::TogglePause);
        }
        if tick == 2_200 {
            commands.push(Command::FocusLost);
        }
        if tick == 3_000 {
            commands.push(Command::ResetAll);
        }
    }
    commands
}

fn replay() -> (Vec<FrameSnapshot>, Vec<Event>) {
    let config = GameConfig::default();
    let level = decode_level(&level_image(), &config).expect("level decodes");
    let levels = LevelSet::from_levels(vec![level]).expect("levels");
    let mut playing = Playing::new(config, levels).expect("session starts");

    let mut snapshots = Vec::new();
    let mut events = Vec::new();
    for command in script() {
        playing.apply(command, &mut events);
        snapshots.push(playing.snapshot());
    }
    (snapshots, events)
}

#[test]
fn identical_command_streams_produce_identical_runs() {
    let (first_snapshots, first_events) = replay();
    let (second_snapshots, second_events) = replay();

    assert_eq!(first_snapshots, second_snapshots);
    assert_eq!(first_events, second_events);
    assert!(first_events.contains(&Event::PlayerLanded));
}

#[test]
fn replay_keeps_entities_inside_the_level() {
    let (snapshots, _) = replay();
    let config = GameConfig::default();
    let width = 40.0 * config.tile_size();

    for snapshot in &snapshots {
        let player = snapshot.player.hitbox;
        assert!(player.x >= 0.0 && player.right() <= width);
        assert!(player.y.is_finite());
        for enemy in &snapshot.enemies {
            assert!(enemy.hitbox.x >= 0.0 && enemy.hitbox.right() <= width);
        }
        assert!(snapshot.scroll_offset >= 0.0);
        assert!(snapshot.scroll_offset <= (40.0 - 26.0) * config.tile_size());
    }
}
