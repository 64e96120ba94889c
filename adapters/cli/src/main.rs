#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Tideline simulation headlessly.

mod script;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tideline_core::{Command, FrameSnapshot, GameConfig};
use tideline_system_playing::Playing;
use tideline_world::{load_level, LevelSet};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::script::Script;

#[derive(Parser)]
#[command(name = "tideline")]
#[command(about = "Headless driver for the Tideline platformer simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted input file against a directory of levels
    Run {
        /// Directory holding the level images, played in file name order
        #[arg(long)]
        levels: PathBuf,
        /// TOML file overriding the default game configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// TOML script of `[[step]]` entries
        #[arg(long)]
        script: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode one level image and describe it
    CheckLevel {
        /// Level image to decode
        level: PathBuf,
        /// TOML file overriding the default game configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Outcome of a scripted run.
#[derive(Debug, Serialize)]
struct RunReport {
    ticks: u64,
    events: u64,
    fingerprint: String,
    snapshot: FrameSnapshot,
}

/// Entry point for the Tideline command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            levels,
            config,
            script,
            json,
        } => run(&levels, config.as_deref(), &script, json),
        Commands::CheckLevel { level, config } => check_level(&level, config.as_deref()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let config: GameConfig = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    config.validate().context("configuration rejected")?;
    Ok(config)
}

fn run(levels_dir: &Path, config: Option<&Path>, script_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config)?;
    let levels = LevelSet::load_dir(levels_dir, &config)
        .with_context(|| format!("failed to load levels from {}", levels_dir.display()))?;
    let script = Script::load(script_path)
        .with_context(|| format!("failed to load script {}", script_path.display()))?;
    let mut playing = Playing::new(config, levels).context("failed to start session")?;

    let mut hasher = Sha256::new();
    let mut events = Vec::new();
    let mut ticks = 0_u64;
    let mut event_count = 0_u64;
    for command in script.commands() {
        playing.apply(command, &mut events);
        if matches!(command, Command::Tick { .. }) {
            ticks += 1;
        }
        for event in events.drain(..) {
            event_count += 1;
            debug!(tick = ticks, event = ?event, "event");
        }
        hasher.update(serde_json::to_vec(&playing.snapshot())?);
    }

    let report = RunReport {
        ticks,
        events: event_count,
        fingerprint: format!("{:x}", hasher.finalize()),
        snapshot: playing.snapshot(),
    };
    info!(
        ticks = report.ticks,
        events = report.events,
        fingerprint = %report.fingerprint,
        "run_finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    let snapshot = &report.snapshot;
    let player = &snapshot.player;
    println!(
        "level {} after {} ticks ({} events), scroll {:.1}",
        snapshot.level_index, report.ticks, report.events, snapshot.scroll_offset
    );
    println!(
        "player x={:.1} y={:.1} health={} facing={:?} animation={:?} on_ground={}",
        player.hitbox.x,
        player.hitbox.y,
        player.health,
        player.facing,
        player.animation,
        player.on_ground
    );
    for enemy in &snapshot.enemies {
        println!(
            "enemy #{} {:?} x={:.1} y={:.1} health={} facing={:?} state={:?}",
            enemy.id.get(),
            enemy.kind,
            enemy.hitbox.x,
            enemy.hitbox.y,
            enemy.health,
            enemy.facing,
            enemy.state
        );
    }
    println!(
        "paused={} game_over={} level_completed={}",
        snapshot.paused, snapshot.game_over, snapshot.level_completed
    );
    println!("fingerprint {}", report.fingerprint);
}

fn check_level(path: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let level = load_level(path, &config)
        .with_context(|| format!("failed to load level {}", path.display()))?;
    let grid = level.grid();

    println!(
        "{}: {}x{} tiles, {} passable, max scroll {:.1}",
        path.display(),
        grid.columns(),
        grid.rows(),
        grid.passable_count(),
        level.max_scroll_offset()
    );
    let spawn = level.player_spawn();
    println!(
        "player spawn ({}, {}){}",
        spawn.column(),
        spawn.row(),
        if level.player_spawn_is_default() {
            " [default]"
        } else {
            ""
        }
    );
    for enemy in level.enemy_spawns() {
        println!(
            "{:?} at ({}, {})",
            enemy.kind,
            enemy.tile.column(),
            enemy.tile.row()
        );
    }
    Ok(())
}
