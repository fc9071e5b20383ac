//! Hop Engine headless runner.
//!
//! Loads the configuration and a directory of JSON levels, then simulates a
//! fixed number of seconds with constant intents and logs where every active
//! entity ended up. Useful for replaying level designs without a renderer.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --levels assets/levels --seconds 3 --right
//! ```

use clap::Parser;
use hopengine::gameworld::GameWorld;
use hopengine::resources::gameconfig::GameConfig;
use hopengine::resources::input::InputState;
use hopengine::resources::levelstore::LevelStore;
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

/// Hop Engine headless simulation
#[derive(Parser)]
#[command(version, about = "Runs the platformer simulation without a window.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Directory of `*.json` level files, played in file name order.
    #[arg(long, value_name = "DIR", default_value = "assets/levels")]
    levels: PathBuf,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,

    /// Hold left for the whole run.
    #[arg(long)]
    left: bool,

    /// Hold right for the whole run.
    #[arg(long)]
    right: bool,

    /// Hold jump for the whole run.
    #[arg(long)]
    jump: bool,

    /// Enable the collision box overlay in the draw output.
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{e}, using defaults");
    }
    if cli.debug {
        config.debug.collision_boxes = true;
    }
    let step = config.timing.fixed_step();

    let levels = match LevelStore::load_dir(&cli.levels) {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut game = match GameWorld::new(config, levels) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    game.set_input(InputState::new(cli.left, cli.right, cli.jump));

    let ticks = (cli.seconds.max(0.0) / step).round() as u32;
    for _ in 0..ticks {
        if let Err(e) = game.update(step) {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    info!(
        "simulated {ticks} ticks, now on level {} '{}'",
        game.current_level(),
        game.level_name()
    );
    for item in game.snapshot() {
        info!(
            "{:?}: position ({:.1}, {:.1}) facing {} {:?} ({:?})",
            item.entity,
            item.position.x,
            item.position.y,
            item.direction,
            item.super_state,
            item.animation
        );
    }
    let draw = game.draw();
    info!(
        "draw list: {} sprites, {} debug boxes, texts {:?}",
        draw.sprites().count(),
        draw.debug_boxes().count(),
        draw.texts().collect::<Vec<_>>()
    );
    ExitCode::SUCCESS
}
