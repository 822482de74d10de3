//! Maze Tank entry point
//!
//! Headless driver: loads settings, tuning and levels, then runs the
//! simulation at a fixed timestep under a simple autopilot, playing sounds
//! for the events it produces. Rendering lives outside this crate.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use maze_tank::audio::AudioManager;
use maze_tank::consts::{SIM_DT, TICK_INTERVAL_MS};
use maze_tank::normalize_degrees;
use maze_tank::settings::CameraMode;
use maze_tank::sim::{Command, GamePhase, GameState, LevelSource, Tile, TickInput, hud_view, tick};
use maze_tank::{Settings, Tuning};

#[derive(Debug, Parser)]
#[command(name = "maze-tank", about = "Drive a tank through the maze and collect every coin")]
struct Args {
    /// Settings JSON (missing file means defaults)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Tuning JSON overriding game balance
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Level file, overrides the one in settings
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Run seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Stop after this many ticks
    #[arg(long, default_value_t = 60_000)]
    ticks: u64,
    /// Pace ticks at the external tick interval instead of running flat out
    #[arg(long)]
    realtime: bool,
    /// Camera framing (first, third), overrides the one in settings
    #[arg(long, value_parser = parse_camera)]
    camera: Option<CameraMode>,
    /// Write the effective settings back to the --settings file
    #[arg(long, requires = "settings")]
    save_settings: bool,
}

fn parse_camera(s: &str) -> Result<CameraMode, String> {
    CameraMode::from_str(s).ok_or_else(|| format!("unknown camera '{s}', expected first or third"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Maze Tank starting (seed {})", args.seed);

    let mut settings = args
        .settings
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();
    let tuning = args
        .tuning
        .as_deref()
        .map(Tuning::load_or_default)
        .unwrap_or_default();
    if let Some(camera) = args.camera {
        settings.camera = camera;
    }
    if let Some(levels) = &args.levels {
        settings.level_file = levels.clone();
    }
    log::info!("Camera: {}", settings.camera.as_str());

    if args.save_settings
        && let Some(path) = &args.settings
    {
        settings.save(path)?;
    }
    let level_file = settings.level_file.clone();

    // Fail early on an unreadable level file; in-game loads just log
    LevelSource::File(level_file.clone()).read()?;

    let mut state = GameState::new(args.seed, tuning, LevelSource::File(level_file));
    state.apply_preferences(&settings);
    let mut audio = AudioManager::new(&settings);

    for _ in 0..args.ticks {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);
        audio.handle_events(&state.drain_events());

        if state.quit_requested {
            break;
        }
        if args.realtime {
            std::thread::sleep(Duration::from_millis(TICK_INTERVAL_MS));
        }
    }

    log::info!("Stopped after {} ticks in {:?}", state.time_ticks, state.phase);
    let view = hud_view(&state);
    for line in view.status.iter().chain(view.timer.iter()).chain(view.banner.iter()) {
        println!("{line}");
    }
    Ok(())
}

/// Steer toward the nearest coin, fire when lined up, advance through menus
fn autopilot(state: &GameState) -> TickInput {
    match state.phase {
        GamePhase::MainMenu => {
            return TickInput {
                commands: vec![Command::SelectLevel(1)],
                ..Default::default()
            };
        }
        GamePhase::LevelComplete => {
            return TickInput {
                commands: vec![Command::NextLevel],
                ..Default::default()
            };
        }
        GamePhase::GameOver { .. } | GamePhase::GameWon => {
            return TickInput {
                commands: vec![Command::Quit],
                ..Default::default()
            };
        }
        GamePhase::Paused => {
            return TickInput {
                commands: vec![Command::Resume],
                ..Default::default()
            };
        }
        GamePhase::Playing => {}
    }

    let tank = &state.tank;
    let nearest = state
        .maze
        .tiles()
        .filter(|(_, tile)| *tile == Tile::Coin)
        .map(|(coord, _)| {
            let (x, z) = coord.to_world();
            (x - tank.position.x, z - tank.position.z)
        })
        .min_by(|a, b| a.0.hypot(a.1).total_cmp(&b.0.hypot(b.1)));

    let Some((dx, dz)) = nearest else {
        return TickInput::default();
    };
    let diff = normalize_degrees(dx.atan2(dz).to_degrees() - tank.rotation);
    let lined_up = diff.abs() < 5.0;

    TickInput {
        forward: diff.abs() < 30.0,
        left: diff > 2.0,
        right: diff < -2.0,
        fire: lined_up && dx.hypot(dz) > 4.0,
        ..Default::default()
    }
}
