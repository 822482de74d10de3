//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Within one
//! tick the order is: commands, tank, donut tiles, projectile, tank coin
//! pickup, particles, aim, countdown, animations.

use super::maze::Tile;
use super::projectile::{Flight, Projectile};
use super::state::{Collector, GameEvent, GamePhase, GameState, LossCause};
use super::tank::DriveInput;
use crate::settings::CameraMode;

/// Brightness change per key press
const BRIGHTNESS_STEP: f32 = 0.2;
const MAX_BRIGHTNESS: f32 = 3.0;

/// Discrete, edge-triggered requests (key presses, menu picks)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Escape: Playing <-> Paused
    TogglePause,
    Resume,
    /// Digit key on a level-select screen
    SelectLevel(u8),
    Restart,
    /// Continue after a level is complete
    NextLevel,
    PreviousLevel,
    Quit,
    Camera(CameraMode),
    BrightnessUp,
    BrightnessDown,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Jump pressed this tick
    pub jump: bool,
    /// Fire pressed this tick
    pub fire: bool,
    /// Aim modifier held
    pub aiming: bool,
    /// Turret yaw requested by the pointer (see `aim::pointer_target_yaw`)
    pub aim_target: Option<f32>,
    pub commands: Vec<Command>,
}

impl TickInput {
    fn drive(&self) -> DriveInput {
        DriveInput {
            move_dir: axis(self.forward, self.back),
            turn_dir: axis(self.left, self.right),
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    for &command in &input.commands {
        apply_command(state, command);
    }

    update_tank(state, input, dt);

    if state.phase == GamePhase::Playing {
        let occupied = if state.tank.is_grounded() {
            state.maze.tile_at(state.tank.position.x, state.tank.position.z)
        } else {
            None
        };
        for tile in state.maze.advance_donuts(occupied, &state.tuning.donut) {
            log::debug!("Donut tile ({}, {}) collapsed", tile.row(), tile.col());
            state.emit(GameEvent::TileCollapsed { tile });
        }
    }

    update_projectile(state, input, dt);

    // The tank picks up whatever it drives over, in the air or not
    if state.phase == GamePhase::Playing && !state.tank.is_falling() {
        let pos = state.tank.position;
        if let Some(tile) = state.maze.tile_at(pos.x, pos.z) {
            state.try_collect(tile, Collector::Tank, pos);
        }
    }

    state.particles.update(dt);

    if state.phase == GamePhase::Playing && !state.tank.is_falling() {
        if input.aiming
            && let Some(yaw) = input.aim_target
        {
            state.aim.set_target(yaw);
        }
        state.aim.update_turret(&state.tuning.aim);
        state.aim.update_camera(state.tank.rotation, dt, &state.tuning.aim);
    }

    if state.phase == GamePhase::Playing {
        use super::timer::CountdownTick;
        match state.countdown.tick(&state.tuning.timer) {
            CountdownTick::Running => {}
            CountdownTick::WarningRaised => {
                log::info!("Low time warning");
                state.emit(GameEvent::TimeWarning);
            }
            CountdownTick::Expired => {
                log::info!("Time up on level {}", state.progression.level);
                state.phase = GamePhase::GameOver {
                    cause: LossCause::TimeUp,
                };
                state.emit(GameEvent::TimeUp);
            }
        }
    }

    state.countdown.update_flash(&state.tuning.timer);
    state.coin_spin.update();
}

/// Route one command according to the current phase
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::Quit => {
            log::info!("Quit requested");
            state.quit_requested = true;
        }
        Command::Camera(mode) => state.aim.camera = mode,
        Command::BrightnessUp => {
            state.brightness = (state.brightness + BRIGHTNESS_STEP).min(MAX_BRIGHTNESS);
        }
        Command::BrightnessDown => {
            state.brightness = (state.brightness - BRIGHTNESS_STEP).max(0.0);
        }
        Command::Restart => {
            state.restart();
        }
        Command::TogglePause => match state.phase {
            GamePhase::Playing => set_paused(state, true),
            GamePhase::Paused => set_paused(state, false),
            _ => {}
        },
        Command::Resume => {
            if state.phase == GamePhase::Paused {
                set_paused(state, false);
            }
        }
        Command::SelectLevel(level) => {
            if !matches!(state.phase, GamePhase::MainMenu | GamePhase::Paused) {
                return;
            }
            if state.progression.is_unlocked(level) {
                state.try_start_level(level);
            } else {
                log::debug!("Level {level} is locked");
            }
        }
        Command::NextLevel => {
            if state.phase == GamePhase::LevelComplete && !state.progression.is_final_level() {
                let next = state.progression.level + 1;
                state.try_start_level(next);
            }
        }
        Command::PreviousLevel => {
            if state.phase == GamePhase::Playing && state.progression.level > 1 {
                let previous = state.progression.level - 1;
                state.try_start_level(previous);
            }
        }
    }
}

fn set_paused(state: &mut GameState, paused: bool) {
    state.phase = if paused {
        GamePhase::Paused
    } else {
        GamePhase::Playing
    };
    state.emit(GameEvent::MenuToggled { paused });
}

fn update_tank(state: &mut GameState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning.tank;
    let tank = &mut state.tank;

    // A falling tank ignores input and keeps dropping, even after game over
    if tank.is_falling() {
        if matches!(state.phase, GamePhase::Playing | GamePhase::GameOver { .. }) {
            tank.integrate(DriveInput::default(), dt, tuning);
            tank.check_fall(&state.maze, dt, tuning);
        }
        return;
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let jumped = input.jump && tank.try_jump(tuning);
    let drive = input.drive();
    tank.integrate(drive, dt, tuning);
    let fell = tank.check_fall(&state.maze, dt, tuning);
    tank.update_steering(drive.turn_dir, dt, tuning);

    if jumped {
        state.emit(GameEvent::Jumped);
    }
    if fell {
        log::info!("Tank fell off level {}", state.progression.level);
        state.phase = GamePhase::GameOver {
            cause: LossCause::Fell,
        };
        state.emit(GameEvent::Fell);
    }
}

fn update_projectile(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if input.fire && state.projectile.is_none() && !state.tank.is_falling() {
        let heading = state.aim.barrel_heading(state.tank.rotation);
        state.projectile = Some(Projectile::fire(&state.tank, heading, &state.tuning.projectile));
        log::debug!("Fired");
        state.emit(GameEvent::Fired);
    }

    let Some(mut ball) = state.projectile.take() else {
        return;
    };
    let flight = ball.update(dt, &state.tuning.projectile);
    if let Some(tile) = ball.tile(&state.maze)
        && state.maze.get(tile) == Tile::Coin
    {
        state.try_collect(tile, Collector::Projectile, ball.position);
    }
    if flight == Flight::Airborne {
        state.projectile = Some(ball);
    }
}
