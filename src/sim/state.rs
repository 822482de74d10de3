//! Game state and core simulation types
//!
//! Everything the simulation reads or writes lives in one `GameState`,
//! passed explicitly to `tick`.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aim::Aim;
use super::maze::{LevelError, LevelSource, Maze, TileCoord};
use super::particles::ParticleBurst;
use super::progression::{CoinOutcome, Progression};
use super::projectile::Projectile;
use super::tank::Tank;
use super::timer::{CoinSpin, Countdown};
use crate::consts::FINAL_LEVEL;
use crate::settings::{CameraMode, Settings};
use crate::tuning::Tuning;

/// Why a run ended badly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    TimeUp,
    Fell,
}

/// Current screen mode; exactly one routes input at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen with level select
    MainMenu,
    /// Active gameplay
    Playing,
    /// In-game menu overlay
    Paused,
    /// All coins of a non-final level collected, waiting to advance
    LevelComplete,
    /// Run lost
    GameOver { cause: LossCause },
    /// Final level cleared
    GameWon,
}

/// Which path picked up a coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collector {
    Tank,
    Projectile,
}

/// Side effects produced by a tick, drained by the host (audio, logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u8 },
    Jumped,
    Fired,
    CoinCollected { by: Collector, tile: TileCoord },
    LevelComplete { level: u8 },
    GameWon,
    TimeWarning,
    TimeUp,
    Fell,
    TileCollapsed { tile: TileCoord },
    MenuToggled { paused: bool },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// A fresh generator on the next stream
    pub fn next_rng(&mut self) -> Pcg32 {
        self.stream += 1;
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    /// Where level grids are read from on every level start
    pub levels: LevelSource,
    pub phase: GamePhase,
    pub progression: Progression,
    pub maze: Maze,
    pub tank: Tank,
    /// At most one ball in flight
    pub projectile: Option<Projectile>,
    pub aim: Aim,
    pub countdown: Countdown,
    pub coin_spin: CoinSpin,
    /// Scene brightness (0.0 - 3.0)
    pub brightness: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub quit_requested: bool,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: ParticleBurst,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// New session on the main menu, with level 1 preloaded if available
    pub fn new(seed: u64, tuning: Tuning, levels: LevelSource) -> Self {
        let countdown = Countdown::new(&tuning);
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            tuning,
            levels,
            phase: GamePhase::MainMenu,
            progression: Progression::new(FINAL_LEVEL),
            maze: Maze::new(),
            tank: Tank::default(),
            projectile: None,
            aim: Aim::new(CameraMode::default()),
            countdown,
            coin_spin: CoinSpin::default(),
            brightness: 1.0,
            time_ticks: 0,
            quit_requested: false,
            particles: ParticleBurst::default(),
            events: Vec::new(),
        };

        match state.maze.load(&state.levels, 1) {
            Ok(coins) => state.progression.begin_level(1, coins),
            Err(e) => log::warn!("{e}"),
        }
        state.tank = Tank::spawn_at(state.maze.center());
        state
    }

    /// Carry the player's view preferences into the session
    pub fn apply_preferences(&mut self, settings: &Settings) {
        self.aim.camera = settings.camera;
        self.brightness = settings.brightness.clamp(0.0, 3.0);
    }

    /// Load `level` and reset everything tied to a level attempt.
    ///
    /// On failure nothing changes: not the grid, not the phase.
    pub fn start_level(&mut self, level: u8) -> Result<(), LevelError> {
        let coins = self.maze.load(&self.levels, level)?;

        self.progression.begin_level(level, coins);
        self.tank = Tank::spawn_at(self.maze.center());
        self.projectile = None;
        self.particles = ParticleBurst::default();
        self.aim = Aim::new(self.aim.camera);
        self.countdown = Countdown::new(&self.tuning);
        self.phase = GamePhase::Playing;
        self.emit(GameEvent::LevelStarted { level });
        log::info!("Switched to level {level}");
        Ok(())
    }

    /// Start `level`, logging instead of failing
    pub fn try_start_level(&mut self, level: u8) -> bool {
        match self.start_level(level) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e}; staying on level {}", self.progression.level);
                false
            }
        }
    }

    /// Back to level 1 (completion flags are kept)
    pub fn restart(&mut self) -> bool {
        self.try_start_level(1)
    }

    /// Pick up the coin at `tile` if there is one, and update progression
    pub fn try_collect(&mut self, tile: TileCoord, by: Collector, at: Vec3) -> bool {
        if self.phase != GamePhase::Playing || !self.maze.collect_coin(tile) {
            return false;
        }

        let mut rng = self.rng_state.next_rng();
        self.particles.trigger(at, &mut rng, &self.tuning.particles);
        self.emit(GameEvent::CoinCollected { by, tile });
        log::debug!(
            "Coin collected by {:?}: {}/{}",
            by,
            self.progression.coins_collected + 1,
            self.progression.total_coins
        );

        let level = self.progression.level;
        match self.progression.record_coin() {
            CoinOutcome::Counted => {}
            CoinOutcome::LevelComplete => {
                self.phase = GamePhase::LevelComplete;
                self.emit(GameEvent::LevelComplete { level });
                log::info!("Level {level} complete");
            }
            CoinOutcome::GameWon => {
                self.phase = GamePhase::GameWon;
                self.emit(GameEvent::GameWon);
                log::info!("Game won");
            }
        }
        true
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}
