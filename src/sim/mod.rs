//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (particles are the only consumer)
//! - Side effects leave as `GameEvent`s, never as direct calls
//! - No rendering, audio or platform dependencies

pub mod aim;
pub mod hud;
pub mod maze;
pub mod particles;
pub mod progression;
pub mod projectile;
pub mod state;
pub mod tank;
pub mod tick;
pub mod timer;

pub use aim::{Aim, pointer_target_yaw};
pub use hud::{HudView, hud_view};
pub use maze::{DonutPhase, LevelError, LevelSource, Maze, Tile, TileCoord, TileOutOfBounds};
pub use particles::ParticleBurst;
pub use progression::Progression;
pub use projectile::Projectile;
pub use state::{Collector, GameEvent, GamePhase, GameState, LossCause};
pub use tank::{Tank, Vertical};
pub use tick::{Command, TickInput, apply_command, tick};
pub use timer::{CoinSpin, Countdown};
