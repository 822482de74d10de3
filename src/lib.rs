//! Maze Tank - a 3D maze arcade game with a collectible-coin tank
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tank, projectile, maze, progression)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `audio`: Fire-and-forget sound playback driven by simulation events

pub mod audio;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (seconds per tick)
    pub const SIM_DT: f32 = 0.016;
    /// Interval of the external tick source
    pub const TICK_INTERVAL_MS: u64 = 10;

    /// Maze dimensions (tiles)
    pub const MAZE_WIDTH: usize = 15;
    pub const MAZE_HEIGHT: usize = 15;
    /// World units per tile edge
    pub const TILE_SIZE: f32 = 2.0;

    /// Number of levels in a full run
    pub const FINAL_LEVEL: u8 = 3;
}

/// Normalize an angle in degrees into [-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Horizontal unit heading for a yaw in degrees (yaw 0 faces +Z)
#[inline]
pub fn heading_vector(yaw_degrees: f32) -> Vec3 {
    let rad = yaw_degrees.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}
