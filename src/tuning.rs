//! Data-driven game balance
//!
//! Every numeric knob of the simulation lives here. Defaults reproduce the
//! classic feel; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;

/// Tank movement and vertical physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    /// Forward speed (units/s)
    pub move_speed: f32,
    /// Turn rate (degrees per tick)
    pub rotation_speed: f32,
    /// Per-tick velocity multiplier with no move input
    pub damping: f32,
    /// Speed above which friction kicks in
    pub max_speed: f32,
    pub friction: f32,
    /// Upward velocity on jump
    pub jump_velocity: f32,
    /// Gravity (units/s², negative is down)
    pub gravity: f32,
    /// Gravity multiplier while falling off the maze
    pub fall_gravity_multiplier: f32,
    /// Tip-over rate while falling (degrees/s), clamped at 90
    pub fall_tip_speed: f32,
    /// Steering deflection rate under turn input (degrees/s)
    pub steering_speed: f32,
    /// Steering relax rate with no turn input (degrees/s)
    pub steering_return_speed: f32,
    pub max_steering_angle: f32,
    pub wheel_radius: f32,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            rotation_speed: 1.0,
            damping: 0.9,
            max_speed: 10.0,
            friction: 3.0,
            jump_velocity: 5.0,
            gravity: -9.81,
            fall_gravity_multiplier: 10.0,
            fall_tip_speed: 140.0,
            steering_speed: 10.0,
            steering_return_speed: 60.0,
            max_steering_angle: 15.0,
            wheel_radius: 0.001,
        }
    }
}

/// Projectile ballistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Horizontal speed (units/s)
    pub speed: f32,
    /// Spawn distance ahead of the tank along the firing heading
    pub muzzle_offset: f32,
    /// Spawn height above the tank
    pub muzzle_height: f32,
    /// Gravity (units/s², negative is down)
    pub gravity: f32,
    /// Grace period before gravity starts (s)
    pub gravity_delay: f32,
    /// Exponent rate of the gravity ramp-in
    pub gravity_ease_rate: f32,
    pub gravity_scale: f32,
    /// Height at or below which the projectile is considered landed
    pub impact_height: f32,
    /// Flight time after which the projectile is discarded (s)
    pub max_flight_time: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 12.0,
            muzzle_offset: 0.8,
            muzzle_height: 2.0,
            gravity: -9.81,
            gravity_delay: 0.2,
            gravity_ease_rate: 3.0,
            gravity_scale: 30.0,
            impact_height: 0.9,
            max_flight_time: 10.0,
        }
    }
}

/// Coin burst particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub count: usize,
    pub life: f32,
    /// Horizontal speed range is [-spread, spread)
    pub horizontal_spread: f32,
    /// Vertical speed range is [0, lift)
    pub vertical_lift: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            count: 100,
            life: 1.0,
            horizontal_spread: 1.0,
            vertical_lift: 2.0,
        }
    }
}

/// Countdown and warning banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerTuning {
    /// Time budget per level (s)
    pub level_time: f32,
    /// Seconds removed per tick
    pub decrement: f32,
    /// Remaining time that raises the warning
    pub warning_threshold: f32,
    /// Remaining time below which the warning banner is hidden again
    pub warning_clear_threshold: f32,
    pub flash_step: f32,
    pub flash_min: f32,
    pub flash_max: f32,
}

impl Default for TimerTuning {
    fn default() -> Self {
        Self {
            level_time: 200.0,
            decrement: 0.01,
            warning_threshold: 100.0,
            warning_clear_threshold: 6.0,
            flash_step: 0.05,
            flash_min: 0.2,
            flash_max: 1.0,
        }
    }
}

/// What an unstable tile does while nobody stands on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DonutVacancy {
    /// Counter holds its value until the tank returns
    #[default]
    Freeze,
    /// Counter keeps running once triggered
    Continue,
    /// Counter drops back to idle
    Reset,
}

/// Unstable donut tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonutTuning {
    /// First tick of the drop phase (shaking before this)
    pub drop_start: u32,
    /// Tick at which the tile is removed
    pub remove_at: u32,
    /// Sink per tick while dropping
    pub drop_rate: f32,
    pub shake_amplitude: f32,
    pub vacancy: DonutVacancy,
}

impl Default for DonutTuning {
    fn default() -> Self {
        Self {
            drop_start: 35,
            remove_at: 100,
            drop_rate: 0.05,
            shake_amplitude: 0.1,
            vacancy: DonutVacancy::Freeze,
        }
    }
}

/// Turret and camera smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimTuning {
    /// Fraction of the remaining turret angle closed per tick
    pub turret_factor: f32,
    /// Differences below this are treated as settled (degrees)
    pub turret_epsilon: f32,
    pub camera_smoothing_first_person: f32,
    pub camera_smoothing_third_person: f32,
}

impl Default for AimTuning {
    fn default() -> Self {
        Self {
            turret_factor: 0.1,
            turret_epsilon: 0.01,
            camera_smoothing_first_person: 10.0,
            camera_smoothing_third_person: 5.0,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub tank: TankTuning,
    pub projectile: ProjectileTuning,
    pub particles: ParticleTuning,
    pub timer: TimerTuning,
    pub donut: DonutTuning,
    pub aim: AimTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from disk, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        let result = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|json| Self::from_json(&json));

        match result {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Ticks in a full level countdown
    pub fn level_ticks(&self) -> u32 {
        if self.timer.decrement <= 0.0 {
            return u32::MAX;
        }
        (self.timer.level_time / self.timer.decrement).round() as u32
    }
}
