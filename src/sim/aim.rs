//! Turret aim and camera framing
//!
//! Both follow their targets by exponential smoothing. Angles are degrees;
//! only the turret's remaining delta is wrapped, so the turret always takes
//! the short way round.

use serde::{Deserialize, Serialize};

use crate::normalize_degrees;
use crate::settings::CameraMode;
use crate::tuning::AimTuning;

/// Turret yaw requested by a pointer at `(x, y)` on a `width` x `height` screen.
///
/// Straight up on screen is 0°, left is positive. Returns `None` when the
/// pointer sits exactly on the centre.
pub fn pointer_target_yaw(x: f32, y: f32, width: f32, height: f32) -> Option<f32> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    if x == cx && y == cy {
        return None;
    }
    let dx = -(x - cx);
    let dy = cy - y;
    Some(normalize_degrees(dx.atan2(dy).to_degrees()))
}

/// Turret and camera orientation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Turret yaw relative to the hull
    pub turret_yaw: f32,
    /// Where the turret is heading, in [-180, 180]
    pub target_yaw: f32,
    /// Camera pan around the tank
    pub camera_pan: f32,
    pub camera: CameraMode,
}

impl Aim {
    pub fn new(camera: CameraMode) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    pub fn set_target(&mut self, yaw: f32) {
        self.target_yaw = normalize_degrees(yaw);
    }

    /// Shortest signed angle from the turret to its target
    pub fn remaining(&self) -> f32 {
        normalize_degrees(self.target_yaw - self.turret_yaw)
    }

    /// Close a fixed fraction of the remaining turret angle
    pub fn update_turret(&mut self, tuning: &AimTuning) {
        let diff = self.remaining();
        if diff.abs() > tuning.turret_epsilon {
            self.turret_yaw += diff * tuning.turret_factor;
        }
    }

    /// Ease the camera toward the combined hull + turret heading
    pub fn update_camera(&mut self, tank_rotation: f32, dt: f32, tuning: &AimTuning) {
        let smoothing = match self.camera {
            CameraMode::FirstPerson => tuning.camera_smoothing_first_person,
            CameraMode::ThirdPerson => tuning.camera_smoothing_third_person,
        };
        let target = self.barrel_heading(tank_rotation);
        self.camera_pan += (target - self.camera_pan) * smoothing * dt;
    }

    /// Heading of the barrel in world space
    pub fn barrel_heading(&self, tank_rotation: f32) -> f32 {
        tank_rotation + self.turret_yaw
    }
}
