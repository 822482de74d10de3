//! Tank kinematics: driving, jumping and falling off the maze

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::maze::{Maze, TileCoord, nearest_tile};
use crate::heading_vector;
use crate::tuning::TankTuning;

/// Vertical state of the tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Vertical {
    /// Resting on a supporting tile
    #[default]
    Grounded,
    /// In the air after a jump
    Jumping,
    /// Dropped off the maze; there is no way back
    Falling,
}

/// Directional intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveInput {
    /// +1 forward, -1 backward, 0 none
    pub move_dir: f32,
    /// +1 left, -1 right, 0 none
    pub turn_dir: f32,
}

/// The player's tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub position: Vec3,
    /// Yaw in degrees (0 faces +Z), not wrapped
    pub rotation: f32,
    /// Horizontal velocity (units/s)
    pub velocity: Vec3,
    pub vertical: Vertical,
    pub vertical_velocity: f32,
    /// Front wheel deflection in degrees
    pub steering_angle: f32,
    /// Accumulated wheel spin in degrees
    pub wheel_rotation: f32,
    /// Tip-over angle while falling, 0..=90
    pub fall_rotation: f32,
}

impl Default for Tank {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            velocity: Vec3::ZERO,
            vertical: Vertical::Grounded,
            vertical_velocity: 0.0,
            steering_angle: 0.0,
            wheel_rotation: 0.0,
            fall_rotation: 0.0,
        }
    }
}

impl Tank {
    /// A fresh tank standing on `tile`
    pub fn spawn_at(tile: TileCoord) -> Self {
        let (x, z) = tile.to_world();
        Self {
            position: Vec3::new(x, 0.0, z),
            ..Default::default()
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.vertical == Vertical::Grounded
    }

    pub fn is_falling(&self) -> bool {
        self.vertical == Vertical::Falling
    }

    /// Unit vector the hull faces
    pub fn forward(&self) -> Vec3 {
        heading_vector(self.rotation)
    }

    /// Start a jump. Only possible from the ground.
    pub fn try_jump(&mut self, tuning: &TankTuning) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.vertical = Vertical::Jumping;
        self.vertical_velocity = tuning.jump_velocity;
        true
    }

    /// Integrate turning, driving and jump arcs for one tick
    pub fn integrate(&mut self, input: DriveInput, dt: f32, tuning: &TankTuning) {
        self.rotation += input.turn_dir * tuning.rotation_speed;

        if input.move_dir != 0.0 {
            self.velocity = self.forward() * (tuning.move_speed * input.move_dir);
        } else {
            self.velocity *= tuning.damping;
        }
        if self.velocity.length() > tuning.max_speed {
            self.velocity -= self.velocity * tuning.friction * dt;
        }

        self.position += self.velocity * dt;
        if tuning.wheel_radius > 0.0 {
            self.wheel_rotation += tuning.move_speed * input.move_dir * dt / tuning.wheel_radius;
        }

        if self.vertical == Vertical::Jumping {
            self.vertical_velocity += tuning.gravity * dt;
            self.position.y += self.vertical_velocity * dt;
            if self.position.y <= 0.0 {
                self.position.y = 0.0;
                self.vertical_velocity = 0.0;
                self.vertical = Vertical::Grounded;
            }
        }

        if self.is_falling() && self.fall_rotation < 90.0 {
            self.fall_rotation = (self.fall_rotation + dt * tuning.fall_tip_speed).min(90.0);
        }
    }

    /// Check ground support under the tank and advance any fall.
    ///
    /// Returns `true` on the tick the tank starts falling.
    pub fn check_fall(&mut self, maze: &Maze, dt: f32, tuning: &TankTuning) -> bool {
        match self.vertical {
            Vertical::Jumping => false,
            Vertical::Falling => {
                self.apply_fall_gravity(dt, tuning);
                false
            }
            Vertical::Grounded => {
                let (row, col) = nearest_tile(self.position.x, self.position.z);
                let supported = maze.cell(row, col).is_some_and(|tile| tile.is_supporting());
                if supported {
                    self.position.y = 0.0;
                    self.vertical_velocity = 0.0;
                    false
                } else {
                    self.vertical = Vertical::Falling;
                    self.apply_fall_gravity(dt, tuning);
                    true
                }
            }
        }
    }

    fn apply_fall_gravity(&mut self, dt: f32, tuning: &TankTuning) {
        self.vertical_velocity += tuning.gravity * tuning.fall_gravity_multiplier * dt;
        self.position.y += self.vertical_velocity * dt;
    }

    /// Move the wheel deflection toward the turn input, or back to centre
    pub fn update_steering(&mut self, turn_dir: f32, dt: f32, tuning: &TankTuning) {
        let max = tuning.max_steering_angle;
        if turn_dir > 0.0 {
            self.steering_angle += tuning.steering_speed * dt;
        } else if turn_dir < 0.0 {
            self.steering_angle -= tuning.steering_speed * dt;
        } else if self.steering_angle > 0.0 {
            self.steering_angle = (self.steering_angle - tuning.steering_return_speed * dt).max(0.0);
        } else if self.steering_angle < 0.0 {
            self.steering_angle = (self.steering_angle + tuning.steering_return_speed * dt).min(0.0);
        }
        self.steering_angle = self.steering_angle.clamp(-max, max);
    }
}
