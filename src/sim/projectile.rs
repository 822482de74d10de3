//! Projectile ballistics
//!
//! One ball at a time. It flies straight along the firing heading, then
//! gravity ramps in smoothly after a short grace period.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::maze::{Maze, TileCoord};
use super::tank::Tank;
use crate::heading_vector;
use crate::tuning::ProjectileTuning;

/// Result of advancing a projectile by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    /// Still in the air
    Airborne,
    /// Touched down this tick; no bounce
    Landed,
    /// Exceeded its maximum flight time
    Expired,
}

/// The in-flight ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec3,
    /// Horizontal velocity: unit heading scaled by the firing speed
    pub direction: Vec3,
    pub vertical_velocity: f32,
    /// Seconds since firing
    pub flight_time: f32,
}

impl Projectile {
    /// Launch from the turret along `barrel_heading`, in world degrees
    pub fn fire(tank: &Tank, barrel_heading: f32, tuning: &ProjectileTuning) -> Self {
        let heading = heading_vector(barrel_heading).normalize_or_zero();
        let muzzle = tank.position + heading * tuning.muzzle_offset;
        Self {
            position: Vec3::new(muzzle.x, tank.position.y + tuning.muzzle_height, muzzle.z),
            direction: heading * tuning.speed,
            vertical_velocity: 0.0,
            flight_time: 0.0,
        }
    }

    /// Gravity multiplier `1 - e^(-rate * t)`, 0 during the grace period
    pub fn gravity_ease(&self, tuning: &ProjectileTuning) -> f32 {
        if self.flight_time < tuning.gravity_delay {
            return 0.0;
        }
        let t = self.flight_time - tuning.gravity_delay;
        1.0 - (-tuning.gravity_ease_rate * t).exp()
    }

    pub fn update(&mut self, dt: f32, tuning: &ProjectileTuning) -> Flight {
        self.flight_time += dt;

        self.position.x += self.direction.x * dt;
        self.position.z += self.direction.z * dt;

        if self.flight_time >= tuning.gravity_delay {
            let eased = tuning.gravity * self.gravity_ease(tuning);
            self.vertical_velocity += eased * tuning.gravity_scale * dt;
        }
        self.position.y += self.vertical_velocity * dt;

        if self.position.y <= tuning.impact_height {
            self.position.y = 0.0;
            Flight::Landed
        } else if self.flight_time >= tuning.max_flight_time {
            Flight::Expired
        } else {
            Flight::Airborne
        }
    }

    /// Maze tile under the ball, if inside the grid
    pub fn tile(&self, maze: &Maze) -> Option<TileCoord> {
        maze.tile_at(self.position.x, self.position.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::CameraMode;
    use crate::sim::aim::Aim;

    fn fly(projectile: &mut Projectile, tuning: &ProjectileTuning) -> (Flight, u32) {
        let mut ticks = 0;
        loop {
            ticks += 1;
            let flight = projectile.update(SIM_DT, tuning);
            if flight != Flight::Airborne || ticks > 10_000 {
                return (flight, ticks);
            }
        }
    }

    #[test]
    fn spawns_ahead_of_turret() {
        let tuning = ProjectileTuning::default();
        let tank = Tank {
            rotation: 45.0,
            ..Tank::spawn_at(TileCoord::new(7, 7).unwrap())
        };
        let aim = Aim {
            turret_yaw: 45.0,
            ..Aim::new(CameraMode::ThirdPerson)
        };
        let ball = Projectile::fire(&tank, aim.barrel_heading(tank.rotation), &tuning);

        // Hull 45 + turret 45 points along +X
        assert!((ball.position.x - (14.0 + 0.8)).abs() < 1e-4);
        assert!((ball.position.z - 14.0).abs() < 1e-4);
        assert_eq!(ball.position.y, 2.0);
        assert!((ball.direction.length() - 12.0).abs() < 1e-4);
        assert_eq!(ball.vertical_velocity, 0.0);
    }

    #[test]
    fn no_gravity_during_grace_period() {
        let tuning = ProjectileTuning::default();
        let mut ball = Projectile::fire(&Tank::default(), 0.0, &tuning);
        for _ in 0..12 {
            assert_eq!(ball.update(SIM_DT, &tuning), Flight::Airborne);
        }
        assert!(ball.flight_time < tuning.gravity_delay);
        assert_eq!(ball.position.y, 2.0);
        assert_eq!(ball.vertical_velocity, 0.0);
    }

    #[test]
    fn gravity_ramps_in_smoothly() {
        let tuning = ProjectileTuning::default();
        let mut ball = Projectile::fire(&Tank::default(), 0.0, &tuning);
        ball.flight_time = tuning.gravity_delay;
        assert_eq!(ball.gravity_ease(&tuning), 0.0);
        ball.flight_time = tuning.gravity_delay + 0.1;
        let early = ball.gravity_ease(&tuning);
        ball.flight_time = tuning.gravity_delay + 1.0;
        let late = ball.gravity_ease(&tuning);
        assert!(early > 0.0 && early < late && late < 1.0);
    }

    #[test]
    fn lands_without_bouncing() {
        let tuning = ProjectileTuning::default();
        let mut ball = Projectile::fire(&Tank::default(), 0.0, &tuning);
        let (flight, ticks) = fly(&mut ball, &tuning);
        assert_eq!(flight, Flight::Landed);
        assert_eq!(ball.position.y, 0.0);
        // Short, steep arc: a few tiles downrange
        assert!((15..40).contains(&ticks), "landed after {ticks} ticks");
        assert!(ball.position.z > 3.0 && ball.position.z < 8.0);
    }

    #[test]
    fn expires_when_gravity_is_off() {
        let tuning = ProjectileTuning {
            gravity: 0.0,
            max_flight_time: 1.0,
            ..Default::default()
        };
        let mut ball = Projectile::fire(&Tank::default(), 0.0, &tuning);
        let (flight, _) = fly(&mut ball, &tuning);
        assert_eq!(flight, Flight::Expired);
    }
}
