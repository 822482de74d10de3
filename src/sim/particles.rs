//! Coin burst particles (visual only, never feeds back into gameplay)

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::ParticleTuning;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Seconds left, <= 0 means dead
    pub life: f32,
}

/// One burst of particles; a new trigger replaces the whole batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub particles: Vec<Particle>,
    active: bool,
}

impl ParticleBurst {
    /// Replace any current batch with a fresh burst at `origin`
    pub fn trigger(&mut self, origin: Vec3, rng: &mut impl Rng, tuning: &ParticleTuning) {
        self.particles.clear();
        self.particles.extend((0..tuning.count).map(|_| Particle {
            pos: origin,
            vel: Vec3::new(
                sample(rng, -tuning.horizontal_spread, tuning.horizontal_spread),
                sample(rng, 0.0, tuning.vertical_lift),
                sample(rng, -tuning.horizontal_spread, tuning.horizontal_spread),
            ),
            life: tuning.life,
        }));
        self.active = !self.particles.is_empty();
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        for p in &mut self.particles {
            p.life -= dt;
            p.pos += p.vel * dt;
        }
        if self.particles.iter().all(|p| p.life <= 0.0) {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Particles still worth drawing
    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.life > 0.0)
    }
}

fn sample(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
