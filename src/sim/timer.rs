//! Level countdown, low-time warning flash and coin animation

use serde::{Deserialize, Serialize};

use crate::tuning::{TimerTuning, Tuning};

/// What happened to the countdown on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running,
    /// Crossed the warning threshold (once per level)
    WarningRaised,
    /// Reached zero
    Expired,
}

/// Per-level countdown.
///
/// Time is kept as whole ticks so the countdown lands exactly on zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ticks: u32,
    decrement: f32,
    warning_played: bool,
    /// Whether the "hurry up" banner is showing
    pub low_time_warning: bool,
    /// Banner opacity, oscillates while the warning shows
    pub flash_alpha: f32,
    flash_increasing: bool,
}

impl Countdown {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            remaining_ticks: tuning.level_ticks(),
            decrement: tuning.timer.decrement,
            warning_played: false,
            low_time_warning: false,
            flash_alpha: tuning.timer.flash_max,
            flash_increasing: false,
        }
    }

    /// Seconds left
    pub fn remaining_time(&self) -> f32 {
        self.remaining_ticks as f32 * self.decrement
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ticks == 0
    }

    /// Count down one tick. Only call while a level is being played.
    pub fn tick(&mut self, tuning: &TimerTuning) -> CountdownTick {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            return CountdownTick::Expired;
        }

        let remaining = self.remaining_time();
        if !self.warning_played && remaining <= tuning.warning_threshold {
            self.warning_played = true;
            self.low_time_warning = true;
            return CountdownTick::WarningRaised;
        }
        if remaining <= tuning.warning_clear_threshold {
            self.low_time_warning = false;
        }
        CountdownTick::Running
    }

    /// Animate the warning banner (runs every tick, whatever the phase)
    pub fn update_flash(&mut self, tuning: &TimerTuning) {
        if !self.low_time_warning {
            self.flash_alpha = tuning.flash_max;
            self.flash_increasing = false;
            return;
        }

        if self.flash_increasing {
            self.flash_alpha += tuning.flash_step;
        } else {
            self.flash_alpha -= tuning.flash_step;
        }
        if self.flash_alpha <= tuning.flash_min {
            self.flash_alpha = tuning.flash_min;
            self.flash_increasing = true;
        } else if self.flash_alpha >= tuning.flash_max {
            self.flash_alpha = tuning.flash_max;
            self.flash_increasing = false;
        }
    }
}

/// Spinning, bobbing coin animation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinSpin {
    /// Degrees, in [0, 360)
    pub angle: f32,
    /// Phase of the vertical bob
    pub bounce: f32,
}

impl CoinSpin {
    pub fn update(&mut self) {
        self.angle += 2.0;
        if self.angle >= 360.0 {
            self.angle -= 360.0;
        }
        self.bounce += 0.1;
    }

    /// Current bob height offset
    pub fn bob(&self) -> f32 {
        0.1 * self.bounce.sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_countdown_is_exact() {
        let tuning = Tuning::default();
        let mut countdown = Countdown::new(&tuning);
        assert!((countdown.remaining_time() - 200.0).abs() < 1e-3);

        let mut warnings = 0;
        for tick in 1..=20_000 {
            match countdown.tick(&tuning.timer) {
                CountdownTick::Expired => {
                    assert_eq!(tick, 20_000);
                }
                CountdownTick::WarningRaised => warnings += 1,
                CountdownTick::Running => {}
            }
        }
        assert_eq!(warnings, 1);
        assert!(countdown.is_expired());
        assert_eq!(countdown.remaining_time(), 0.0);
        assert_eq!(countdown.tick(&tuning.timer), CountdownTick::Expired);
    }

    #[test]
    fn warning_shows_then_clears_near_the_end() {
        let tuning = Tuning::default();
        let mut countdown = Countdown::new(&tuning);
        for _ in 0..10_010 {
            countdown.tick(&tuning.timer);
        }
        assert!(countdown.low_time_warning);
        for _ in 0..9_500 {
            countdown.tick(&tuning.timer);
        }
        assert!(!countdown.low_time_warning);
    }

    #[test]
    fn flash_oscillates_between_bounds() {
        let tuning = Tuning::default();
        let mut countdown = Countdown::new(&tuning);
        countdown.low_time_warning = true;

        let mut min_seen: f32 = 1.0;
        for _ in 0..40 {
            countdown.update_flash(&tuning.timer);
            assert!(countdown.flash_alpha >= 0.2 && countdown.flash_alpha <= 1.0);
            min_seen = min_seen.min(countdown.flash_alpha);
        }
        assert_eq!(min_seen, 0.2);

        countdown.low_time_warning = false;
        countdown.update_flash(&tuning.timer);
        assert_eq!(countdown.flash_alpha, 1.0);
    }

    #[test]
    fn coin_spin_wraps() {
        let mut spin = CoinSpin::default();
        for _ in 0..181 {
            spin.update();
        }
        assert!((spin.angle - 2.0).abs() < 1e-3);
        assert!(spin.bob().abs() <= 0.1);
    }
}
