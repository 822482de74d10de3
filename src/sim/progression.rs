//! Level progression: current level, unlocks and coin tally

use serde::{Deserialize, Serialize};

/// Effect of one collected coin on the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinOutcome {
    /// More coins remain on this level
    Counted,
    /// Last coin of a non-final level
    LevelComplete,
    /// Last coin of the final level
    GameWon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    /// Current level, 1-based
    pub level: u8,
    pub final_level: u8,
    completed: Vec<bool>,
    pub coins_collected: usize,
    pub total_coins: usize,
}

impl Progression {
    pub fn new(final_level: u8) -> Self {
        Self {
            level: 1,
            final_level,
            completed: vec![false; usize::from(final_level)],
            coins_collected: 0,
            total_coins: 0,
        }
    }

    /// Level 1 is always open; level N+1 opens once level N is completed
    pub fn is_unlocked(&self, level: u8) -> bool {
        match level {
            0 => false,
            1 => self.final_level >= 1,
            n if n <= self.final_level => self.is_completed(n - 1),
            _ => false,
        }
    }

    pub fn is_completed(&self, level: u8) -> bool {
        level
            .checked_sub(1)
            .and_then(|i| self.completed.get(usize::from(i)))
            .copied()
            .unwrap_or(false)
    }

    /// Completion flags indexed by `level - 1`
    pub fn completed(&self) -> &[bool] {
        &self.completed
    }

    pub fn is_final_level(&self) -> bool {
        self.level >= self.final_level
    }

    /// Enter `level` with a freshly counted coin total
    pub fn begin_level(&mut self, level: u8, total_coins: usize) {
        self.level = level;
        self.total_coins = total_coins;
        self.coins_collected = 0;
    }

    /// Tally a coin that was just removed from the grid
    pub fn record_coin(&mut self) -> CoinOutcome {
        self.coins_collected = (self.coins_collected + 1).min(self.total_coins);
        if self.coins_collected < self.total_coins {
            return CoinOutcome::Counted;
        }

        if let Some(flag) = self.completed.get_mut(usize::from(self.level.saturating_sub(1))) {
            *flag = true;
        }
        self.coins_collected = 0;
        if self.is_final_level() {
            CoinOutcome::GameWon
        } else {
            CoinOutcome::LevelComplete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocks_follow_completion() {
        let mut progression = Progression::new(3);
        assert!(progression.is_unlocked(1));
        assert!(!progression.is_unlocked(2));
        assert!(!progression.is_unlocked(3));
        assert!(!progression.is_unlocked(0));
        assert!(!progression.is_unlocked(4));

        progression.begin_level(1, 1);
        assert_eq!(progression.record_coin(), CoinOutcome::LevelComplete);
        assert!(progression.is_unlocked(2));
        assert!(!progression.is_unlocked(3));
    }

    #[test]
    fn completion_fires_once_and_resets_counter() {
        let mut progression = Progression::new(3);
        progression.begin_level(2, 3);
        assert_eq!(progression.record_coin(), CoinOutcome::Counted);
        assert_eq!(progression.record_coin(), CoinOutcome::Counted);
        assert!(!progression.is_completed(2));
        assert_eq!(progression.record_coin(), CoinOutcome::LevelComplete);
        assert!(progression.is_completed(2));
        assert_eq!(progression.coins_collected, 0);
        assert_eq!(progression.completed(), &[false, true, false]);
    }

    #[test]
    fn final_level_wins() {
        let mut progression = Progression::new(3);
        progression.begin_level(3, 1);
        assert_eq!(progression.record_coin(), CoinOutcome::GameWon);
        assert!(progression.is_completed(3));
    }
}
