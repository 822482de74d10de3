//! Overlay text selection
//!
//! Turns the session into the lines a renderer would draw. No drawing here.

use super::state::{GamePhase, GameState, LossCause};

pub const HELP_LINE: &str =
    "WASD: Move  |  Mouse: Aim  |  LMB: Shoot |  RMB: Aim | C: Cockpit View | V: Third-Person View";

/// Flashing low-time banner
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub lines: Vec<String>,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    /// `Level: N   Coins: a/b`, hidden on the main menu
    pub status: Option<String>,
    /// `Time: Ns`, hidden on the main menu
    pub timer: Option<String>,
    pub help: Option<&'static str>,
    /// Centered overlay (menus and end-of-level screens)
    pub banner: Vec<String>,
    pub warning: Option<Warning>,
}

pub fn hud_view(state: &GameState) -> HudView {
    let progression = &state.progression;
    let in_level = state.phase != GamePhase::MainMenu;

    let status = in_level.then(|| {
        format!(
            "Level: {}   Coins: {}/{}",
            progression.level, progression.coins_collected, progression.total_coins
        )
    });
    let timer = in_level.then(|| format!("Time: {}s", state.countdown.remaining_time().round() as u32));

    let banner = match state.phase {
        GamePhase::MainMenu => {
            let mut lines = vec!["Maze Tank - Select Level".to_string()];
            lines.extend(level_list(state));
            lines.push("R: Restart            Q: Quit Game".to_string());
            lines
        }
        GamePhase::Paused => {
            let mut lines = vec!["PAUSED - Select Level".to_string()];
            lines.extend(level_list(state));
            lines.push("R: Restart    Q: Quit    ESC: Resume".to_string());
            lines
        }
        GamePhase::Playing => Vec::new(),
        GamePhase::LevelComplete => vec![
            "Level Complete!".to_string(),
            "Press N to continue to the next level.".to_string(),
        ],
        GamePhase::GameOver { cause } => {
            let reason = match cause {
                LossCause::TimeUp => "Out of time",
                LossCause::Fell => "You fell off the maze",
            };
            vec![
                "GAME OVER".to_string(),
                reason.to_string(),
                "Press R to Reset or Q to Quit".to_string(),
            ]
        }
        GamePhase::GameWon => vec![
            "CONGRATULATIONS!".to_string(),
            "You completed all levels!".to_string(),
            "Press R to restart or Q to quit.".to_string(),
        ],
    };

    let warning = (state.phase == GamePhase::Playing && state.countdown.low_time_warning).then(|| Warning {
        lines: vec![
            "HURRY UP!".to_string(),
            format!("Only {} seconds left!", state.tuning.timer.warning_threshold.round() as u32),
        ],
        alpha: state.countdown.flash_alpha,
    });

    HudView {
        status,
        timer,
        help: (state.phase == GamePhase::Playing).then_some(HELP_LINE),
        banner,
        warning,
    }
}

fn level_list(state: &GameState) -> impl Iterator<Item = String> + '_ {
    let progression = &state.progression;
    (1..=progression.final_level).map(move |level| {
        if level == 1 {
            format!("{level}: Level {level}")
        } else if progression.is_unlocked(level) {
            format!("{level}: Level {level} (unlocked)")
        } else {
            format!("{level}: Level {level} (locked)")
        }
    })
}
