//! Audio system using an external sound player
//!
//! Each effect launches the configured player on a .wav file and never
//! waits for it. Playback failures are logged and otherwise ignored.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tank leaves the ground
    Jump,
    /// Ball launched
    Fireball,
    /// Coin picked up by either path
    Coin,
    /// Level finished
    StageClear,
    /// Final level finished
    WorldClear,
    /// Ran out of time
    GameOver,
    /// Low time warning
    Warning,
    /// Tank dropped off the maze
    Fall,
    /// Menu opened or closed
    Pause,
}

impl SoundEffect {
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Jump => "smb_jump-super.wav",
            SoundEffect::Fireball => "smb_fireball.wav",
            SoundEffect::Coin => "smb_coin.wav",
            SoundEffect::StageClear => "smb_stage_clear.wav",
            SoundEffect::WorldClear => "smb_world_clear.wav",
            SoundEffect::GameOver => "smb_gameover.wav",
            SoundEffect::Warning => "smb_warning.wav",
            SoundEffect::Fall => "plankton.wav",
            SoundEffect::Pause => "smb_pause.wav",
        }
    }

    /// The sound a simulation event should make, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Fired => Some(SoundEffect::Fireball),
            GameEvent::CoinCollected { .. } => Some(SoundEffect::Coin),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::StageClear),
            GameEvent::GameWon => Some(SoundEffect::WorldClear),
            GameEvent::TimeUp => Some(SoundEffect::GameOver),
            GameEvent::TimeWarning => Some(SoundEffect::Warning),
            GameEvent::Fell => Some(SoundEffect::Fall),
            GameEvent::MenuToggled { .. } => Some(SoundEffect::Pause),
            GameEvent::LevelStarted { .. } | GameEvent::TileCollapsed { .. } => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    command: String,
    sound_dir: PathBuf,
    muted: bool,
    /// Players still running, reaped opportunistically
    children: Vec<Child>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            command: settings.audio_command.clone(),
            sound_dir: settings.sound_dir.clone(),
            muted: !settings.sound_enabled,
            children: Vec::new(),
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Player invocation for one effect
    pub fn command_for(&self, effect: SoundEffect) -> Command {
        let mut command = Command::new(&self.command);
        command
            .arg("-f")
            .arg(self.sound_dir.join(effect.file_name()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        self.reap();
        if self.muted {
            return;
        }
        match self.command_for(effect).spawn() {
            Ok(child) => self.children.push(child),
            Err(e) => log::warn!("Failed to play {}: {e}", effect.file_name()),
        }
    }

    /// Play whatever the drained events call for
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    /// Number of players that have not exited yet
    pub fn in_flight(&mut self) -> usize {
        self.reap();
        self.children.len()
    }

    fn reap(&mut self) {
        self.children.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Collector, TileCoord};

    #[test]
    fn events_map_to_sound_files() {
        let coin = GameEvent::CoinCollected {
            by: Collector::Projectile,
            tile: TileCoord::new(1, 1).unwrap(),
        };
        assert_eq!(SoundEffect::for_event(&coin), Some(SoundEffect::Coin));
        assert_eq!(SoundEffect::for_event(&GameEvent::Fell).map(SoundEffect::file_name), Some("plankton.wav"));
        assert_eq!(SoundEffect::for_event(&GameEvent::LevelStarted { level: 1 }), None);
    }

    #[test]
    fn command_points_at_sound_file() {
        let settings = Settings {
            audio_command: "aplay".to_string(),
            sound_dir: PathBuf::from("/tmp/sfx"),
            ..Default::default()
        };
        let audio = AudioManager::new(&settings);
        let command = audio.command_for(SoundEffect::Jump);
        assert_eq!(command.get_program(), "aplay");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["-f", "/tmp/sfx/smb_jump-super.wav"]);
    }

    #[test]
    fn muted_or_missing_player_never_panics() {
        let settings = Settings {
            sound_enabled: false,
            audio_command: "definitely-not-a-real-player".to_string(),
            ..Default::default()
        };
        let mut audio = AudioManager::new(&settings);
        assert!(audio.is_muted());
        audio.handle_events(&[GameEvent::Jumped, GameEvent::Fired]);
        assert_eq!(audio.in_flight(), 0);

        audio.set_muted(false);
        audio.play(SoundEffect::Coin);
        assert_eq!(audio.in_flight(), 0);
    }
}
