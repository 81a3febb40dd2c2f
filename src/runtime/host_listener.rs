use log::{debug, info, warn};

use crate::controller::CommandSender;
use crate::error::PlaybackError;
use crate::library::Track;
use crate::session::{Command, PlayerListener};

/// The binary's own listener: prints what is playing and, when enabled,
/// moves on to the next track once one finishes.
pub struct HostListener {
    commands: CommandSender,
    auto_advance: bool,
}

impl HostListener {
    pub fn new(commands: CommandSender, auto_advance: bool) -> Self {
        Self {
            commands,
            auto_advance,
        }
    }
}

impl PlayerListener for HostListener {
    fn current_play(&self, track: &Track) {
        println!("now playing: {}", track.display_name());
    }

    fn on_resume(&self) {
        info!("playback started");
    }

    fn on_completion(&self) {
        if !self.auto_advance {
            return;
        }
        if let Err(e) = self.commands.send(Command::Next) {
            warn!("auto-advance failed: {e}");
        }
    }

    fn on_buffering_update(&self, percent: u8) {
        debug!("buffering {percent}%");
    }

    fn on_progress(&self, position_ms: u64, duration_ms: u64) {
        debug!("progress {position_ms}/{duration_ms} ms");
    }

    fn on_error(&self, error: &PlaybackError) {
        println!("error: {error}");
    }
}
