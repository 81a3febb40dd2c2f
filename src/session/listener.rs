//! Observer interface and the single-slot fan-out.

use crate::error::PlaybackError;
use crate::library::Track;

/// Host-side observer of playback events.
///
/// Callbacks run on the controller worker, so implementations should return
/// quickly and never block on the controller.
pub trait PlayerListener: Send {
    /// A Play sequence was issued for `track` (before the engine confirms).
    fn current_play(&self, track: &Track);
    /// The engine confirmed the source and playback started.
    fn on_resume(&self);
    /// The current track played to its end.
    fn on_completion(&self);
    fn on_buffering_update(&self, percent: u8);
    /// Periodic position poll while playing.
    fn on_progress(&self, position_ms: u64, duration_ms: u64);
    /// A load or prepare failed.
    fn on_error(&self, _error: &PlaybackError) {}
}

/// Holds at most one observer. Events sent while empty are dropped.
#[derive(Default)]
pub struct Listener {
    inner: Option<Box<dyn PlayerListener>>,
}

impl Listener {
    pub fn set(&mut self, listener: Option<Box<dyn PlayerListener>>) {
        self.inner = listener;
    }

    pub fn current_play(&self, track: &Track) {
        if let Some(l) = &self.inner {
            l.current_play(track);
        }
    }

    pub fn on_resume(&self) {
        if let Some(l) = &self.inner {
            l.on_resume();
        }
    }

    pub fn on_completion(&self) {
        if let Some(l) = &self.inner {
            l.on_completion();
        }
    }

    pub fn on_buffering_update(&self, percent: u8) {
        if let Some(l) = &self.inner {
            l.on_buffering_update(percent);
        }
    }

    pub fn on_progress(&self, position_ms: u64, duration_ms: u64) {
        if let Some(l) = &self.inner {
            l.on_progress(position_ms, duration_ms);
        }
    }

    pub fn on_error(&self, error: &PlaybackError) {
        if let Some(l) = &self.inner {
            l.on_error(error);
        }
    }
}
