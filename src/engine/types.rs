//! Engine-facing small types: load generations, async events and the
//! callback/progress seams.

use std::fmt;

/// Generation counter distinguishing the current load from superseded ones.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Asynchronous notifications raised by an engine. Each one carries the epoch
/// of the load that caused it so the owner can drop stale ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// `begin_prepare` finished; the source can be started.
    ReadyToPlay { epoch: Epoch },
    /// The loaded source played to its natural end.
    TrackCompleted { epoch: Epoch },
    /// Buffering/decoding progress in percent (0..=100).
    BufferingProgress { epoch: Epoch, percent: u8 },
    /// `begin_prepare` failed after returning.
    PrepareFailed { epoch: Epoch, reason: String },
}

impl EngineEvent {
    pub fn epoch(&self) -> Epoch {
        match self {
            EngineEvent::ReadyToPlay { epoch }
            | EngineEvent::TrackCompleted { epoch }
            | EngineEvent::BufferingProgress { epoch, .. }
            | EngineEvent::PrepareFailed { epoch, .. } => *epoch,
        }
    }
}

/// Receiver for engine events.
///
/// Called from whatever thread the engine uses; implementations must only
/// hand the event off (e.g. onto a channel) and return quickly.
pub trait EngineCallback: Send + Sync {
    fn on_event(&self, event: EngineEvent);
}

/// View of the playback position that any thread may read without going
/// through the owning worker.
pub trait ProgressSource: Send + Sync {
    /// Position of the playing source in milliseconds, 0 when nothing is loaded.
    fn current_progress_ms(&self) -> u64;
}
