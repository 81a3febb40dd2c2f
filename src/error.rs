//! Error types for the playback controller.

use thiserror::Error;

/// Errors surfaced by the engine adapter, the playlist cursor and the controller.
///
/// None of these are fatal: the session stays usable and the next command
/// resets the engine before reusing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The track locator could not be opened.
    #[error("cannot open {locator}: {reason}")]
    Source { locator: String, reason: String },

    /// The engine failed while preparing a loaded source.
    #[error("failed to prepare {locator}: {reason}")]
    Prepare { locator: String, reason: String },

    /// An explicit cursor override pointed outside the playlist.
    #[error("index {index} is out of range for a playlist of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    /// The audio output device could not be opened.
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// The controller worker is no longer running.
    #[error("playback controller has shut down")]
    Disconnected,
}

impl PlaybackError {
    pub fn open_failed(locator: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::Source {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
