//! Values the state machine publishes: transport state, capability flags,
//! the playback snapshot and the now-playing metadata.

use std::sync::{Arc, Mutex};

use crate::library::Track;

/// Externally visible playback phase.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TransportState {
    #[default]
    None,
    /// A load/prepare is in flight.
    Connecting,
    Playing,
    Paused,
    SkippingToNext,
    SkippingToPrevious,
    Stopped,
}

impl TransportState {
    /// Whether the platform session should be marked active.
    pub fn is_active(self) -> bool {
        !matches!(self, TransportState::None | TransportState::Stopped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportState::None => "none",
            TransportState::Connecting => "connecting",
            TransportState::Playing => "playing",
            TransportState::Paused => "paused",
            TransportState::SkippingToNext => "skipping-to-next",
            TransportState::SkippingToPrevious => "skipping-to-previous",
            TransportState::Stopped => "stopped",
        }
    }
}

/// Actions advertised to the session surface. Always the full set, whatever
/// the playlist size or state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub play: bool,
    pub pause: bool,
    pub play_pause: bool,
    pub skip_to_next: bool,
    pub skip_to_previous: bool,
    pub stop: bool,
    pub play_from_id: bool,
    pub seek: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        play: true,
        pause: true,
        play_pause: true,
        skip_to_next: true,
        skip_to_previous: true,
        stop: true,
        play_from_id: true,
        seek: true,
    };
}

/// Transport snapshot pushed to the publisher on every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: TransportState,
    pub position_ms: u64,
    pub playback_rate: f32,
    pub capabilities: Capabilities,
    pub active: bool,
}

impl PlaybackSnapshot {
    pub fn new(state: TransportState, position_ms: u64) -> Self {
        Self {
            state,
            position_ms,
            playback_rate: 1.0,
            capabilities: Capabilities::ALL,
            active: state.is_active(),
        }
    }
}

/// Now-playing metadata derived from the current track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMetadata {
    pub index: usize,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: u64,
    pub locator: String,
    pub artwork: Option<String>,
}

impl PublishedMetadata {
    pub fn new(index: usize, track: &Track) -> Self {
        Self {
            index,
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration_ms: track.duration_ms(),
            locator: track.path.display().to_string(),
            artwork: track.artwork.as_ref().map(|p| p.display().to_string()),
        }
    }
}

/// Opaque identity a media-routing surface uses to find this controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub bus_name: String,
    pub object_path: String,
}

/// Latest transport state, readable from other threads.
pub type StatusHandle = Arc<Mutex<TransportState>>;
