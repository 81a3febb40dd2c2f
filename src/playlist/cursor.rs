//! The playlist and its current-position cursor.
//!
//! The playlist is replaced wholesale by the host and never edited in place.
//! Whenever it is non-empty the cursor satisfies `0 <= index < len`; while it
//! is empty every navigation call is a no-op returning `None`.

use crate::error::{PlaybackError, Result};
use crate::library::Track;

#[derive(Debug, Clone, Default)]
pub struct PlaylistCursor {
    tracks: Vec<Track>,
    index: usize,
}

impl PlaylistCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the playlist and rewind the cursor to the first track.
    pub fn set_playlist(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Cursor position, or `None` for an empty playlist.
    pub fn index(&self) -> Option<usize> {
        (!self.tracks.is_empty()).then_some(self.index)
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.index)
    }

    /// Step forward, wrapping from the last track to the first.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.tracks.len();
        self.current()
    }

    /// Step back, wrapping from the first track to the last.
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len();
        self.index = (self.index + len - 1) % len;
        self.current()
    }

    /// Point the cursor at `index`. Out-of-range values are rejected and the
    /// cursor stays where it was.
    pub fn set_index(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        self.index = index;
        Ok(())
    }
}
