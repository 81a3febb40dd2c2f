use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::config::PlaybackSettings;
use crate::library::Track;

/// Apply the host's playback defaults to a freshly scanned library: optional
/// shuffle, then the start index clamped into range.
pub fn arrange_playlist(mut tracks: Vec<Track>, playback: &PlaybackSettings) -> (Vec<Track>, usize) {
    if playback.shuffle {
        tracks.shuffle(&mut thread_rng());
    }
    let start = match tracks.len() {
        0 => 0,
        n => playback.start_index.min(n - 1),
    };
    (tracks, start)
}
