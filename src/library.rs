//! Playlist source: scans a directory for audio files and reads their tags.
//!
//! The playback core never mutates a `Track`; the scanner is the only place
//! they are built.

mod model;
mod scan;

pub use model::Track;
pub use scan::scan;

#[cfg(test)]
mod tests;
