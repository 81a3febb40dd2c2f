//! Ordered playlist with a circular cursor.

mod cursor;

pub use cursor::PlaylistCursor;
