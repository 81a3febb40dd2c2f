use std::path::PathBuf;
use std::time::Duration;

/// One playable item. Immutable once the scanner hands it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Source locator handed to the engine.
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    /// Cover image found next to the file, if any.
    pub artwork: Option<PathBuf>,
}

impl Track {
    /// A bare track for a locator, titled after the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            path,
            title,
            artist: None,
            album: None,
            duration: None,
            artwork: None,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration
            .map(|d| d.as_millis().min(u64::MAX as u128) as u64)
            .unwrap_or(0)
    }

    /// "Artist - Title", or just the title when the artist is unknown.
    pub fn display_name(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title.trim()),
            _ => self.title.clone(),
        }
    }
}
