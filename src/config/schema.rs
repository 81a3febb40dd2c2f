use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// How long the controller waits for a message before running housekeeping
    /// (end-of-track detection), in milliseconds.
    pub tick_ms: u64,
    /// Interval between progress notifications while playing, in milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            progress_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// What the transport does when a load or prepare fails.
    pub failure_policy: FailurePolicy,
    /// Issue `Next` when a track finishes on its own.
    pub auto_advance: bool,
    /// Shuffle the scanned library once before handing it to the controller.
    pub shuffle: bool,
    /// Cursor position to start from (clamped to the library size).
    pub start_index: usize,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            auto_advance: true,
            shuffle: false,
            start_index: 0,
        }
    }
}

/// Transport behaviour after `load` or `begin_prepare` fails.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Leave the transport in `Connecting` until a new command supersedes it.
    #[default]
    #[serde(alias = "stay_pending", alias = "pending")]
    StayPending,
    /// Reset the engine and publish `Stopped`.
    #[serde(alias = "stopped")]
    Stop,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// File names checked, in order, for a cover image next to each track.
    pub artwork_names: Vec<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            artwork_names: vec![
                "cover.jpg".into(),
                "cover.png".into(),
                "folder.jpg".into(),
                "folder.png".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Publish state on the D-Bus session bus via MPRIS.
    pub mpris: bool,
    /// Player identity shown to MPRIS clients and used in the bus name.
    pub identity: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mpris: true,
            identity: "encore".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default log filter; `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
