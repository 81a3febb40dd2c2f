use log::info;

use super::state::{PlaybackSnapshot, PublishedMetadata, SessionToken};

/// Sink for transport and now-playing updates.
///
/// Called exactly once per transition. `metadata` is `Some` when the visible
/// track changes (Play sequences) and `None` for state-only updates.
pub trait SessionPublisher: Send {
    fn publish(&mut self, snapshot: &PlaybackSnapshot, metadata: Option<&PublishedMetadata>);

    fn session_token(&self) -> SessionToken;
}

/// Publisher that only writes to the log; used when MPRIS is disabled.
pub struct LogPublisher {
    identity: String,
}

impl LogPublisher {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

impl SessionPublisher for LogPublisher {
    fn publish(&mut self, snapshot: &PlaybackSnapshot, metadata: Option<&PublishedMetadata>) {
        if let Some(m) = metadata {
            info!(
                "now playing [{}] {} ({} ms)",
                m.index, m.title, m.duration_ms
            );
        }
        info!(
            "transport {} at {} ms (active: {})",
            snapshot.state.as_str(),
            snapshot.position_ms,
            snapshot.active
        );
    }

    fn session_token(&self) -> SessionToken {
        SessionToken {
            bus_name: format!("local.{}", self.identity),
            object_path: "/".to_string(),
        }
    }
}
