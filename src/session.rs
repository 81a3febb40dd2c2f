//! Playback session: the transport state machine and its collaborators.
//!
//! `machine::Session` is the core. It talks outward to three seams:
//! a `PlaybackEngine` (see `crate::engine`), a `SessionPublisher` that mirrors
//! state and metadata to the now-playing surface, and a single optional
//! `PlayerListener`.

mod command;
mod listener;
mod machine;
mod publisher;
mod state;

pub use command::Command;
pub use listener::PlayerListener;
pub use machine::Session;
pub use publisher::{LogPublisher, SessionPublisher};
pub use state::{
    Capabilities, PlaybackSnapshot, PublishedMetadata, SessionToken, StatusHandle, TransportState,
};
