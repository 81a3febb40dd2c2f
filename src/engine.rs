//! Playback engine adapter.
//!
//! An engine wraps one track's decode/output resource. The transport state
//! machine drives it through `PlaybackEngine` and hears back through an
//! `EngineCallback`, always tagged with the `Epoch` of the load that caused
//! the event.

mod prepared;
mod rodio_engine;
mod sink;
mod types;

use std::sync::Arc;

use crate::error::Result;
use crate::library::Track;

pub use rodio_engine::RodioEngine;
pub use types::{EngineCallback, EngineEvent, Epoch, ProgressSource};

pub trait PlaybackEngine {
    /// Reset the engine and bind `track` as the new source for `epoch`.
    ///
    /// Fails with `PlaybackError::Source` when the locator cannot be opened;
    /// the engine is left reset in that case.
    fn load(&mut self, track: &Track, epoch: Epoch) -> Result<()>;

    /// Start preparing the loaded source and return immediately. Completion is
    /// reported as `ReadyToPlay` or `PrepareFailed` through the callback.
    fn begin_prepare(&mut self) -> Result<()>;

    /// Start (or resume) the prepared source. No-op when nothing is loaded.
    ///
    /// Fails with `PlaybackError::Prepare` when a source is loaded but nothing
    /// for its epoch is ready to attach, i.e. the engine could not actually
    /// begin playing.
    fn start(&mut self) -> Result<()>;

    /// No-op when nothing is playing.
    fn pause(&mut self);

    /// Drop any loaded, prepared or playing source.
    fn reset(&mut self);

    fn current_progress_ms(&self) -> u64;

    /// Position reader that may be moved to other threads.
    fn progress_source(&self) -> Arc<dyn ProgressSource>;

    /// Housekeeping on the owner's tick, e.g. end-of-track detection.
    fn poll(&mut self) {}

    /// Free the output resource at the end of a session.
    fn release(&mut self) {
        self.reset();
    }
}
