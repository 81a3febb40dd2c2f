//! `PlaybackEngine` backed by `rodio`.
//!
//! `load` opens the file and arms the prepared slot for the load's epoch,
//! `begin_prepare` decodes on a short-lived thread and parks the decoder in
//! that slot, and `start` only attaches a decoder parked for the current
//! epoch. A prepare that finishes after a newer load is dropped on arrival and
//! never reaches the speakers.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder};

use crate::error::{PlaybackError, Result};
use crate::library::Track;

use super::PlaybackEngine;
use super::prepared::PreparedSlot;
use super::sink::{DecodedSource, SinkProgress, SinkSlot, decode, paused_sink};
use super::types::{EngineCallback, EngineEvent, Epoch, ProgressSource};

pub(super) struct Loaded {
    pub(super) epoch: Epoch,
    pub(super) locator: PathBuf,
    /// Taken by `begin_prepare`.
    pub(super) file: Option<File>,
}

/// Hand the loaded file to a prepare thread. Fails when nothing is loaded or
/// the file was already handed out.
pub(super) fn claim_file(loaded: Option<&mut Loaded>) -> Result<(Epoch, String, File)> {
    let Some(loaded) = loaded else {
        return Err(PlaybackError::open_failed("<none>", "no source loaded"));
    };
    let locator = loaded.locator.display().to_string();
    let Some(file) = loaded.file.take() else {
        return Err(PlaybackError::open_failed(locator, "already preparing"));
    };
    Ok((loaded.epoch, locator, file))
}

/// Open `track` for decoding; it must be a regular file.
pub(super) fn open_source(track: &Track) -> Result<File> {
    let file =
        File::open(&track.path).map_err(|e| PlaybackError::open_failed(track.path.display(), e))?;
    let meta = file
        .metadata()
        .map_err(|e| PlaybackError::open_failed(track.path.display(), e))?;
    if !meta.is_file() {
        return Err(PlaybackError::open_failed(
            track.path.display(),
            "not a regular file",
        ));
    }
    Ok(file)
}

pub struct RodioEngine {
    stream: OutputStream,
    callback: Arc<dyn EngineCallback>,
    loaded: Option<Loaded>,
    prepared: PreparedSlot<DecodedSource>,
    current: SinkSlot,
    completion_sent: bool,
}

impl RodioEngine {
    /// Open the default output device. Must be called on the thread that will
    /// own the engine: the output stream cannot move between threads.
    pub fn open(callback: Arc<dyn EngineCallback>) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            callback,
            loaded: None,
            prepared: PreparedSlot::default(),
            current: SinkSlot::default(),
            completion_sent: false,
        })
    }

    fn loaded_epoch(&self) -> Option<Epoch> {
        self.loaded.as_ref().map(|l| l.epoch)
    }
}

impl PlaybackEngine for RodioEngine {
    fn load(&mut self, track: &Track, epoch: Epoch) -> Result<()> {
        self.reset();

        let file = open_source(track)?;
        self.prepared.arm(epoch);

        debug!("engine: loaded {} for epoch {epoch}", track.path.display());
        self.loaded = Some(Loaded {
            epoch,
            locator: track.path.clone(),
            file: Some(file),
        });
        Ok(())
    }

    fn begin_prepare(&mut self) -> Result<()> {
        let (epoch, locator, file) = claim_file(self.loaded.as_mut())?;

        let slot = self.prepared.clone();
        let callback = self.callback.clone();
        thread::Builder::new()
            .name("encore-prepare".to_string())
            .spawn(move || {
                callback.on_event(EngineEvent::BufferingProgress { epoch, percent: 0 });
                match decode(file) {
                    Ok(source) => {
                        if !slot.offer(epoch, source) {
                            debug!("engine: prepare for stale epoch {epoch} finished, dropped");
                            return;
                        }
                        callback.on_event(EngineEvent::BufferingProgress { epoch, percent: 100 });
                        callback.on_event(EngineEvent::ReadyToPlay { epoch });
                    }
                    Err(e) => callback.on_event(EngineEvent::PrepareFailed {
                        epoch,
                        reason: e.to_string(),
                    }),
                }
            })
            .map_err(|e| PlaybackError::Prepare {
                locator,
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let Some(loaded) = self.loaded.as_ref() else {
            debug!("engine: start ignored, nothing loaded");
            return Ok(());
        };
        let epoch = loaded.epoch;

        if let Some(source) = self.prepared.take(epoch) {
            let sink = paused_sink(&self.stream, source);
            sink.play();
            if let Ok(mut current) = self.current.lock() {
                if let Some(old) = current.replace(sink) {
                    old.stop();
                }
            }
            self.completion_sent = false;
            return Ok(());
        }

        // Already attached: resume.
        let resumed = self
            .current
            .lock()
            .ok()
            .and_then(|c| c.as_ref().map(|sink| sink.play()))
            .is_some();
        if resumed {
            Ok(())
        } else {
            Err(PlaybackError::Prepare {
                locator: loaded.locator.display().to_string(),
                reason: format!("no prepared source for epoch {epoch}"),
            })
        }
    }

    fn pause(&mut self) {
        if let Ok(current) = self.current.lock() {
            if let Some(sink) = current.as_ref() {
                sink.pause();
            }
        }
    }

    fn reset(&mut self) {
        match self.current.lock() {
            Ok(mut current) => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
            }
            Err(e) => warn!("engine: sink slot poisoned during reset: {e}"),
        }
        self.prepared.disarm();
        self.loaded = None;
        self.completion_sent = false;
    }

    fn current_progress_ms(&self) -> u64 {
        SinkProgress {
            slot: self.current.clone(),
        }
        .current_progress_ms()
    }

    fn progress_source(&self) -> Arc<dyn ProgressSource> {
        Arc::new(SinkProgress {
            slot: self.current.clone(),
        })
    }

    fn poll(&mut self) {
        if self.completion_sent {
            return;
        }
        let Some(epoch) = self.loaded_epoch() else {
            return;
        };
        let finished = self
            .current
            .lock()
            .ok()
            .map(|c| c.as_ref().is_some_and(|s| !s.is_paused() && s.empty()))
            .unwrap_or(false);
        if finished {
            self.completion_sent = true;
            self.callback.on_event(EngineEvent::TrackCompleted { epoch });
        }
    }
}
