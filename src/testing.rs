//! Fakes shared by the session and controller tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::engine::{EngineCallback, EngineEvent, Epoch, PlaybackEngine, ProgressSource};
use crate::error::{PlaybackError, Result};
use crate::library::Track;
use crate::session::{
    PlaybackSnapshot, PlayerListener, PublishedMetadata, SessionPublisher, SessionToken,
    TransportState,
};

pub fn tracks(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| {
            let mut t = Track::from_path(format!("/music/{i:02}.flac"));
            t.duration = Some(std::time::Duration::from_secs(180 + i as u64));
            t
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Load(PathBuf, Epoch),
    Prepare,
    Start,
    Pause,
    Reset,
    Release,
}

/// Shared view into a `FakeEngine`, kept by the test after the engine moves
/// into a session.
#[derive(Debug, Default)]
pub struct EngineProbe {
    calls: Mutex<Vec<EngineCall>>,
    pub fail_load: AtomicBool,
    pub fail_prepare: AtomicBool,
    pub fail_start: AtomicBool,
    pub position_ms: AtomicU64,
}

impl EngineProbe {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Epoch of the most recent load.
    pub fn last_epoch(&self) -> Option<Epoch> {
        self.calls().iter().rev().find_map(|c| match c {
            EngineCall::Load(_, e) => Some(*e),
            _ => None,
        })
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ProgressSource for EngineProbe {
    fn current_progress_ms(&self) -> u64 {
        self.position_ms.load(Ordering::SeqCst)
    }
}

/// Engine that records calls. With a callback attached it answers every
/// successful prepare with `BufferingProgress(100)` then `ReadyToPlay`.
pub struct FakeEngine {
    probe: Arc<EngineProbe>,
    callback: Option<Arc<dyn EngineCallback>>,
    epoch: Option<Epoch>,
}

impl FakeEngine {
    pub fn new() -> (Self, Arc<EngineProbe>) {
        let probe = Arc::new(EngineProbe::default());
        let engine = Self {
            probe: probe.clone(),
            callback: None,
            epoch: None,
        };
        (engine, probe)
    }

    pub fn with_callback(callback: Arc<dyn EngineCallback>) -> (Self, Arc<EngineProbe>) {
        let (mut engine, probe) = Self::new();
        engine.callback = Some(callback);
        (engine, probe)
    }
}

impl PlaybackEngine for FakeEngine {
    fn load(&mut self, track: &Track, epoch: Epoch) -> Result<()> {
        self.probe.record(EngineCall::Load(track.path.clone(), epoch));
        if self.probe.fail_load.load(Ordering::SeqCst) {
            self.epoch = None;
            return Err(PlaybackError::open_failed(track.path.display(), "no such file"));
        }
        self.epoch = Some(epoch);
        Ok(())
    }

    fn begin_prepare(&mut self) -> Result<()> {
        self.probe.record(EngineCall::Prepare);
        if self.probe.fail_prepare.load(Ordering::SeqCst) {
            return Err(PlaybackError::Prepare {
                locator: "fake".into(),
                reason: "unsupported format".into(),
            });
        }
        if let (Some(cb), Some(epoch)) = (&self.callback, self.epoch) {
            cb.on_event(EngineEvent::BufferingProgress { epoch, percent: 100 });
            cb.on_event(EngineEvent::ReadyToPlay { epoch });
        }
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.probe.record(EngineCall::Start);
        if self.probe.fail_start.load(Ordering::SeqCst) {
            return Err(PlaybackError::Prepare {
                locator: "fake".into(),
                reason: "no prepared source".into(),
            });
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.probe.record(EngineCall::Pause);
    }

    fn reset(&mut self) {
        self.epoch = None;
        self.probe.record(EngineCall::Reset);
    }

    fn current_progress_ms(&self) -> u64 {
        self.probe.current_progress_ms()
    }

    fn progress_source(&self) -> Arc<dyn ProgressSource> {
        self.probe.clone()
    }

    fn release(&mut self) {
        self.epoch = None;
        self.probe.record(EngineCall::Release);
    }
}

pub type Published = Arc<Mutex<Vec<(PlaybackSnapshot, Option<PublishedMetadata>)>>>;

pub struct RecordingPublisher {
    log: Published,
}

impl RecordingPublisher {
    pub fn new() -> (Box<Self>, Published) {
        let log: Published = Arc::default();
        (Box::new(Self { log: log.clone() }), log)
    }
}

impl SessionPublisher for RecordingPublisher {
    fn publish(&mut self, snapshot: &PlaybackSnapshot, metadata: Option<&PublishedMetadata>) {
        self.log
            .lock()
            .unwrap()
            .push((snapshot.clone(), metadata.cloned()));
    }

    fn session_token(&self) -> SessionToken {
        SessionToken {
            bus_name: "test.encore".into(),
            object_path: "/test".into(),
        }
    }
}

pub fn published_states(log: &Published) -> Vec<TransportState> {
    log.lock().unwrap().iter().map(|(s, _)| s.state).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    CurrentPlay(String),
    Resume,
    Completion,
    Buffering(u8),
    Progress(u64, u64),
    Error(PlaybackError),
}

/// Listener that appends to a shared log and, optionally, forwards each event
/// to a channel so threaded tests can wait on it.
pub struct RecordingListener {
    heard: Arc<Mutex<Vec<Heard>>>,
    forward: Option<Mutex<Sender<Heard>>>,
}

impl RecordingListener {
    pub fn new() -> (Box<Self>, Arc<Mutex<Vec<Heard>>>) {
        let heard: Arc<Mutex<Vec<Heard>>> = Arc::default();
        let listener = Self {
            heard: heard.clone(),
            forward: None,
        };
        (Box::new(listener), heard)
    }

    pub fn forwarding(tx: Sender<Heard>) -> Box<Self> {
        Box::new(Self {
            heard: Arc::default(),
            forward: Some(Mutex::new(tx)),
        })
    }

    fn push(&self, event: Heard) {
        if let Some(tx) = &self.forward {
            let _ = tx.lock().unwrap().send(event.clone());
        }
        self.heard.lock().unwrap().push(event);
    }
}

impl PlayerListener for RecordingListener {
    fn current_play(&self, track: &Track) {
        self.push(Heard::CurrentPlay(track.title.clone()));
    }

    fn on_resume(&self) {
        self.push(Heard::Resume);
    }

    fn on_completion(&self) {
        self.push(Heard::Completion);
    }

    fn on_buffering_update(&self, percent: u8) {
        self.push(Heard::Buffering(percent));
    }

    fn on_progress(&self, position_ms: u64, duration_ms: u64) {
        self.push(Heard::Progress(position_ms, duration_ms));
    }

    fn on_error(&self, error: &PlaybackError) {
        self.push(Heard::Error(error.clone()));
    }
}
