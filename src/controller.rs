//! Threaded front end for a `Session`.
//!
//! The session and its engine live on one worker thread. Everything else
//! talks to it through an mpsc inbox: host commands, playlist updates and
//! engine events (the engine's callback just posts into the same inbox), so
//! no two of them ever run concurrently. State and progress are readable
//! from any thread through shared handles.

mod worker;

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::config::Settings;
use crate::engine::{EngineCallback, EngineEvent, PlaybackEngine, ProgressSource};
use crate::error::{PlaybackError, Result};
use crate::library::Track;
use crate::session::{
    Command, PlayerListener, Session, SessionPublisher, SessionToken, StatusHandle, TransportState,
};

pub(crate) enum Inbox {
    Command(Command),
    Engine(EngineEvent),
    SetPlaylist(Vec<Track>),
    SetIndex(usize),
    SetListener(Option<Box<dyn PlayerListener>>),
    Quit,
}

/// Engine callback that re-enters the worker through its inbox.
struct InboxCallback {
    tx: Sender<Inbox>,
}

impl EngineCallback for InboxCallback {
    fn on_event(&self, event: EngineEvent) {
        if self.tx.send(Inbox::Engine(event)).is_err() {
            debug!("controller gone, dropping engine event");
        }
    }
}

/// Cloneable handle that can only issue transport commands. Handy for
/// listeners and remote-control surfaces.
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Inbox>,
}

impl CommandSender {
    pub fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(Inbox::Command(command))
            .map_err(|_| PlaybackError::Disconnected)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Timing {
    pub tick: Duration,
    pub progress_interval: Duration,
}

pub struct Controller {
    tx: Sender<Inbox>,
    worker: Option<JoinHandle<()>>,
    status: StatusHandle,
    progress: Arc<dyn ProgressSource>,
    token: SessionToken,
}

impl Controller {
    /// Start the worker thread and build the engine on it.
    ///
    /// `make_engine` runs on the worker because some engines (rodio's output
    /// stream) cannot move between threads. Its error is returned here.
    pub fn spawn<E, F>(
        make_engine: F,
        publisher: Box<dyn SessionPublisher>,
        settings: &Settings,
    ) -> Result<Self>
    where
        E: PlaybackEngine + 'static,
        F: FnOnce(Arc<dyn EngineCallback>) -> Result<E> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Inbox>();
        let (ready_tx, ready_rx) = mpsc::channel();

        let token = publisher.session_token();
        let policy = settings.playback.failure_policy;
        let timing = Timing {
            tick: Duration::from_millis(settings.engine.tick_ms.max(1)),
            progress_interval: Duration::from_millis(settings.engine.progress_interval_ms),
        };
        let callback: Arc<dyn EngineCallback> = Arc::new(InboxCallback { tx: tx.clone() });

        let worker = thread::Builder::new()
            .name("encore-controller".to_string())
            .spawn(move || {
                let engine = match make_engine(callback) {
                    Ok(engine) => engine,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let session = Session::new(engine, publisher, policy);
                let _ = ready_tx.send(Ok((session.status_handle(), session.progress_source())));
                worker::run(session, rx, timing);
            })
            .map_err(|e| PlaybackError::Output(e.to_string()))?;

        let (status, progress) = match ready_rx.recv() {
            Ok(Ok(handles)) => handles,
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => {
                let _ = worker.join();
                return Err(PlaybackError::Disconnected);
            }
        };

        Ok(Self {
            tx,
            worker: Some(worker),
            status,
            progress,
            token,
        })
    }

    pub fn send(&self, command: Command) -> Result<()> {
        self.post(Inbox::Command(command))
    }

    pub fn commander(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    pub fn set_playlist(&self, tracks: Vec<Track>) -> Result<()> {
        self.post(Inbox::SetPlaylist(tracks))
    }

    /// Move the cursor without playing. Out-of-range values are logged and
    /// ignored by the worker.
    pub fn set_index(&self, index: usize) -> Result<()> {
        self.post(Inbox::SetIndex(index))
    }

    /// Register or (with `None`) remove the single listener.
    pub fn set_listener(&self, listener: Option<Box<dyn PlayerListener>>) -> Result<()> {
        self.post(Inbox::SetListener(listener))
    }

    /// Latest published transport state.
    pub fn state(&self) -> TransportState {
        match self.status.lock() {
            Ok(s) => *s,
            Err(e) => *e.into_inner(),
        }
    }

    pub fn progress_ms(&self) -> u64 {
        self.progress.current_progress_ms()
    }

    pub fn progress_source(&self) -> Arc<dyn ProgressSource> {
        self.progress.clone()
    }

    pub fn session_token(&self) -> &SessionToken {
        &self.token
    }

    /// Release the session and wait for the worker to exit.
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn post(&self, msg: Inbox) -> Result<()> {
        self.tx.send(msg).map_err(|_| PlaybackError::Disconnected)
    }

    fn stop_worker(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.tx.send(Inbox::Quit);
        if worker.join().is_err() {
            warn!("controller worker panicked");
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop_worker();
    }
}
