//! The transport state machine.
//!
//! `Session` owns the playlist cursor, the transport state and the engine.
//! Commands move the state to a pending value (`Connecting`,
//! `SkippingToNext`, `SkippingToPrevious`) before the engine confirms
//! anything, so a query landing mid-transition sees the in-flight status.
//! Only a `ReadyToPlay` carrying the epoch of the latest load may turn that
//! into `Playing`.
//!
//! A `Session` is not thread-safe on purpose: one owner (the controller
//! worker) must serialise every command and engine event.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::config::FailurePolicy;
use crate::engine::{EngineEvent, Epoch, PlaybackEngine, ProgressSource};
use crate::error::{PlaybackError, Result};
use crate::library::Track;
use crate::playlist::PlaylistCursor;

use super::command::Command;
use super::listener::{Listener, PlayerListener};
use super::publisher::SessionPublisher;
use super::state::{PlaybackSnapshot, PublishedMetadata, SessionToken, StatusHandle, TransportState};

pub struct Session<E: PlaybackEngine> {
    engine: E,
    publisher: Box<dyn SessionPublisher>,
    listener: Listener,
    cursor: PlaylistCursor,
    /// Track handed to the engine by the latest Play, with its playlist index.
    now_playing: Option<(usize, Track)>,
    state: TransportState,
    epoch: Epoch,
    policy: FailurePolicy,
    status: StatusHandle,
}

impl<E: PlaybackEngine> Session<E> {
    /// Start a session with an empty playlist in state `None`, and publish
    /// that initial state.
    pub fn new(engine: E, publisher: Box<dyn SessionPublisher>, policy: FailurePolicy) -> Self {
        let mut session = Self {
            engine,
            publisher,
            listener: Listener::default(),
            cursor: PlaylistCursor::new(),
            now_playing: None,
            state: TransportState::None,
            epoch: Epoch::default(),
            policy,
            status: Arc::new(Mutex::new(TransportState::None)),
        };
        session.transition(TransportState::None, None);
        session
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn cursor_index(&self) -> Option<usize> {
        self.cursor.index()
    }

    /// Always read fresh from the engine.
    pub fn progress_ms(&self) -> u64 {
        self.engine.current_progress_ms()
    }

    pub fn progress_source(&self) -> Arc<dyn ProgressSource> {
        self.engine.progress_source()
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn session_token(&self) -> SessionToken {
        self.publisher.session_token()
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn PlayerListener>>) {
        self.listener.set(listener);
    }

    /// Replace the playlist; the cursor returns to the first track.
    ///
    /// An active session is stopped, since the loaded track no longer
    /// matches the cursor. An idle one republishes the new cursor track.
    pub fn set_playlist(&mut self, tracks: Vec<Track>) {
        self.cursor.set_playlist(tracks);
        debug!("playlist replaced with {} tracks", self.cursor.len());
        self.cursor_moved();
    }

    /// Explicit cursor override; out-of-range indices are rejected. Moving
    /// the cursor has the same effect on playback as `set_playlist`.
    pub fn set_index(&mut self, index: usize) -> Result<()> {
        let before = self.cursor.index();
        self.cursor.set_index(index)?;
        if self.cursor.index() != before {
            self.cursor_moved();
        }
        Ok(())
    }

    pub fn handle(&mut self, command: Command) -> Result<()> {
        debug!("command {command:?} in state {}", self.state.as_str());
        match command {
            Command::Play(None) => self.play(),
            Command::Play(Some(index)) => self.play_from(index),
            Command::Pause => {
                self.pause();
                Ok(())
            }
            Command::PlayPause => {
                if self.state == TransportState::Playing {
                    self.pause();
                    Ok(())
                } else {
                    self.play()
                }
            }
            Command::Next => self.skip_to_next(),
            Command::Previous => self.skip_to_previous(),
            Command::Stop => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Reload and prepare the track under the cursor.
    pub fn play(&mut self) -> Result<()> {
        let Some(index) = self.cursor.index() else {
            debug!("play ignored: playlist is empty");
            return Ok(());
        };
        let Some(track) = self.cursor.current().cloned() else {
            return Ok(());
        };

        self.epoch = self.epoch.next();
        let epoch = self.epoch;
        self.engine.reset();

        let metadata = PublishedMetadata::new(index, &track);
        self.transition(TransportState::Connecting, Some(&metadata));
        self.now_playing = Some((index, track.clone()));

        let prepared = self
            .engine
            .load(&track, epoch)
            .and_then(|()| self.engine.begin_prepare());
        match prepared {
            Ok(()) => {
                self.listener.current_play(&track);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn play_from(&mut self, index: usize) -> Result<()> {
        if self.cursor.is_empty() {
            debug!("play {index} ignored: playlist is empty");
            return Ok(());
        }
        self.cursor.set_index(index).inspect_err(|e| warn!("{e}"))?;
        self.play()
    }

    /// Only honoured while `Playing`; anything else is a silent no-op.
    pub fn pause(&mut self) {
        if self.state != TransportState::Playing {
            debug!("pause ignored in state {}", self.state.as_str());
            return;
        }
        self.engine.pause();
        self.transition(TransportState::Paused, None);
    }

    pub fn skip_to_next(&mut self) -> Result<()> {
        if self.cursor.advance().is_none() {
            debug!("next ignored: playlist is empty");
            return Ok(());
        }
        self.transition(TransportState::SkippingToNext, None);
        self.play()
    }

    pub fn skip_to_previous(&mut self) -> Result<()> {
        if self.cursor.retreat().is_none() {
            debug!("previous ignored: playlist is empty");
            return Ok(());
        }
        self.transition(TransportState::SkippingToPrevious, None);
        self.play()
    }

    /// Reset the engine and invalidate any in-flight prepare.
    pub fn stop(&mut self) {
        if !self.state.is_active() {
            debug!("stop ignored in state {}", self.state.as_str());
            return;
        }
        self.epoch = self.epoch.next();
        self.engine.reset();
        self.now_playing = None;
        self.transition(TransportState::Stopped, None);
    }

    /// Apply an engine event. Events from a superseded load are dropped.
    pub fn on_engine_event(&mut self, event: EngineEvent) -> Result<()> {
        if event.epoch() != self.epoch {
            debug!(
                "discarding stale {event:?}, current epoch is {}",
                self.epoch
            );
            return Ok(());
        }

        match event {
            EngineEvent::ReadyToPlay { .. } => {
                if self.state != TransportState::Connecting {
                    debug!("ready-to-play ignored in state {}", self.state.as_str());
                    return Ok(());
                }
                if let Err(e) = self.engine.start() {
                    return Err(self.fail(e));
                }
                self.transition(TransportState::Playing, None);
                self.listener.on_resume();
                Ok(())
            }
            EngineEvent::TrackCompleted { .. } => {
                self.listener.on_completion();
                Ok(())
            }
            EngineEvent::BufferingProgress { percent, .. } => {
                self.listener.on_buffering_update(percent.min(100));
                Ok(())
            }
            EngineEvent::PrepareFailed { reason, .. } => {
                let locator = self
                    .now_playing
                    .as_ref()
                    .map(|(_, t)| t.path.display().to_string())
                    .unwrap_or_default();
                Err(self.fail(PlaybackError::Prepare { locator, reason }))
            }
        }
    }

    /// Engine housekeeping; the owner calls this on every idle tick.
    pub fn tick(&mut self) {
        self.engine.poll();
    }

    /// Notify the listener of the current position. Only while playing.
    pub fn report_progress(&self) {
        if self.state != TransportState::Playing {
            return;
        }
        let duration = self
            .now_playing
            .as_ref()
            .map(|(_, t)| t.duration_ms())
            .unwrap_or(0);
        self.listener
            .on_progress(self.engine.current_progress_ms(), duration);
    }

    /// End of session: invalidate pending loads and free the engine.
    pub fn release(&mut self) {
        self.epoch = self.epoch.next();
        self.engine.release();
        self.now_playing = None;
        if self.state.is_active() {
            self.transition(TransportState::Stopped, None);
        }
        info!("session released");
    }

    fn fail(&mut self, error: PlaybackError) -> PlaybackError {
        warn!("{error}");
        if self.policy == FailurePolicy::Stop {
            self.epoch = self.epoch.next();
            self.engine.reset();
            self.now_playing = None;
            self.transition(TransportState::Stopped, None);
        }
        self.listener.on_error(&error);
        error
    }

    fn cursor_moved(&mut self) {
        let metadata = self
            .cursor
            .index()
            .zip(self.cursor.current())
            .map(|(i, t)| PublishedMetadata::new(i, t));

        if self.state.is_active() {
            debug!("cursor moved under an active session, stopping");
            self.epoch = self.epoch.next();
            self.engine.reset();
            self.now_playing = None;
            self.transition(TransportState::Stopped, metadata.as_ref());
        } else if metadata.is_some() {
            self.transition(self.state, metadata.as_ref());
        }
    }

    fn transition(&mut self, state: TransportState, metadata: Option<&PublishedMetadata>) {
        if self.state != state {
            debug!("transport {} -> {}", self.state.as_str(), state.as_str());
        }
        self.state = state;
        match self.status.lock() {
            Ok(mut s) => *s = state,
            Err(e) => warn!("status handle poisoned: {e}"),
        }
        let snapshot = PlaybackSnapshot::new(state, self.engine.current_progress_ms());
        self.publisher.publish(&snapshot, metadata);
    }
}

#[cfg(test)]
impl<E: PlaybackEngine> Session<E> {
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn playlist_len(&self) -> usize {
        self.cursor.len()
    }

    pub fn now_playing_index(&self) -> Option<usize> {
        self.now_playing.as_ref().map(|(i, _)| *i)
    }
}
