//! Hand-off slot between prepare threads and the engine owner.
//!
//! The slot knows which epoch is current. A prepare thread may only park its
//! decoded source while its epoch is still the armed one, and the owner only
//! takes a source for the epoch it asks for, so a slow prepare finishing after
//! a newer load can neither overwrite nor be mistaken for the newer source.

use std::sync::{Arc, Mutex};

use super::types::Epoch;

struct Inner<S> {
    armed: Option<Epoch>,
    ready: Option<(Epoch, S)>,
}

pub(super) struct PreparedSlot<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S> Clone for PreparedSlot<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> Default for PreparedSlot<S> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                armed: None,
                ready: None,
            })),
        }
    }
}

impl<S> PreparedSlot<S> {
    /// Make `epoch` the only one allowed to park a source. Drops anything
    /// parked for an older epoch.
    pub(super) fn arm(&self, epoch: Epoch) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.armed = Some(epoch);
            inner.ready = None;
        }
    }

    pub(super) fn disarm(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.armed = None;
            inner.ready = None;
        }
    }

    /// Park `source` for `epoch`. Returns `false`, dropping the source, when
    /// `epoch` is no longer armed.
    pub(super) fn offer(&self, epoch: Epoch, source: S) -> bool {
        let Ok(mut inner) = self.inner.lock() else {
            return false;
        };
        if inner.armed != Some(epoch) {
            return false;
        }
        inner.ready = Some((epoch, source));
        true
    }

    /// Take the source parked for `epoch`, if any.
    pub(super) fn take(&self, epoch: Epoch) -> Option<S> {
        let mut inner = self.inner.lock().ok()?;
        match inner.ready.take() {
            Some((e, source)) if e == epoch => Some(source),
            other => {
                inner.ready = other;
                None
            }
        }
    }
}
