use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

use log::{debug, info, warn};

use crate::engine::PlaybackEngine;
use crate::session::Session;

use super::{Inbox, Timing};

/// Worker loop: drain the inbox, and on every wake-up let the engine do its
/// housekeeping and emit progress when due.
pub(super) fn run<E: PlaybackEngine>(mut session: Session<E>, rx: Receiver<Inbox>, timing: Timing) {
    info!("controller started");
    let mut last_progress = Instant::now();

    loop {
        match rx.recv_timeout(timing.tick) {
            Ok(Inbox::Quit) => break,
            Ok(msg) => dispatch(&mut session, msg),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        session.tick();
        if last_progress.elapsed() >= timing.progress_interval {
            session.report_progress();
            last_progress = Instant::now();
        }
    }

    session.release();
}

fn dispatch<E: PlaybackEngine>(session: &mut Session<E>, msg: Inbox) {
    let result = match msg {
        Inbox::Command(cmd) => session.handle(cmd),
        Inbox::Engine(event) => session.on_engine_event(event),
        Inbox::SetPlaylist(tracks) => {
            session.set_playlist(tracks);
            Ok(())
        }
        Inbox::SetIndex(index) => session.set_index(index).inspect_err(|e| warn!("{e}")),
        Inbox::SetListener(listener) => {
            session.set_listener(listener);
            Ok(())
        }
        Inbox::Quit => Ok(()),
    };
    // Failures were already logged and handed to the listener.
    if let Err(e) = result {
        debug!("controller: {e}");
    }
}
