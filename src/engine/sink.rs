//! Helpers around `rodio` sinks: decoding a file off-thread and reading the
//! position of whatever sink is currently playing.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex};

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink};

use super::types::ProgressSource;

pub(super) type DecodedSource = Decoder<BufReader<File>>;

/// Open the decoder for an already opened file. This is the slow part of a
/// prepare and runs on the prepare thread.
pub(super) fn decode(file: File) -> Result<DecodedSource, DecoderError> {
    Decoder::new(BufReader::new(file))
}

/// Attach `source` to the stream's mixer as a new, paused `Sink`.
pub(super) fn paused_sink(stream: &OutputStream, source: DecodedSource) -> Sink {
    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.append(source);
    sink
}

/// The sink that is currently started, shared with progress readers.
pub(super) type SinkSlot = Arc<Mutex<Option<Sink>>>;

/// `ProgressSource` backed by the engine's current sink.
#[derive(Clone, Default)]
pub(super) struct SinkProgress {
    pub(super) slot: SinkSlot,
}

impl ProgressSource for SinkProgress {
    fn current_progress_ms(&self) -> u64 {
        self.slot
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|sink| sink.get_pos().as_millis()))
            .map(|ms| ms.min(u64::MAX as u128) as u64)
            .unwrap_or(0)
    }
}
