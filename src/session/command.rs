/// Transport commands accepted by the state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// (Re)load and play the current track, or the track at the given
    /// playlist index.
    Play(Option<usize>),
    /// Pause; only honoured while playing.
    Pause,
    /// Pause when playing, play otherwise.
    PlayPause,
    /// Skip to the next track, wrapping at the end.
    Next,
    /// Skip to the previous track, wrapping at the start.
    Previous,
    Stop,
}

impl Command {
    /// Parse a text command such as `play`, `play 3`, `next` or `prev`.
    /// Unknown input yields `None` and is meant to be ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let mut words = input.split_whitespace();
        let verb = words.next()?.to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return None;
        }

        match (verb.as_str(), arg) {
            ("play", None) => Some(Command::Play(None)),
            ("play", Some(n)) => n.parse().ok().map(|i| Command::Play(Some(i))),
            ("pause", None) => Some(Command::Pause),
            ("toggle" | "play-pause" | "playpause", None) => Some(Command::PlayPause),
            ("next" | "skip", None) => Some(Command::Next),
            ("prev" | "previous" | "last", None) => Some(Command::Previous),
            ("stop", None) => Some(Command::Stop),
            _ => None,
        }
    }
}
