//! MPRIS (D-Bus) now-playing surface.
//!
//! `MprisPublisher` is the session publisher used on Linux desktops: every
//! publish updates the shared state read by the D-Bus interfaces and wakes
//! the bus thread, which emits one `PropertiesChanged` per publish. Method calls coming in
//! over the bus are forwarded to the host as `ControlCmd`s.

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};

use async_io::block_on;
use log::{debug, info, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::engine::ProgressSource;
use crate::session::{
    Capabilities, Command, PlaybackSnapshot, PublishedMetadata, SessionPublisher, SessionToken,
    TransportState,
};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Transport(Command),
    /// Print the current state, progress and session token.
    Status,
    Quit,
}

struct SharedState {
    playback: TransportState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    art_url: Option<String>,
    track_id: Option<OwnedObjectPath>,
    position_ms: u64,
    progress: Option<Arc<dyn ProgressSource>>,
    capabilities: Capabilities,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            playback: TransportState::None,
            title: None,
            artist: Vec::new(),
            album: None,
            url: None,
            length_micros: None,
            art_url: None,
            track_id: None,
            position_ms: 0,
            progress: None,
            capabilities: Capabilities::ALL,
        }
    }
}

impl SharedState {
    fn apply_metadata(&mut self, m: &PublishedMetadata) {
        self.title = Some(m.title.clone());
        self.artist = m.artist.iter().cloned().collect();
        self.album = m.album.clone();
        self.url = Some(file_url(&m.locator));
        self.length_micros = (m.duration_ms > 0)
            .then(|| i64::try_from(m.duration_ms.saturating_mul(1000)).unwrap_or(i64::MAX));
        self.art_url = m.artwork.as_deref().map(file_url);
        self.track_id = ObjectPath::try_from(format!("{OBJECT_PATH}/track/{}", m.index))
            .ok()
            .map(OwnedObjectPath::from);
    }

    fn position_micros(&self) -> i64 {
        let ms = self
            .progress
            .as_ref()
            .map(|p| p.current_progress_ms())
            .unwrap_or(self.position_ms);
        i64::try_from(ms.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

fn file_url(locator: &str) -> String {
    if locator.contains("://") {
        locator.to_string()
    } else {
        format!("file://{locator}")
    }
}

fn playback_status(state: TransportState) -> &'static str {
    match state {
        TransportState::None | TransportState::Stopped => "Stopped",
        TransportState::Paused => "Paused",
        TransportState::Connecting
        | TransportState::Playing
        | TransportState::SkippingToNext
        | TransportState::SkippingToPrevious => "Playing",
    }
}

/// Publisher half of the MPRIS service. Cheap to clone; all clones share one
/// bus thread.
#[derive(Clone)]
pub struct MprisPublisher {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
    token: SessionToken,
}

impl MprisPublisher {
    /// Let `Position` reads go straight to the engine instead of the last
    /// published snapshot.
    pub fn set_progress_source(&self, progress: Arc<dyn ProgressSource>) {
        if let Ok(mut s) = self.state.lock() {
            s.progress = Some(progress);
        }
    }
}

impl SessionPublisher for MprisPublisher {
    fn publish(&mut self, snapshot: &PlaybackSnapshot, metadata: Option<&PublishedMetadata>) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = snapshot.state;
            s.position_ms = snapshot.position_ms;
            s.capabilities = snapshot.capabilities;
            if let Some(m) = metadata {
                s.apply_metadata(m);
            }
        }
        // The bus thread may be gone (no session bus); that is fine.
        let _ = self.notify.send(());
    }

    fn session_token(&self) -> SessionToken {
        self.token.clone()
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
    identity: String,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> String {
        self.identity.clone()
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn send(&self, command: Command) {
        if self.tx.send(ControlCmd::Transport(command)).is_err() {
            debug!("mpris: host gone, dropping {command:?}");
        }
    }

    fn capabilities(&self) -> Capabilities {
        self.state
            .lock()
            .map(|s| s.capabilities)
            .unwrap_or(Capabilities::ALL)
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.send(Command::Next);
    }

    fn previous(&self) {
        self.send(Command::Previous);
    }

    fn play(&self) {
        self.send(Command::Play(None));
    }

    fn pause(&self) {
        self.send(Command::Pause);
    }

    fn play_pause(&self) {
        self.send(Command::PlayPause);
    }

    fn stop(&self) {
        self.send(Command::Stop);
    }

    /// Advertised but not implemented by the engine.
    fn seek(&self, _offset: i64) {}

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        playback_status(s.playback)
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros()).unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        self.capabilities().play
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        self.capabilities().pause
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        self.capabilities().skip_to_next
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        self.capabilities().skip_to_previous
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        self.capabilities().seek
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::from(id.clone().into_inner()));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = &s.url {
            put("xesam:url", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        if let Some(art) = &s.art_url {
            put("mpris:artUrl", Value::from(art.clone()));
        }
        map
    }
}

/// Start the MPRIS service on its own thread and return the publisher half.
///
/// Bus errors are logged; the returned publisher keeps working (its updates
/// just go nowhere).
pub fn spawn_mpris(tx: Sender<ControlCmd>, identity: &str) -> MprisPublisher {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let bus_name = format!(
        "org.mpris.MediaPlayer2.{identity}.instance{}",
        std::process::id()
    );
    let token = SessionToken {
        bus_name: bus_name.clone(),
        object_path: OBJECT_PATH.to_string(),
    };

    let state_for_thread = state.clone();
    let identity = identity.to_string();
    let spawned = std::thread::Builder::new()
        .name("encore-mpris".to_string())
        .spawn(move || {
            // The connection must outlive the loop: dropping it unregisters
            // the bus name.
            let Some((_connection, player)) =
                block_on(connect(bus_name, identity, tx, state_for_thread))
            else {
                return;
            };
            while notify_rx.recv().is_ok() {
                block_on(emit_changes(&player));
            }
            debug!("mpris: publisher gone, bus thread exiting");
        });
    if let Err(e) = spawned {
        warn!("mpris: failed to start bus thread: {e}");
    }

    MprisPublisher {
        state,
        notify: notify_tx,
        token,
    }
}

async fn connect(
    bus_name: String,
    identity: String,
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
) -> Option<(Connection, InterfaceRef<PlayerIface>)> {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!("mpris: failed to connect to session bus: {e}");
            return None;
        }
    };

    if let Err(e) = connection.request_name(bus_name.as_str()).await {
        warn!("mpris: failed to acquire {bus_name}: {e}");
        return None;
    }

    let object_server = connection.object_server();
    let root = RootIface {
        tx: tx.clone(),
        identity,
    };
    if let Err(e) = object_server.at(OBJECT_PATH, root).await {
        warn!("mpris: failed to register root iface: {e}");
        return None;
    }
    if let Err(e) = object_server.at(OBJECT_PATH, PlayerIface { tx, state }).await {
        warn!("mpris: failed to register player iface: {e}");
        return None;
    }
    let player = match object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            warn!("mpris: player iface lookup failed: {e}");
            return None;
        }
    };
    info!("mpris: serving as {bus_name}");
    Some((connection, player))
}

async fn emit_changes(player: &InterfaceRef<PlayerIface>) {
    let iface = player.get().await;
    let emitter = player.signal_emitter();
    if let Err(e) = iface.playback_status_changed(emitter).await {
        debug!("mpris: PlaybackStatus signal failed: {e}");
    }
    if let Err(e) = iface.metadata_changed(emitter).await {
        debug!("mpris: Metadata signal failed: {e}");
    }
}
