use std::env;
use std::path::Path;
use std::sync::mpsc;

use env_logger::Env;
use log::{info, warn};

use crate::controller::Controller;
use crate::engine::RodioEngine;
use crate::library::scan;
use crate::mpris::{self, ControlCmd};
use crate::session::{LogPublisher, SessionPublisher};

mod event_loop;
mod host_listener;
mod input;
mod settings;
mod startup;

use host_listener::HostListener;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    env_logger::Builder::from_env(Env::default().default_filter_or(settings.logging.level.as_str()))
        .init();
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let dir = env::args()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .unwrap_or_else(|| {
            env::current_dir()
                .ok()
                .and_then(|p| p.to_str().map(|s| s.to_string()))
                .unwrap_or_else(|| ".".to_string())
        });

    let tracks = scan(Path::new(&dir), &settings.library);
    info!("found {} tracks under {dir}", tracks.len());
    let (tracks, start) = startup::arrange_playlist(tracks, &settings.playback);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = settings
        .session
        .mpris
        .then(|| mpris::spawn_mpris(control_tx.clone(), &settings.session.identity));
    let publisher: Box<dyn SessionPublisher> = match &mpris {
        Some(m) => Box::new(m.clone()),
        None => Box::new(LogPublisher::new(settings.session.identity.as_str())),
    };

    let controller = Controller::spawn(RodioEngine::open, publisher, &settings)?;
    if let Some(m) = &mpris {
        m.set_progress_source(controller.progress_source());
    }

    let listener = HostListener::new(controller.commander(), settings.playback.auto_advance);
    controller.set_listener(Some(Box::new(listener)))?;
    controller.set_playlist(tracks)?;
    if start > 0 {
        controller.set_index(start)?;
    }

    input::spawn_stdin(control_tx);
    println!("{}", input::HELP);

    event_loop::run(&controller, &control_rx);
    controller.shutdown();
    Ok(())
}
