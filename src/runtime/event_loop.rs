use std::sync::mpsc::Receiver;

use log::warn;

use crate::controller::Controller;
use crate::mpris::ControlCmd;
use crate::session::{SessionToken, TransportState};

/// Serve host commands (MPRIS and stdin) until one of them asks to quit.
pub fn run(controller: &Controller, control_rx: &Receiver<ControlCmd>) {
    while let Ok(cmd) = control_rx.recv() {
        if handle_control_cmd(cmd, controller) {
            break;
        }
    }
}

/// Returns `true` when the host should shut down.
fn handle_control_cmd(cmd: ControlCmd, controller: &Controller) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Transport(command) => {
            if let Err(e) = controller.send(command) {
                warn!("{e}");
                return true;
            }
        }
        ControlCmd::Status => println!(
            "{}",
            status_line(
                controller.state(),
                controller.progress_ms(),
                controller.session_token()
            )
        ),
    }
    false
}

pub fn status_line(state: TransportState, progress_ms: u64, token: &SessionToken) -> String {
    let secs = progress_ms / 1000;
    format!(
        "{} {}:{:02} [{} {}]",
        state.as_str(),
        secs / 60,
        secs % 60,
        token.bus_name,
        token.object_path
    )
}
