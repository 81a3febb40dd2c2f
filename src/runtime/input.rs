use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;

use log::{debug, warn};

use crate::mpris::ControlCmd;
use crate::session::Command;

pub const HELP: &str =
    "commands: play [n] | pause | toggle | next | prev | stop | status | quit";

/// Map one line of user input to a host command.
pub fn parse_line(line: &str) -> Option<ControlCmd> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => None,
        "status" | "s" => Some(ControlCmd::Status),
        "quit" | "q" | "exit" => Some(ControlCmd::Quit),
        other => Command::parse(other).map(ControlCmd::Transport),
    }
}

/// Forward stdin lines to the host loop until stdin closes.
pub fn spawn_stdin(tx: Sender<ControlCmd>) {
    let spawned = thread::Builder::new()
        .name("encore-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_line(&line) {
                    Some(cmd) => {
                        if tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("unknown command: {}\n{HELP}", line.trim()),
                }
            }
            debug!("stdin closed");
        });
    if let Err(e) = spawned {
        warn!("failed to start stdin reader: {e}");
    }
}
