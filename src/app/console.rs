use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{info, warn};

use crate::types::ControlCommand;

/// Parses command lines from `input` and forwards them until `quit`, end of input, or
/// until the control loop goes away.
pub fn forward_commands<R: BufRead>(input: R, sender: &Sender<ControlCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read command: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ControlCommand>() {
            Ok(command) => {
                let quit = command == ControlCommand::Quit;
                if sender.send(command).is_err() || quit {
                    return;
                }
            }
            Err(e) => eprintln!("{} (type 'help' for commands)", e),
        }
    }

    info!("Console input closed");
    let _ = sender.send(ControlCommand::Quit);
}

/// Reads commands from stdin on a background thread.
pub fn spawn_console_reader(sender: Sender<ControlCommand>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console".to_string())
        .spawn(move || forward_commands(io::stdin().lock(), &sender))
}
