use std::io::{self, Write};
use std::time::Duration;

use crossbeam_channel::{select, tick, Receiver};
use log::{error, info, warn};

use super::session::LoggerSession;
use super::state::TickOutcome;
use crate::types::{ControlCommand, HELP_TEXT};

/// Whether the control loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies one control command and writes its visible result to `out`.
///
/// Session errors are reported to the user and the log; only I/O errors on `out`
/// propagate.
pub fn handle_command<W: Write>(
    session: &mut LoggerSession,
    command: ControlCommand,
    out: &mut W,
) -> io::Result<Flow> {
    match command {
        ControlCommand::Start(selection) => {
            if !session.start(selection) {
                writeln!(out, "Already logging")?;
            }
            write!(out, "{}", session.info())?;
        }
        ControlCommand::Stop => {
            session.stop();
            write!(out, "{}", session.info())?;
        }
        ControlCommand::Clear => {
            session.clear();
            write!(out, "{}", session.info())?;
        }
        ControlCommand::Save { directory } => match session.save(directory.as_deref()) {
            Ok(result) => writeln!(out, "{}", result.message())?,
            Err(e) => {
                error!("Save failed: {}", e);
                writeln!(out, "Save failed: {}", e)?;
            }
        },
        ControlCommand::Analyze => match session.analyze() {
            Ok(()) => write!(out, "{}", session.analyze_info())?,
            Err(e) => {
                warn!("Analyze refused: {}", e);
                writeln!(out, "{}", e)?;
            }
        },
        ControlCommand::Calibrate => {
            session.calibrate();
            write!(out, "{}", session.zero_info())?;
        }
        ControlCommand::ResetCalibration => {
            session.reset_calibration();
            write!(out, "{}", session.zero_info())?;
        }
        ControlCommand::Info => {
            session.drain();
            write!(out, "{}", session.info())?;
        }
        ControlCommand::ZeroInfo => write!(out, "{}", session.zero_info())?,
        ControlCommand::AnalyzeInfo => write!(out, "{}", session.analyze_info())?,
        ControlCommand::Json => {
            session.drain();
            match session.reports_json() {
                Ok(json) => writeln!(out, "{}", json)?,
                Err(e) => error!("Failed to serialize reports: {}", e),
            }
        }
        ControlCommand::Help => writeln!(out, "{}", HELP_TEXT)?,
        ControlCommand::Quit => {
            session.stop();
            return Ok(Flow::Quit);
        }
    }
    out.flush()?;
    Ok(Flow::Continue)
}

/// Control loop: refresh on every tick, apply commands as they arrive.
///
/// Returns when a `Quit` command is handled or the command queue closes.
pub fn run<W: Write>(
    session: &mut LoggerSession,
    commands: Receiver<ControlCommand>,
    refresh_period: Duration,
    out: &mut W,
) -> io::Result<()> {
    let ticker = tick(refresh_period);

    loop {
        select! {
            recv(ticker) -> _ => {
                if session.on_tick() == TickOutcome::AutoStopped {
                    writeln!(out, "Buffer full, logging stopped")?;
                    write!(out, "{}", session.info())?;
                    out.flush()?;
                }
            }
            recv(commands) -> command => {
                match command {
                    Ok(command) => {
                        if handle_command(session, command, out)? == Flow::Quit {
                            break;
                        }
                    }
                    Err(_) => {
                        info!("Command queue closed");
                        session.stop();
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
