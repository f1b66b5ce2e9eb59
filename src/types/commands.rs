use std::path::PathBuf;
use std::str::FromStr;

use super::ChannelSelection;

/// Control actions a host issues against the logger session.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlCommand {
    Start(ChannelSelection),
    Stop,
    Clear,
    Save { directory: Option<PathBuf> },
    Analyze,
    Calibrate,
    ResetCalibration,
    Info,
    ZeroInfo,
    AnalyzeInfo,
    Json,
    Help,
    Quit,
}

impl FromStr for ControlCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err("Empty command".to_string());
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("Too many arguments for '{}'", verb));
        }

        let command = match (verb.to_ascii_lowercase().as_str(), arg) {
            ("start", None) => ControlCommand::Start(ChannelSelection::Both),
            ("start", Some(selection)) => ControlCommand::Start(selection.parse()?),
            ("stop", None) => ControlCommand::Stop,
            ("clear", None) => ControlCommand::Clear,
            ("save", directory) => ControlCommand::Save {
                directory: directory.map(PathBuf::from),
            },
            ("analyze", None) => ControlCommand::Analyze,
            ("calibrate" | "zero", None) => ControlCommand::Calibrate,
            ("reset" | "reset-calibration", None) => ControlCommand::ResetCalibration,
            ("info", None) => ControlCommand::Info,
            ("zero-info", None) => ControlCommand::ZeroInfo,
            ("analyze-info", None) => ControlCommand::AnalyzeInfo,
            ("json", None) => ControlCommand::Json,
            ("help" | "?", None) => ControlCommand::Help,
            ("quit" | "exit", None) => ControlCommand::Quit,
            (verb, Some(_)) => return Err(format!("'{}' takes no argument", verb)),
            (verb, None) => return Err(format!("Unknown command: {}", verb)),
        };
        Ok(command)
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  start [both|accel|gyro]  start logging the selected channels
  stop                     stop logging
  clear                    drop all buffered samples
  save [dir]               export buffered samples to CSV
  analyze                  compute mean and standard deviation
  calibrate                use the last analysis as zero baseline
  reset                    reset the zero baseline
  info | zero-info | analyze-info | json
  quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!("start".parse::<ControlCommand>(), Ok(ControlCommand::Start(ChannelSelection::Both)));
        assert_eq!(
            "start gyro".parse::<ControlCommand>(),
            Ok(ControlCommand::Start(ChannelSelection::GyroscopeOnly))
        );
        assert_eq!("  STOP ".parse::<ControlCommand>(), Ok(ControlCommand::Stop));
        assert_eq!("reset".parse::<ControlCommand>(), Ok(ControlCommand::ResetCalibration));
        assert_eq!("save".parse::<ControlCommand>(), Ok(ControlCommand::Save { directory: None }));
        assert_eq!(
            "save /tmp/logs".parse::<ControlCommand>(),
            Ok(ControlCommand::Save {
                directory: Some(PathBuf::from("/tmp/logs"))
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<ControlCommand>().is_err());
        assert!("launch".parse::<ControlCommand>().is_err());
        assert!("stop now".parse::<ControlCommand>().is_err());
        assert!("start magnetometer".parse::<ControlCommand>().is_err());
        assert!("save a b".parse::<ControlCommand>().is_err());
    }
}
