use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical sensor stream, each one logged by its own `SampleLog`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SensorChannel {
    Accelerometer,
    Gyroscope,
}

impl SensorChannel {
    pub const ALL: [SensorChannel; 2] = [SensorChannel::Accelerometer, SensorChannel::Gyroscope];

    /// Display name used in the text reports.
    pub fn name(&self) -> &'static str {
        match self {
            SensorChannel::Accelerometer => "Accelerometer",
            SensorChannel::Gyroscope => "Gyroscope",
        }
    }

    /// Suffix appended to the export file stem.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            SensorChannel::Accelerometer => "accel",
            SensorChannel::Gyroscope => "gyro",
        }
    }
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which channels a started session accepts samples from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSelection {
    #[default]
    Both,
    AccelerometerOnly,
    GyroscopeOnly,
}

impl ChannelSelection {
    pub fn includes(&self, channel: SensorChannel) -> bool {
        match self {
            ChannelSelection::Both => true,
            ChannelSelection::AccelerometerOnly => channel == SensorChannel::Accelerometer,
            ChannelSelection::GyroscopeOnly => channel == SensorChannel::Gyroscope,
        }
    }
}

impl FromStr for ChannelSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "both" | "all" => Ok(ChannelSelection::Both),
            "accel" | "accelerometer" => Ok(ChannelSelection::AccelerometerOnly),
            "gyro" | "gyroscope" => Ok(ChannelSelection::GyroscopeOnly),
            other => Err(format!("Unknown channel selection: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_includes() {
        assert!(ChannelSelection::Both.includes(SensorChannel::Accelerometer));
        assert!(ChannelSelection::Both.includes(SensorChannel::Gyroscope));
        assert!(ChannelSelection::AccelerometerOnly.includes(SensorChannel::Accelerometer));
        assert!(!ChannelSelection::AccelerometerOnly.includes(SensorChannel::Gyroscope));
        assert!(!ChannelSelection::GyroscopeOnly.includes(SensorChannel::Accelerometer));
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!("gyro".parse::<ChannelSelection>(), Ok(ChannelSelection::GyroscopeOnly));
        assert_eq!("Accelerometer".parse::<ChannelSelection>(), Ok(ChannelSelection::AccelerometerOnly));
        assert!("magnetometer".parse::<ChannelSelection>().is_err());
    }
}
