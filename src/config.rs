use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::is_valid_stamp_format;

/// Configuration file read when `SENSOR_LOGGER_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "sensor_logger.toml";

/// One sample per nanosecond; timestamps cannot be spaced any tighter
pub const MAX_SIMULATED_RATE_HZ: u32 = 1_000_000_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logger: LoggerConfig,
    pub export: ExportConfig,
    pub feed: FeedConfig,
    pub mqtt: MqttConfig,
    pub simulated: SimulatedConfig,
    pub channels: ChannelConfig,
}

/// Sample buffer and status refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub capacity: usize,
    pub refresh_period_ms: u64,
    pub auto_stop_on_overflow: bool,
}

/// CSV export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: String,
    pub file_stamp_format: String,
    pub create_directory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    Mqtt,
    Simulated,
}

/// Where samples come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: FeedSource,
}

/// MQTT broker settings; credentials come from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topics: MqttTopics,
    pub qos: u8,
    pub keep_alive: u16,
}

/// One topic per sensor channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttTopics {
    pub accelerometer: String,
    pub gyroscope: String,
}

/// Synthetic feed used without hardware
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    pub rate_hz: u32,
    pub noise: f32,
}

/// Queue sizes between threads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub sample_channel_capacity: usize,
    pub command_channel_capacity: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            capacity: crate::sample_log::DEFAULT_CAPACITY,
            refresh_period_ms: 419,
            auto_stop_on_overflow: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: "data_export".to_string(),
            file_stamp_format: "%Y_%m_%d_%H_%M_%S_%3f".to_string(),
            create_directory: false,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::Simulated,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "sensor_logger_client".to_string(),
            topics: MqttTopics::default(),
            qos: 1,
            keep_alive: 5,
        }
    }
}

impl Default for MqttTopics {
    fn default() -> Self {
        Self {
            accelerometer: "sensor/accelerometer".to_string(),
            gyroscope: "sensor/gyroscope".to_string(),
        }
    }
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            rate_hz: 1000,
            noise: 0.02,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sample_channel_capacity: 5000,
            command_channel_capacity: 16,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// Check the configuration for values the logger cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logger.capacity == 0 {
            return Err(ConfigError::ValidationError("Buffer capacity must be positive".to_string()));
        }

        if self.logger.refresh_period_ms == 0 {
            return Err(ConfigError::ValidationError("Refresh period must be positive".to_string()));
        }

        if !is_valid_stamp_format(&self.export.file_stamp_format) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid export file stamp format: {:?}",
                self.export.file_stamp_format
            )));
        }

        if self.mqtt.qos > 2 {
            return Err(ConfigError::ValidationError("MQTT QoS must be 0, 1 or 2".to_string()));
        }

        if self.mqtt.keep_alive < 5 {
            return Err(ConfigError::ValidationError("MQTT keep alive must be at least 5 seconds".to_string()));
        }

        if self.mqtt.topics.accelerometer == self.mqtt.topics.gyroscope {
            return Err(ConfigError::ValidationError("MQTT topics must differ per channel".to_string()));
        }

        if self.simulated.rate_hz == 0 || self.simulated.rate_hz > MAX_SIMULATED_RATE_HZ {
            return Err(ConfigError::ValidationError(format!(
                "Simulated rate must be between 1 and {} Hz",
                MAX_SIMULATED_RATE_HZ
            )));
        }

        if self.channels.sample_channel_capacity == 0 || self.channels.command_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Channel capacities must be positive".to_string()));
        }

        Ok(())
    }

    /// Directory exports land in
    pub fn get_export_directory(&self) -> PathBuf {
        PathBuf::from(&self.export.directory)
    }
}

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
