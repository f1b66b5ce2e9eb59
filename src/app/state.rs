use std::path::PathBuf;

use crate::config::AppConfig;
use crate::types::ChannelSelection;

/// Logging state
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    pub is_started: bool,
    pub selection: ChannelSelection,
    /// Samples stored since the last start
    pub accepted: usize,
    /// Samples drained while stopped or from unselected channels
    pub discarded: usize,
}

/// Session settings copied out of the application config
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub capacity: usize,
    pub auto_stop_on_overflow: bool,
    pub export_directory: PathBuf,
    pub create_export_directory: bool,
    pub file_stamp_format: String,
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            capacity: config.logger.capacity,
            auto_stop_on_overflow: config.logger.auto_stop_on_overflow,
            export_directory: config.get_export_directory(),
            create_export_directory: config.export.create_directory,
            file_stamp_format: config.export.file_stamp_format.clone(),
        }
    }
}

impl CollectionState {
    pub fn status_summary(&self) -> String {
        if self.is_started {
            format!("Logging ({:?})", self.selection)
        } else {
            "Stopped".to_string()
        }
    }

    pub fn start(&mut self, selection: ChannelSelection) {
        self.is_started = true;
        self.selection = selection;
        self.accepted = 0;
    }

    pub fn stop(&mut self) {
        self.is_started = false;
    }
}

/// What a refresh tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Refreshed,
    AutoStopped,
}
