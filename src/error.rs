use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// Errors surfaced by the logger session and its exports.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Export to {} failed: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot {0} while logging is running")]
    SessionRunning(&'static str),
    #[error("Feed error: {0}")]
    Feed(String),
    #[error("Console I/O error: {0}")]
    Console(#[from] std::io::Error),
}

impl LoggerError {
    pub fn export(path: &Path, source: std::io::Error) -> Self {
        LoggerError::Export {
            path: path.to_path_buf(),
            source,
        }
    }
}
