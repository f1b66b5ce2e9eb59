use std::path::PathBuf;

use super::SensorChannel;

/// One CSV file written by a save operation
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub channel: SensorChannel,
    pub path: PathBuf,
    pub rows: usize,
}

/// Result of exporting both channels to disk
#[derive(Debug, Default)]
pub struct SaveResult {
    pub files: Vec<SavedFile>,
}

impl SaveResult {
    pub fn push(&mut self, channel: SensorChannel, path: PathBuf, rows: usize) {
        self.files.push(SavedFile { channel, path, rows });
    }

    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }

    pub fn message(&self) -> String {
        let names: Vec<String> = self
            .files
            .iter()
            .map(|f| format!("{} ({} rows)", f.path.display(), f.rows))
            .collect();
        format!("Saved {} samples: {}", self.total_rows(), names.join(", "))
    }
}
