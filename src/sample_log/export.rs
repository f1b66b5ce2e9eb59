use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use log::{info, warn};

use crate::error::LoggerError;
use crate::utils::format_g;

use super::SampleLog;

pub const CSV_HEADER: &str = "ts,x,y,z\n";

impl SampleLog {
    /// Buffered samples as `ts,x,y,z` text, one line per sample in insertion order.
    pub fn to_csv(&self) -> String {
        // ~48 bytes per row keeps the builder from reallocating for typical values
        let mut text = String::with_capacity(CSV_HEADER.len() + self.count() * 48);
        text.push_str(CSV_HEADER);
        for sample in self.samples() {
            let _ = writeln!(
                text,
                "{},{},{},{}",
                sample.timestamp,
                format_g(sample.x as f64),
                format_g(sample.y as f64),
                format_g(sample.z as f64),
            );
        }
        text
    }

    /// Writes the CSV export to a new file at `path` and returns the number of rows.
    ///
    /// Fails if the file already exists or its directory is missing. The text is built
    /// before the file is created and written in one go.
    pub fn save_to_file(&self, path: &Path) -> Result<usize, LoggerError> {
        let text = self.to_csv();

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| LoggerError::export(path, e))?;

        if let Err(e) = file.write_all(text.as_bytes()).and_then(|_| file.sync_all()) {
            drop(file);
            if let Err(remove_err) = std::fs::remove_file(path) {
                warn!("Failed to remove partial export {}: {}", path.display(), remove_err);
            }
            return Err(LoggerError::export(path, e));
        }

        info!(
            "{}: exported {} samples to {}",
            self.channel(),
            self.count(),
            path.display()
        );
        Ok(self.count())
    }
}
