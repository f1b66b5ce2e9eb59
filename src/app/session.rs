use std::path::Path;

use log::{debug, info, warn};

use super::state::{CollectionState, SessionSettings, TickOutcome};
use crate::config::AppConfig;
use crate::error::LoggerError;
use crate::feed::FeedReceivers;
use crate::sample_log::{ChannelReport, SampleLog};
use crate::types::{ChannelSelection, Sample, SaveResult, SensorChannel};
use crate::utils::export_file_stem;

/// Host context: owns one `SampleLog` per channel plus the queues feeding them.
///
/// Only this struct ever touches the logs. Feeds write into the queues, and every control
/// operation drains them first, so the logs see samples in arrival order.
pub struct LoggerSession {
    accelerometer: SampleLog,
    gyroscope: SampleLog,
    receivers: FeedReceivers,
    pub collection: CollectionState,
    settings: SessionSettings,
}

impl LoggerSession {
    pub fn new(config: &AppConfig, receivers: FeedReceivers) -> Self {
        let settings = SessionSettings::from(config);
        Self {
            accelerometer: SampleLog::with_capacity(SensorChannel::Accelerometer, settings.capacity),
            gyroscope: SampleLog::with_capacity(SensorChannel::Gyroscope, settings.capacity),
            receivers,
            collection: CollectionState::default(),
            settings,
        }
    }

    pub fn log(&self, channel: SensorChannel) -> &SampleLog {
        match channel {
            SensorChannel::Accelerometer => &self.accelerometer,
            SensorChannel::Gyroscope => &self.gyroscope,
        }
    }

    fn log_mut(&mut self, channel: SensorChannel) -> &mut SampleLog {
        match channel {
            SensorChannel::Accelerometer => &mut self.accelerometer,
            SensorChannel::Gyroscope => &mut self.gyroscope,
        }
    }

    pub fn is_started(&self) -> bool {
        self.collection.is_started
    }

    pub fn is_overflowed(&self) -> bool {
        self.accelerometer.is_overflowed() || self.gyroscope.is_overflowed()
    }

    /// Moves queued samples into the logs. Samples are discarded while stopped or when
    /// their channel is not selected. Returns the number stored.
    pub fn drain(&mut self) -> usize {
        let mut stored = 0;
        for channel in SensorChannel::ALL {
            let accept = self.collection.is_started && self.collection.selection.includes(channel);
            let queued: Vec<Sample> = self.receivers.get(channel).try_iter().collect();
            if accept {
                stored += self.log_mut(channel).extend(queued);
            } else {
                self.collection.discarded += queued.len();
            }
        }
        self.collection.accepted += stored;
        stored
    }

    pub fn start(&mut self, selection: ChannelSelection) -> bool {
        if self.collection.is_started {
            warn!("Start ignored, logging already running");
            return false;
        }
        // whatever queued up while stopped belongs to no session
        self.drain();
        self.collection.start(selection);
        info!("Logging started ({:?})", selection);
        true
    }

    pub fn stop(&mut self) -> bool {
        if !self.collection.is_started {
            return false;
        }
        self.drain();
        self.collection.stop();
        info!(
            "Logging stopped: {} accelerometer / {} gyroscope samples",
            self.accelerometer.count(),
            self.gyroscope.count()
        );
        true
    }

    pub fn clear(&mut self) {
        self.drain();
        self.accelerometer.clear();
        self.gyroscope.clear();
        info!("Sample buffers cleared");
    }

    /// Exports both channels as `<stamp>_accel.csv` and `<stamp>_gyro.csv`.
    ///
    /// Files already written are removed again when a later channel fails.
    pub fn save(&mut self, directory: Option<&Path>) -> Result<SaveResult, LoggerError> {
        if self.collection.is_started {
            return Err(LoggerError::SessionRunning("save"));
        }
        self.drain();

        let directory = directory.unwrap_or(self.settings.export_directory.as_path());
        if self.settings.create_export_directory {
            std::fs::create_dir_all(directory).map_err(|e| LoggerError::export(directory, e))?;
        }

        let stem = export_file_stem(&self.settings.file_stamp_format);
        let mut result = SaveResult::default();
        for channel in SensorChannel::ALL {
            let path = directory.join(format!("{}_{}.csv", stem, channel.file_suffix()));
            match self.log(channel).save_to_file(&path) {
                Ok(rows) => result.push(channel, path, rows),
                Err(e) => {
                    // a save either produces every channel's file or none
                    for written in &result.files {
                        if let Err(remove_err) = std::fs::remove_file(&written.path) {
                            warn!("Failed to remove {}: {}", written.path.display(), remove_err);
                        }
                    }
                    return Err(e);
                }
            }
        }
        info!("{}", result.message());
        Ok(result)
    }

    pub fn analyze(&mut self) -> Result<(), LoggerError> {
        if self.collection.is_started {
            return Err(LoggerError::SessionRunning("analyze"));
        }
        self.drain();
        self.accelerometer.analyze();
        self.gyroscope.analyze();
        Ok(())
    }

    /// Uses each channel's last analysis as its zero baseline.
    pub fn calibrate(&mut self) {
        for channel in SensorChannel::ALL {
            let log = self.log_mut(channel);
            let (mean, deviation) = (log.mean(), log.deviation());
            log.set_zero(mean, deviation);
        }
        info!("Zero baseline updated from last analysis");
    }

    pub fn reset_calibration(&mut self) {
        self.accelerometer.reset_zero();
        self.gyroscope.reset_zero();
        info!("Zero baseline reset");
    }

    /// Periodic refresh. Stops logging once a buffer is full.
    pub fn on_tick(&mut self) -> TickOutcome {
        self.drain();
        if !self.collection.is_started {
            return TickOutcome::Idle;
        }

        if self.settings.auto_stop_on_overflow && self.is_overflowed() {
            warn!("Sample buffer full, stopping logger");
            self.stop();
            return TickOutcome::AutoStopped;
        }

        debug!(
            "{}: {} accelerometer / {} gyroscope samples",
            self.collection.status_summary(),
            self.accelerometer.count(),
            self.gyroscope.count()
        );
        TickOutcome::Refreshed
    }

    pub fn info(&self) -> String {
        SensorChannel::ALL.iter().map(|&c| self.log(c).summary_info()).collect()
    }

    pub fn zero_info(&self) -> String {
        SensorChannel::ALL.iter().map(|&c| self.log(c).calibration_info()).collect()
    }

    pub fn analyze_info(&self) -> String {
        SensorChannel::ALL.iter().map(|&c| self.log(c).analysis_info()).collect()
    }

    pub fn reports(&self) -> Vec<ChannelReport> {
        SensorChannel::ALL.iter().map(|&c| self.log(c).report()).collect()
    }

    pub fn reports_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.reports())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{feed_channels, FeedSenders};
    use crate::types::Vector3;

    fn session_with_capacity(capacity: usize) -> (LoggerSession, FeedSenders) {
        let mut config = AppConfig::default();
        config.logger.capacity = capacity;
        let (senders, receivers) = feed_channels(1024);
        (LoggerSession::new(&config, receivers), senders)
    }

    fn feed(senders: &FeedSenders, channel: SensorChannel, n: i64) {
        for i in 0..n {
            senders
                .send(channel, Sample::new(i * 1_000_000, 1.0, 2.0, 3.0))
                .unwrap();
        }
    }

    #[test]
    fn test_samples_discarded_while_stopped() {
        let (mut session, senders) = session_with_capacity(100);
        feed(&senders, SensorChannel::Accelerometer, 5);
        assert_eq!(session.drain(), 0);
        assert_eq!(session.collection.discarded, 5);

        assert!(session.start(ChannelSelection::Both));
        feed(&senders, SensorChannel::Accelerometer, 5);
        feed(&senders, SensorChannel::Gyroscope, 3);
        assert_eq!(session.drain(), 8);
        assert_eq!(session.log(SensorChannel::Accelerometer).count(), 5);
        assert_eq!(session.log(SensorChannel::Gyroscope).count(), 3);
    }

    #[test]
    fn test_selection_filters_channels() {
        let (mut session, senders) = session_with_capacity(100);
        session.start(ChannelSelection::GyroscopeOnly);
        feed(&senders, SensorChannel::Accelerometer, 4);
        feed(&senders, SensorChannel::Gyroscope, 4);
        session.stop();

        assert_eq!(session.log(SensorChannel::Accelerometer).count(), 0);
        assert_eq!(session.log(SensorChannel::Gyroscope).count(), 4);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let (mut session, _senders) = session_with_capacity(10);
        assert!(!session.stop());
        assert!(session.start(ChannelSelection::Both));
        assert!(!session.start(ChannelSelection::AccelerometerOnly));
        assert_eq!(session.collection.selection, ChannelSelection::Both);
        assert!(session.stop());
        assert!(!session.is_started());
    }

    #[test]
    fn test_save_and_analyze_refused_while_running() {
        let (mut session, _senders) = session_with_capacity(10);
        session.start(ChannelSelection::Both);
        assert!(matches!(session.analyze(), Err(LoggerError::SessionRunning("analyze"))));
        assert!(matches!(session.save(None), Err(LoggerError::SessionRunning("save"))));
    }

    #[test]
    fn test_tick_auto_stops_on_overflow() {
        let (mut session, senders) = session_with_capacity(8);
        session.start(ChannelSelection::Both);
        feed(&senders, SensorChannel::Accelerometer, 4);
        assert_eq!(session.on_tick(), TickOutcome::Refreshed);

        feed(&senders, SensorChannel::Accelerometer, 10);
        assert_eq!(session.on_tick(), TickOutcome::AutoStopped);
        assert!(!session.is_started());
        assert_eq!(session.log(SensorChannel::Accelerometer).count(), 8);
        assert_eq!(session.on_tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_failed_save_leaves_no_partial_export() {
        let dir = std::env::temp_dir().join(format!("sensor_logger_partial_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let mut config = AppConfig::default();
        config.export.directory = dir.to_string_lossy().into_owned();
        config.export.file_stamp_format = "run".to_string();
        let (senders, receivers) = feed_channels(16);
        let mut session = LoggerSession::new(&config, receivers);

        session.start(ChannelSelection::Both);
        feed(&senders, SensorChannel::Accelerometer, 3);
        session.stop();

        // gyroscope target already taken, so its create fails after the accelerometer write
        std::fs::write(dir.join("run_gyro.csv"), "keep").unwrap();
        assert!(matches!(session.save(None), Err(LoggerError::Export { .. })));
        assert!(!dir.join("run_accel.csv").exists());
        assert_eq!(std::fs::read_to_string(dir.join("run_gyro.csv")).unwrap(), "keep");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_calibrate_and_reset() {
        let (mut session, senders) = session_with_capacity(100);
        session.start(ChannelSelection::AccelerometerOnly);
        feed(&senders, SensorChannel::Accelerometer, 10);
        session.stop();
        session.analyze().unwrap();
        session.calibrate();

        let accel = session.log(SensorChannel::Accelerometer);
        assert_eq!(accel.zero_mean(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(accel.zero_deviation(), Vector3::ZERO);

        // calibrated run of the same signal analyzes to zero
        session.analyze().unwrap();
        assert_eq!(session.log(SensorChannel::Accelerometer).adjusted_mean(), Vector3::ZERO);

        session.reset_calibration();
        assert!(session.zero_info().contains("Zero mean: 0.000000, 0.000000, 0.000000 @ 0.000000"));
    }

    #[test]
    fn test_clear_resets_both_channels() {
        let (mut session, senders) = session_with_capacity(100);
        session.start(ChannelSelection::Both);
        feed(&senders, SensorChannel::Accelerometer, 3);
        feed(&senders, SensorChannel::Gyroscope, 3);
        session.clear();
        assert_eq!(session.log(SensorChannel::Accelerometer).count(), 0);
        assert_eq!(session.log(SensorChannel::Gyroscope).count(), 0);
        assert!(session.is_started());
    }

    #[test]
    fn test_text_views_cover_both_channels() {
        let (session, _senders) = session_with_capacity(4);
        for text in [session.info(), session.zero_info(), session.analyze_info()] {
            assert!(text.contains("*** Accelerometer ***"));
            assert!(text.contains("*** Gyroscope ***"));
        }
        let json = session.reports_json().unwrap();
        assert!(json.contains("\"gyroscope\""));
    }
}
