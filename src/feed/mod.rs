//! Sample feeds. Each feed runs on its own thread and writes into one bounded queue per
//! channel; the session that owns the `SampleLog`s drains those queues.

pub mod mqtt;
pub mod simulated;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, SendError, Sender};
use log::{error, info};

use crate::config::{AppConfig, FeedSource};
use crate::error::LoggerError;
use crate::types::{Sample, SensorChannel};

/// Producer side handed to a feed thread.
#[derive(Clone, Debug)]
pub struct FeedSenders {
    pub accelerometer: Sender<Sample>,
    pub gyroscope: Sender<Sample>,
}

impl FeedSenders {
    pub fn send(&self, channel: SensorChannel, sample: Sample) -> Result<(), SendError<Sample>> {
        match channel {
            SensorChannel::Accelerometer => self.accelerometer.send(sample),
            SensorChannel::Gyroscope => self.gyroscope.send(sample),
        }
    }
}

/// Consumer side owned by the session.
#[derive(Debug)]
pub struct FeedReceivers {
    pub accelerometer: Receiver<Sample>,
    pub gyroscope: Receiver<Sample>,
}

impl FeedReceivers {
    pub fn get(&self, channel: SensorChannel) -> &Receiver<Sample> {
        match channel {
            SensorChannel::Accelerometer => &self.accelerometer,
            SensorChannel::Gyroscope => &self.gyroscope,
        }
    }
}

pub fn feed_channels(capacity: usize) -> (FeedSenders, FeedReceivers) {
    let (accel_sender, accel_receiver) = bounded(capacity);
    let (gyro_sender, gyro_receiver) = bounded(capacity);
    (
        FeedSenders {
            accelerometer: accel_sender,
            gyroscope: gyro_sender,
        },
        FeedReceivers {
            accelerometer: accel_receiver,
            gyroscope: gyro_receiver,
        },
    )
}

/// Starts the configured feed on a background thread.
pub fn spawn_feed(
    config: &AppConfig,
    senders: FeedSenders,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, LoggerError> {
    let source = config.feed.source;
    let mqtt_config = config.mqtt.clone();
    let simulated_config = config.simulated.clone();

    thread::Builder::new()
        .name(format!("{:?}-feed", source).to_lowercase())
        .spawn(move || {
            let result = match source {
                FeedSource::Mqtt => mqtt::run_mqtt_client(&mqtt_config, senders, shutdown_signal),
                FeedSource::Simulated => {
                    simulated::run_simulated_feed(&simulated_config, senders, shutdown_signal)
                }
            };
            match result {
                Ok(()) => info!("{:?} feed stopped", source),
                Err(e) => error!("{:?} feed failed: {}", source, e),
            }
        })
        .map_err(|e| LoggerError::Feed(format!("failed to start {:?} feed thread: {}", source, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_senders_route_by_channel() {
        let (senders, receivers) = feed_channels(4);
        senders
            .send(SensorChannel::Gyroscope, Sample::new(1, 0.0, 0.0, 1.0))
            .unwrap();

        assert!(receivers.get(SensorChannel::Accelerometer).try_recv().is_err());
        assert_eq!(
            receivers.get(SensorChannel::Gyroscope).try_recv().unwrap(),
            Sample::new(1, 0.0, 0.0, 1.0)
        );
    }
}
