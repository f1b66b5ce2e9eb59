use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::info;
use rand::Rng;

use super::FeedSenders;
use crate::config::SimulatedConfig;
use crate::types::{Sample, SensorChannel};

const STANDARD_GRAVITY: f32 = 9.80665;
const BATCH_PERIOD: Duration = Duration::from_millis(10);

/// Synthetic device at rest: gravity on z for the accelerometer, zero rotation for the
/// gyroscope, both with uniform noise of `noise` amplitude.
pub struct SimulatedDevice<R: Rng> {
    rng: R,
    noise: f32,
}

impl<R: Rng> SimulatedDevice<R> {
    pub fn new(rng: R, noise: f32) -> Self {
        Self { rng, noise }
    }

    fn jitter(&mut self) -> f32 {
        if self.noise > 0.0 {
            self.rng.random_range(-self.noise..self.noise)
        } else {
            0.0
        }
    }

    pub fn sample(&mut self, channel: SensorChannel, timestamp: i64) -> Sample {
        let (x, y, z) = (self.jitter(), self.jitter(), self.jitter());
        match channel {
            SensorChannel::Accelerometer => Sample::new(timestamp, x, y, STANDARD_GRAVITY + z),
            SensorChannel::Gyroscope => Sample::new(timestamp, x, y, z),
        }
    }
}

/// Emits samples at `rate_hz` per channel until shutdown or until the queues close.
///
/// Samples are produced in small batches; timestamps are spaced evenly from the feed
/// start so the reported rate matches the configured one.
pub fn run_simulated_feed(
    config: &SimulatedConfig,
    senders: FeedSenders,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut device = SimulatedDevice::new(rand::rng(), config.noise);
    let interval_ns = (1_000_000_000 / config.rate_hz.max(1) as i64).max(1);
    let start = Instant::now();
    let mut produced: i64 = 0;

    info!("Simulated feed running at {} Hz", config.rate_hz);

    while !shutdown_signal.load(Ordering::Relaxed) {
        let due = start.elapsed().as_nanos() as i64 / interval_ns;
        while produced < due {
            let timestamp = produced * interval_ns;
            for channel in SensorChannel::ALL {
                if senders.send(channel, device.sample(channel, timestamp)).is_err() {
                    info!("{} queue disconnected, simulated feed exiting", channel);
                    return Ok(());
                }
            }
            produced += 1;
        }
        thread::sleep(BATCH_PERIOD);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::feed_channels;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_device_noise_bounds() {
        let mut device = SimulatedDevice::new(StdRng::seed_from_u64(7), 0.05);
        for i in 0..1000 {
            let accel = device.sample(SensorChannel::Accelerometer, i);
            assert!(accel.x.abs() <= 0.05);
            assert!((accel.z - STANDARD_GRAVITY).abs() <= 0.0501);

            let gyro = device.sample(SensorChannel::Gyroscope, i);
            assert!(gyro.length() <= 0.09);
            assert_eq!(gyro.timestamp, i);
        }
    }

    #[test]
    fn test_noiseless_device() {
        let mut device = SimulatedDevice::new(StdRng::seed_from_u64(1), 0.0);
        assert_eq!(
            device.sample(SensorChannel::Accelerometer, 3),
            Sample::new(3, 0.0, 0.0, STANDARD_GRAVITY)
        );
    }

    #[test]
    fn test_feed_exits_when_queues_close() {
        let (senders, receivers) = feed_channels(64);
        drop(receivers);
        let config = SimulatedConfig {
            rate_hz: 1000,
            noise: 0.0,
        };
        let result = run_simulated_feed(&config, senders, Arc::new(AtomicBool::new(false)));
        assert!(result.is_ok());
    }

    #[test]
    fn test_feed_survives_rates_above_one_gigahertz() {
        let (senders, receivers) = feed_channels(16);
        let config = SimulatedConfig {
            rate_hz: 2_000_000_000,
            noise: 0.0,
        };
        let handle = thread::spawn(move || run_simulated_feed(&config, senders, Arc::new(AtomicBool::new(false))).is_ok());

        let first = receivers.gyroscope.recv_timeout(Duration::from_secs(1)).unwrap();
        let second = receivers.gyroscope.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(second.timestamp - first.timestamp, 1);

        drop(receivers);
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_feed_timestamps_are_evenly_spaced() {
        let (senders, receivers) = feed_channels(10_000);
        let shutdown = Arc::new(AtomicBool::new(false));
        let config = SimulatedConfig {
            rate_hz: 500,
            noise: 0.0,
        };

        let feed_shutdown = Arc::clone(&shutdown);
        let handle = thread::spawn(move || run_simulated_feed(&config, senders, feed_shutdown).is_ok());
        thread::sleep(Duration::from_millis(100));
        shutdown.store(true, Ordering::Relaxed);
        assert!(handle.join().unwrap());

        let timestamps: Vec<i64> = receivers.gyroscope.try_iter().map(|s| s.timestamp).collect();
        assert!(timestamps.len() >= 10);
        for (i, ts) in timestamps.iter().enumerate() {
            assert_eq!(*ts, i as i64 * 2_000_000);
        }
    }
}
