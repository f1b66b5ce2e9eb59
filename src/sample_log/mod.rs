//! Per-channel sample buffer with statistics and zero calibration.
//!
//! A `SampleLog` owns a buffer allocated once at construction. Samples are written at
//! the cursor until the buffer is full; later samples are dropped and the log reports
//! itself as overflowed until it is cleared.

pub mod export;
pub mod report;
pub mod stats;

use crate::types::{Sample, SensorChannel, Vector3};

pub use report::ChannelReport;

/// Roughly two minutes of data at 1 kHz.
pub const DEFAULT_CAPACITY: usize = 1000 * 120;

#[derive(Debug)]
pub struct SampleLog {
    channel: SensorChannel,
    buffer: Box<[Sample]>,
    cursor: usize,
    zero_mean: Vector3,
    zero_deviation: Vector3,
    mean: Vector3,
    deviation: Vector3,
    mean_with_zero: Vector3,
    deviation_with_zero: Vector3,
}

impl SampleLog {
    pub fn new(channel: SensorChannel) -> Self {
        Self::with_capacity(channel, DEFAULT_CAPACITY)
    }

    /// A zero capacity is bumped to one so the reports always have a slot to read.
    pub fn with_capacity(channel: SensorChannel, capacity: usize) -> Self {
        Self {
            channel,
            buffer: vec![Sample::default(); capacity.max(1)].into_boxed_slice(),
            cursor: 0,
            zero_mean: Vector3::ZERO,
            zero_deviation: Vector3::ZERO,
            mean: Vector3::ZERO,
            deviation: Vector3::ZERO,
            mean_with_zero: Vector3::ZERO,
            deviation_with_zero: Vector3::ZERO,
        }
    }

    pub fn channel(&self) -> SensorChannel {
        self.channel
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn count(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Stores `sample` at the cursor. Silently dropped once the buffer is full.
    pub fn push(&mut self, sample: Sample) {
        if self.cursor >= self.buffer.len() {
            return;
        }
        self.buffer[self.cursor] = sample;
        self.cursor += 1;
    }

    /// Pushes every sample of `samples`, returning how many were stored.
    pub fn extend<I: IntoIterator<Item = Sample>>(&mut self, samples: I) -> usize {
        let before = self.cursor;
        for sample in samples {
            if self.is_overflowed() {
                break;
            }
            self.push(sample);
        }
        self.cursor - before
    }

    /// Rewinds the cursor. Old samples stay in memory but are no longer reachable,
    /// and the zero baseline and last statistics are kept.
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    pub fn is_overflowed(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    /// Buffered samples in insertion order.
    pub fn samples(&self) -> &[Sample] {
        &self.buffer[..self.cursor]
    }

    /// Most recent sample, or the first slot when nothing has been written.
    pub fn last_sample(&self) -> Sample {
        self.buffer[self.cursor.saturating_sub(1)]
    }

    pub fn first_sample(&self) -> Sample {
        self.buffer[0]
    }

    pub fn set_zero(&mut self, zero_mean: Vector3, zero_deviation: Vector3) {
        self.zero_mean = zero_mean;
        self.zero_deviation = zero_deviation;
    }

    pub fn reset_zero(&mut self) {
        self.set_zero(Vector3::ZERO, Vector3::ZERO);
    }

    pub fn zero_mean(&self) -> Vector3 {
        self.zero_mean
    }

    pub fn zero_deviation(&self) -> Vector3 {
        self.zero_deviation
    }

    /// Raw mean from the last `compute_mean`.
    pub fn mean(&self) -> Vector3 {
        self.mean
    }

    /// Raw standard deviation from the last `compute_deviation`.
    pub fn deviation(&self) -> Vector3 {
        self.deviation
    }

    pub fn adjusted_mean(&self) -> Vector3 {
        self.mean_with_zero
    }

    pub fn adjusted_deviation(&self) -> Vector3 {
        self.deviation_with_zero
    }
}
