use serde::Serialize;

use crate::types::{SensorChannel, Vector3};
use crate::utils::{format_fixed, format_g};

use super::SampleLog;

/// Structured form of the text reports.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub channel: SensorChannel,
    pub count: usize,
    pub capacity: usize,
    pub overflowed: bool,
    pub elapsed_seconds: f64,
    /// `None` while the rate is not a finite number.
    pub sample_rate_hz: Option<f64>,
    pub zero_mean: Vector3,
    pub zero_deviation: Vector3,
    pub mean: Vector3,
    pub deviation: Vector3,
    pub adjusted_mean: Vector3,
    pub adjusted_deviation: Vector3,
}

fn f(value: f64) -> String {
    format_fixed(value, 6)
}

fn fixed_vector(v: Vector3) -> String {
    format!("{}, {}, {} @ {}", f(v.x), f(v.y), f(v.z), f(v.length()))
}

fn g_vector(v: Vector3) -> String {
    format!(
        "{}, {}, {} @ {}",
        format_g(v.x),
        format_g(v.y),
        format_g(v.z),
        format_g(v.length())
    )
}

impl SampleLog {
    /// Seconds between the first and the last buffered sample.
    ///
    /// The difference is taken in i128 since feed timestamps are not range checked.
    pub fn elapsed_seconds(&self) -> f64 {
        let span = self.last_sample().timestamp as i128 - self.first_sample().timestamp as i128;
        span as f64 * 1.0e-9
    }

    /// NaN or infinite when no time has elapsed.
    pub fn sample_rate_hz(&self) -> f64 {
        self.count() as f64 / self.elapsed_seconds()
    }

    pub fn summary_info(&self) -> String {
        let last = self.last_sample();
        format!(
            "\n*** {} ***\nTime: {}\nSamples: {} @ {} Hz\nLast: {}, {}, {} @ {}\n",
            self.channel.name(),
            format_fixed(self.elapsed_seconds(), 3),
            self.count(),
            format_fixed(self.sample_rate_hz(), 1),
            f(last.x as f64),
            f(last.y as f64),
            f(last.z as f64),
            f(last.length()),
        )
    }

    pub fn calibration_info(&self) -> String {
        format!(
            "\n*** {} ***\nZero mean: {}\nZero st.dev: {}\n",
            self.channel.name(),
            fixed_vector(self.zero_mean),
            fixed_vector(self.zero_deviation),
        )
    }

    pub fn analysis_info(&self) -> String {
        format!(
            "\n*** {} ***\nMean: {}\nSt.dev: {}\nMean (*): {}\nSt.dev (*): {}\n",
            self.channel.name(),
            fixed_vector(self.mean),
            g_vector(self.deviation),
            fixed_vector(self.mean_with_zero),
            g_vector(self.deviation_with_zero),
        )
    }

    pub fn report(&self) -> ChannelReport {
        let rate = self.sample_rate_hz();
        ChannelReport {
            channel: self.channel,
            count: self.count(),
            capacity: self.capacity(),
            overflowed: self.is_overflowed(),
            elapsed_seconds: self.elapsed_seconds(),
            sample_rate_hz: rate.is_finite().then_some(rate),
            zero_mean: self.zero_mean,
            zero_deviation: self.zero_deviation,
            mean: self.mean,
            deviation: self.deviation,
            adjusted_mean: self.mean_with_zero,
            adjusted_deviation: self.deviation_with_zero,
        }
    }
}
