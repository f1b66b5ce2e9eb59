//! Accelerometer and gyroscope sample logger.
//!
//! Each sensor channel gets a fixed-capacity [`SampleLog`] that buffers timestamped
//! 3-axis samples, computes mean and standard deviation over the buffer, applies a zero
//! baseline, and exports the samples as CSV. [`app::LoggerSession`] owns one log per
//! channel and drains the feed queues into them.

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod logger;
pub mod sample_log;
pub mod types;
pub mod utils;


pub use error::LoggerError;
pub use sample_log::{ChannelReport, SampleLog};
pub use types::{Sample, SensorChannel, Vector3};
