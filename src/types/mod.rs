pub mod sample;
pub mod channel;
pub mod commands;
pub mod results;

pub use sample::{Sample, Vector3};
pub use channel::{ChannelSelection, SensorChannel};
pub use commands::{ControlCommand, HELP_TEXT};
pub use results::{SaveResult, SavedFile};
