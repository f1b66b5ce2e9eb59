pub mod console;
pub mod events;
pub mod session;
pub mod state;

pub use session::LoggerSession;
pub use state::TickOutcome;
