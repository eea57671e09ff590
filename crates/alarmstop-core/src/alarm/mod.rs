//! Alarm control: stop the active alarm if one is ringing.

pub mod error;
pub mod workflow;

pub use error::AlarmError;
pub use workflow::{AlarmController, StopOutcome};
