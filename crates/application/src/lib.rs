//! Application layer - Capture and polling use cases

pub mod capture;
pub mod poll;

pub use capture::{CaptureService, CaptureSource};
pub use poll::{CycleOutcome, PollLoop, PollSource, PollStats};
