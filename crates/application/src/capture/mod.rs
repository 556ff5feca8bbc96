mod capture_service;

pub use capture_service::{CaptureService, CaptureSource};
