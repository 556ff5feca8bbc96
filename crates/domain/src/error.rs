use thiserror::Error;

use crate::scale::StabilityCode;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Serial port {port} unavailable: {reason}")]
    PortUnavailable { port: String, reason: String },

    #[error("No serial port found (tried: {})", .tried.join(", "))]
    NoPortFound { tried: Vec<String> },

    #[error("Connection {0} is not open")]
    NotOpen(String),

    #[error("Frame read failed: {0}")]
    FrameRead(String),

    #[error("Read strategy not supported by {0}")]
    UnsupportedRead(String),

    #[error("Failed to write destination {destination}: {reason}")]
    SinkWrite { destination: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Reasons a frame yields no weight
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Frame is empty")]
    Empty,

    #[error("Frame is not valid text")]
    NotText,

    #[error("Expected {expected} tokens, found {found}")]
    TokenCount { expected: usize, found: usize },

    #[error("Invalid weight token: '{0}'")]
    InvalidNumber(String),

    #[error("Unknown stability code: '{0}'")]
    UnknownStability(String),

    #[error("Reading is not stable ({0})")]
    NotStable(StabilityCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_port_found_lists_candidates() {
        let err = DomainError::NoPortFound {
            tried: vec!["/dev/ttyS0".to_string(), "/dev/ttyS1".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No serial port found (tried: /dev/ttyS0, /dev/ttyS1)"
        );
    }

    #[test]
    fn test_not_stable_message() {
        let err = DecodeError::NotStable(StabilityCode::Null);
        assert_eq!(err.to_string(), "Reading is not stable (null)");
    }
}
