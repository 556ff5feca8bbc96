use std::time::Duration;

use async_trait::async_trait;

use super::read_mode::ReadMode;
use crate::error::DomainError;

/// An open byte-stream endpoint to a scale display.
///
/// Owned by whoever opened it. Line settings are fixed at open time, only the
/// read timeout may change afterwards.
#[async_trait]
pub trait ScaleConnection: Send {
    /// Device identifier the connection was opened with
    fn name(&self) -> &str;

    /// Read strategy this connection supports
    fn read_mode(&self) -> ReadMode;

    /// Whether the underlying handle is still usable
    fn is_open(&self) -> bool;

    fn timeout(&self) -> Option<Duration>;

    /// Override the read timeout. `None` blocks until data arrives.
    fn set_timeout(&mut self, timeout: Option<Duration>);

    /// Read until `delimiter` (kept in the result) or until the timeout
    /// elapses, returning whatever was accumulated.
    async fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, DomainError> {
        let _ = delimiter;
        Err(DomainError::UnsupportedRead(self.name().to_string()))
    }

    /// Read one line using the stream's own `\n` convention
    async fn read_line(&mut self) -> Result<Vec<u8>, DomainError>;

    /// Discard anything already received but not yet read
    async fn clear_input(&mut self) -> Result<(), DomainError>;

    /// Release the handle. Closing twice is a no-op.
    async fn close(&mut self) -> Result<(), DomainError>;
}
