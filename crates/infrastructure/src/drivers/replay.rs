use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use domain::DomainError;
use domain::driver::{ReadMode, ScaleConnection};

/// Emulated port that replays a recorded capture.
///
/// Like a plain text stream it only offers native line reads, so it is served
/// by the fallback framing strategy. Each `read_line` returns the next
/// `\n`-terminated line, the unterminated tail at the end, then empty reads.
pub struct ReplayConnection {
    name: String,
    data: Vec<u8>,
    cursor: usize,
    open: bool,
    timeout: Option<Duration>,
}

impl ReplayConnection {
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            cursor: 0,
            open: true,
            timeout: None,
        }
    }

    /// Load a recording from disk
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::PortUnavailable {
                port: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(path = %path.display(), bytes = data.len(), "Replay port opened");
        Ok(Self::from_bytes(path.display().to_string(), data))
    }
}

#[async_trait]
impl ScaleConnection for ReplayConnection {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_mode(&self) -> ReadMode {
        ReadMode::LineOnly
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, DomainError> {
        if !self.open {
            return Err(DomainError::NotOpen(self.name.clone()));
        }

        let rest = &self.data[self.cursor..];
        let len = rest
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(rest.len());
        let line = rest[..len].to_vec();
        self.cursor += len;
        Ok(line)
    }

    async fn clear_input(&mut self) -> Result<(), DomainError> {
        // Recorded data is consumed line by line, nothing is buffered ahead.
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DomainError> {
        if self.open {
            self.open = false;
            tracing::debug!(port = %self.name, "Replay port closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_lines_in_order() {
        let mut port = ReplayConnection::from_bytes("bench", "0 X 1.5\n2 X 1.5\n2 X 1.6");
        assert_eq!(port.read_line().await.unwrap(), b"0 X 1.5\n");
        assert_eq!(port.read_line().await.unwrap(), b"2 X 1.5\n");
        assert_eq!(port.read_line().await.unwrap(), b"2 X 1.6");
        assert!(port.read_line().await.unwrap().is_empty());
        assert!(port.read_line().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_line_only_capability() {
        let mut port = ReplayConnection::from_bytes("bench", "1\r2\r");
        assert_eq!(port.read_mode(), ReadMode::LineOnly);
        assert!(matches!(
            port.read_until(b'\r').await,
            Err(DomainError::UnsupportedRead(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_port_cannot_be_read() {
        let mut port = ReplayConnection::from_bytes("bench", "2 X 1.0\n");
        port.close().await.unwrap();
        port.close().await.unwrap();
        assert!(!port.is_open());
        assert!(matches!(port.read_line().await, Err(DomainError::NotOpen(_))));
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = ReplayConnection::open_file("/nonexistent/recording.txt").await;
        assert!(matches!(result, Err(DomainError::PortUnavailable { .. })));
    }
}
