use std::time::Duration;

use async_trait::async_trait;
use domain::DomainError;
use domain::driver::{ConnectionResolver, ScaleConnection};

use super::PortOpener;

/// Probe order on POSIX hosts
pub const POSIX_CANDIDATES: &[&str] = &["/dev/ttyS0", "/dev/ttyS1"];
/// Probe order elsewhere, as wired on the weighing stations
pub const WINDOWS_CANDIDATES: &[&str] = &[
    "COM1", "COM2", "COM6", "COM5", "COM3", "COM4", "COM7", "COM8", "COM9",
];

/// Ports probed, in order, when no device is given
pub fn default_candidates() -> Vec<String> {
    let candidates = if cfg!(unix) {
        POSIX_CANDIDATES
    } else {
        WINDOWS_CANDIDATES
    };
    candidates.iter().map(|s| s.to_string()).collect()
}

/// Opens a named device, or probes the candidate list for the first one that
/// opens.
///
/// Failures are never retried here. The caller owns the returned connection
/// and must close it.
pub struct PortResolver<O> {
    opener: O,
    candidates: Vec<String>,
}

impl<O: PortOpener> PortResolver<O> {
    pub fn new(opener: O) -> Self {
        Self::with_candidates(opener, default_candidates())
    }

    pub fn with_candidates(opener: O, candidates: Vec<String>) -> Self {
        Self { opener, candidates }
    }

    pub async fn open(
        &self,
        device: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn ScaleConnection>, DomainError> {
        match device {
            Some(device) => self.opener.open(device, timeout).await.map_err(|e| match e {
                DomainError::PortUnavailable { .. } => e,
                other => DomainError::PortUnavailable {
                    port: device.to_string(),
                    reason: other.to_string(),
                },
            }),
            None => self.probe(timeout).await,
        }
    }

    async fn probe(&self, timeout: Option<Duration>) -> Result<Box<dyn ScaleConnection>, DomainError> {
        for candidate in &self.candidates {
            match self.opener.open(candidate, timeout).await {
                Ok(connection) => {
                    tracing::info!(port = %candidate, "Found serial port");
                    return Ok(connection);
                }
                Err(e) => {
                    tracing::debug!(port = %candidate, error = %e, "Candidate port unavailable");
                }
            }
        }

        Err(DomainError::NoPortFound {
            tried: self.candidates.clone(),
        })
    }
}

#[async_trait]
impl<O: PortOpener> ConnectionResolver for PortResolver<O> {
    async fn resolve(
        &self,
        device: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn ScaleConnection>, DomainError> {
        self.open(device, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_orders() {
        assert_eq!(POSIX_CANDIDATES, ["/dev/ttyS0", "/dev/ttyS1"]);
        assert_eq!(
            WINDOWS_CANDIDATES,
            ["COM1", "COM2", "COM6", "COM5", "COM3", "COM4", "COM7", "COM8", "COM9"]
        );
    }

    #[test]
    fn test_default_candidates_for_platform() {
        let expected = if cfg!(unix) {
            POSIX_CANDIDATES
        } else {
            WINDOWS_CANDIDATES
        };
        assert_eq!(default_candidates(), expected);
    }
}
