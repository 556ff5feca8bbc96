use std::time::Duration;

use async_trait::async_trait;

use super::scale_connection::ScaleConnection;
use crate::error::DomainError;

/// Opens scale connections by device identifier
#[async_trait]
pub trait ConnectionResolver: Send + Sync {
    /// Open `device`, or the first available candidate when `device` is `None`.
    ///
    /// `timeout` is the read timeout to configure on the opened connection.
    async fn resolve(
        &self,
        device: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn ScaleConnection>, DomainError>;
}
