use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::driver::{ConnectionResolver, ScaleConnection};
use domain::scale::{ProtocolVariant, WeightReading};
use infrastructure::framing::FrameReader;
use infrastructure::protocol::decode;

/// Where a capture reads from
pub enum CaptureSource<'a> {
    /// Already open, owned by the caller and left open
    Connection(&'a mut dyn ScaleConnection),
    /// Opened for this capture and closed afterwards
    Device(&'a str),
    /// First candidate port that opens, closed afterwards
    Probe,
    /// Nothing configured: no hardware is touched
    Absent,
}

impl fmt::Debug for CaptureSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(conn) => write!(f, "Connection({})", conn.name()),
            Self::Device(device) => write!(f, "Device({device})"),
            Self::Probe => f.write_str("Probe"),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// "Get current weight": resolve a connection if needed, read one frame and
/// decode it.
///
/// Hardware and protocol faults never escape; they all end as `None`.
pub struct CaptureService {
    resolver: Arc<dyn ConnectionResolver>,
    consistency_check: bool,
}

impl CaptureService {
    pub fn new(resolver: Arc<dyn ConnectionResolver>) -> Self {
        Self {
            resolver,
            consistency_check: false,
        }
    }

    /// Enable the double-read consistency check on every capture
    pub fn with_consistency_check(mut self, enabled: bool) -> Self {
        self.consistency_check = enabled;
        self
    }

    /// Capture one weight.
    ///
    /// `timeout` overrides the read timeout for this call only. Without it a
    /// connection opened here uses the variant default and a supplied one keeps
    /// its own.
    pub async fn capture(
        &self,
        source: CaptureSource<'_>,
        variant: ProtocolVariant,
        timeout: Option<Duration>,
    ) -> WeightReading {
        tracing::debug!(source = ?source, variant = %variant, "Capturing weight");

        match source {
            CaptureSource::Connection(connection) => match timeout {
                Some(timeout) => {
                    let previous = connection.timeout();
                    connection.set_timeout(Some(timeout));
                    let reading = self.read_weight(connection, variant).await;
                    connection.set_timeout(previous);
                    reading
                }
                None => self.read_weight(connection, variant).await,
            },
            CaptureSource::Device(device) => self.capture_owned(Some(device), variant, timeout).await,
            CaptureSource::Probe => self.capture_owned(None, variant, timeout).await,
            CaptureSource::Absent => {
                tracing::debug!("No port configured, skipping capture");
                None
            }
        }
    }

    async fn capture_owned(
        &self,
        device: Option<&str>,
        variant: ProtocolVariant,
        timeout: Option<Duration>,
    ) -> WeightReading {
        let timeout = timeout.or_else(|| variant.default_timeout());

        let mut connection = match self.resolver.resolve(device, timeout).await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!(device = ?device, error = %e, "Scale port unavailable");
                return None;
            }
        };

        let reading = self.read_weight(connection.as_mut(), variant).await;

        if let Err(e) = connection.close().await {
            tracing::warn!(port = %connection.name(), error = %e, "Error closing scale port");
        }
        reading
    }

    /// Read and decode one frame from an open connection
    pub async fn read_weight(
        &self,
        connection: &mut dyn ScaleConnection,
        variant: ProtocolVariant,
    ) -> WeightReading {
        let reader = FrameReader::for_connection(variant, &*connection)
            .with_consistency_check(self.consistency_check);
        let frame = reader.read_frame(connection).await;
        let reading = decode(&frame, variant);

        match reading {
            Some(weight) => tracing::info!(port = %connection.name(), weight, "Weight captured"),
            None => tracing::debug!(port = %connection.name(), frame = %frame, "No stable weight"),
        }
        reading
    }
}
