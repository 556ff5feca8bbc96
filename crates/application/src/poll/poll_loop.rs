use std::time::Duration;

use domain::driver::ScaleConnection;
use domain::scale::{ProtocolVariant, WeightReading};
use infrastructure::sink::DumpSink;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::capture::{CaptureService, CaptureSource};

/// Capture source owned by the poll loop
pub enum PollSource {
    /// Reopened on every cycle
    Device(String),
    /// Candidate ports probed on every cycle
    Probe,
    /// Kept open across cycles and closed on shutdown
    Connection(Box<dyn ScaleConnection>),
    Absent,
}

impl PollSource {
    fn as_capture_source(&mut self) -> CaptureSource<'_> {
        match self {
            Self::Device(device) => CaptureSource::Device(device),
            Self::Probe => CaptureSource::Probe,
            Self::Connection(connection) => CaptureSource::Connection(connection.as_mut()),
            Self::Absent => CaptureSource::Absent,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Device(device) => device.clone(),
            Self::Probe => "auto".to_string(),
            Self::Connection(connection) => connection.name().to_string(),
            Self::Absent => "none".to_string(),
        }
    }
}

/// Result of one capture-dump cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    Dumped(f64),
    NoReading,
    SinkFailed,
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub dumped: u64,
    pub no_reading: u64,
    pub sink_failures: u64,
}

impl PollStats {
    fn record(&mut self, outcome: CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Dumped(_) => self.dumped += 1,
            CycleOutcome::NoReading => self.no_reading += 1,
            CycleOutcome::SinkFailed => self.sink_failures += 1,
        }
    }
}

/// Capture → dump → sleep, until the cancellation token fires.
///
/// A missing reading skips the dump for that cycle. Sink failures are logged
/// and the loop carries on. On cancellation the destination is flushed and
/// closed and a kept-open connection is closed.
pub struct PollLoop {
    capture: CaptureService,
    source: PollSource,
    sink: DumpSink,
    variant: ProtocolVariant,
    interval: Duration,
    timeout: Option<Duration>,
    cancel_token: CancellationToken,
}

impl PollLoop {
    pub fn new(
        capture: CaptureService,
        source: PollSource,
        sink: DumpSink,
        variant: ProtocolVariant,
        interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            capture,
            source,
            sink,
            variant,
            interval,
            timeout: None,
            cancel_token,
        }
    }

    /// Read timeout override passed to every capture
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run until cancelled
    pub async fn run(mut self) -> PollStats {
        let token = self.cancel_token.clone();
        let mut stats = PollStats::default();

        tracing::info!(
            source = %self.source.describe(),
            destination = %self.sink.describe(),
            variant = %self.variant,
            interval_secs = self.interval.as_secs_f64(),
            "Poll loop started"
        );

        loop {
            // GEOTEXTIL reads may block until the display answers.
            let reading = tokio::select! {
                _ = token.cancelled() => break,
                reading = self.capture() => reading,
            };

            stats.record(self.dump(reading).await);

            tokio::select! {
                _ = token.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        tracing::info!("Shutdown signal received");
        self.shutdown().await;
        tracing::info!(?stats, "Poll loop stopped");
        stats
    }

    /// One capture-dump iteration without sleeping
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let reading = self.capture().await;
        self.dump(reading).await
    }

    async fn capture(&mut self) -> WeightReading {
        let source = self.source.as_capture_source();
        self.capture.capture(source, self.variant, self.timeout).await
    }

    async fn dump(&mut self, reading: WeightReading) -> CycleOutcome {
        let Some(weight) = reading else {
            tracing::warn!(
                destination = %self.sink.describe(),
                "No stable weight, nothing written this cycle"
            );
            return CycleOutcome::NoReading;
        };

        match self.sink.dump_weight(weight, None).await {
            Ok(_) => CycleOutcome::Dumped(weight),
            // The sink already logged the failure.
            Err(_) => CycleOutcome::SinkFailed,
        }
    }

    /// Flush and close the destination, then any kept-open connection
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.sink.close().await {
            tracing::error!(error = %e, "Failed to close destination");
        }
        if let PollSource::Connection(connection) = &mut self.source {
            if let Err(e) = connection.close().await {
                tracing::warn!(port = %connection.name(), error = %e, "Error closing scale port");
            }
        }
    }
}
