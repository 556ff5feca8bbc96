use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use application::{CaptureService, CaptureSource, PollLoop, PollSource, PollStats};
use chrono::NaiveDateTime;
use domain::driver::{ConnectionResolver, ScaleConnection};
use domain::scale::WeightReading;
use domain::sink::DumpRecord;
use infrastructure::config::AgentConfig;
use infrastructure::drivers::{PortResolver, ReplayConnection, SerialPortOpener, SerialSettings};
use infrastructure::sink::DumpSink;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Serial resolver over the platform's candidate ports
pub fn serial_resolver() -> Arc<dyn ConnectionResolver> {
    Arc::new(PortResolver::new(SerialPortOpener::new(
        SerialSettings::default(),
    )))
}

pub fn capture_service(config: &AgentConfig, resolver: Arc<dyn ConnectionResolver>) -> CaptureService {
    CaptureService::new(resolver).with_consistency_check(config.consistency_check)
}

fn capture_source(config: &AgentConfig) -> CaptureSource<'_> {
    match config.device() {
        Some(Some(device)) => CaptureSource::Device(device),
        Some(None) => CaptureSource::Probe,
        None => {
            warn!("No scale port configured");
            CaptureSource::Absent
        }
    }
}

fn poll_source(config: &AgentConfig) -> PollSource {
    match config.device() {
        Some(Some(device)) => PollSource::Device(device.to_string()),
        Some(None) => PollSource::Probe,
        None => {
            warn!("No scale port configured, every cycle will be empty");
            PollSource::Absent
        }
    }
}

async fn open_replay(path: &Path) -> Result<ReplayConnection> {
    ReplayConnection::open_file(path)
        .await
        .with_context(|| format!("Failed to open replay file {}", path.display()))
}

/// Read the current weight once
pub async fn capture(
    config: &AgentConfig,
    resolver: Arc<dyn ConnectionResolver>,
    replay: Option<&Path>,
) -> Result<WeightReading> {
    let service = capture_service(config, resolver);

    let reading = match replay {
        Some(path) => {
            let mut port = open_replay(path).await?;
            let reading = service
                .capture(
                    CaptureSource::Connection(&mut port),
                    config.protocol,
                    config.timeout(),
                )
                .await;
            port.close().await?;
            reading
        }
        None => {
            service
                .capture(capture_source(config), config.protocol, config.timeout())
                .await
        }
    };

    Ok(reading)
}

/// Write one record to the configured destination
pub async fn dump(
    config: &AgentConfig,
    weight: f64,
    captured_at: Option<NaiveDateTime>,
) -> Result<DumpRecord> {
    let mut sink = DumpSink::new(config.destination());
    let record = sink.dump_weight(weight, captured_at).await?;
    sink.close().await?;
    Ok(record)
}

/// Capture once and dump the result; no stable weight skips the dump
pub async fn run_once(
    config: &AgentConfig,
    resolver: Arc<dyn ConnectionResolver>,
    replay: Option<&Path>,
) -> Result<Option<DumpRecord>> {
    match capture(config, resolver, replay).await? {
        Some(weight) => Ok(Some(dump(config, weight, None).await?)),
        None => {
            warn!(destination = %config.destination(), "No stable weight, nothing written");
            Ok(None)
        }
    }
}

/// Poll until `cancel_token` fires
pub async fn daemon(
    config: &AgentConfig,
    resolver: Arc<dyn ConnectionResolver>,
    replay: Option<&Path>,
    cancel_token: CancellationToken,
) -> Result<PollStats> {
    let source = match replay {
        Some(path) => PollSource::Connection(Box::new(open_replay(path).await?)),
        None => poll_source(config),
    };

    let poll = PollLoop::new(
        capture_service(config, resolver),
        source,
        DumpSink::new(config.destination()),
        config.protocol,
        config.interval(),
        cancel_token,
    )
    .with_timeout(config.timeout());

    info!(
        interval_secs = config.interval_secs,
        consistency_check = config.consistency_check,
        "⚖️ Scale daemon running"
    );
    Ok(poll.run().await)
}

/// Cancel `token` on Ctrl+C
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("🛑 Shutting down...");
                token.cancel();
            }
            Err(err) => warn!(error = %err, "Unable to listen for shutdown signal"),
        }
    });
}
