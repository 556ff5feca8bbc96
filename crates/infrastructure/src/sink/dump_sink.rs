use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use domain::DomainError;
use domain::sink::DumpRecord;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use super::destination::Destination;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

enum Target {
    Stdout,
    File(PathBuf),
    /// Caller-managed stream, kept open across dumps until `close`
    Stream {
        label: String,
        writer: Option<BoxedWriter>,
    },
}

/// Writes the header and one weight record per dump.
///
/// File destinations are truncated, written, flushed and closed on every dump
/// so each one is a complete, self-contained file. Standard output is flushed
/// but never closed.
pub struct DumpSink {
    target: Target,
}

impl DumpSink {
    pub fn new(destination: Destination) -> Self {
        let target = match destination {
            Destination::Stdout => Target::Stdout,
            Destination::File(path) => Target::File(path),
        };
        Self { target }
    }

    /// Dump into an already-open stream. It is flushed after every dump and
    /// shut down only by `close`.
    pub fn from_stream(label: impl Into<String>, writer: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            target: Target::Stream {
                label: label.into(),
                writer: Some(Box::new(writer)),
            },
        }
    }

    pub fn describe(&self) -> String {
        match &self.target {
            Target::Stdout => Destination::Stdout.to_string(),
            Target::File(path) => path.display().to_string(),
            Target::Stream { label, .. } => label.clone(),
        }
    }

    /// Dump `weight` stamped with `captured_at`, or local now
    pub async fn dump_weight(
        &mut self,
        weight: f64,
        captured_at: Option<NaiveDateTime>,
    ) -> Result<DumpRecord, DomainError> {
        let captured_at = captured_at.unwrap_or_else(|| Local::now().naive_local());
        let record = DumpRecord::new(weight, captured_at);
        self.dump(&record).await?;
        Ok(record)
    }

    pub async fn dump(&mut self, record: &DumpRecord) -> Result<(), DomainError> {
        let destination = self.describe();
        let payload = record.render();

        debug!(destination = %destination, weight = record.weight, timestamp = %record.timestamp(), "Writing dump");

        let result = match &mut self.target {
            Target::Stdout => {
                let mut stdout = tokio::io::stdout();
                write_payload(&mut stdout, &payload).await
            }
            Target::File(path) => match File::create(path.as_path()).await {
                // Dropping the handle closes the file once flushed.
                Ok(mut file) => write_payload(&mut file, &payload).await,
                Err(e) => Err(e),
            },
            Target::Stream { writer, .. } => match writer.as_mut() {
                Some(writer) => write_payload(writer, &payload).await,
                None => Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "stream already closed",
                )),
            },
        };

        match result {
            Ok(()) => {
                info!(destination = %destination, weight = record.weight, "Weight dumped");
                Ok(())
            }
            Err(e) => {
                error!(destination = %destination, error = %e, "Failed to write dump");
                Err(DomainError::SinkWrite {
                    destination,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Flush and release the destination. Standard output is only flushed.
    /// Safe to call more than once.
    pub async fn close(&mut self) -> Result<(), DomainError> {
        let destination = self.describe();
        let result = match &mut self.target {
            Target::Stdout => tokio::io::stdout().flush().await,
            Target::File(_) => Ok(()),
            Target::Stream { writer, .. } => match writer.take() {
                Some(mut writer) => match writer.flush().await {
                    Ok(()) => writer.shutdown().await,
                    Err(e) => Err(e),
                },
                None => Ok(()),
            },
        };

        result.map_err(|e| {
            error!(destination = %destination, error = %e, "Failed to close destination");
            DomainError::SinkWrite {
                destination,
                reason: e.to_string(),
            }
        })
    }
}

async fn write_payload<W>(writer: &mut W, payload: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(payload.as_bytes()).await?;
    writer.flush().await
}
