use std::time::Duration;

use async_trait::async_trait;
use domain::DomainError;
use domain::driver::{ReadMode, ScaleConnection};
use tokio::io::AsyncWriteExt;
use tokio_serial::{
    ClearBuffer, DataBits, Parity, SerialPort, SerialPortBuilderExt, SerialStream, StopBits,
};

use super::{PortOpener, bounded_read_until};

/// Line settings shared by both scale displays: 9600 baud, 8N1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Windows needs the `\\.\COMn` form for COM10 and above, and it is accepted
/// for every port.
fn normalize_port_name(port: &str) -> String {
    if cfg!(target_os = "windows") && !port.to_uppercase().starts_with(r"\\.\") {
        format!(r"\\.\{}", port)
    } else {
        port.to_string()
    }
}

/// An open serial port. Supports delimiter reads.
pub struct SerialConnection {
    name: String,
    port: Option<SerialStream>,
    timeout: Option<Duration>,
}

impl SerialConnection {
    /// Open `port` with `settings`. Must run inside the tokio runtime.
    pub fn open(
        port: &str,
        settings: &SerialSettings,
        timeout: Option<Duration>,
    ) -> Result<Self, DomainError> {
        let port_name = normalize_port_name(port);

        tracing::debug!(
            port = %port_name,
            baud_rate = settings.baud_rate,
            "Opening serial port"
        );

        let stream = tokio_serial::new(&port_name, settings.baud_rate)
            .data_bits(settings.data_bits)
            .parity(settings.parity)
            .stop_bits(settings.stop_bits)
            .open_native_async()
            .map_err(|e| {
                tracing::debug!(port = %port_name, error = %e, "Failed to open serial port");
                DomainError::PortUnavailable {
                    port: port.to_string(),
                    reason: e.to_string(),
                }
            })?;

        tracing::info!(port = %port, "Serial port opened");
        Ok(Self {
            name: port.to_string(),
            port: Some(stream),
            timeout,
        })
    }

    fn stream(&mut self) -> Result<&mut SerialStream, DomainError> {
        let name = &self.name;
        self.port
            .as_mut()
            .ok_or_else(|| DomainError::NotOpen(name.clone()))
    }
}

#[async_trait]
impl ScaleConnection for SerialConnection {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_mode(&self) -> ReadMode {
        ReadMode::Delimited
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    async fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>, DomainError> {
        let timeout = self.timeout;
        let stream = self.stream()?;
        bounded_read_until(stream, delimiter, timeout)
            .await
            .map_err(|e| DomainError::FrameRead(e.to_string()))
    }

    async fn read_line(&mut self) -> Result<Vec<u8>, DomainError> {
        self.read_until(b'\n').await
    }

    async fn clear_input(&mut self) -> Result<(), DomainError> {
        let stream = self.stream()?;
        stream
            .clear(ClearBuffer::Input)
            .map_err(|e| DomainError::FrameRead(format!("Failed to clear input: {}", e)))
    }

    async fn close(&mut self) -> Result<(), DomainError> {
        if let Some(mut stream) = self.port.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::warn!(port = %self.name, error = %e, "Error shutting down serial port");
            }
            tracing::info!(port = %self.name, "Serial port closed");
        }
        Ok(())
    }
}

/// Opens real serial devices with the fixed line settings
#[derive(Debug, Clone, Default)]
pub struct SerialPortOpener {
    settings: SerialSettings,
}

impl SerialPortOpener {
    pub fn new(settings: SerialSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PortOpener for SerialPortOpener {
    async fn open(
        &self,
        device: &str,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn ScaleConnection>, DomainError> {
        let connection = SerialConnection::open(device, &self.settings, timeout)?;
        Ok(Box::new(connection))
    }
}
