mod replay;
mod resolver;
mod serial;

pub use replay::ReplayConnection;
pub use resolver::{POSIX_CANDIDATES, PortResolver, WINDOWS_CANDIDATES, default_candidates};
pub use serial::{SerialConnection, SerialPortOpener, SerialSettings};

use std::time::Duration;

use async_trait::async_trait;
use domain::DomainError;
use domain::driver::ScaleConnection;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Opens a single device by identifier
#[async_trait]
pub trait PortOpener: Send + Sync {
    async fn open(
        &self,
        device: &str,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn ScaleConnection>, DomainError>;
}

/// Byte-at-a-time read up to and including `delimiter`, or until EOF.
///
/// Bytes are appended to `buf` as they arrive so a cancelled call leaves the
/// partial frame behind.
async fn read_until_byte<R>(reader: &mut R, delimiter: u8, buf: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte).await? == 0 {
            return Ok(());
        }
        buf.push(byte[0]);
        if byte[0] == delimiter {
            return Ok(());
        }
    }
}

/// `read_until_byte` bounded by `timeout`. When the timeout elapses the bytes
/// gathered so far are returned, possibly none. `None` waits forever.
pub(crate) async fn bounded_read_until<R>(
    reader: &mut R,
    delimiter: u8,
    timeout: Option<Duration>,
) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = Vec::new();
    let result = match timeout {
        Some(limit) => {
            match tokio::time::timeout(limit, read_until_byte(reader, delimiter, &mut buf)).await {
                Ok(read) => read,
                Err(_elapsed) => Ok(()),
            }
        }
        None => read_until_byte(reader, delimiter, &mut buf).await,
    };
    result.map(|_| buf)
}
