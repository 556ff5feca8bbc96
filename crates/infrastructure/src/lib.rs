//! Infrastructure layer - Serial ports, framing, decoding and destinations

pub mod config;
pub mod drivers;
pub mod framing;
pub mod protocol;
pub mod sink;

pub use config::AgentConfig;
pub use drivers::{PortOpener, PortResolver, ReplayConnection, SerialConnection, SerialPortOpener};
pub use framing::{FrameReader, FrameStrategy};
pub use protocol::{DecoderFactory, FibraDecoder, GeotextilDecoder, decode};
pub use sink::{Destination, DumpSink};
