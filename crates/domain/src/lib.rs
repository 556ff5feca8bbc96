//! Domain layer - Scale capture model with no hardware dependencies
//!
//! This crate contains:
//! - Value Objects (ProtocolVariant, StabilityCode, RawFrame, DumpRecord)
//! - Connection seams (ScaleConnection, ConnectionResolver)
//! - Decoder seam (FrameDecoder)
//! - Errors
//!
//! Principles:
//! - No dependencies on serial ports, files or the runtime
//! - Decoding rules live next to the types they produce
//! - Testable in isolation

pub mod decoder;
pub mod driver;
pub mod error;
pub mod scale;
pub mod sink;

// Re-export commonly used types
pub use decoder::FrameDecoder;
pub use driver::{ConnectionResolver, ReadMode, ScaleConnection};
pub use error::{DecodeError, DomainError};
pub use scale::{ProtocolVariant, RawFrame, StabilityCode, WeightReading};
pub use sink::DumpRecord;
