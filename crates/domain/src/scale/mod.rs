mod frame;
mod protocol;
mod stability;

pub use frame::RawFrame;
pub use protocol::{FRAME_DELIMITER, ProtocolVariant};
pub use stability::StabilityCode;

/// A weight captured from the scale display.
///
/// `None` means the display did not report a stable, non-null value (or the
/// frame could not be read). The capture timestamp is attached only when the
/// reading is dumped.
pub type WeightReading = Option<f64>;
