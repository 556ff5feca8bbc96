use crate::error::DecodeError;
use crate::scale::{ProtocolVariant, RawFrame};

/// Turns one raw frame into a weight.
///
/// Implementations never block. Every failure, including unstable or null
/// readings, is reported as a `DecodeError`.
pub trait FrameDecoder: Send + Sync {
    fn variant(&self) -> ProtocolVariant;

    fn parse(&self, frame: &RawFrame) -> Result<f64, DecodeError>;
}
