use domain::driver::{ReadMode, ScaleConnection};
use domain::scale::{FRAME_DELIMITER, ProtocolVariant, RawFrame};

/// How frames are pulled off a connection, fixed per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStrategy {
    /// Read up to the delimiter byte, bounded by the connection timeout
    Delimited(u8),
    /// Read one native line and require it to be valid UTF-8 text
    TextLine,
}

impl FrameStrategy {
    pub fn for_mode(mode: ReadMode) -> Self {
        if mode.supports_delimiter() {
            Self::Delimited(FRAME_DELIMITER)
        } else {
            Self::TextLine
        }
    }
}

/// Reads one frame per call from an open connection.
///
/// Never fails: unreadable connections and undecodable lines produce an empty
/// frame so the next poll can resynchronise. After each read the connection's
/// pending input is discarded.
#[derive(Debug, Clone)]
pub struct FrameReader {
    variant: ProtocolVariant,
    strategy: FrameStrategy,
    consistency_check: bool,
}

impl FrameReader {
    pub fn new(variant: ProtocolVariant, mode: ReadMode) -> Self {
        Self {
            variant,
            strategy: FrameStrategy::for_mode(mode),
            consistency_check: false,
        }
    }

    pub fn for_connection(variant: ProtocolVariant, connection: &dyn ScaleConnection) -> Self {
        Self::new(variant, connection.read_mode())
    }

    /// Opt-in: read a second frame and report a null reading when it differs
    /// from the first. Off by default.
    pub fn with_consistency_check(mut self, enabled: bool) -> Self {
        self.consistency_check = enabled;
        self
    }

    pub fn strategy(&self) -> FrameStrategy {
        self.strategy
    }

    pub async fn read_frame(&self, connection: &mut dyn ScaleConnection) -> RawFrame {
        let frame = self.read_once(connection).await;
        if !self.consistency_check {
            return frame;
        }

        let confirmation = self.read_once(connection).await;
        if confirmation == frame {
            frame
        } else {
            tracing::warn!(
                port = %connection.name(),
                first = %frame,
                second = %confirmation,
                "Consecutive frames disagree, reporting null reading"
            );
            RawFrame::from(self.variant.null_frame())
        }
    }

    async fn read_once(&self, connection: &mut dyn ScaleConnection) -> RawFrame {
        let frame = match self.strategy {
            FrameStrategy::Delimited(delimiter) => match connection.read_until(delimiter).await {
                Ok(bytes) => RawFrame::new(bytes),
                Err(e) => {
                    tracing::debug!(port = %connection.name(), error = %e, "Frame read failed");
                    RawFrame::empty()
                }
            },
            FrameStrategy::TextLine => match connection.read_line().await {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => RawFrame::new(text.into_bytes()),
                    Err(_) => {
                        tracing::debug!(port = %connection.name(), "Dropping undecodable line");
                        RawFrame::empty()
                    }
                },
                Err(e) => {
                    tracing::debug!(port = %connection.name(), error = %e, "Line read failed");
                    RawFrame::empty()
                }
            },
        };

        if connection.is_open() {
            if let Err(e) = connection.clear_input().await {
                tracing::debug!(port = %connection.name(), error = %e, "Failed to discard stale input");
            }
        }

        tracing::trace!(port = %connection.name(), frame = %frame, "Frame read");
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_follows_capability() {
        assert_eq!(
            FrameStrategy::for_mode(ReadMode::Delimited),
            FrameStrategy::Delimited(b'\r')
        );
        assert_eq!(
            FrameStrategy::for_mode(ReadMode::LineOnly),
            FrameStrategy::TextLine
        );
    }

    #[test]
    fn test_consistency_check_defaults_off() {
        let reader = FrameReader::new(ProtocolVariant::Fibra, ReadMode::Delimited);
        assert!(!reader.consistency_check);
        assert!(reader.with_consistency_check(true).consistency_check);
    }
}
