/// Read capability of an open connection, fixed when it is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadMode {
    /// Reads up to an arbitrary delimiter byte, bounded by the read timeout
    Delimited,
    /// Only exposes reads of one native (`\n` terminated) line
    LineOnly,
}

impl ReadMode {
    pub fn supports_delimiter(&self) -> bool {
        matches!(self, Self::Delimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_mode_capabilities() {
        assert!(ReadMode::Delimited.supports_delimiter());
        assert!(!ReadMode::LineOnly.supports_delimiter());
    }
}
