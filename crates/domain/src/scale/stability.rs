use std::fmt;

use serde::{Deserialize, Serialize};

/// First field of a FIBRA frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityCode {
    /// `0`: weight still settling
    Unstable,
    /// `2`: weight settled
    Stable,
    /// `3`: nothing on the platform / no weight
    Null,
}

impl StabilityCode {
    /// Map the raw token to a code. Unknown markers return `None`.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        match token {
            b"0" => Some(Self::Unstable),
            b"2" => Some(Self::Stable),
            b"3" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable)
    }
}

impl fmt::Display for StabilityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unstable => "unstable",
            Self::Stable => "stable",
            Self::Null => "null",
        };
        f.write_str(s)
    }
}
