use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Line terminator emitted by both display models.
pub const FRAME_DELIMITER: u8 = b'\r';

/// Wire format emitted by the scale display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVariant {
    /// `<stability> <status> <weight>` frames, continuous output
    #[default]
    #[serde(alias = "0")]
    Fibra,
    /// Bare weight token with comma decimals, answers only when polled
    #[serde(alias = "1")]
    Geotextil,
}

impl ProtocolVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fibra => "fibra",
            Self::Geotextil => "geotextil",
        }
    }

    /// Read timeout used when the capture layer opens the port itself.
    ///
    /// GEOTEXTIL blocks until the display answers.
    pub fn default_timeout(&self) -> Option<Duration> {
        match self {
            Self::Fibra => Some(Duration::from_millis(500)),
            Self::Geotextil => None,
        }
    }

    /// Frame that decodes to "no value" under this variant. Returned when two
    /// consecutive frames disagree.
    pub fn null_frame(&self) -> &'static [u8] {
        match self {
            Self::Fibra => b"3 ERRSYNC 0",
            Self::Geotextil => b"",
        }
    }
}

impl fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolVariant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fibra" | "0" => Ok(Self::Fibra),
            "geotextil" | "1" => Ok(Self::Geotextil),
            other => Err(DomainError::InvalidConfig(format!(
                "Unknown protocol '{other}' (expected fibra/0 or geotextil/1)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        assert_eq!(
            ProtocolVariant::Fibra.default_timeout(),
            Some(Duration::from_millis(500))
        );
        assert_eq!(ProtocolVariant::Geotextil.default_timeout(), None);
    }

    #[test]
    fn test_parse_names_and_numeric_codes() {
        assert_eq!("fibra".parse::<ProtocolVariant>().unwrap(), ProtocolVariant::Fibra);
        assert_eq!("GEOTEXTIL".parse::<ProtocolVariant>().unwrap(), ProtocolVariant::Geotextil);
        assert_eq!("0".parse::<ProtocolVariant>().unwrap(), ProtocolVariant::Fibra);
        assert_eq!("1".parse::<ProtocolVariant>().unwrap(), ProtocolVariant::Geotextil);
        assert!("2".parse::<ProtocolVariant>().is_err());
    }

    #[test]
    fn test_serde_lowercase_and_alias() {
        let v: ProtocolVariant = serde_json::from_str("\"geotextil\"").unwrap();
        assert_eq!(v, ProtocolVariant::Geotextil);
        let v: ProtocolVariant = serde_json::from_str("\"0\"").unwrap();
        assert_eq!(v, ProtocolVariant::Fibra);
        assert_eq!(serde_json::to_string(&ProtocolVariant::Fibra).unwrap(), "\"fibra\"");
    }
}
