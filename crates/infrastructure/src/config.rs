use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use domain::scale::ProtocolVariant;
use serde::{Deserialize, Serialize};

use crate::sink::Destination;

/// Device identifier that asks the resolver to probe the candidate ports
pub const AUTO_PORT: &str = "auto";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AgentConfig {
    /// `COMn`, a device path, `auto`, or unset for no hardware
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub protocol: ProtocolVariant,
    /// File path or `-`; unset writes to standard output
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Read timeout override, otherwise the protocol default applies
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub consistency_check: bool,
    /// Append logs here instead of stderr. Unset by default; `toodles.log`
    /// matches the legacy station setup.
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_interval_secs() -> u64 {
    5
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            port: None,
            protocol: ProtocolVariant::default(),
            destination: None,
            interval_secs: default_interval_secs(),
            timeout_ms: None,
            debug: false,
            consistency_check: false,
            log_file: None,
        }
    }
}

impl AgentConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("protocol", "fibra")?
            .set_default("interval_secs", default_interval_secs() as i64)?
            .set_default("debug", false)?
            .set_default("consistency_check", false)?
            // Local config file, e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. SCALE__PORT=/dev/ttyUSB0)
            .add_source(Environment::with_prefix("SCALE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Port to open: `Some(None)` probes candidates, `None` means no hardware
    pub fn device(&self) -> Option<Option<&str>> {
        match self.port.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(p) if p.eq_ignore_ascii_case(AUTO_PORT) => Some(None),
            Some(p) => Some(Some(p)),
        }
    }

    pub fn destination(&self) -> Destination {
        Destination::from_arg(self.destination.as_deref())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
