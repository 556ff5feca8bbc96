use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use domain::scale::ProtocolVariant;
use domain::sink::parse_timestamp;
use infrastructure::config::AgentConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serial scale weight capture", long_about = None)]
pub struct Cli {
    /// Path to config directory
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: String,

    /// Verbose diagnostics
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the weight comes from
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Serial device (`COM3`, `/dev/ttyS0`) or `auto` to probe candidates
    #[arg(long)]
    pub port: Option<String>,

    /// Wire format: fibra (0) or geotextil (1)
    #[arg(long)]
    pub protocol: Option<ProtocolVariant>,

    /// Replay a recorded capture instead of opening a port
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current stable weight, or nothing
    Capture {
        #[command(flatten)]
        source: SourceArgs,

        /// Read timeout override in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Write a weight record without touching the scale
    Dump {
        #[arg(allow_negative_numbers = true)]
        weight: f64,

        /// File path, or `-` for standard output
        #[arg(long)]
        destination: Option<String>,

        /// YYYYMMDDHHmm, defaults to local now
        #[arg(long, value_parser = parse_timestamp_arg)]
        timestamp: Option<NaiveDateTime>,
    },

    /// Capture once and dump the result
    Run {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long)]
        destination: Option<String>,
    },

    /// Capture and dump every interval until Ctrl+C
    Daemon {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long)]
        destination: Option<String>,

        /// Seconds between captures
        #[arg(long)]
        interval: Option<u64>,

        /// Read each frame twice and discard disagreeing pairs
        #[arg(long)]
        consistency_check: bool,
    },
}

fn parse_timestamp_arg(s: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(s).map_err(|e| format!("expected YYYYMMDDHHmm: {e}"))
}

impl SourceArgs {
    fn apply(&self, config: &mut AgentConfig) {
        if let Some(port) = &self.port {
            config.port = Some(port.clone());
        }
        if let Some(protocol) = self.protocol {
            config.protocol = protocol;
        }
    }
}

impl Cli {
    /// Override configuration values with the flags given on the command line
    pub fn apply(&self, config: &mut AgentConfig) {
        config.debug |= self.debug;

        match &self.command {
            Command::Capture { source, timeout_ms } => {
                source.apply(config);
                if timeout_ms.is_some() {
                    config.timeout_ms = *timeout_ms;
                }
            }
            Command::Dump { destination, .. } => {
                if destination.is_some() {
                    config.destination = destination.clone();
                }
            }
            Command::Run {
                source,
                destination,
            } => {
                source.apply(config);
                if destination.is_some() {
                    config.destination = destination.clone();
                }
            }
            Command::Daemon {
                source,
                destination,
                interval,
                consistency_check,
            } => {
                source.apply(config);
                if destination.is_some() {
                    config.destination = destination.clone();
                }
                if let Some(interval) = interval {
                    config.interval_secs = *interval;
                }
                config.consistency_check |= *consistency_check;
            }
        }
    }

    /// Recorded capture to read from, if any
    pub fn replay(&self) -> Option<&PathBuf> {
        match &self.command {
            Command::Capture { source, .. }
            | Command::Run { source, .. }
            | Command::Daemon { source, .. } => source.replay.as_ref(),
            Command::Dump { .. } => None,
        }
    }
}
