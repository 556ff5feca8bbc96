use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::info;

use domain::sink::format_weight;
use infrastructure::config::AgentConfig;
use scale_agent::cli::{Cli, Command};
use scale_agent::{commands, logging};

async fn run() -> Result<()> {
    dotenv().ok();

    let args = Cli::parse();

    let mut config = AgentConfig::load(&args.config_dir)
        .with_context(|| format!("Failed to load configuration from {}", args.config_dir))?;
    args.apply(&mut config);

    logging::init(config.debug, config.log_file.as_deref())?;
    info!(
        port = ?config.port,
        protocol = %config.protocol,
        destination = %config.destination(),
        "Configuration loaded"
    );

    let replay = args.replay().map(|p| p.as_path());
    let resolver = commands::serial_resolver();

    match &args.command {
        Command::Capture { .. } => {
            if let Some(weight) = commands::capture(&config, resolver, replay).await? {
                println!("{}", format_weight(weight));
            }
        }
        Command::Dump {
            weight, timestamp, ..
        } => {
            commands::dump(&config, *weight, *timestamp).await?;
        }
        Command::Run { .. } => {
            commands::run_once(&config, resolver, replay).await?;
        }
        Command::Daemon { .. } => {
            let token = CancellationToken::new();
            commands::cancel_on_ctrl_c(token.clone());
            eprintln!("Press Ctrl+C to stop");

            let stats = commands::daemon(&config, resolver, replay, token).await?;
            info!(cycles = stats.cycles, dumped = stats.dumped, "👋 Good bye!");
        }
    }

    Ok(())
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run()) {
        eprintln!("\n❌ CRITICAL ERROR: {:?}", e);
        std::process::exit(1);
    }
}
