// src/main.rs - command line front end for the printer client
use clap::{Parser, Subcommand};

use btspool::config::{self, Config, ConfigError};
use btspool::transport::Connector;
use btspool::{ConnectionSupervisor, SERIAL_PORT_PROFILE_UUID};

#[derive(Parser)]
#[command(name = "btspool", about = "Print text receipts to a Bluetooth SPP printer")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "printer.toml")]
    config: String,

    /// Printer address (overrides the configuration file)
    #[arg(short, long)]
    address: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect, print the given text (or stdin when omitted), disconnect
    Print { text: Vec<String> },
    /// Connect to the printer and report the link state
    Check,
}

#[cfg(target_os = "linux")]
fn connector(channel: u8) -> Result<Box<dyn Connector>, Box<dyn std::error::Error + Send + Sync>> {
    Ok(Box::new(btspool::transport::rfcomm::RfcommConnector::new(
        channel,
    )))
}

#[cfg(not(target_os = "linux"))]
fn connector(_channel: u8) -> Result<Box<dyn Connector>, Box<dyn std::error::Error + Send + Sync>> {
    Err("RFCOMM transport is only available on Linux".into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let mut config = match config::load_config(&cli.config) {
        Ok(config) => config,
        // No config file is fine as long as the address came in by flag.
        Err(ConfigError::Io(_)) if cli.address.is_some() => Config::default(),
        Err(e) => {
            tracing::error!("Failed to load config from '{}': {}", cli.config, e);
            return Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>);
        }
    };
    if let Some(address) = cli.address {
        config.device.address = address;
    }
    config.validate().map_err(|e| {
        tracing::error!("{}", e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    if config.printer.name.is_empty() {
        tracing::info!("Printer: {}", config.device.address);
    } else {
        tracing::info!("Printer: {} ({})", config.printer.name, config.device.address);
    }
    tracing::info!(
        "RFCOMM channel {} (SPP service {}), connect timeout {}s",
        config.device.channel,
        SERIAL_PORT_PROFILE_UUID,
        config.device.connect_timeout_secs
    );

    let supervisor = ConnectionSupervisor::new(
        connector(config.device.channel)?,
        config.connect_timeout(),
    );

    match cli.command {
        Command::Check => {
            supervisor.connect(&config.device.address).await?;
            tracing::info!("Link state: {:?}", supervisor.state().await);
        }
        Command::Print { text } => {
            supervisor.connect(&config.device.address).await?;
            let payload = if text.is_empty() {
                std::io::read_to_string(std::io::stdin())?
            } else {
                let mut joined = text.join(" ");
                joined.push('\n');
                joined
            };
            let handle = supervisor.print(&payload).await?;
            match handle.await {
                Ok(Ok(())) => tracing::info!("Receipt delivered"),
                Ok(Err(e)) => {
                    tracing::error!("Print failed: {}", e);
                    supervisor.shutdown().await;
                    return Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>);
                }
                Err(_) => return Err("print worker stopped unexpectedly".into()),
            }
        }
    }

    supervisor.shutdown().await;
    Ok(())
}
