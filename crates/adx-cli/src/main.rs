//! ADX gateway CLI.
//!
//! Commands: serve (stdio MCP server), config (print redacted configuration)

use std::sync::Arc;

use clap::Parser;

use adx_client::KustoClient;
use adx_core::{ConfigField, ConfigSnapshot, GatewayConfig};
use adx_mcp::RemoteHandle;

#[derive(Parser)]
#[command(name = "adx")]
#[command(version)]
#[command(about = "Azure Data Explorer gateway over MCP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the MCP protocol on stdio
    Serve,
    /// Print the gateway configuration with the secret redacted
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => serve().await,
        Some(Commands::Config) => {
            print_config();
            Ok(())
        }
        None => {
            println!(
                "adx v{} — Azure Data Explorer gateway over MCP",
                env!("CARGO_PKG_VERSION")
            );
            println!("Run `adx --help` for usage.");
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for MCP JSON-RPC.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("starting adx gateway v{}", env!("CARGO_PKG_VERSION"));

    // A failed configuration leaves the handle unconnected and the server
    // still starts; remote-dependent calls then fail individually.
    let handle = match GatewayConfig::from_env() {
        Ok(config) => match KustoClient::new(&config) {
            Ok(client) => {
                tracing::info!(cluster = %client.cluster_url(), "application-key client ready");
                RemoteHandle::connected(Arc::new(client))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to construct ADX client");
                RemoteHandle::unconnected()
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "configuration invalid; serving without a remote client");
            RemoteHandle::unconnected()
        }
    };

    adx_mcp::serve_stdio(handle).await
}

fn print_config() {
    let snapshot = ConfigSnapshot::from_env();
    for field in ConfigField::ALL {
        println!("{}: {}", field.label(), snapshot.display_value(field));
    }
}
