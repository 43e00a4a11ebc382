mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use mealflow_gateway::{start_server, GatewayState};
use mealflow_store::SqliteOrderStore;

use config::Config;

#[derive(Parser)]
#[command(name = "mealflow")]
#[command(about = "Mealflow — food-ordering assistant fulfillment backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the fulfillment webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    println!("mealflow is up: {}", resp.text().await?);
                }
                Err(_) => {
                    println!("mealflow is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        db = %config.db_path,
        "Starting Mealflow gateway"
    );

    let store = SqliteOrderStore::open(&config.db_path)?;
    store.seed_default_menu().await?;

    let state = GatewayState::new(Arc::new(store));
    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port).parse()?;
    start_server(addr, state).await
}
