//! service-gateway
//!
//! Reads named routes (a path prefix mapped to one backend) and forwards
//! every matching request to its backend.
//!
//! ```text
//!   Client ──▶ listener ──▶ dispatcher ──▶ forwarding handler ──▶ bound proxy ──▶ Backend
//!                            (longest       (strip context,       (rewrite URI,
//!                             prefix)        log URL)              observe response)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use service_gateway::config::load_config;
use service_gateway::observability::logging::init_logging;
use service_gateway::{GatewayError, GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "service-gateway")]
#[command(about = "Configuration-driven HTTP reverse proxy gateway", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "default.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway terminated");
            eprintln!("service-gateway: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), GatewayError> {
    let loaded = load_config(&cli.config)?;
    init_logging(&loaded.settings.observability);
    loaded.log_source();

    let settings = loaded.settings;

    // Routes are bound before the listener so a bad target never serves.
    let bind_address = settings.gateway.bind_address();
    let server = GatewayServer::new(settings)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| GatewayError::Bind {
            addr: bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let _signals = shutdown.trigger_on_signal();

    server.run(listener, server_shutdown).await.map_err(GatewayError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
