//! Office network gate
//!
//! Serves an allow-list gated API in front of the office application.

use clap::Parser;
use office_gate::{
    access_control::AccessGate,
    config::{LogFormat, LoggingConfig, load_config},
    server::{HttpConfig, build_router, run_http_blocking},
    store::create_policy_store,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Office network gate - allow-list access control for HTTP services
#[derive(Parser, Debug)]
#[command(name = "office-gate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "OFFICE_GATE_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error), overrides logging.level
    #[arg(long, env = "OFFICE_GATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// HTTP server host, overrides server.host
    #[arg(long, env = "OFFICE_GATE_HOST")]
    host: Option<String>,

    /// HTTP server port, overrides server.port
    #[arg(long, env = "OFFICE_GATE_PORT")]
    port: Option<u16>,
}

fn init_logging(config: &LoggingConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(config.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up OFFICE_GATE_* variables from a local .env file, if any
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Initialize logging
    init_logging(&config.logging, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting office network gate"
    );

    // Create policy store
    let store = create_policy_store(&config.policy);
    info!(
        store = store.store_type(),
        loopback_bypass = config.gate.loopback_bypass,
        "Policy store ready"
    );

    // Create the gate
    let gate = Arc::new(
        AccessGate::from_config(store, &config.gate)
            .inspect_err(|e| error!(error = %e, "Failed to create access gate"))?,
    );

    let http_config = HttpConfig::from_server_config(&config.server)
        .inspect_err(|e| error!(error = %e, "Invalid server address"))?;

    run_http_blocking(build_router(gate), http_config).await?;

    Ok(())
}
