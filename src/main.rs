use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use issuer_id::{Config, LogFormat, build_router, metrics, utils};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; the subscriber needs the config.
            eprintln!("Configuration error: {e}");
            return ExitCode::from(exitcode::CONFIG as u8);
        }
    };

    init_tracing(&config);

    info!(
        "Starting issuer ID demo server v{}",
        env!("CARGO_PKG_VERSION")
    );

    match run(config).await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Run the server, returning an exit code on error.
async fn run(config: Config) -> Result<(), exitcode::ExitCode> {
    info!(
        host = %config.host,
        port = %config.port,
        log_format = %config.log_format,
        metrics_port = config.metrics_port,
        "Configuration loaded"
    );

    if let Some(metrics_addr) = config.metrics_addr() {
        metrics::try_init_metrics(metrics_addr);
    } else {
        info!("Metrics disabled (METRICS_PORT=0)");
    }

    let app = build_router();

    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        error!("Invalid server address: {e}");
        exitcode::CONFIG
    })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET  /health  - Health check");
    info!("  GET  /whoami  - Issuer ID of the calling request");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {e}");
            exitcode::SOFTWARE
        })?;

    info!("Server shutdown complete");
    Ok(())
}
