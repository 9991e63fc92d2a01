//! # Kedai
//!
//! Loads configuration, connects to Redis and listens on the configured
//! channels until Ctrl+C or SIGTERM.

use kedai_app::app::App;
use kedai_app::startup::print_banner;
use kedai_config::ConfigLoader;
use kedai_core::telemetry::init_tracing;
use kedai_core::KedaiResult;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Tracing is not initialised when configuration fails to load
        eprintln!("Application error [{}]: {}", e.error_code(), e);
        std::process::exit(1);
    }
}

async fn run() -> KedaiResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_tracing(&config.observability)?;
    print_banner();
    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));

    let app = App::start(config).await?;

    shutdown_signal().await;

    app.shutdown().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
