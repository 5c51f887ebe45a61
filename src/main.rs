use std::sync::Arc;

use tracing::{error, info, warn};

use dailydigest::{digest, AppContext, Config, Database, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = dailydigest::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        dailydigest::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> dailydigest::Result<()> {
    config.validate()?;

    info!("Daily Digest starting");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let db = Database::open(&config.database.path).await?;
    let server_config = config.server.clone();
    let scheduler_enabled = config.scheduler.enabled;

    let ctx = Arc::new(AppContext::from_config(config, db)?);

    let scheduler = if scheduler_enabled {
        Some(digest::start_scheduler(Arc::clone(&ctx)))
    } else {
        warn!("Scheduler disabled, digests will only be sent via /trigger");
        None
    };

    let server = WebServer::new(&server_config, ctx)?;
    server.run(shutdown_signal()).await?;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    info!("Daily Digest stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
