//! Main entry point for the game ranking service
//!
//! Initializes configuration and logging, then serves the ranking API until
//! a shutdown signal arrives.

use anyhow::Result;
use clap::Parser;
use game_ranking::config::{validate_config, AppConfig, StorageBackend};
use game_ranking::service::{AppState, HealthCheck, HealthStatus};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

/// Game Ranking Service - play-count rankings with manual overrides
#[derive(Parser)]
#[command(
    name = "game-ranking",
    version,
    about = "Stores game metadata and keeps play-count rankings with manual overrides",
    long_about = "Game Ranking keeps a dense ranking over a catalogue of games, derived from \
                 play counts with recency tie-breaks. Admins can pin games to fixed ranks; \
                 every mutation re-ranks and persists the whole collection as one JSON document."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Perform health check and exit
    #[arg(long, help = "Check that the game store is readable and exit with status code")]
    health_check: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP port override
    #[arg(long, value_name = "PORT", help = "Override HTTP server port")]
    http_port: Option<u16>,

    /// Data path override
    #[arg(long, value_name = "PATH", help = "Override the JSON collection path")]
    data_path: Option<PathBuf>,

    /// Use the in-memory store
    #[arg(long, help = "Keep the collection in memory instead of on disk")]
    memory: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Perform health check and return appropriate exit code
async fn perform_health_check(config: AppConfig) -> Result<()> {
    info!("Performing health check...");

    let app_state = AppState::new(config).await?;
    let health = HealthCheck::check(
        app_state.ranking_service(),
        &app_state.config().service.name,
    )
    .await;

    println!("Health Check: {}", health.status);
    if let Some(stats) = &health.stats {
        println!("  Games: {}", stats.total_games);
        println!("  Active Games: {}", stats.active_games);
        println!("  Total Plays: {}", stats.total_plays);
    }
    for check in &health.checks {
        if let Some(message) = &check.message {
            println!("  {}: {}", check.name, message);
        }
    }

    if health.status == HealthStatus::Healthy {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("🚀 Game Ranking Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   HTTP: {}", config.bind_address());
    info!("   Storage: {}", config.storage.backend);
    if config.storage.backend == StorageBackend::File {
        info!("   Data path: {}", config.storage.data_path.display());
    }
    info!(
        "   Top limit: {} (max {})",
        config.ranking.default_top_limit, config.ranking.max_top_limit
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(http_port) = args.http_port {
        config.service.http_port = http_port;
    }

    if let Some(data_path) = &args.data_path {
        config.storage.backend = StorageBackend::File;
        config.storage.data_path = data_path.clone();
    }

    if args.memory {
        config.storage.backend = StorageBackend::Memory;
    }

    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.health_check {
        return perform_health_check(config).await;
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown_timeout = config.shutdown_timeout();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown = async move {
        let _ = shutdown_rx.await;
    };

    let signal_task = tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("🛑 Shutdown signal received, draining in-flight requests...");
        let _ = shutdown_tx.send(());
        tokio::time::sleep(shutdown_timeout).await;
        warn!("⚠️  Shutdown timeout exceeded, forcing exit");
        std::process::exit(1);
    });

    info!("✅ Game Ranking Service is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    if let Err(e) = app_state.serve(shutdown).await {
        error!("Service failed: {}", e);
        std::process::exit(1);
    }

    signal_task.abort();
    info!("🛑 Game Ranking Service stopped");
    Ok(())
}
