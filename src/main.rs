//! Travel tour API entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use travel_tour_api::api::{create_router, with_frontend, AppState};
use travel_tour_api::config::{Config, StoreBackend};
use travel_tour_api::metrics;
use travel_tour_api::tour::{MemoryTourStore, MongoTourStore, TourService, TourStore};
use travel_tour_api::utils::shutdown_signal;

/// REST API for a travel tour catalogue.
#[derive(Parser, Debug)]
#[command(name = "travel-tour-api")]
#[command(about = "CRUD REST service for travel tour offerings")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Persistence backend (overrides STORE_BACKEND).
    #[arg(long)]
    store: Option<StoreBackend>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Persistence backend (overrides STORE_BACKEND).
        #[arg(long)]
        store: Option<StoreBackend>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let config = Config::load();

    // Initialize logging
    let (log_json, log_level) = match &config {
        Ok(c) => (c.log_json, c.rust_log.clone()),
        Err(_) => (false, "info".to_string()),
    };
    let filter = if args.verbose {
        EnvFilter::new("travel_tour_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with((!log_json).then(fmt::layer))
        .with(log_json.then(|| fmt::layer().json()))
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Serve { port, store }) => {
            cmd_serve(config?, port.or(args.port), store.or(args.store)).await
        }
        None => cmd_serve(config?, args.port, args.store).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: Result<Config, envy::Error>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TRAVEL TOUR API - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match config {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Check bind address
    print!("Checking bind address... ");
    match config.bind_addr() {
        Ok(addr) => {
            println!("OK");
            println!("  Listening on: {}", addr);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Bind address invalid"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Store Backend: {}", config.store_backend);
    if config.store_backend == StoreBackend::Mongo {
        println!(
            "  MongoDB URI: {}",
            config.redacted_mongo_uri().unwrap_or_default()
        );
        println!("  Database: {}", config.mongo_database);
        println!("  Collection: {}", config.mongo_collection);
    }
    match &config.frontend_dir {
        Some(dir) => println!("  Frontend: {}", dir.display()),
        None => println!("  Frontend: Disabled"),
    }
    println!("  Log Level: {}", config.rust_log);
    println!("  JSON Logs: {}", if config.log_json { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Connect to the configured store.
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn TourStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; tours are lost on restart");
            Ok(Arc::new(MemoryTourStore::new()))
        }
        StoreBackend::Mongo => {
            info!(
                uri = config.redacted_mongo_uri().unwrap_or_default(),
                "Connecting to MongoDB..."
            );
            match MongoTourStore::from_config(config).await {
                Ok(store) => Ok(Arc::new(store)),
                Err(e) => {
                    error!("Error connecting to MongoDB: {}", e);
                    Err(anyhow::anyhow!("MongoDB connection failed: {}", e))
                }
            }
        }
    }
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    mut config: Config,
    port_override: Option<u16>,
    store_override: Option<StoreBackend>,
) -> anyhow::Result<()> {
    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(store) = store_override {
        config.store_backend = store;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    // Initialize metrics
    let prometheus = match metrics::install_prometheus() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder not installed: {}", e);
            None
        }
    };

    let store = build_store(&config).await?;
    info!(backend = store.backend(), "Tour store ready");

    // Create app state
    let mut app_state = AppState::new(TourService::new(store));
    if let Some(handle) = prometheus {
        app_state = app_state.with_metrics(handle);
    }

    let mut router = create_router(app_state);
    if let Some(dir) = &config.frontend_dir {
        info!("Serving frontend from {}", dir.display());
        router = with_frontend(router, dir);
    }

    // Start HTTP server
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on {}", addr);
    info!("API docs available at http://{}/api-docs", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
