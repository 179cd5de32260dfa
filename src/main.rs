//! # Sensor Hub Backend - Main Application Entry Point
//!
//! Telemetry-ingestion backend for the M5StickC sensor badge. It sets up
//! an Actix-web HTTP server that:
//!
//! - accepts raw PCM recordings and converts them to WAV containers,
//! - accepts JSON sensor readings and logs them off the request path,
//! - serves read-only item lookups from a SQLite table.
//!
//! ## Application Architecture:
//! - **config**: Application configuration (TOML files + environment variables)
//! - **state**: Shared application state, metrics, and the database handle
//! - **db**: Pool construction and items-table queries
//! - **audio**: Raw blob store and WAV container framer
//! - **telemetry**: Sensor payload schema and report formatting
//! - **health**: System health and metrics endpoints
//! - **middleware**: Request logging and per-endpoint counters
//! - **handlers**: HTTP request handlers for the API endpoints
//! - **error**: Custom error types and HTTP error responses

mod audio;
mod config;
mod db;
mod error;
mod handlers;
mod health;
mod middleware;
mod state;
mod telemetry;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use config::AppConfig;
use state::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Global shutdown signal, set by the signal handler task and polled by
/// the main task to stop the server gracefully.
static SHUTDOWN_SIGNAL: AtomicBool = AtomicBool::new(false);

/// Upper bound on a raw recording body. A 60-second mono 16-bit 16 kHz
/// clip is just under 2 MiB, so 16 MiB leaves generous headroom.
const MAX_RECORDING_BYTES: usize = 16 * 1024 * 1024;

#[actix_web::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    init_tracing()?;

    let config = AppConfig::load()?;
    config.validate()?;

    info!("Starting sensor-hub-backend v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded: {}:{}", config.server.host, config.server.port);

    // The database handle is built once here and carried in AppState;
    // nothing else in the crate holds connection state.
    let pool = db::connect(&config.database).await?;

    let app_state = AppState::new(config.clone(), pool);
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    setup_signal_handlers();

    info!("Starting HTTP server on {}", bind_addr);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::PayloadConfig::new(MAX_RECORDING_BYTES))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(middleware::RequestTracking)
            // The device firmware posts to the bare paths; everything is
            // also mirrored under /api for newer clients.
            .route("/recording", web::post().to(handlers::receive_recording))
            .route("/sensor_data", web::post().to(handlers::receive_sensor_data))
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/api")
                    .route("/recording", web::post().to(handlers::receive_recording))
                    .route("/sensor_data", web::post().to(handlers::receive_sensor_data))
                    .route("/items", web::get().to(handlers::list_items))
                    .route("/items/{id}", web::get().to(handlers::get_item))
                    .route("/health", web::get().to(health::health_check))
                    .route("/metrics", web::get().to(health::detailed_metrics))
                    .route("/config", web::get().to(handlers::get_config))
                    .route("/config", web::put().to(handlers::update_config)),
            )
    })
    .bind(&bind_addr)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    // Race the server against the shutdown signal
    tokio::select! {
        result = server_task => {
            match result {
                Ok(server_result) => {
                    if let Err(e) = server_result {
                        error!("Server error: {}", e);
                    }
                }
                Err(e) => {
                    error!("Server task error: {}", e);
                }
            }
        }
        _ = wait_for_shutdown() => {
            info!("Shutdown signal received, stopping server...");
            server_handle.stop(true).await;
        }
    }

    info!("Server stopped gracefully");
    Ok(())
}

/// Initialize the tracing (logging) system.
///
/// `RUST_LOG` controls the filter; the default keeps this crate at debug
/// and actix at info.
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensor_hub_backend=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

/// Listen for SIGTERM/SIGINT and flip the shutdown flag.
fn setup_signal_handlers() {
    tokio::spawn(async {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
            .expect("Failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }

        SHUTDOWN_SIGNAL.store(true, Ordering::SeqCst);
    });
}

/// Poll the shutdown flag every 100ms until it is set.
async fn wait_for_shutdown() {
    while !SHUTDOWN_SIGNAL.load(Ordering::SeqCst) {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
}
