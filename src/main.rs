mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod server;
mod service;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use config::{Config, REQUEST_TIMEOUT};
use repository::PgNoteRepository;
use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fetch env variables
    config::load_dotenv();
    let cfg = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {e}");
        panic!("failed to load configuration: {e}");
    });
    tracing::info!("Loaded configuration: {cfg:?}");

    // Pool creation and migration
    let pool = repository::create_pool(&cfg).unwrap_or_else(|e| {
        tracing::error!("Failed to create database pool: {e}");
        panic!("failed to create database pool: {e}");
    });

    repository::migrate(&pool).await.unwrap_or_else(|e| {
        tracing::error!("Failed to connect to and migrate database: {e}");
        panic!("failed to connect to and migrate database: {e}");
    });
    tracing::info!("Database connected successfully");

    // Service creation
    let repo = Arc::new(PgNoteRepository::new(pool.clone()));
    let service = Arc::new(NoteService::new(repo));

    let base_path = cfg.api_base_path();
    let router = handlers::router(service, &base_path);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.server_port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {}: {e}", cfg.server_port);
            panic!("failed to bind to port {}: {e}", cfg.server_port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Server starting, listening on {addr}{base_path}"),
        Err(e) => tracing::warn!("Server starting, local address unavailable: {e}"),
    }

    server::serve(
        listener,
        router,
        server::shutdown_signal(),
        REQUEST_TIMEOUT,
        REQUEST_TIMEOUT,
    )
    .await;

    pool.close();
    tracing::info!("Database connection closed");
    tracing::info!("Server exited properly");
}
