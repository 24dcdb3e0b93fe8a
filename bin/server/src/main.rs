mod auth;
mod config;
mod constants;
mod handlers;
mod state;

use actix_multipart::form::MultipartFormConfig;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use config::ServerConfig;
use constants::MULTIPART_MEMORY_LIMIT;
use crypto::KeyStore;
use state::AppState;
use std::sync::Arc;
use storage::FilesystemStorage;
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() {
    // Initialize tracing with env filter
    // Filter out actix-server worker shutdown messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info")
                    .add_directive("actix_server::worker=warn".parse().unwrap())
                    .add_directive("actix_server::accept=warn".parse().unwrap())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting file relay server (PID: {})", std::process::id());

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let key_store = KeyStore::load(&config.key_source).context("Failed to load upload keys")?;
    if key_store.is_empty() {
        warn!("Key file has no entries, every upload will be rejected");
    } else if key_store.requires_client_id() {
        info!("Loaded {} client keys", key_store.len());
    } else {
        info!("Using a single shared upload secret");
    }

    let storage = FilesystemStorage::new(&config.upload_root);
    storage
        .initialize()
        .await
        .context("Failed to initialize filesystem storage")?;
    info!("Using filesystem storage: {:?}", storage.upload_root());

    let state = web::Data::new(AppState::new(
        key_store,
        Arc::new(storage),
        config.tolerance_secs,
    ));
    let max_upload_size = config.max_upload_size;
    let bind_address = config.bind_address();

    info!("Starting server on http://{}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload_size)
                    .memory_limit(MULTIPART_MEMORY_LIMIT),
            )
            .configure(handlers::configure)
            .default_service(web::to(handlers::download::not_found))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind to {}", bind_address))?;

    info!("Server bound successfully to http://{}", bind_address);

    // Blocks until the server receives a shutdown signal
    server.run().await.context("Server terminated with an error")
}
