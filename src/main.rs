//! Bongdaha - football scores and news site server

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bongdaha::{
    api::{self, AppState, OriginPolicy},
    config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bongdaha=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bongdaha server...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    if config.football.api_key.is_none() {
        tracing::warn!("FOOTBALL_API_KEY is not set; football endpoints will return empty results");
    }
    if config.server.cors_allowed_origins.is_empty() {
        tracing::info!("CORS: all origins allowed");
    } else {
        tracing::info!("CORS: allowed origins {:?}", config.server.cors_allowed_origins);
    }

    // Build application state
    let state = AppState::from_config(&config)?;
    tracing::info!(
        "Serving public site from {} and admin bundle at /{}",
        config.site.public_dir.display(),
        config.site.admin_mount
    );

    // Build router
    let origins = OriginPolicy::new(config.server.cors_allowed_origins.clone());
    let app = api::build_router(state, origins);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
