//! GearGuard Server - equipment maintenance tracking
//!
//! Loads configuration, connects to MongoDB, brings stored documents up to
//! the current shape and serves the REST API.

use anyhow::Context;
use mongodb::{options::ClientOptions, Client};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gearguard_server::{
    api,
    config::AppConfig,
    repository::{migrations, Repository},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("gearguard_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting GearGuard Server v{}", env!("CARGO_PKG_VERSION"));

    // Connect to MongoDB
    let mut options = ClientOptions::parse(&config.database.url)
        .await
        .context("Invalid MongoDB connection string")?;
    options.max_pool_size = Some(config.database.max_pool_size);
    options.min_pool_size = Some(config.database.min_pool_size);
    options.app_name = Some("gearguard-server".to_string());

    let client = Client::with_options(options).context("Failed to create MongoDB client")?;
    let db = client.database(&config.database.name);

    let repository = Repository::new(db.clone());
    repository
        .ping()
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database {}", config.database.name);

    migrations::run(&db)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    let services = Services::new(repository, config.auth.clone());

    let reconciled = services
        .requests
        .reconcile_scrapped_equipment()
        .await
        .context("Failed to reconcile scrapped equipment")?;
    if reconciled > 0 {
        tracing::warn!("Scrapped {} equipment left active by earlier failures", reconciled);
    }

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
