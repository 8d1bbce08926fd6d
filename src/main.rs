use std::sync::Arc;

use moodie_api::{
    api::{create_router, AppState},
    config::Config,
    services::{CatalogProvider, CatalogService, JsonFileCatalog},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moodie_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Seed the catalog from disk when configured
    let mut providers: Vec<Arc<dyn CatalogProvider>> = Vec::new();
    if let Some(path) = &config.catalog_path {
        providers.push(Arc::new(JsonFileCatalog::new(path)));
    }
    let catalog = CatalogService::new(providers).fetch_all().await?;

    // Initialize application state
    let state = AppState::with_catalog(catalog);

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
