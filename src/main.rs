use anyhow::{Context, Result};
use axum::{extract::FromRef, Router};
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt};

use crate::{
    catalog::{Catalog, CatalogSource},
    config::Settings,
};

// Declare modules
mod catalog;
mod config;
mod error;
mod filter;
mod gallery;
mod listing;
mod models;
mod routes;

// Shared, read-only application state. Handlers extract the parts they need.
#[derive(Clone, FromRef)]
struct AppState {
    settings: Arc<Settings>,
    catalog: Arc<Catalog>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "listings_site=info,tower_http=info".into()))
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing listings site...");

    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let http_client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build reqwest client")?;

    // The catalog is fetched exactly once; a failure leaves an empty catalog
    // and the pages render their empty states.
    let source = CatalogSource::from_location(&settings.catalog_source, http_client);
    let catalog = Catalog::load(&source).await;

    let app_state = AppState {
        settings: Arc::new(settings),
        catalog: Arc::new(catalog),
    };

    let router: Router = routes::create_router(app_state.clone());
    let app = router
        .nest_service("/assets", ServeDir::new(&app_state.settings.static_dir))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = app_state
        .settings
        .server_address
        .parse()
        .with_context(|| format!("Invalid server address format: {}", app_state.settings.server_address))?;

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
