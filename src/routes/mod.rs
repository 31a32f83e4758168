// Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

mod api;
mod pages;

// Static assets and the trace layer are added in main.rs
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/listings", get(api::list_listings))
        .route("/listings/:position/gallery", post(api::gallery_action))
        .with_state(app_state.clone());

    Router::new()
        .route("/", get(pages::home_page))
        .route("/listings", get(pages::listings_page))
        .nest("/api", api_router)
        .with_state(app_state)
}
