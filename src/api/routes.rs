use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/catalog", get(handlers::get_catalog))
        .route("/catalog", post(handlers::add_catalog_items))
        // Feedback
        .route("/feedback", get(handlers::get_feedback))
        .route("/feedback", post(handlers::add_feedback))
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
        .route("/recommendations/scores", post(handlers::score_candidates))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
