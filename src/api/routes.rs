//! Admin API route table.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{api_keys, config};
use super::AppState;

/// Build the admin API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api-keys", post(api_keys::create_api_key).get(api_keys::list_api_keys))
        .route("/api-keys/{id}", delete(api_keys::delete_api_key))
        .route("/config", get(config::get_all_config))
        // Config keys may be hierarchical (`conn-7/SLACK_SIGNING_SECRET`),
        // so the key segment is a wildcard, not a single path parameter.
        .route(
            "/config/{*key}",
            get(config::get_config).put(config::save_config).delete(config::delete_config),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
