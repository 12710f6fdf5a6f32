pub mod requests;
pub mod workflow;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(workflow::router())
        .merge(requests::router())
}

/// CORS for the console frontend. Dev mode allows any origin; otherwise only
/// the configured origins, and none if the list is empty.
pub fn cors_layer(cfg: &Config) -> CorsLayer {
    if cfg.dev_mode {
        return CorsLayer::very_permissive();
    }
    let origins: Vec<HeaderValue> = cfg
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
