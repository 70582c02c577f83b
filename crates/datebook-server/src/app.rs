use std::path::Path;

use axum::{
    Router,
    middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use datebook_api::auth::{self, AppState};
use datebook_api::events;
use datebook_api::middleware::{require_auth, throttle};

/// Assembles the application router: the JSON API under /api (throttled,
/// event routes behind bearer auth), a liveness probe, and the static
/// single-page client served from `public_dir`.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/events", get(events::list_events))
        .route("/events", post(events::create_event))
        .route("/events/{id}", delete(events::delete_event))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), throttle));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .fallback_service(ServeDir::new(public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
