use super::{handlers, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/places/search", post(handlers::search_places_handler))
        .route("/sessions", post(handlers::open_session_handler))
        .route("/sessions/{id}", delete(handlers::close_session_handler))
        .route(
            "/sessions/{id}/schema",
            get(handlers::session_schema_handler),
        )
        .route("/sessions/{id}/ask", post(handlers::ask_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
