//! Router construction for the agri portal server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{handle_panic, method_not_allowed};
use crate::routes::{chat, health, services, static_files};
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let app = Router::new()
        .route(
            "/api/chat",
            post(chat::chat).fallback(method_not_allowed),
        )
        .route(
            "/api/health",
            get(health::health).fallback(method_not_allowed),
        )
        .route(
            "/api/services",
            get(services::list_services).fallback(method_not_allowed),
        )
        .fallback(static_files::spa_fallback)
        .with_state(state);

    with_middleware(app)
}

/// Panic catching, request tracing and permissive CORS.
pub fn with_middleware(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
