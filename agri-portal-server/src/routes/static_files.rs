//! Static file serving
//!
//! Files come from the bundle directory; unknown paths get `index.html` so
//! client-side routes survive a reload. Paths under `/api` never fall back to
//! the document.

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn spa_fallback(State(state): State<AppState>, request: Request) -> Response {
    if request.uri().path().starts_with("/api") {
        return ApiError::NotFound.into_response();
    }

    match state.spa.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
