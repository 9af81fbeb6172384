//! Agri Portal HTTP server
//!
//! Serves the single-page bundle and a small JSON API:
//!
//! - `POST /api/chat`     keyword reply for the chat panel
//! - `GET  /api/health`   liveness probe
//! - `GET  /api/services` the configured AI service catalog
//!
//! Any other `/api` path answers 404 JSON; everything else falls back to the
//! bundle's `index.html`.

pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use router::{build_router, with_middleware};
pub use state::{AppState, ResponseClock};
