//! Shared application state
//!
//! Everything here is immutable after startup except the response clock,
//! which is a single atomic. Handlers never need a lock.

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use agri_portal_core::{ReplyMatcher, ServerConfig, ServiceCatalog};
use tower_http::services::{ServeDir, ServeFile};

#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<ReplyMatcher>,
    pub catalog: Arc<ServiceCatalog>,
    pub clock: Arc<ResponseClock>,
    /// Bundle directory with `index.html` as the SPA fallback
    pub spa: ServeDir<ServeFile>,
}

impl AppState {
    pub fn new(matcher: ReplyMatcher, catalog: ServiceCatalog, static_dir: impl AsRef<Path>) -> Self {
        let static_dir = static_dir.as_ref();
        let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
        Self {
            matcher: Arc::new(matcher),
            catalog: Arc::new(catalog),
            clock: Arc::new(ResponseClock::default()),
            spa,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            ReplyMatcher::builtin(),
            config.catalog.clone(),
            &config.static_dir,
        )
    }
}

/// Millisecond timestamps for response bodies.
///
/// Wall-clock time since the epoch, nudged forward so that successive stamps
/// are strictly increasing even within the same millisecond.
#[derive(Debug, Default)]
pub struct ResponseClock {
    last: AtomicI64,
}

impl ResponseClock {
    pub fn now_millis(&self) -> i64 {
        let wall = chrono::Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        wall.max(previous + 1)
    }
}
