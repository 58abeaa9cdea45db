//! catalog-api library
//!
//! HTTP CRUD service for the composer catalog. Exposes the router and
//! application state so integration tests can drive the full stack.

use axum::{middleware, Router};
use governor::DefaultDirectRateLimiter;
use sqlx::SqlitePool;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod error;
pub mod pagination;
pub mod rate_limit;
pub mod store;
pub mod validation;

pub use crate::error::{ApiError, ApiResult};
pub use crate::store::ComposerStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store handle
    pub store: ComposerStore,
    /// Process-wide request budget
    pub rate_limiter: Arc<DefaultDirectRateLimiter>,
    /// Directory served for paths no route matches
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, requests_per_minute: NonZeroU32) -> Self {
        Self {
            store: ComposerStore::new(db),
            rate_limiter: Arc::new(rate_limit::rate_limiter(requests_per_minute)),
            static_dir: None,
        }
    }

    /// Serve files from `dir` for unmatched paths
    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.static_dir = Some(dir);
        self
    }
}

/// Build application router
///
/// - `/api/composers/...`: composer CRUD, rate limited
/// - `/health`: health check, not rate limited
/// - everything else: static assets, when a directory is configured
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/api/composers", api::composer_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ));

    let mut router = Router::new().merge(api).merge(api::health_routes());

    if let Some(dir) = &state.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
