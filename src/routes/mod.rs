//! HTTP route handlers.
//!
//! A single route answers `GET /` (and `HEAD /`), with `OPTIONS /` listing the
//! accepted methods. Every other method or path gets [`fallback::not_found`],
//! a 404 for both unknown paths and unknown methods on `/`. No 405 is ever
//! produced and the 404 never carries an `Allow` header.
//!
//! Request tracing is enabled via `TraceLayer`, which logs each request and
//! its response status at debug level.

pub mod fallback;
pub mod home;

use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with the deploy route and the not-found fallback.
pub fn create_router() -> Router {
    Router::new()
        .route("/", any(home::root))
        .fallback(fallback::not_found)
        .layer(TraceLayer::new_for_http())
}
