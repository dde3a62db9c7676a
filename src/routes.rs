//! Demo router with the issuer ID middleware installed.
//!
//! # Middleware Stack
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │    Issuer ID     │ ← Attaches IssuerId to request extensions
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          │
//!          ▼
//!      Handler
//! ```
//!
//! # Routes
//!
//! - `GET /health` - Liveness check
//! - `GET /whoami` - Issuer ID of the calling request

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::IssuerIdLayer;

/// Build the demo router with all routes and middleware configured.
///
/// Layers run outermost-first, so the issuer ID is already attached when the
/// trace layer opens its span.
pub fn build_router() -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/whoami", get(handlers::whoami))
        .layer(TraceLayer::new_for_http())
        .layer(IssuerIdLayer::new())
}
