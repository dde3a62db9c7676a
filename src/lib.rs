//! # Issuer ID
//!
//! Tower/Axum middleware that tags every inbound request with a stable,
//! privacy-preserving pseudo-identifier derived from the client's IP:
//!
//! - **IP resolution**: `True-Client-IP` → `X-Forwarded-For` → `X-Real-IP`,
//!   first non-empty header wins, validated as an IP literal
//! - **Deterministic IDs**: SHA-1 of the IP text, shaped as a version 5 UUID
//! - **Request-scoped context**: stored in request extensions under a private
//!   key, read back with [`get_issuer_id`], [`IssuerIdExt`] or the
//!   [`IssuerId`] extractor
//! - **Silent fallback**: requests without a usable IP get the all-zero
//!   sentinel, never an error
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Host HTTP server / router                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IssuerIdLayer → IssuerIdService                            │
//! │     ├─ resolve_client_ip (headers)                          │
//! │     └─ IssuerId::derive / IssuerId::SENTINEL                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Downstream handlers (get_issuer_id, IssuerId extractor)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use issuer_id::{IssuerId, IssuerIdLayer};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let app = Router::new()
//!         .route("/", get(|id: IssuerId| async move { id.to_string() }))
//!         .layer(IssuerIdLayer::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod issuer;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod utils;

// Re-exports for convenience
pub use config::{Config, LogFormat};
pub use error::{AppError, AppResult};
pub use issuer::{IssuerId, SENTINEL_ISSUER_ID};
pub use middleware::{ISSUER_ID_CONTEXT_KEY, IssuerIdExt, IssuerIdLayer, get_issuer_id};
pub use routes::build_router;
