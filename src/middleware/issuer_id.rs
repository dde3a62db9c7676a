//! Issuer ID middleware and request-scoped accessors.
//!
//! # Features
//!
//! - Resolves the client IP from forwarding headers (see [`super::ip`])
//! - Derives a deterministic [`IssuerId`] from it, or uses the sentinel
//! - Stores the ID in the request extensions for downstream handlers
//! - Never rejects a request and never touches the response
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use issuer_id::IssuerId;
//! use issuer_id::middleware::IssuerIdLayer;
//!
//! async fn handler(issuer: IssuerId) -> String {
//!     issuer.to_string()
//! }
//!
//! let app: Router = Router::new()
//!     .route("/", get(handler))
//!     .layer(IssuerIdLayer::new());
//! ```
//!
//! Code that only holds the request extensions can use [`get_issuer_id`]:
//!
//! ```rust,ignore
//! let id: String = get_issuer_id(Some(req.extensions()));
//! ```
//!
//! # Privacy
//!
//! Neither the client IP nor the derived ID is logged or recorded in metrics;
//! only the header source and whether the sentinel was used.

use std::convert::Infallible;
use std::task::{Context, Poll};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Request};
use tower::{Layer, Service};
use tracing::debug;

use super::ip::resolve_client_ip;
use crate::issuer::IssuerId;
use crate::metrics;

/// Name under which the issuer ID is documented in request context.
///
/// The actual extension key is a crate-private type, so no other code can
/// overwrite or spoof the entry.
pub const ISSUER_ID_CONTEXT_KEY: &str = "CMG_MIDDLEWARE_ISSUER_ID";

/// Private extension key holding the issuer ID.
#[derive(Debug, Clone, Copy)]
struct IssuerIdEntry(IssuerId);

/// Issuer ID layer for Tower middleware stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssuerIdLayer;

impl IssuerIdLayer {
    /// Create a new issuer ID layer.
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for IssuerIdLayer {
    type Service = IssuerIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IssuerIdService::new(inner)
    }
}

/// Issuer ID service wrapper.
///
/// Generic over the request body so it composes with any `http` service,
/// not only axum routers.
#[derive(Debug, Clone)]
pub struct IssuerIdService<S> {
    inner: S,
}

impl<S> IssuerIdService<S> {
    /// Wrap `inner` so every request reaching it carries an issuer ID.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B> Service<Request<B>> for IssuerIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let issuer_id = assign_issuer_id(req.headers());
        req.extensions_mut().insert(IssuerIdEntry(issuer_id));

        // The inner future is returned as-is; dropping it cancels the inner call.
        self.inner.call(req)
    }
}

/// Compute the issuer ID for a request's headers.
fn assign_issuer_id(headers: &HeaderMap) -> IssuerId {
    match resolve_client_ip(headers) {
        Some(ip) => {
            debug!(source = %ip.source(), "Derived issuer id from client IP");
            metrics::record_issuer_id_assigned(metrics::OUTCOME_DERIVED, ip.source().header_name());
            IssuerId::derive(ip.as_str())
        }
        None => {
            debug!("No usable client IP, assigning sentinel issuer id");
            metrics::record_issuer_id_assigned(metrics::OUTCOME_SENTINEL, metrics::SOURCE_NONE);
            IssuerId::SENTINEL
        }
    }
}

/// Look up the issuer ID stored by [`IssuerIdService`], if any.
fn lookup(extensions: &Extensions) -> Option<IssuerId> {
    extensions.get::<IssuerIdEntry>().map(|entry| entry.0)
}

/// Get the issuer ID attached to a request context.
///
/// Returns the canonical UUID text, or [`SENTINEL_ISSUER_ID`] when the
/// context is absent or the middleware never ran. Never fails.
///
/// [`SENTINEL_ISSUER_ID`]: crate::issuer::SENTINEL_ISSUER_ID
pub fn get_issuer_id(extensions: Option<&Extensions>) -> String {
    extensions
        .and_then(lookup)
        .unwrap_or(IssuerId::SENTINEL)
        .to_string()
}

/// Extension trait to read the issuer ID from requests.
pub trait IssuerIdExt {
    /// The attached issuer ID, or [`IssuerId::SENTINEL`] if none.
    fn issuer_id(&self) -> IssuerId;

    /// Whether the middleware attached an entry at all.
    ///
    /// A request whose IP could not be resolved still has an entry (the
    /// sentinel); this only reports whether [`IssuerIdService`] ran.
    fn has_issuer_id(&self) -> bool;
}

impl<B> IssuerIdExt for Request<B> {
    fn issuer_id(&self) -> IssuerId {
        lookup(self.extensions()).unwrap_or_default()
    }

    fn has_issuer_id(&self) -> bool {
        lookup(self.extensions()).is_some()
    }
}

impl IssuerIdExt for Parts {
    fn issuer_id(&self) -> IssuerId {
        lookup(&self.extensions).unwrap_or_default()
    }

    fn has_issuer_id(&self) -> bool {
        lookup(&self.extensions).is_some()
    }
}

/// Handlers can take `IssuerId` directly as an argument.
///
/// Extraction cannot fail: without the middleware it yields the sentinel.
impl<S> FromRequestParts<S> for IssuerId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.issuer_id())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::issuer::SENTINEL_ISSUER_ID;
    use axum::body::Body;
    use tower::ServiceExt;

    /// Inner service that echoes the issuer ID it sees.
    async fn echo(req: Request<Body>) -> Result<String, Infallible> {
        Ok(get_issuer_id(Some(req.extensions())))
    }

    async fn run(req: Request<Body>) -> String {
        IssuerIdLayer::new()
            .layer(tower::service_fn(echo))
            .oneshot(req)
            .await
            .unwrap()
    }

    #[test]
    fn test_get_issuer_id_without_context() {
        assert_eq!(get_issuer_id(None), SENTINEL_ISSUER_ID);
    }

    #[test]
    fn test_get_issuer_id_missing_entry() {
        let extensions = Extensions::new();
        assert_eq!(get_issuer_id(Some(&extensions)), SENTINEL_ISSUER_ID);
    }

    #[test]
    fn test_get_issuer_id_ignores_foreign_string() {
        // A plain string in the extensions is not the issuer ID entry.
        let mut extensions = Extensions::new();
        extensions.insert(String::from("53a636be-fcd6-5304-9a0e-ae5fbc440165"));

        assert_eq!(get_issuer_id(Some(&extensions)), SENTINEL_ISSUER_ID);
    }

    #[test]
    fn test_get_issuer_id_present() {
        let mut extensions = Extensions::new();
        extensions.insert(IssuerIdEntry(IssuerId::derive("8.8.8.8")));

        assert_eq!(
            get_issuer_id(Some(&extensions)),
            "53a636be-fcd6-5304-9a0e-ae5fbc440165"
        );
    }

    #[tokio::test]
    async fn test_service_derives_from_header() {
        let req = Request::builder()
            .header("true-client-ip", "8.8.8.8")
            .body(Body::empty())
            .unwrap();

        assert_eq!(run(req).await, "53a636be-fcd6-5304-9a0e-ae5fbc440165");
    }

    #[tokio::test]
    async fn test_service_sentinel_without_headers() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(run(req).await, SENTINEL_ISSUER_ID);
    }

    #[tokio::test]
    async fn test_service_sentinel_for_invalid_ip() {
        let req = Request::builder()
            .header("x-real-ip", "not-an-ip")
            .body(Body::empty())
            .unwrap();

        assert_eq!(run(req).await, SENTINEL_ISSUER_ID);
    }

    #[tokio::test]
    async fn test_service_marks_request_even_for_sentinel() {
        let svc = IssuerIdService::new(tower::service_fn(|req: Request<Body>| async move {
            Ok::<_, Infallible>((req.has_issuer_id(), req.issuer_id()))
        }));

        let (present, id) = svc
            .oneshot(Request::builder().body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(present);
        assert!(id.is_sentinel());
    }

    #[tokio::test]
    async fn test_service_forwards_inner_error() {
        let svc = IssuerIdService::new(tower::service_fn(|_req: Request<Body>| async {
            Err::<(), _>("inner failed")
        }));

        let result = svc
            .oneshot(Request::builder().body(Body::empty()).unwrap())
            .await;

        assert_eq!(result, Err("inner failed"));
    }

    #[test]
    fn test_ext_on_bare_request() {
        let req = Request::builder().body(()).unwrap();

        assert!(!req.has_issuer_id());
        assert!(req.issuer_id().is_sentinel());
    }

    #[tokio::test]
    async fn test_extractor_without_middleware() {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();

        let id = IssuerId::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(id.is_sentinel());
    }

    #[tokio::test]
    async fn test_extractor_reads_entry() {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
        parts
            .extensions
            .insert(IssuerIdEntry(IssuerId::derive("203.0.113.5")));

        let id = IssuerId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id.to_string(), "8910e4e3-d09a-5986-9210-7eefaef86152");
    }
}
