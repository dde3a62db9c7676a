//! Client IP resolution from proxy-forwarded headers.
//!
//! # Header Priority
//!
//! Checks in order; the first header with a non-empty value is selected and
//! no other header is consulted afterwards:
//!
//! 1. `True-Client-IP` - the whole value is the candidate
//! 2. `X-Forwarded-For` - the whole value is the candidate
//! 3. `X-Real-IP` - the text before the first comma is the candidate
//!
//! The candidate must then parse as a bare IPv4 or IPv6 literal (no port, no
//! zone, no surrounding whitespace). If it does not, resolution yields `None`
//! even when a lower-priority header holds a valid address.
//!
//! # X-Forwarded-For Is Not Split
//!
//! `X-Forwarded-For` conventionally carries a comma-separated proxy chain, yet
//! it is read as a single opaque value here while `X-Real-IP` is the one that
//! gets split. Existing issuer IDs depend on this behavior, so a chain such as
//! `"203.0.113.50, 70.41.3.18"` in `X-Forwarded-For` resolves to `None`.
//!
//! # Security Warning: IP Spoofing Risk
//!
//! **These headers are client-controlled.** Unless the service sits behind a
//! reverse proxy that overwrites them, a client can pick any address and with
//! it any issuer ID. Treat the result as a correlation hint, never as identity.
//!
//! # Internal Architecture
//!
//! ```text
//!   ┌──────────────────────┐     ┌──────────────────────┐
//!   │  select_candidate    │ ──▶ │  resolve_client_ip   │
//!   │  (first non-empty)   │     │  (split + validate)  │
//!   └──────────────────────┘     └──────────────────────┘
//! ```

use std::fmt;
use std::net::IpAddr;

use axum::http::{HeaderMap, HeaderValue};
use tracing::debug;

/// Header set by CDNs (Akamai, Cloudflare Enterprise) with the client address.
pub const TRUE_CLIENT_IP_HEADER: &str = "true-client-ip";

/// Header set by most reverse proxies.
pub const X_FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Header set by nginx's `real_ip` module and similar proxies.
pub const X_REAL_IP_HEADER: &str = "x-real-ip";

/// Header a resolved client IP was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpSource {
    TrueClientIp,
    ForwardedFor,
    RealIp,
}

impl IpSource {
    /// Lookup order, highest priority first.
    pub const PRIORITY: [IpSource; 3] = [
        IpSource::TrueClientIp,
        IpSource::ForwardedFor,
        IpSource::RealIp,
    ];

    /// Lowercase header name this source is read from.
    pub fn header_name(self) -> &'static str {
        match self {
            IpSource::TrueClientIp => TRUE_CLIENT_IP_HEADER,
            IpSource::ForwardedFor => X_FORWARDED_FOR_HEADER,
            IpSource::RealIp => X_REAL_IP_HEADER,
        }
    }

    /// Extract the candidate text from a header value of this source.
    fn candidate(self, value: &str) -> &str {
        match self {
            IpSource::RealIp => value.split_once(',').map_or(value, |(first, _)| first),
            IpSource::TrueClientIp | IpSource::ForwardedFor => value,
        }
    }
}

impl fmt::Display for IpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

/// A validated client IP, borrowed from the request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIp<'a> {
    source: IpSource,
    text: &'a str,
    addr: IpAddr,
}

impl<'a> ResolvedIp<'a> {
    /// The address exactly as it appeared in the header.
    ///
    /// Issuer IDs are derived from this text, not from the normalized
    /// [`addr`](Self::addr), so `"::1"` and `"0::1"` map to different IDs.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn source(&self) -> IpSource {
        self.source
    }
}

/// Pick the first header in [`IpSource::PRIORITY`] with a non-empty value.
///
/// Only the first value of a repeated header is considered.
#[inline]
fn select_candidate(headers: &HeaderMap) -> Option<(IpSource, &HeaderValue)> {
    IpSource::PRIORITY.into_iter().find_map(|source| {
        headers
            .get(source.header_name())
            .filter(|value| !value.is_empty())
            .map(|value| (source, value))
    })
}

/// Resolve the client IP from forwarding headers.
///
/// Returns `None` when no header is set or when the selected header does not
/// hold a valid IP literal. This never fails loudly: a missing or malformed
/// address is a normal outcome.
///
/// # Example
///
/// ```
/// use axum::http::{HeaderMap, HeaderValue};
/// use issuer_id::middleware::{IpSource, resolve_client_ip};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.5, 10.0.0.1"));
///
/// let ip = resolve_client_ip(&headers).unwrap();
/// assert_eq!(ip.as_str(), "203.0.113.5");
/// assert_eq!(ip.source(), IpSource::RealIp);
/// ```
pub fn resolve_client_ip(headers: &HeaderMap) -> Option<ResolvedIp<'_>> {
    let (source, value) = select_candidate(headers)?;

    // Opaque (non-visible-ASCII) bytes still claim the slot, then fail.
    let Ok(value) = value.to_str() else {
        debug!(source = %source, "Client IP header is not valid text, ignoring");
        return None;
    };

    let text = source.candidate(value);
    match text.parse::<IpAddr>() {
        Ok(addr) => Some(ResolvedIp { source, text, addr }),
        Err(_) => {
            debug!(source = %source, "Client IP header is not an IP literal, ignoring");
            None
        }
    }
}
