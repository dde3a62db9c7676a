//! HTTP middleware attaching a deterministic issuer ID to each request.
//!
//! - **IP resolution** ([`ip`]): prioritized forwarding headers, validated
//! - **Issuer ID** ([`issuer_id`]): Tower layer plus request-scoped accessors
//!
//! # Architecture
//!
//! ```text
//! Request → resolve_client_ip → IssuerId::derive / SENTINEL → extensions → Handler
//!                                                                 ↓
//!                                        get_issuer_id / IssuerIdExt / IssuerId extractor
//! ```
//!
//! # Security Considerations
//!
//! - Forwarding headers are client-controlled unless a trusted proxy rewrites them
//! - The issuer ID is a correlation hint, not an authenticated identity
//! - Client IPs and issuer IDs are never logged

pub mod ip;
pub mod issuer_id;

pub use ip::{
    IpSource, ResolvedIp, TRUE_CLIENT_IP_HEADER, X_FORWARDED_FOR_HEADER, X_REAL_IP_HEADER,
    resolve_client_ip,
};
pub use issuer_id::{
    ISSUER_ID_CONTEXT_KEY, IssuerIdExt, IssuerIdLayer, IssuerIdService, get_issuer_id,
};
