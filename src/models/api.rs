use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::issuer::IssuerId;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy"; the service has no upstream dependencies
    pub status: String,
    /// Crate version
    pub version: String,
    /// Time the response was produced
    pub timestamp: DateTime<Utc>,
}

/// Issuer ID attached to the caller's request.
#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    /// Canonical UUID text, or the all-zero sentinel
    pub issuer_id: IssuerId,
    /// False when no client IP could be resolved
    pub attributed: bool,
}

impl From<IssuerId> for WhoAmIResponse {
    fn from(issuer_id: IssuerId) -> Self {
        Self {
            issuer_id,
            attributed: !issuer_id.is_sentinel(),
        }
    }
}
