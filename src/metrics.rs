//! Prometheus metrics for issuer ID assignment.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `issuer_ids_assigned_total` - Issuer IDs attached to requests
//!   (labels: `outcome` = `derived` | `sentinel`, `source` = header name | `none`)
//!
//! Labels are bounded: neither client IPs nor identifiers are ever recorded.
//!
//! # Usage
//!
//! ```rust,ignore
//! use issuer_id::metrics::init_metrics;
//!
//! // Initialize metrics (call once at startup)
//! init_metrics("0.0.0.0:9090".parse()?)?;
//! ```
//!
//! Recording without an installed exporter is a no-op, so the middleware can
//! be used in applications that do not export metrics.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

use crate::error::{AppError, AppResult};

/// Metric names as constants for consistency.
pub mod names {
    pub const ISSUER_IDS_ASSIGNED_TOTAL: &str = "issuer_ids_assigned_total";
}

/// `outcome` label for IDs derived from a client IP.
pub const OUTCOME_DERIVED: &str = "derived";

/// `outcome` label for the sentinel ID.
pub const OUTCOME_SENTINEL: &str = "sentinel";

/// `source` label when no header yielded a usable IP.
pub const SOURCE_NONE: &str = "none";

/// Initialize the Prometheus metrics exporter.
///
/// Starts the Prometheus HTTP listener on `metrics_addr` and describes all
/// metrics.
///
/// # Errors
///
/// Returns `AppError::MetricsError` if the exporter cannot be installed
/// (e.g. a recorder is already set or the address is in use).
pub fn init_metrics(metrics_addr: SocketAddr) -> AppResult<()> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| AppError::MetricsError(format!("Failed to install Prometheus exporter: {e}")))?;

    describe_counter!(
        names::ISSUER_IDS_ASSIGNED_TOTAL,
        "Total number of issuer IDs attached to requests"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record one issuer ID assignment.
pub fn record_issuer_id_assigned(outcome: &'static str, source: &'static str) {
    counter!(names::ISSUER_IDS_ASSIGNED_TOTAL, "outcome" => outcome, "source" => source)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Full metrics testing requires a Prometheus scraper; these only check
    // that recording without an exporter is harmless.

    #[test]
    fn test_record_without_exporter() {
        record_issuer_id_assigned(OUTCOME_DERIVED, "x-real-ip");
        record_issuer_id_assigned(OUTCOME_SENTINEL, SOURCE_NONE);
    }
}
