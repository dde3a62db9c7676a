use thiserror::Error;

/// Errors raised while configuring and running the demo server.
///
/// The issuer ID middleware itself has no failure path; these cover the
/// ambient pieces around it (configuration and the metrics exporter).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Metrics error: {0}")]
    MetricsError(String),
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = AppError::ConfigError("Invalid PORT: bad".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid PORT: bad");
    }
}
