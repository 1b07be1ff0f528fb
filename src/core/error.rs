use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Collector rejected export: HTTP {status}")]
    Collector { status: u16 },
}

/// Result type alias for slicewatch operations
pub type Result<T> = std::result::Result<T, MetricsError>;

impl MetricsError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if this error is expected to clear on a later cycle
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Collector { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Encode(_) => "encode",
            Self::Network(_) | Self::Collector { .. } => "delivery",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MetricsError::config("missing collector url");
        assert_eq!(err.to_string(), "Configuration error: missing collector url");
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_error_recoverability() {
        assert!(MetricsError::Collector { status: 503 }.is_recoverable());
        assert!(MetricsError::Collector { status: 429 }.is_recoverable());
        assert!(!MetricsError::Collector { status: 401 }.is_recoverable());
        assert!(!MetricsError::config("bad interval").is_recoverable());
    }

    #[test]
    fn test_collector_error_display() {
        let err = MetricsError::Collector { status: 500 };
        assert_eq!(err.to_string(), "Collector rejected export: HTTP 500");
        assert_eq!(err.category(), "delivery");
    }

    #[test]
    fn test_encode_error_category() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = MetricsError::from(json_err);
        assert_eq!(err.category(), "encode");
        assert!(!err.is_recoverable());
    }
}
