//! Error types for market-pulse.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PulseError {
    /// True when the error means the caller asked for an instrument we don't track.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PulseError::Data(DataError::InstrumentNotFound(_)))
    }
}

/// Failures talking to an upstream market data provider.
///
/// Every variant is treated the same by the cache: a stale entry is served
/// when one exists, otherwise the error reaches the caller.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{operation} timed out after {after_ms} ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Whether the provider explicitly throttled us (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::Status { status: 429, .. })
    }
}

/// Data lookup and shape errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for market-pulse operations.
pub type PulseResult<T> = Result<T, PulseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err: PulseError = DataError::InstrumentNotFound("XYZ".into()).into();
        assert!(err.is_not_found());

        let err: PulseError = ProviderError::Transport("connection reset".into()).into();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_rate_limited_status() {
        let throttled = ProviderError::Status {
            status: 429,
            body: "Too Many Requests".into(),
        };
        assert!(throttled.is_rate_limited());

        let server = ProviderError::Status {
            status: 500,
            body: String::new(),
        };
        assert!(!server.is_rate_limited());
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = IndicatorError::InsufficientData {
            required: 15,
            available: 3,
        };
        assert_eq!(err.to_string(), "Insufficient data: need 15 points, have 3");
    }
}
