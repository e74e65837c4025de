//! Error types and error classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`ErrorClass`]: The coarse taxonomy callers use to decide how to surface a failure

mod class;

pub use class::ErrorClass;

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into an [`ErrorClass`] via the [`class`](Self::class)
/// method. None of them is retried: every failure aborts the current render.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The client cannot be built from the supplied configuration,
    /// e.g. the API token is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request could not be completed or the body could not be decoded.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// The provider returned the "not available" sentinel, or no data point at all,
    /// for a call that must yield a value.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixwatch_market_data::errors::{ErrorClass, MarketDataError};
    ///
    /// let error = MarketDataError::Timeout { provider: "BANXICO".to_string() };
    /// assert_eq!(error.class(), ErrorClass::Transport);
    ///
    /// let error = MarketDataError::DataUnavailable("N/E".to_string());
    /// assert_eq!(error.class(), ErrorClass::DataUnavailable);
    /// ```
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Configuration(_) => ErrorClass::Configuration,

            Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => ErrorClass::Transport,

            Self::DataUnavailable(_) => ErrorClass::DataUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_class() {
        let error = MarketDataError::Configuration("token missing".to_string());
        assert_eq!(error.class(), ErrorClass::Configuration);
    }

    #[test]
    fn test_transport_classes() {
        let errors = [
            MarketDataError::Timeout {
                provider: "BANXICO".to_string(),
            },
            MarketDataError::HttpStatus {
                provider: "BANXICO".to_string(),
                status: 500,
            },
            MarketDataError::ProviderError {
                provider: "BANXICO".to_string(),
                message: "connection reset".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.class(), ErrorClass::Transport);
        }
    }

    #[test]
    fn test_data_unavailable_class() {
        let error = MarketDataError::DataUnavailable("N/E".to_string());
        assert_eq!(error.class(), ErrorClass::DataUnavailable);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::HttpStatus {
            provider: "BANXICO".to_string(),
            status: 401,
        };
        assert_eq!(format!("{}", error), "HTTP 401 from BANXICO");

        let error = MarketDataError::ProviderError {
            provider: "BANXICO".to_string(),
            message: "invalid JSON".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: BANXICO - invalid JSON"
        );

        let error = MarketDataError::DataUnavailable("no 'oportuno' value".to_string());
        assert_eq!(format!("{}", error), "Data unavailable: no 'oportuno' value");
    }
}
