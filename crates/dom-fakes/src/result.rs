//! Result and error types for the fakes.
//!
//! The media graph itself is total: adding, removing, connecting and
//! disconnecting never fail. Errors only come from the ambient installation
//! point, option parsing and the event expectation helpers.

use thiserror::Error;

/// Result type for fake operations
pub type FakesResult<T> = Result<T, FakesError>;

/// Errors that can occur while using the fakes
#[derive(Debug, Error)]
pub enum FakesError {
    /// No ambient `MediaStream` constructor is installed on this thread
    #[error("No ambient MediaStream constructor installed; call global::install() first")]
    NotInstalled,

    /// An ambient `MediaStream` constructor is already installed
    #[error("An ambient MediaStream constructor is already installed")]
    AlreadyInstalled,

    /// Fewer events than expected were observed
    #[error("Expected {expected} '{event}' event(s), received {received}")]
    EventNotReceived {
        /// Event name
        event: String,
        /// Number of events required
        expected: usize,
        /// Number of events observed
        received: usize,
    },

    /// An event arrived that the test asserted would not
    #[error("Received event '{event}' when we should not have ({received} time(s))")]
    UnexpectedEvent {
        /// Event name
        event: String,
        /// Number of events observed
        received: usize,
    },

    /// Options could not be parsed
    #[error("Invalid options: {message}")]
    InvalidOptions {
        /// Error message
        message: String,
    },
}

impl From<serde_json::Error> for FakesError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidOptions {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FakesError::EventNotReceived {
            event: "addtrack".to_string(),
            expected: 2,
            received: 1,
        };
        assert_eq!(
            err.to_string(),
            "Expected 2 'addtrack' event(s), received 1"
        );

        let err = FakesError::UnexpectedEvent {
            event: "ended".to_string(),
            received: 3,
        };
        assert!(err.to_string().contains("'ended'"));
    }

    #[test]
    fn test_from_json_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: FakesError = parse.unwrap_err().into();
        assert!(matches!(err, FakesError::InvalidOptions { .. }));
    }
}
