// Error types for hrm-e2e
//
// Only two of the four failure categories ever become an `Error` value:
//
// - Precondition violations (a test asked for something that must exist and
//   it does not) -> `Precondition`
// - Infrastructure failures (driver errors, navigation or element timeouts,
//   rejected login) -> `Timeout`, `NavigationTimeout`, `ElementNotFound`,
//   `Driver`, `AuthenticationFailed`
//
// Business-outcome variance is reported through the outcome enums in
// `workflows`, and probe failures are absorbed by `Locator`'s probe methods.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for hrm-e2e operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the application under test
#[derive(Debug, Error)]
pub enum Error {
    /// A workflow precondition was violated
    ///
    /// Raised when the caller asserted that a record exists (for example
    /// "update employee 0042") and the application has no such record.
    /// This is a test-setup error, not application behavior.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Timeout waiting for an element or condition
    ///
    /// Contains the condition description and how long we waited.
    #[error("Timeout after {}ms: {what}", .waited.as_millis())]
    Timeout { what: String, waited: Duration },

    /// Navigation timeout
    ///
    /// The browser never reached a URL matching the expected pattern.
    #[error("Navigation timeout after {duration_ms}ms waiting for '{expected}' (at '{actual}')")]
    NavigationTimeout {
        expected: String,
        actual: String,
        duration_ms: u64,
    },

    /// Element not found by any lookup strategy
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Error reported by the browser driver
    #[error("Driver error: {0}")]
    Driver(String),

    /// The application rejected the configured credentials
    #[error("Authentication failed for user '{username}': {message}")]
    AuthenticationFailed { username: String, message: String },

    /// Test data violated a builder invariant
    #[error("Invalid {field}: {message}")]
    InvalidData { field: String, message: String },

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session used outside of its Ready state
    #[error("Session state: {0}")]
    SessionState(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Error from the Playwright bindings
    #[cfg(feature = "playwright")]
    #[error("Playwright error: {0}")]
    Playwright(#[from] playwright_rs::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidData {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for timeouts of any kind, looking through context wrappers.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::NavigationTimeout { .. } => true,
            Error::Context(_, inner) => inner.is_timeout(),
            _ => false,
        }
    }

    /// Returns true for precondition violations, looking through context wrappers.
    pub fn is_precondition(&self) -> bool {
        match self {
            Error::Precondition(_) => true,
            Error::Context(_, inner) => inner.is_precondition(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_includes_wait() {
        let err = Error::Timeout {
            what: "'.oxd-toast' to be visible".to_string(),
            waited: Duration::from_millis(1500),
        };
        assert_eq!(
            err.to_string(),
            "Timeout after 1500ms: '.oxd-toast' to be visible"
        );
    }

    #[test]
    fn test_context_preserves_classification() {
        let err = Error::Precondition("employee 0042 does not exist".into())
            .context("update employee");
        assert!(err.is_precondition());
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("update employee: "));

        let nav = Error::NavigationTimeout {
            expected: "/dashboard/".into(),
            actual: "/auth/login".into(),
            duration_ms: 30000,
        }
        .context("login");
        assert!(nav.is_timeout());
    }
}
