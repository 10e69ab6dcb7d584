//! Result and error types for fixdom.

use thiserror::Error;

/// Result type for fixdom operations
pub type FixdomResult<T> = Result<T, FixdomError>;

/// Errors that can occur in fixdom
#[derive(Debug, Error)]
pub enum FixdomError {
    /// Fetching a fixture failed
    #[error("Failed to fetch fixture {url}: {message}")]
    FetchFailed {
        /// Resolved URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Selector could not be parsed
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// Selector source text
        selector: String,
        /// Error message
        message: String,
    },

    /// Text pattern could not be compiled
    #[error("Invalid text pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Matcher name or arguments not recognized
    #[error("Invalid matcher '{name}': {message}")]
    InvalidMatcher {
        /// Matcher name as given
        name: String,
        /// Error message
        message: String,
    },

    /// Script runner reported a failure
    #[error("Script execution failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Assertion failed (from `expect()`)
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Node does not belong to this document or is of the wrong kind
    #[error("Invalid node: {message}")]
    InvalidNode {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FixdomError {
    /// Create a fetch failure for a resolved URL
    #[must_use]
    pub fn fetch_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a script failure
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Create a matcher lookup error
    #[must_use]
    pub fn invalid_matcher(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMatcher {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error came from the fixture source
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}
