//! Unified Error Type System
//!
//! Centralized error types for the entire client.
//! Provides error classification for retry decisions.
//!
//! ## Error Categories
//!
//! - **Validation**: Bad input caught before any request (surface immediately)
//! - **Timeout**: Request aborted after its deadline (surface immediately)
//! - **Client**: 4xx responses (surface immediately)
//! - **Server / Network / InvalidResponse**: retried with backoff, then surfaced
//! - **Cancelled**: Pending request dropped by a queue clear
//!
//! Telemetry failures (token tracking) never become errors; they are logged.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

/// Matches the status code embedded in messages like `HTTP 503: ...`
static HTTP_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HTTP (\d{3})").expect("static status pattern"));

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories driving retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input rejected before a request was made
    Validation,
    /// Request exceeded its deadline - user should adjust the request
    Timeout,
    /// 4xx response - retrying cannot help
    Client,
    /// 5xx response or service-reported failure
    Server,
    /// Connectivity issues
    Network,
    /// Response body did not have the expected shape
    InvalidResponse,
    /// Request dropped before it ran
    Cancelled,
    /// Local configuration problem
    Config,
    /// Unknown error - conservative retry
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Client => write!(f, "CLIENT"),
            Self::Server => write!(f, "SERVER"),
            Self::Network => write!(f, "NETWORK"),
            Self::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Config => write!(f, "CONFIG"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if a failed call in this category may be attempted again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Server | Self::Network | Self::InvalidResponse | Self::Unknown
        )
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Message-based classifier used by the retry wrapper
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Extract the status code from an `HTTP <code>` marker, if present
    pub fn http_status(message: &str) -> Option<u16> {
        HTTP_STATUS
            .captures(message)
            .and_then(|caps| caps.get(1))
            .and_then(|code| code.as_str().parse().ok())
    }

    /// Classify an error message
    ///
    /// `HTTP 4xx` is a client error. Any other message mentioning "timeout"
    /// is a timeout, even behind a 5xx marker. Remaining `HTTP 5xx` markers
    /// are server errors; anything else is unknown and therefore retryable.
    pub fn classify(message: &str) -> ErrorCategory {
        let status = Self::http_status(message);
        if matches!(status, Some(400..=499)) {
            return ErrorCategory::Client;
        }

        if message.to_lowercase().contains("timeout") {
            return ErrorCategory::Timeout;
        }

        match status {
            Some(500..=599) => ErrorCategory::Server,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Decide whether an error should be retried
    ///
    /// Both the typed category and the rendered message must allow it, so a
    /// validation error is never retried even though its text carries no status.
    pub fn should_retry(err: &PhotomonixError) -> bool {
        err.category().is_retryable() && Self::classify(&err.to_string()).is_retryable()
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Individual problems found
    pub problems: Vec<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self.problems.join("; ");
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, joined)
        } else {
            write!(f, "Validation failed: {}", joined)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Create from a single message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            problems: vec![message.into()],
        }
    }

    /// Create from a list of collected problems
    pub fn from_problems(problems: Vec<String>) -> Self {
        Self {
            field: None,
            problems,
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum PhotomonixError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Service Errors
    // -------------------------------------------------------------------------
    /// Non-success HTTP status; the rendered message always carries the code
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Request aborted after its deadline
    #[error("Request timeout: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response format from {0}")]
    InvalidResponse(String),

    /// Failure reported inside an otherwise successful response body
    #[error("Service error: {0}")]
    Service(String),

    // -------------------------------------------------------------------------
    // Client-side Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("Request queue cleared")]
    QueueCleared,

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<ValidationError> for PhotomonixError {
    fn from(err: ValidationError) -> Self {
        PhotomonixError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, PhotomonixError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl PhotomonixError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error from a single message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(message))
    }

    /// Typed category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { status, .. } if (400..500).contains(status) => ErrorCategory::Client,
            Self::Http { .. } | Self::Service(_) => ErrorCategory::Server,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Network(_) | Self::Io(_) => ErrorCategory::Network,
            Self::InvalidResponse(_) | Self::Json(_) => ErrorCategory::InvalidResponse,
            Self::Validation(_) | Self::Image(_) => ErrorCategory::Validation,
            Self::QueueCleared => ErrorCategory::Cancelled,
            Self::Config(_) | Self::Auth(_) => ErrorCategory::Config,
            Self::Queue(_) => ErrorCategory::Unknown,
        }
    }

    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        ErrorClassifier::should_retry(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Timeout.to_string(), "TIMEOUT");
        assert_eq!(ErrorCategory::InvalidResponse.to_string(), "INVALID_RESPONSE");
        assert_eq!(ErrorCategory::Client.to_string(), "CLIENT");
    }

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::Server.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::InvalidResponse.is_retryable());
        assert!(ErrorCategory::Unknown.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::Timeout.is_retryable());
        assert!(!ErrorCategory::Validation.is_retryable());
        assert!(!ErrorCategory::Cancelled.is_retryable());
    }

    #[test]
    fn test_http_status_extraction() {
        assert_eq!(ErrorClassifier::http_status("HTTP 503: down"), Some(503));
        assert_eq!(
            ErrorClassifier::http_status("upstream said HTTP 429 slow down"),
            Some(429)
        );
        assert_eq!(ErrorClassifier::http_status("no status here"), None);
        assert_eq!(ErrorClassifier::http_status("HTTP 12: short"), None);
    }

    #[test]
    fn test_classify_messages() {
        assert_eq!(
            ErrorClassifier::classify("HTTP 404: Not Found"),
            ErrorCategory::Client
        );
        assert_eq!(
            ErrorClassifier::classify("HTTP 500: Failed to get suggestions"),
            ErrorCategory::Server
        );
        assert_eq!(
            ErrorClassifier::classify("Request Timeout: analysis took too long"),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorClassifier::classify("connection reset by peer"),
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn test_timeout_text_beats_server_status() {
        assert_eq!(
            ErrorClassifier::classify("HTTP 504: gateway timeout"),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorClassifier::classify("HTTP 408: request timeout"),
            ErrorCategory::Client
        );
        assert!(!ErrorClassifier::should_retry(&PhotomonixError::http(
            504,
            "gateway timeout"
        )));
    }

    #[test]
    fn test_should_retry_typed_errors() {
        assert!(PhotomonixError::http(500, "boom").is_retryable());
        assert!(PhotomonixError::Network("connection refused".into()).is_retryable());
        assert!(PhotomonixError::InvalidResponse("suggestion service".into()).is_retryable());
        assert!(!PhotomonixError::http(404, "missing").is_retryable());
        assert!(!PhotomonixError::http(422, "bad options").is_retryable());
        assert!(
            !PhotomonixError::timeout("Image analysis is taking too long", Duration::from_secs(30))
                .is_retryable()
        );
        assert!(!PhotomonixError::validation("Image file is required").is_retryable());
        assert!(!PhotomonixError::QueueCleared.is_retryable());
    }

    #[test]
    fn test_http_error_display_carries_status() {
        let err = PhotomonixError::http(413, "Payload too large");
        assert_eq!(err.to_string(), "HTTP 413: Payload too large");
        assert_eq!(err.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::from_problems(vec![
            "Image file is required".to_string(),
            "Reference notes must be less than 1000 characters".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Image file is required; Reference notes must be less than 1000 characters"
        );

        let with_field = ValidationError::new("must not be blank").with_field("Background");
        assert_eq!(
            with_field.to_string(),
            "Validation failed for 'Background': must not be blank"
        );
    }
}
