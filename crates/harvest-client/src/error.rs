//! # Client Error Types
//!
//! Errors raised while talking to the crop service or acting on the ledger.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Service             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection ↻   │  │  Server{5xx} ↻          │ │
//! │  │  InvalidUrl     │  │  Timeout ↻      │  │  Server{4xx}            │ │
//! │  │  ConfigLoad     │  │  Request        │  │  NotFound, Rejected     │ │
//! │  │                 │  │                 │  │  Decode                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ↻ = retryable (fetch only; mutations are never retried)               │
//! │                                                                         │
//! │  LedgerError wraps a ClientError or a blocked (invalid) submission.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use harvest_core::{CoreError, FieldErrors};
use thiserror::Error;

/// Result type alias for crop service calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a call to the crop service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// API base URL is not http(s).
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Service unreachable.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// No response within the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Request could not be built or sent.
    #[error("Request failed: {0}")]
    Request(String),

    // =========================================================================
    // Service Errors
    // =========================================================================
    /// Non-success HTTP status.
    #[error("Crop service returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server { status: u16, message: Option<String> },

    /// No crop with that id.
    #[error("Crop not found: {0}")]
    NotFound(String),

    /// The service answered but reported `success: false`.
    #[error("Crop service rejected the request{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected(Option<String>),

    /// Response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl ClientError {
    /// Classifies a reqwest failure; `timeout_secs` is the limit that applied.
    pub fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(timeout_secs)
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl ClientError {
    /// Returns true if the call may succeed when repeated.
    ///
    /// ## Retryable Errors
    /// - Connection failures
    /// - Timeouts
    /// - 5xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Connection(_) | ClientError::Timeout(_) => true,
            ClientError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_) | ClientError::InvalidUrl(_) | ClientError::ConfigLoadFailed(_)
        )
    }

    /// The message the service itself supplied, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } | ClientError::Rejected(message) => message.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// Ledger Error
// =============================================================================

/// Failure of a user action on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The form has invalid fields; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for LedgerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => LedgerError::Validation(errors),
            other => LedgerError::Core(other),
        }
    }
}

/// Result type alias for ledger actions.
pub type LedgerResult<T> = Result<T, LedgerError>;
