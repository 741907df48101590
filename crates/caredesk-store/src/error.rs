//! Collaborator error types.
//!
//! Error definitions with transient/permanent classification. The import
//! engine's retry policy keys off these structured kinds first and only
//! falls back to message-pattern matching for opaque upstream errors.

use thiserror::Error;

/// Errors from the key-path document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store is temporarily unreachable.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    /// Request timed out.
    #[error("store timeout after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Caller lacks permission for the path.
    #[error("permission denied for path '{path}'")]
    PermissionDenied { path: String },

    /// Value at the path could not be (de)serialized.
    #[error("invalid data at '{path}': {message}")]
    InvalidData { path: String, message: String },

    /// Anything else.
    #[error("store operation failed: {message}")]
    Operation { message: String },
}

impl StoreError {
    /// Whether the operation may succeed if retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable { .. } | StoreError::Timeout { .. }
        )
    }

    /// Stable code for classification and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
            StoreError::Timeout { .. } => "STORE_TIMEOUT",
            StoreError::PermissionDenied { .. } => "STORE_PERMISSION_DENIED",
            StoreError::InvalidData { .. } => "STORE_INVALID_DATA",
            StoreError::Operation { .. } => "STORE_OPERATION_FAILED",
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }

    /// Create an invalid-data error.
    pub fn invalid_data(path: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::InvalidData {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Provider is temporarily unreachable or rate limiting.
    #[error("identity provider unavailable: {message}")]
    Unavailable { message: String },

    /// Too many requests in a short window.
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    /// An account with this email already exists.
    #[error("email already in use: {email}")]
    EmailAlreadyInUse { email: String },

    /// Credentials were rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Caller is not allowed to perform the operation.
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// Email or password failed provider-side validation.
    #[error("invalid credential data: {message}")]
    InvalidData { message: String },

    /// Anything else.
    #[error("identity operation failed: {message}")]
    Operation { message: String },
}

impl IdentityError {
    /// Whether the operation may succeed if retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            IdentityError::Unavailable { .. } | IdentityError::RateLimited { .. }
        )
    }

    /// Stable code for classification and logging.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            IdentityError::Unavailable { .. } => "IDENTITY_UNAVAILABLE",
            IdentityError::RateLimited { .. } => "IDENTITY_RATE_LIMITED",
            IdentityError::EmailAlreadyInUse { .. } => "IDENTITY_EMAIL_IN_USE",
            IdentityError::AuthenticationFailed => "IDENTITY_AUTH_FAILED",
            IdentityError::PermissionDenied { .. } => "IDENTITY_PERMISSION_DENIED",
            IdentityError::InvalidData { .. } => "IDENTITY_INVALID_DATA",
            IdentityError::Operation { .. } => "IDENTITY_OPERATION_FAILED",
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        IdentityError::Unavailable {
            message: message.into(),
        }
    }
}

/// Errors from the notification side-channel.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Delivery failed; callers treat notifications as best-effort.
    #[error("notification delivery failed: {message}")]
    Delivery { message: String },
}
