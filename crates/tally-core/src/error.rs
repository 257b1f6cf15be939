use thiserror::Error;

/// Application-wide error types for Tally.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request payload failed a business-rule check.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation conflicts with existing state (duplicate key, referenced row).
    #[error("{0}")]
    Conflict(String),

    /// Entity lookup came up empty.
    #[error("{0}")]
    NotFound(String),

    /// Login failed: unknown email, wrong password, or inactive account.
    /// Deliberately carries no detail about which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, malformed, expired, or wrong scope.
    #[error("Token error: {0}")]
    TokenError(String),

    /// Authenticated but lacking the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Password hashing/verification failed at the library level.
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Missing or invalid configuration.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if this error is the caller's fault (4xx-class) rather
    /// than a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Conflict(_)
                | AppError::NotFound(_)
                | AppError::InvalidCredentials
                | AppError::TokenError(_)
                | AppError::Forbidden(_)
        )
    }

    /// Returns true if the error should be answered without revealing detail
    /// beyond a generic 401 (credential and token failures).
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials | AppError::TokenError(_)
        )
    }
}
