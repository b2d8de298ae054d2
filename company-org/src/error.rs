//! Error types for company operations
//!
//! Every service call fails with a `CompanyError`. Each variant maps to an
//! HTTP-equivalent status code and renders a field-keyed body, so a host can
//! turn it into a response without any extra logic.

use serde_json::json;
use thiserror::Error;

/// Key used for errors that do not belong to a single input field.
pub const NON_FIELD_ERRORS: &str = "non_field_error";

/// Company management error types.
#[derive(Debug, Error)]
pub enum CompanyError {
    /// Input failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending input field
        field: String,
        /// Human-readable reason
        message: String,
    },

    /// Caller lacks the required role
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A precondition of the operation does not hold
    #[error("{0}")]
    Conflict(String),

    /// Resource is absent or not in a state that can be acted on
    #[error("Not found: {0}")]
    NotFound(String),

    /// Status change not allowed from the current state
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for company operations.
pub type CompanyResult<T> = Result<T, CompanyError>;

impl CompanyError {
    /// Shorthand for a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CompanyError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, CompanyError::Storage(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CompanyError::Validation { .. }
            | CompanyError::Conflict(_)
            | CompanyError::InvalidTransition { .. } => 400,
            CompanyError::PermissionDenied(_) => 403,
            CompanyError::NotFound(_) => 404,
            CompanyError::Storage(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            CompanyError::Validation { .. } => "VALIDATION_ERROR",
            CompanyError::PermissionDenied(_) => "PERMISSION_DENIED",
            CompanyError::Conflict(_) => "CONFLICT",
            CompanyError::NotFound(_) => "NOT_FOUND",
            CompanyError::InvalidTransition { .. } => "INVALID_TRANSITION",
            CompanyError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Render the response body.
    ///
    /// Validation errors are keyed by field, precondition failures by
    /// `non_field_error`, everything else carries a `detail` message.
    ///
    /// # Examples
    ///
    /// ```
    /// use company_org::CompanyError;
    ///
    /// let err = CompanyError::Conflict("Cannot block the company owner".into());
    /// assert_eq!(
    ///     err.to_body()["non_field_error"][0],
    ///     "Cannot block the company owner"
    /// );
    /// ```
    pub fn to_body(&self) -> serde_json::Value {
        match self {
            CompanyError::Validation { field, message } => json!({ field.as_str(): [message] }),
            CompanyError::Conflict(message) => json!({ NON_FIELD_ERRORS: [message] }),
            CompanyError::InvalidTransition { .. } => {
                json!({ NON_FIELD_ERRORS: [self.to_string()] })
            }
            CompanyError::PermissionDenied(message) | CompanyError::NotFound(message) => {
                json!({ "detail": message })
            }
            CompanyError::Storage(_) => json!({ "detail": "Internal server error" }),
        }
    }
}
