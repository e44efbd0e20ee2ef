//! Service error types

use agora_core::DomainError;
use validator::ValidationErrors;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service layer errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Field-level validation failure, reported to the submitter only
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Non-recoverable rejection (e.g. editing another user's message)
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ServiceError {
    /// Create a not-found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Check whether this error should be shown as field errors on a form
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ServiceError::not_found("Message", "abc");
        assert_eq!(err.to_string(), "Message not found: abc");
        assert!(!err.is_validation());
    }
}
