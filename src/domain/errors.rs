//! Domain errors for the configuration service.

use thiserror::Error;

/// Format a parent chain as a human-readable string: `3 -> 7 -> 3`.
fn format_cycle_path(path: &[i64]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Domain-level errors that can occur in the configuration service.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Dangling reference: {0}")]
    DanglingReference(String),

    #[error("Duplicate association for client {client_id} and config {config_id}")]
    DuplicateAssociation { client_id: i64, config_id: i64 },

    #[error("Client parent cycle detected: {}", format_cycle_path(.0))]
    ParentCycle(Vec<i64>),

    #[error("Client not found: {0}")]
    ClientNotFound(i64),

    #[error("Client type not found: {0}")]
    ClientTypeNotFound(i64),

    #[error("Config not found: {0}")]
    ConfigNotFound(i64),

    #[error("Check-in rejected for unknown client {identifier} of type {client_type}")]
    CheckInRejected { identifier: String, client_type: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Errors caused by the caller's input rather than the store.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_)
                | Self::Conflict(_)
                | Self::DanglingReference(_)
                | Self::DuplicateAssociation { .. }
                | Self::ParentCycle(_)
                | Self::CheckInRejected { .. }
        )
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ClientNotFound(_) | Self::ClientTypeNotFound(_) | Self::ConfigNotFound(_)
        )
    }

    /// Reject empty or whitespace-only required fields.
    pub fn require(field: &str, value: &str) -> DomainResult<()> {
        if value.trim().is_empty() {
            return Err(Self::ValidationFailed(format!("{field} is required")));
        }
        Ok(())
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.message().to_string());
            }
        }
        Self::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_path_formatting() {
        let err = DomainError::ParentCycle(vec![3, 7, 3]);
        assert_eq!(err.to_string(), "Client parent cycle detected: 3 -> 7 -> 3");
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::ValidationFailed("x".into()).is_validation());
        assert!(DomainError::DuplicateAssociation { client_id: 1, config_id: 2 }.is_validation());
        assert!(!DomainError::DatabaseError("x".into()).is_validation());
        assert!(DomainError::ConfigNotFound(4).is_not_found());
        assert!(!DomainError::ConfigNotFound(4).is_validation());
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(DomainError::require("key", "  ").is_err());
        assert!(DomainError::require("key", "feature.enabled").is_ok());
    }
}
