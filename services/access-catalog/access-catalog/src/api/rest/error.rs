use entitle_runtime::Problem;
use tracing::error;

use crate::domain::error::DomainError;

/// Map domain errors to RFC 9457 problems so `?` works in handlers.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::NotFound { .. } | DomainError::ConflictNotFound { .. } => {
                Problem::not_found(e.to_string())
            }
            DomainError::GroupNameTaken { .. }
            | DomainError::ReferencedBy { .. }
            | DomainError::SelfConflict
            | DomainError::ConflictExists { .. } => Problem::conflict(e.to_string()),
            DomainError::Validation { .. } => Problem::validation(e.to_string()),
            DomainError::Database(db_err) => {
                error!(error = %db_err, "database error");
                Problem::internal("an internal database error occurred")
            }
        }
    }
}
