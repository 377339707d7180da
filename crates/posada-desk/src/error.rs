use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("Room not found: {id}")]
    RoomNotFound { id: String },

    #[error("Rental not found: {id}")]
    RentalNotFound { id: String },

    #[error("Reservation not found: {id}")]
    ReservationNotFound { id: String },

    #[error("Room {number} is not available (currently {state})")]
    RoomUnavailable { number: String, state: String },

    #[error("Rental {id} is already closed")]
    RentalAlreadyClosed { id: String },

    #[error("Invalid {entity} state transition from {from} to {to}")]
    InvalidStateTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Database error during {operation}: {source}")]
    Database {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Coarse error taxonomy surfaced to the view layer for presentation/retry
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    Validation,
    Internal,
}

impl DeskError {
    pub fn database(operation: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskError::RoomNotFound { .. }
            | DeskError::RentalNotFound { .. }
            | DeskError::ReservationNotFound { .. } => ErrorKind::NotFound,
            DeskError::RoomUnavailable { .. }
            | DeskError::RentalAlreadyClosed { .. }
            | DeskError::InvalidStateTransition { .. } => ErrorKind::InvalidState,
            DeskError::Validation { .. } => ErrorKind::Validation,
            DeskError::Database { .. } | DeskError::Migration(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = DeskError::RoomNotFound {
            id: "abc".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = DeskError::RentalAlreadyClosed {
            id: "abc".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let err = DeskError::validation("hours", "must be at least 1");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
