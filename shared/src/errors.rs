use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Result not found: {0}")]
    ResultNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{op}: deadline of {after:?} exceeded")]
    Timeout { op: &'static str, after: Duration },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Caller-facing classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    /// The write collides with an existing row.
    Conflict,
    /// The write violates a storage constraint other than uniqueness.
    InvalidState,
    /// The store could not be reached; retrying later may succeed.
    Unavailable,
    DeadlineExceeded,
    Internal,
}

impl ServiceError {
    pub fn database(op: &'static str, source: sqlx::Error) -> Self {
        ServiceError::Database { op, source }
    }

    /// Operation tag of a storage or deadline failure.
    pub fn op(&self) -> Option<&'static str> {
        match self {
            ServiceError::Database { op, .. } | ServiceError::Timeout { op, .. } => Some(op),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::GameNotFound(_) | ServiceError::ResultNotFound(_) => ErrorKind::NotFound,
            ServiceError::Validation(_) => ErrorKind::InvalidArgument,
            ServiceError::Database { source, .. } => classify_sqlx(source),
            ServiceError::Timeout { .. } => ErrorKind::DeadlineExceeded,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }
}

fn classify_sqlx(err: &sqlx::Error) -> ErrorKind {
    use sqlx::error::ErrorKind as DbErrorKind;

    match err {
        sqlx::Error::Database(db) => match db.kind() {
            DbErrorKind::UniqueViolation => ErrorKind::Conflict,
            DbErrorKind::ForeignKeyViolation
            | DbErrorKind::NotNullViolation
            | DbErrorKind::CheckViolation => ErrorKind::InvalidState,
            _ => ErrorKind::Internal,
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ErrorKind::Unavailable,
        _ => ErrorKind::Internal,
    }
}

impl From<ServiceError> for tonic::Status {
    fn from(err: ServiceError) -> Self {
        let msg = err.to_string();
        match err.kind() {
            ErrorKind::InvalidArgument => tonic::Status::invalid_argument(msg),
            ErrorKind::NotFound => tonic::Status::not_found(msg),
            ErrorKind::Conflict => tonic::Status::already_exists(msg),
            ErrorKind::InvalidState => tonic::Status::failed_precondition(msg),
            ErrorKind::Unavailable => tonic::Status::unavailable(msg),
            ErrorKind::DeadlineExceeded => tonic::Status::deadline_exceeded(msg),
            ErrorKind::Internal => tonic::Status::internal(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
