use thiserror::Error;

/// Failures raised by the persistence gateway.
///
/// A missing record is not an error here; see `SoftDeleteOutcome::NotFound`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),
    #[error("{0}")]
    Operation(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Operation(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
