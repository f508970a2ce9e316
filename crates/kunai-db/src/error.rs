use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Placeholder mismatch: {0}")]
    PlaceholderMismatch(String),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
