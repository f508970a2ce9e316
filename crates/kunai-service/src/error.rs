use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] kunai_db::error::DbError),

    #[error(transparent)]
    DirectoryError(#[from] kunai_directory::error::DirectoryError),

    #[error(transparent)]
    CompileError(#[from] kunai_rfc::rfc::query::CompileError),

    #[error(transparent)]
    CoreError(#[from] kunai_core::error::CoreError),

    #[error("No addressbook directory serves {0}")]
    NotFound(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Directory {directory} is not {expected}")]
    WrongBackend {
        directory: String,
        expected: &'static str,
    },
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
