use thiserror::Error;

/// Application-level errors (command layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] kunai_service::error::ServiceError),

    #[error(transparent)]
    RegistryError(#[from] kunai_directory::error::RegistryError),

    #[error("Failed to read {path}: {source}")]
    InputError {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed JSON input: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
