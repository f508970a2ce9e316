use thiserror::Error;

/// Errors raised while loading or checking settings.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    LoadError(#[from] config::ConfigError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
