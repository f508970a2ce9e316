use thiserror::Error;

/// RFC model and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Unsupported collation: {0}")]
    UnsupportedCollation(String),

    #[error("Unknown match type: {0}")]
    UnknownMatchType(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
