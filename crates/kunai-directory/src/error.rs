use thiserror::Error;

/// Errors raised while building a [`crate::registry::PropertyAttributeRegistry`].
///
/// All of them are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("KIND is already mapped to {existing}; cannot map it to {attribute}")]
    DuplicateKindMapping { existing: String, attribute: String },

    #[error("Attribute {attribute} is already mapped for {property}")]
    DuplicateMapping { attribute: String, property: String },

    #[error("Value {value} is already stamped on attribute {attribute}")]
    DuplicateValue { attribute: String, value: String },

    #[error("Attribute id must not be empty")]
    EmptyAttributeId,

    #[error("Property name for attribute {attribute} must not be empty")]
    EmptyPropertyName { attribute: String },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Errors raised while turning a vCard into a directory record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Missing required property {property} (attribute {attribute})")]
    MissingRequiredProperty { property: String, attribute: String },
}

pub type MappingResult<T> = std::result::Result<T, MappingError>;

/// Registry or mapping failures, as seen by callers of the directory layer.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}
