//! Directory record to vCard mapping, both directions.

mod read;
mod telephone;
mod write;

pub use read::{MappedCard, normalize_timestamp};
pub use telephone::telephone_attribute;

use kunai_rfc::rfc::vcard::VCardKind;

use crate::registry::PropertyAttributeRegistry;

/// Per-directory settings the mapper needs besides the registry.
#[derive(Debug, Clone)]
pub struct MapperOptions {
    /// Attribute whose value names the card resource.
    pub entry_id_attribute: String,
    /// Kind used when a record carries none.
    pub default_kind: Option<VCardKind>,
    /// Principal collection, e.g. `/principals/users/`. Cards get an
    /// `X-BW-PRINCIPALHREF` under it when set.
    pub principal_prefix: Option<String>,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            entry_id_attribute: "cn".to_owned(),
            default_kind: None,
            principal_prefix: None,
        }
    }
}

/// Maps directory records to vCards and back through a registry.
#[derive(Debug, Clone, Copy)]
pub struct RecordMapper<'a> {
    registry: &'a PropertyAttributeRegistry,
    options: &'a MapperOptions,
}

impl<'a> RecordMapper<'a> {
    #[must_use]
    pub const fn new(registry: &'a PropertyAttributeRegistry, options: &'a MapperOptions) -> Self {
        Self { registry, options }
    }
}
