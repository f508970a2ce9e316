use std::collections::BTreeMap;

use tracing::debug;

use super::mapping::{AttributeMapping, PropertyMapping, ValueMapping};
use super::PropertyAttributeRegistry;
use crate::error::{RegistryError, RegistryResult};

/// Collects mappings before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    mappings: Vec<AttributeMapping>,
    by_property: BTreeMap<String, Vec<usize>>,
    kind_mapping: Option<usize>,
    default_attributes: Vec<String>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Records a literal attribute value stamped on created records.
    ///
    /// ## Errors
    /// Returns [`RegistryError::EmptyAttributeId`] or
    /// [`RegistryError::DuplicateValue`] for an already stamped pair.
    pub fn register_value(
        &mut self,
        attribute_id: impl Into<String>,
        value: impl Into<String>,
    ) -> RegistryResult<&mut Self> {
        let mapping = ValueMapping {
            attribute_id: attribute_id.into(),
            value: value.into(),
        };
        if mapping.attribute_id.trim().is_empty() {
            return Err(RegistryError::EmptyAttributeId);
        }

        let duplicate = self
            .mappings
            .iter()
            .filter_map(AttributeMapping::as_value)
            .any(|v| {
                v.attribute_id.eq_ignore_ascii_case(&mapping.attribute_id)
                    && v.value.eq_ignore_ascii_case(&mapping.value)
            });
        if duplicate {
            return Err(RegistryError::DuplicateValue {
                attribute: mapping.attribute_id,
                value: mapping.value,
            });
        }

        self.mappings.push(AttributeMapping::Value(mapping));
        Ok(self)
    }

    /// ## Summary
    /// Records a property mapping.
    ///
    /// Property, group and parameter names are uppercased. The attribute
    /// joins the default fetch list. The first mapping for `KIND` becomes
    /// the Kind mapping.
    ///
    /// ## Errors
    /// Returns [`RegistryError::EmptyAttributeId`],
    /// [`RegistryError::EmptyPropertyName`], [`RegistryError::DuplicateMapping`]
    /// when the attribute is already registered for the same group and
    /// parameter variant, or [`RegistryError::DuplicateKindMapping`].
    pub fn register_property(&mut self, mut mapping: PropertyMapping) -> RegistryResult<&mut Self> {
        mapping.property_name.make_ascii_uppercase();
        if let Some(group) = &mut mapping.group {
            group.make_ascii_uppercase();
        }
        if let Some(param) = &mut mapping.param_name {
            param.make_ascii_uppercase();
        }

        if mapping.attribute_id.trim().is_empty() {
            return Err(RegistryError::EmptyAttributeId);
        }
        if mapping.property_name.trim().is_empty() {
            return Err(RegistryError::EmptyPropertyName {
                attribute: mapping.attribute_id,
            });
        }

        let key = mapping.variant_key();
        if let Some(existing) = self
            .mappings
            .iter()
            .filter_map(AttributeMapping::as_property)
            .find(|m| m.variant_key() == key)
        {
            return Err(RegistryError::DuplicateMapping {
                attribute: mapping.attribute_id,
                property: existing.property_name.clone(),
            });
        }

        let index = self.mappings.len();
        if mapping.is_kind() {
            if let Some(existing) = self
                .kind_mapping
                .and_then(|i| self.mappings.get(i))
                .map(AttributeMapping::attribute_id)
            {
                return Err(RegistryError::DuplicateKindMapping {
                    existing: existing.to_owned(),
                    attribute: mapping.attribute_id,
                });
            }
            self.kind_mapping = Some(index);
        }

        debug!(
            attribute = %mapping.attribute_id,
            property = %mapping.property_name,
            group = ?mapping.group,
            param = ?mapping.param_value,
            "Registering property mapping"
        );

        self.by_property
            .entry(mapping.property_name.clone())
            .or_default()
            .push(index);
        self.push_default_attribute(&mapping.attribute_id);
        self.mappings.push(AttributeMapping::Property(mapping));
        Ok(self)
    }

    /// ## Summary
    /// Adds an attribute fetched on every search without a property mapping.
    ///
    /// ## Errors
    /// Returns [`RegistryError::EmptyAttributeId`].
    pub fn add_default_attribute(
        &mut self,
        attribute_id: impl Into<String>,
    ) -> RegistryResult<&mut Self> {
        let attribute_id = attribute_id.into();
        if attribute_id.trim().is_empty() {
            return Err(RegistryError::EmptyAttributeId);
        }
        self.push_default_attribute(&attribute_id);
        Ok(self)
    }

    fn push_default_attribute(&mut self, attribute_id: &str) {
        if !self
            .default_attributes
            .iter()
            .any(|a| a.eq_ignore_ascii_case(attribute_id))
        {
            self.default_attributes.push(attribute_id.to_owned());
        }
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> PropertyAttributeRegistry {
        PropertyAttributeRegistry {
            mappings: self.mappings,
            by_property: self.by_property,
            kind_mapping: self.kind_mapping,
            default_attributes: self.default_attributes,
        }
    }
}
