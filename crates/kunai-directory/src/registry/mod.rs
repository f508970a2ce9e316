//! Bidirectional vCard property to directory attribute registry.
//!
//! A [`RegistryBuilder`] collects mappings at startup and produces an
//! immutable [`PropertyAttributeRegistry`], shared behind an `Arc` by every
//! compiler and record mapper afterwards.

mod builder;
mod mapping;
mod schema_class;
mod standard;

pub use builder::RegistryBuilder;
pub use mapping::{AttributeMapping, PropertyMapping, ValueMapping};
pub use schema_class::kind_for_schema_class;
pub use standard::populate_standard;

use std::collections::BTreeMap;

use kunai_rfc::rfc::vcard::VCardKind;

/// Immutable attribute registry.
#[derive(Debug, Clone)]
pub struct PropertyAttributeRegistry {
    mappings: Vec<AttributeMapping>,
    /// Uppercased property name to indices into `mappings`, registration order.
    by_property: BTreeMap<String, Vec<usize>>,
    kind_mapping: Option<usize>,
    default_attributes: Vec<String>,
}

impl PropertyAttributeRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// All mappings in registration order.
    #[must_use]
    pub fn mappings(&self) -> &[AttributeMapping] {
        &self.mappings
    }

    pub fn value_mappings(&self) -> impl Iterator<Item = &ValueMapping> {
        self.mappings.iter().filter_map(AttributeMapping::as_value)
    }

    pub fn property_mappings(&self) -> impl Iterator<Item = &PropertyMapping> {
        self.mappings.iter().filter_map(AttributeMapping::as_property)
    }

    /// The mapping designated to carry the vCard `KIND`.
    #[must_use]
    pub fn kind_mapping(&self) -> Option<&PropertyMapping> {
        self.kind_mapping
            .and_then(|i| self.mappings.get(i))
            .and_then(AttributeMapping::as_property)
    }

    /// Attributes fetched on every search, in first-registration order.
    #[must_use]
    pub fn default_attributes(&self) -> &[String] {
        &self.default_attributes
    }

    /// Default attributes followed by any `extra` ones not already listed.
    #[must_use]
    pub fn fetch_attributes(&self, extra: &[String]) -> Vec<String> {
        let mut attributes = self.default_attributes.clone();
        for attr in extra {
            if !attributes.iter().any(|a| a.eq_ignore_ascii_case(attr)) {
                attributes.push(attr.clone());
            }
        }
        attributes
    }

    fn mappings_for(&self, property: &str) -> impl Iterator<Item = &PropertyMapping> {
        self.by_property
            .get(&property.to_ascii_uppercase())
            .into_iter()
            .flatten()
            .filter_map(|&i| self.mappings.get(i))
            .filter_map(AttributeMapping::as_property)
    }

    /// ## Summary
    /// Attribute of the first ungrouped, unparameterized mapping for a property.
    ///
    /// Property names compare case-insensitively.
    #[must_use]
    pub fn lookup_attribute_for_simple_property(&self, property: &str) -> Option<&str> {
        self.mappings_for(property)
            .find(|m| m.is_simple())
            .map(|m| m.attribute_id.as_str())
    }

    /// ## Summary
    /// Every attribute mapped to a property across all group and parameter
    /// variants, deduplicated, in registration order.
    #[must_use]
    pub fn lookup_attributes_for_property(&self, property: &str) -> Vec<&str> {
        let mut attributes: Vec<&str> = Vec::new();
        for mapping in self.mappings_for(property) {
            let attr = mapping.attribute_id.as_str();
            if !attributes.iter().any(|a| a.eq_ignore_ascii_case(attr)) {
                attributes.push(attr);
            }
        }
        attributes
    }

    /// Property mappings whose applicable kinds admit `kind`.
    pub fn property_mappings_for_kind<'a>(
        &'a self,
        kind: &'a VCardKind,
    ) -> impl Iterator<Item = &'a PropertyMapping> + 'a {
        self.property_mappings().filter(move |m| m.applies_to(kind))
    }

    /// Kind implied by a directory schema class such as `inetOrgPerson`.
    #[must_use]
    pub fn kind_for_schema_class(&self, class: &str) -> Option<VCardKind> {
        kind_for_schema_class(class)
    }
}

#[cfg(test)]
mod registry_tests;
