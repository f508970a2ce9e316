use kunai_rfc::rfc::vcard::core::types;
use kunai_rfc::rfc::vcard::{VCard, VCardProperty, names};
use tracing::debug;

use super::RecordMapper;
use super::telephone::telephone_attribute;
use crate::dn::child_dn;
use crate::error::{MappingError, MappingResult};
use crate::record::DirRecord;

impl RecordMapper<'_> {
    /// ## Summary
    /// Builds the directory record for a new card under `parent_dn`.
    ///
    /// Value mappings are stamped unconditionally. Each simple property
    /// mapping takes the first matching property of the card, and telephone
    /// numbers go through [`telephone_attribute`].
    ///
    /// The entry is named by the first value of the configured entry-id
    /// attribute. A record without one comes back without a DN and the
    /// caller names it.
    ///
    /// ## Errors
    /// Returns [`MappingError::MissingRequiredProperty`] when a required
    /// mapping has no property. Nothing is returned on failure.
    pub fn write_record(&self, card: &VCard, parent_dn: &str) -> MappingResult<DirRecord> {
        let kind = card.kind();
        let mut record = DirRecord::new();

        for stamp in self.registry.value_mappings() {
            record.add_value(&stamp.attribute_id, stamp.value.clone());
        }

        for mapping in self
            .registry
            .property_mappings_for_kind(&kind)
            .filter(|m| m.is_simple())
        {
            match card
                .get_value(&mapping.property_name)
                .filter(|v| !v.is_empty())
            {
                Some(value) => record.add_value(&mapping.attribute_id, value),
                None if mapping.required => {
                    return Err(MappingError::MissingRequiredProperty {
                        property: mapping.property_name.clone(),
                        attribute: mapping.attribute_id.clone(),
                    });
                }
                None => {}
            }
        }

        for tel in card.get_properties(names::TEL) {
            match telephone_target(tel) {
                Some(attribute) => record.add_value(attribute, tel.value.clone()),
                None => debug!(group = ?tel.group, "No directory attribute for telephone"),
            }
        }

        let naming = &self.options.entry_id_attribute;
        let Some(name) = record.first(naming).map(str::to_owned) else {
            debug!(%naming, attributes = record.attributes.len(), "Mapped card without naming value");
            return Ok(record);
        };
        let dn = child_dn(naming, &name, parent_dn);
        debug!(%dn, attributes = record.attributes.len(), "Mapped card to directory record");

        Ok(record.with_dn(dn))
    }
}

/// Group from the property group or a HOME/WORK TYPE, TYPE from the first
/// other TYPE value.
fn telephone_target(tel: &VCardProperty) -> Option<&'static str> {
    let type_values: Vec<&str> = tel
        .get_param("TYPE")
        .map(|p| p.values.iter().map(String::as_str).collect())
        .unwrap_or_default();
    let is_place =
        |v: &str| v.eq_ignore_ascii_case(types::HOME) || v.eq_ignore_ascii_case(types::WORK);

    let group = tel
        .group
        .as_deref()
        .or_else(|| type_values.iter().copied().find(|v| is_place(v)));
    let tel_type = type_values.iter().copied().find(|v| !is_place(v));

    telephone_attribute(group, tel_type)
}
