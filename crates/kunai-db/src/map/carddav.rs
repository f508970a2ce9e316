//! DB <-> vCard mapping helpers.

use kunai_rfc::rfc::vcard::{VCard, VCardKind, VCardProperty, names};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::model::card::{DbCard, DbCardProperty, encode_params};

/// A card row together with its ordered property rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbCardEntry {
    pub card: DbCard,
    pub properties: Vec<DbCardProperty>,
}

/// ## Summary
/// Builds the rows storing `vcard` in the addressbook at `parent_path`.
///
/// `KIND` defaults to individual and a missing `UID` is generated. The
/// resource name defaults to `<uid>.vcf`. Every property becomes a row, in
/// card order.
///
/// ## Errors
/// Returns [`DbError::ValidationError`] when the card has no `FN`.
pub fn build_card(parent_path: &str, name: Option<&str>, vcard: &VCard) -> DbResult<DbCardEntry> {
    let fn_ = vcard
        .formatted_name()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DbError::ValidationError("vCard has no FN property".to_owned()))?;
    let kind = vcard
        .get_value(names::KIND)
        .map_or(VCardKind::Individual, VCardKind::parse);
    let uid = vcard
        .uid()
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    let card = DbCard {
        id: Uuid::now_v7(),
        parent_path: parent_path.to_owned(),
        name: name.map_or_else(|| format!("{uid}.vcf"), str::to_owned),
        uid,
        fn_: fn_.to_owned(),
        kind: kind.as_str().to_owned(),
    };

    let properties = vcard
        .properties
        .iter()
        .zip(0_i32..)
        .map(|(prop, position)| DbCardProperty {
            id: Uuid::now_v7(),
            card_id: card.id,
            position,
            group_name: prop.group.clone(),
            name: prop.name.to_ascii_uppercase(),
            value: prop.value.clone(),
            params: encode_params(&prop.params),
        })
        .collect();

    tracing::debug!(uid = %card.uid, name = %card.name, "Built card rows");

    Ok(DbCardEntry { card, properties })
}

/// ## Summary
/// Rebuilds the vCard from stored property rows, ordered by position.
#[must_use]
pub fn card_to_vcard(entry: &DbCardEntry) -> VCard {
    let mut rows: Vec<&DbCardProperty> = entry.properties.iter().collect();
    rows.sort_by_key(|row| row.position);

    VCard::from_properties(
        rows.into_iter()
            .map(|row| {
                let mut prop = match &row.group_name {
                    Some(group) => VCardProperty::grouped_text(group, &row.name, &row.value),
                    None => VCardProperty::text(&row.name, &row.value),
                };
                prop.params = row.parameters();
                prop
            })
            .collect(),
    )
}
