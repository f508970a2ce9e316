//! Address object creation and rendering across backends.

use kunai_db::map::carddav::{DbCardEntry, build_card, card_to_vcard};
use kunai_directory::error::DirectoryError;
use kunai_directory::map::MappedCard;
use kunai_directory::record::DirRecord;
use kunai_rfc::rfc::vcard::{VCard, VCardKind, VCardProperty, names};
use serde::Serialize;

use crate::backend::{BackendRegistry, DirectoryBackend};
use crate::error::{ServiceError, ServiceResult};

/// A card in the shape its backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoredCard {
    Ldap(DirRecord),
    Db(DbCardEntry),
}

/// Joins an addressbook path and a resource name, escaping spaces in the name.
fn resource_path(path: &str, name: &str) -> String {
    format!(
        "{}/{}",
        path.trim_end_matches('/'),
        name.replace(' ', "%20")
    )
}

/// ## Summary
/// Builds the backend record for a new card in the addressbook at `path`.
///
/// LDAP records are named under the directory's base DN. Relational cards
/// take `name` as resource name, or `<uid>.vcf`, and the directory's default
/// kind when the card states none.
///
/// ## Side Effects
/// None; the caller writes the returned record.
///
/// ## Errors
/// Returns [`ServiceError::NotFound`] when no backend serves `path`,
/// [`ServiceError::DirectoryError`] when the card misses a property the
/// directory requires, and [`ServiceError::DatabaseError`] when it has no `FN`
/// for a relational directory.
#[tracing::instrument(skip(backends, card), fields(
    uid = ?card.uid(),
    properties = card.properties.len()
))]
pub fn create_card(
    backends: &BackendRegistry,
    path: &str,
    name: Option<&str>,
    card: &VCard,
) -> ServiceResult<StoredCard> {
    let stored = match backends.resolve(path)? {
        DirectoryBackend::Ldap(ldap) => {
            let record = backends
                .record_mapper(ldap)
                .write_record(card, &ldap.base_dn)
                .map_err(DirectoryError::from)?;
            StoredCard::Ldap(record)
        }
        DirectoryBackend::Db(db) => {
            let entry = match &db.default_kind {
                Some(kind) if !card.has_property(names::KIND) => {
                    let mut card = card.clone();
                    card.add_property(VCardProperty::text(names::KIND, kind.as_str()));
                    build_card(path, name, &card)?
                }
                _ => build_card(path, name, card)?,
            };
            StoredCard::Db(entry)
        }
    };

    tracing::debug!("Built card for storage");
    Ok(stored)
}

/// ## Summary
/// Renders a stored card as a vCard with resource metadata.
///
/// LDAP cards get a `SOURCE` pointing at their resource under `path`.
///
/// ## Errors
/// Returns [`ServiceError::NotFound`] when no backend serves `path` and
/// [`ServiceError::WrongBackend`] when `stored` comes from another kind of
/// backend.
#[tracing::instrument(skip(backends, stored))]
pub fn read_card(
    backends: &BackendRegistry,
    path: &str,
    stored: &StoredCard,
) -> ServiceResult<MappedCard> {
    match (backends.resolve(path)?, stored) {
        (DirectoryBackend::Ldap(ldap), StoredCard::Ldap(record)) => {
            let source = record
                .first(&ldap.mapper_options.entry_id_attribute)
                .map(|id| resource_path(path, &format!("{id}.vcf")));
            Ok(backends
                .record_mapper(ldap)
                .read_card(record, source.as_deref()))
        }
        (DirectoryBackend::Db(_), StoredCard::Db(entry)) => Ok(MappedCard {
            name: Some(entry.card.name.clone()),
            kind: VCardKind::parse(&entry.card.kind),
            card: card_to_vcard(entry),
            created: None,
            last_modified: None,
        }),
        (backend, _) => Err(ServiceError::WrongBackend {
            directory: backend.name().to_owned(),
            expected: match stored {
                StoredCard::Ldap(_) => "ldap",
                StoredCard::Db(_) => "relational",
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_path_joins_once() {
        assert_eq!(resource_path("/people", "a.vcf"), "/people/a.vcf");
        assert_eq!(resource_path("/people/", "a.vcf"), "/people/a.vcf");
        assert_eq!(resource_path("/people", "Jane Doe.vcf"), "/people/Jane%20Doe.vcf");
    }
}
