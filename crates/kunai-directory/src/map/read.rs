use chrono::{DateTime, NaiveDateTime};
use kunai_rfc::rfc::vcard::{VCard, VCardKind, VCardParameter, VCardProperty, names};
use serde::Serialize;
use tracing::trace;

use super::RecordMapper;
use crate::dn::ldap_url;
use crate::record::DirRecord;
use crate::registry::PropertyMapping;

/// A directory record rendered as a vCard, with resource metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedCard {
    /// Resource name, `<entry id>.vcf`.
    pub name: Option<String>,
    pub kind: VCardKind,
    pub card: VCard,
    /// `YYYYMMDDTHHMMSSZ`
    pub created: Option<String>,
    /// `YYYYMMDDTHHMMSSZ`; the creation time when the record has no
    /// modification time.
    pub last_modified: Option<String>,
}

impl RecordMapper<'_> {
    /// ## Summary
    /// Renders a directory record as an ordered vCard property list.
    ///
    /// Mapped attributes that are absent are skipped, required or not. `source`
    /// is the URL the card is served from and becomes the `SOURCE` property.
    /// `MEMBER` values are rendered as URIs.
    #[must_use]
    pub fn read_card(&self, record: &DirRecord, source: Option<&str>) -> MappedCard {
        let (kind, stated) = self.resolve_kind(record);

        let mut card = VCard::new();
        if stated {
            card.add_property(VCardProperty::text(names::KIND, kind.as_str()));
        }

        for mapping in self.registry.property_mappings_for_kind(&kind) {
            if mapping.is_kind() {
                continue;
            }
            let is_member = mapping.property_name == names::MEMBER;
            for value in record
                .values(&mapping.attribute_id)
                .iter()
                .filter(|v| !v.is_empty())
            {
                if is_member {
                    card.add_property(mapped_property(mapping, &member_uri(value)));
                } else {
                    card.add_property(mapped_property(mapping, value));
                }
            }
        }

        add_derived_properties(record, source, &mut card);

        let entry_id = record.first(&self.options.entry_id_attribute);
        if let (Some(prefix), Some(account)) = (&self.options.principal_prefix, entry_id)
            && !card.has_property(names::X_BW_PRINCIPALHREF)
        {
            card.add_property(VCardProperty::text(
                names::X_BW_PRINCIPALHREF,
                principal_href(prefix, account),
            ));
        }

        let created = record.first("createTimestamp").and_then(normalize_timestamp);
        let last_modified = record
            .first("modifyTimestamp")
            .and_then(normalize_timestamp)
            .or_else(|| created.clone());
        let mapped = MappedCard {
            name: entry_id.map(|id| format!("{id}.vcf")),
            kind,
            card,
            created,
            last_modified,
        };
        trace!(
            dn = ?record.dn,
            kind = %mapped.kind,
            properties = mapped.card.properties.len(),
            "Mapped directory record"
        );
        mapped
    }

    /// Kind attribute, then schema class, then configured default.
    /// The flag tells whether the kind was stated rather than assumed.
    fn resolve_kind(&self, record: &DirRecord) -> (VCardKind, bool) {
        if let Some(kind) = self
            .registry
            .kind_mapping()
            .and_then(|m| record.first(&m.attribute_id))
        {
            return (VCardKind::parse(kind), true);
        }

        if let Some(kind) = record
            .values("objectClass")
            .iter()
            .find_map(|class| self.registry.kind_for_schema_class(class))
        {
            return (kind, true);
        }

        match &self.options.default_kind {
            Some(kind) => (kind.clone(), true),
            None => (VCardKind::Individual, false),
        }
    }
}

fn mapped_property(mapping: &PropertyMapping, value: &str) -> VCardProperty {
    let mut prop = match &mapping.group {
        Some(group) => VCardProperty::grouped_text(group, &mapping.property_name, value),
        None => VCardProperty::text(&mapping.property_name, value),
    };
    if let (Some(name), Some(param_value)) = (&mapping.param_name, &mapping.param_value) {
        prop.add_param(VCardParameter::new(name, param_value));
    }
    prop
}

/// Member values as URIs: addresses become `mailto:`, DNs LDAP URLs.
fn member_uri(value: &str) -> String {
    let has_mailto = value
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mailto:"));
    if has_mailto {
        value.to_owned()
    } else if value.contains('=') {
        ldap_url(value)
    } else if value.contains('@') {
        format!("mailto:{value}")
    } else {
        value.to_owned()
    }
}

/// `<prefix>/<account>/` with single separators.
fn principal_href(prefix: &str, account: &str) -> String {
    format!(
        "{}/{}/",
        prefix.trim_end_matches('/'),
        account.trim_matches('/')
    )
}

fn add_derived_properties(record: &DirRecord, source: Option<&str>, card: &mut VCard) {
    if !card.has_property(names::UID) {
        let uid = record
            .first("entryUUID")
            .map(str::to_owned)
            .or_else(|| record.dn.as_deref().map(ldap_url));
        if let Some(uid) = uid {
            card.add_property(VCardProperty::text(names::UID, uid));
        }
    }

    let surname = record.first("sn");
    let given = record.first("givenName");

    if !card.has_property(names::N) && (surname.is_some() || given.is_some()) {
        let n = format!(
            "{};{};;;",
            surname.unwrap_or_default(),
            given.unwrap_or_default()
        );
        card.add_property(VCardProperty::text(names::N, n));
    }

    if !card.has_property(names::NICKNAME) {
        let nickname: Vec<&str> = [given, surname].into_iter().flatten().collect();
        if !nickname.is_empty() {
            card.add_property(VCardProperty::text(names::NICKNAME, nickname.join(" ")));
        }
    }

    if !card.has_property(names::CALADRURI)
        && let Some(mail) = record.first("mail")
    {
        card.add_property(VCardProperty::text(names::CALADRURI, format!("mailto:{mail}")));
    }

    if let Some(source) = source.filter(|_| !card.has_property(names::SOURCE)) {
        card.add_property(VCardProperty::text(names::SOURCE, source));
    }
}

/// ## Summary
/// Normalizes an LDAP `GeneralizedTime` to UTC `YYYYMMDDTHHMMSSZ`.
///
/// Accepts fractional seconds and numeric offsets. Returns `None` for
/// values that do not parse.
#[must_use]
pub fn normalize_timestamp(value: &str) -> Option<String> {
    let value = value.trim();

    let utc = if let Some(naive) = value
        .strip_suffix(['Z', 'z'])
        .and_then(|v| {
            NaiveDateTime::parse_from_str(v, "%Y%m%d%H%M%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(v, "%Y%m%dT%H%M%S%.f"))
                .ok()
        }) {
        naive
    } else if let Ok(dt) = DateTime::parse_from_str(value, "%Y%m%d%H%M%S%.f%z") {
        dt.naive_utc()
    } else {
        trace!(value, "Unparseable directory timestamp");
        return None;
    };

    Some(utc.format("%Y%m%dT%H%M%SZ").to_string())
}
