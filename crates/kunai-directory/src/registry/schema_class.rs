use kunai_rfc::rfc::vcard::VCardKind;

const SCHEMA_CLASS_KINDS: &[(&str, VCardKind)] = &[
    ("person", VCardKind::Individual),
    ("organizationalPerson", VCardKind::Individual),
    ("inetOrgPerson", VCardKind::Individual),
    ("groupOfNames", VCardKind::Group),
    ("groupOfUniqueNames", VCardKind::Group),
];

/// ## Summary
/// Kind implied by a directory object class, compared case-insensitively.
#[must_use]
pub fn kind_for_schema_class(class: &str) -> Option<VCardKind> {
    SCHEMA_CLASS_KINDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(class))
        .map(|(_, kind)| kind.clone())
}
