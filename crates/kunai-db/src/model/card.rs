//! Models for relational card storage.

use diesel::prelude::*;
use kunai_rfc::rfc::vcard::VCardParameter;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{card, card_properties};

/// A card with its promoted columns.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Identifiable, Serialize)]
#[diesel(table_name = card)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbCard {
    pub id: Uuid,
    /// Path of the addressbook holding the card.
    pub parent_path: String,
    /// Resource name within the addressbook.
    pub name: String,
    pub uid: String,
    /// Formatted name (FN property).
    #[diesel(column_name = fn_)]
    pub fn_: String,
    pub kind: String,
}

/// One vCard property stored as an entity-attribute-value row.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Queryable,
    Selectable,
    Insertable,
    Identifiable,
    Associations,
    Serialize,
)]
#[diesel(table_name = card_properties)]
#[diesel(belongs_to(DbCard, foreign_key = card_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DbCardProperty {
    pub id: Uuid,
    pub card_id: Uuid,
    /// Position of the property within the card.
    pub position: i32,
    pub group_name: Option<String>,
    /// Uppercased property name.
    pub name: String,
    pub value: String,
    /// Parameters in vCard syntax, e.g. `TYPE=home,voice;LABEL="a;b"`.
    pub params: Option<String>,
}

impl DbCardProperty {
    /// Decodes the stored parameters.
    #[must_use]
    pub fn parameters(&self) -> Vec<VCardParameter> {
        self.params.as_deref().map(decode_params).unwrap_or_default()
    }
}

/// ## Summary
/// Encodes parameters as `NAME=v1,v2;NAME=v3`; `None` when there are none.
///
/// Values containing `;`, `,` or `:` are DQUOTE-quoted (RFC 6350 section 5)
/// and `^`, `"` and newlines are caret-encoded (RFC 6868).
#[must_use]
pub fn encode_params(params: &[VCardParameter]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    Some(
        params
            .iter()
            .map(|p| {
                let values: Vec<String> = p.values.iter().map(|v| encode_value(v)).collect();
                format!("{}={}", p.name, values.join(","))
            })
            .collect::<Vec<_>>()
            .join(";"),
    )
}

fn encode_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '^' => encoded.push_str("^^"),
            '"' => encoded.push_str("^'"),
            '\n' => encoded.push_str("^n"),
            c => encoded.push(c),
        }
    }
    if encoded.contains([';', ',', ':']) {
        format!("\"{encoded}\"")
    } else {
        encoded
    }
}

/// ## Summary
/// Decodes the form produced by [`encode_params`]. A segment without `=`
/// becomes a parameter with no values.
#[must_use]
pub fn decode_params(encoded: &str) -> Vec<VCardParameter> {
    split_unquoted(encoded, ';')
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, values)) => VCardParameter::multi(
                name,
                split_unquoted(values, ',')
                    .into_iter()
                    .filter(|v| !v.is_empty())
                    .map(decode_value)
                    .collect(),
            ),
            None => VCardParameter::multi(segment, Vec::new()),
        })
        .collect()
}

/// Splits on `separator` outside DQUOTE-quoted runs.
fn split_unquoted(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in input.char_indices() {
        if c == '"' {
            quoted = !quoted;
        } else if c == separator && !quoted {
            parts.push(&input[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

fn decode_value(raw: &str) -> String {
    let raw = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);

    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '^' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('^') => decoded.push('^'),
            Some('\'') => decoded.push('"'),
            Some('n') => decoded.push('\n'),
            Some(other) => {
                decoded.push('^');
                decoded.push(other);
            }
            None => decoded.push('^'),
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_encode_and_decode() {
        let params = vec![
            VCardParameter::multi("type", vec!["home".into(), "voice".into()]),
            VCardParameter::new("PREF", "1"),
        ];

        let encoded = encode_params(&params).unwrap();
        assert_eq!(encoded, "TYPE=home,voice;PREF=1");
        assert_eq!(decode_params(&encoded), params);
        assert_eq!(encode_params(&[]), None);
    }

    #[test]
    fn delimiters_in_values_survive() {
        let params = vec![
            VCardParameter::new("LABEL", "Main St; Apt 4, Floor=2"),
            VCardParameter::multi("TYPE", vec!["work".into(), "x:y".into()]),
        ];

        let encoded = encode_params(&params).unwrap();
        assert_eq!(encoded, r#"LABEL="Main St; Apt 4, Floor=2";TYPE=work,"x:y""#);
        assert_eq!(decode_params(&encoded), params);
    }

    #[test]
    fn quotes_and_newlines_are_caret_encoded() {
        let params = vec![VCardParameter::new("LABEL", "The \"Hut\"\n^1")];

        let encoded = encode_params(&params).unwrap();
        assert_eq!(encoded, "LABEL=The ^'Hut^'^n^^1");
        assert_eq!(decode_params(&encoded), params);
    }

    #[test]
    fn decode_tolerates_bare_names() {
        let decoded = decode_params("X-FLAG;;TYPE=work");
        assert_eq!(decoded.len(), 2);
        assert!(decoded[0].values.is_empty());
        assert_eq!(decoded[1].value(), Some("work"));
    }
}
