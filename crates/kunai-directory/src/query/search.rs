use serde::Serialize;

use crate::registry::PropertyAttributeRegistry;

/// A directory search ready to hand to an LDAP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LdapSearch {
    pub base_dn: String,
    pub filter: String,
    pub attributes: Vec<String>,
}

impl LdapSearch {
    /// ## Summary
    /// Restricts a compiled filter to entries of `object_class`.
    ///
    /// Produces `(&(objectClass=X)<filter>)`, or `(objectClass=X)` when the
    /// compiled filter is absent or empty.
    #[must_use]
    pub fn new(
        base_dn: impl Into<String>,
        object_class: &str,
        filter: Option<&str>,
        registry: &PropertyAttributeRegistry,
        extra_attributes: &[String],
    ) -> Self {
        let class_term = format!("(objectClass={object_class})");
        let filter = match filter.filter(|f| !f.is_empty()) {
            Some(f) => format!("(&{class_term}{f})"),
            None => class_term,
        };

        Self {
            base_dn: base_dn.into(),
            filter,
            attributes: registry.fetch_attributes(extra_attributes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_filter_with_object_class() {
        let registry = PropertyAttributeRegistry::standard().unwrap();
        let search = LdapSearch::new(
            "ou=people,dc=example,dc=org",
            "inetOrgPerson",
            Some("(mail=*example*)"),
            &registry,
            &["jpegPhoto".to_owned()],
        );

        assert_eq!(search.filter, "(&(objectClass=inetOrgPerson)(mail=*example*))");
        assert_eq!(search.attributes.first().map(String::as_str), Some("cn"));
        assert_eq!(search.attributes.last().map(String::as_str), Some("jpegPhoto"));
    }

    #[test]
    fn unrestricted_search_matches_class_only() {
        let registry = PropertyAttributeRegistry::builder().build();

        let none = LdapSearch::new("dc=org", "person", None, &registry, &[]);
        let empty = LdapSearch::new("dc=org", "person", Some(""), &registry, &[]);

        assert_eq!(none.filter, "(objectClass=person)");
        assert_eq!(empty, none);
        assert!(none.attributes.is_empty());
    }
}
