//! Backend-neutral shape of a directory entry.

use serde::{Deserialize, Serialize};

/// One attribute with its values in directory order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirAttribute {
    pub name: String,
    pub values: Vec<String>,
}

/// A directory entry: an optional DN and insertion-ordered attributes.
///
/// Attribute names compare case-insensitively, as LDAP attribute
/// descriptions do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirRecord {
    #[serde(default)]
    pub dn: Option<String>,
    #[serde(default)]
    pub attributes: Vec<DirAttribute>,
}

impl DirRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dn(mut self, dn: impl Into<String>) -> Self {
        self.dn = Some(dn.into());
        self
    }

    /// Adds an attribute with its values, builder style.
    #[must_use]
    pub fn with_attr<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add_value(name, value);
        }
        self
    }

    /// Appends a value, creating the attribute on first use.
    pub fn add_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(attr) = self.get_mut(name) {
            attr.values.push(value.into());
        } else {
            self.attributes.push(DirAttribute {
                name: name.to_owned(),
                values: vec![value.into()],
            });
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DirAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut DirAttribute> {
        self.attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// All values of an attribute; empty when absent.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.get(name).map_or(&[], |a| a.values.as_slice())
    }

    /// First non-empty value of an attribute.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name)
            .iter()
            .map(String::as_str)
            .find(|v| !v.is_empty())
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.first(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_ignore_case() {
        let mut record = DirRecord::new().with_attr("mail", ["a@example.com"]);
        record.add_value("MAIL", "b@example.com");

        assert_eq!(record.attributes.len(), 1);
        assert_eq!(record.values("Mail"), ["a@example.com", "b@example.com"]);
        assert_eq!(record.first("mail"), Some("a@example.com"));
    }

    #[test]
    fn missing_and_empty_values() {
        let record = DirRecord::new().with_attr("title", [""]);
        assert!(record.values("cn").is_empty());
        assert!(!record.has("title"));
        assert!(record.get("title").is_some());
    }
}
