//! vCard property types (RFC 6350).

use serde::{Deserialize, Serialize};

use super::parameter::VCardParameter;

/// A vCard property carrying its raw text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCardProperty {
    /// Optional property group (e.g., "HOME" in "HOME.TEL").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<VCardParameter>,
    /// Raw value string.
    pub value: String,
}

impl VCardProperty {
    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: None,
            name: name.into().to_ascii_uppercase(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    /// Creates a property with a text value and group.
    #[must_use]
    pub fn grouped_text(
        group: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::text(name, value)
        }
    }

    /// Adds a parameter, builder style.
    #[must_use]
    pub fn with_param(mut self, param: VCardParameter) -> Self {
        self.params.push(param);
        self
    }

    /// Returns the parameter with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&VCardParameter> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get_param_value(&self, name: &str) -> Option<&str> {
        let p = self.get_param(name)?;
        p.value()
    }

    /// Returns whether this property has the specified TYPE value.
    #[must_use]
    pub fn has_type(&self, type_value: &str) -> bool {
        self.get_param("TYPE")
            .is_some_and(|p| p.has_value(type_value))
    }

    /// Whether the property has neither a group nor parameters.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.group.is_none() && self.params.is_empty()
    }

    /// Adds a parameter to this property.
    pub fn add_param(&mut self, param: VCardParameter) {
        self.params.push(param);
    }
}

/// Common property names as constants.
pub mod names {
    pub const FN: &str = "FN";
    pub const N: &str = "N";
    pub const NICKNAME: &str = "NICKNAME";

    pub const TEL: &str = "TEL";
    pub const EMAIL: &str = "EMAIL";
    pub const IMPP: &str = "IMPP";

    pub const TITLE: &str = "TITLE";
    pub const MEMBER: &str = "MEMBER";

    pub const NOTE: &str = "NOTE";
    pub const UID: &str = "UID";

    pub const CALADRURI: &str = "CALADRURI";
    pub const CAPURI: &str = "CAPURI";

    pub const SOURCE: &str = "SOURCE";
    pub const KIND: &str = "KIND";

    pub const X_BW_PRINCIPALHREF: &str = "X-BW-PRINCIPALHREF";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_text() {
        let prop = VCardProperty::text("fn", "John Doe");
        assert_eq!(prop.name, "FN");
        assert_eq!(prop.value, "John Doe");
        assert!(prop.is_simple());
    }

    #[test]
    fn property_grouped() {
        let prop = VCardProperty::grouped_text("HOME", "TEL", "+1-555-555-5555");
        assert_eq!(prop.group, Some("HOME".to_string()));
        assert_eq!(prop.name, "TEL");
        assert!(!prop.is_simple());
    }

    #[test]
    fn property_with_types() {
        let prop = VCardProperty::text("TEL", "+1-555-555-5555")
            .with_param(VCardParameter::type_param("cell"));
        assert!(prop.has_type("CELL"));
        assert_eq!(prop.get_param_value("type"), Some("cell"));
        assert!(prop.get_param("PREF").is_none());
    }
}
