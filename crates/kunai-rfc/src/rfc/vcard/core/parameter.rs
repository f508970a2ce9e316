//! vCard parameter types (RFC 6350).

use serde::{Deserialize, Serialize};

/// A vCard parameter.
///
/// Parameters can have multiple values (e.g., TYPE=home,work).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCardParameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values.
    pub values: Vec<String>,
}

impl VCardParameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Creates a parameter with multiple values.
    #[must_use]
    pub fn multi(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether the parameter has the specified value (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Creates a TYPE parameter.
    #[must_use]
    pub fn type_param(value: impl Into<String>) -> Self {
        Self::new("TYPE", value)
    }
}

/// TYPE values the directory telephone table distinguishes.
pub mod types {
    pub const HOME: &str = "home";
    pub const WORK: &str = "work";

    pub const VOICE: &str = "voice";
    pub const FAX: &str = "fax";
    pub const CELL: &str = "cell";
    pub const PAGER: &str = "pager";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_uppercased() {
        let param = VCardParameter::new("type", "work");
        assert_eq!(param.name, "TYPE");
        assert_eq!(param.value(), Some("work"));
    }

    #[test]
    fn multi_value_lookup_ignores_case() {
        let param = VCardParameter::multi("TYPE", vec!["HOME".into(), "voice".into()]);
        assert!(param.has_value("home"));
        assert!(param.has_value("VOICE"));
        assert!(!param.has_value("fax"));
    }
}
