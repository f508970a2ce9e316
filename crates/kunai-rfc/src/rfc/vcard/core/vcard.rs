//! vCard wrapper type.

use std::convert::Infallible;

use serde::{Serialize, Serializer};

use super::property::{VCardProperty, names};

/// vCard KIND property values (RFC 6350 §6.1.4, RFC 6715).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VCardKind {
    /// An individual person.
    #[default]
    Individual,
    /// A group of people.
    Group,
    /// An organization.
    Organization,
    /// A named location.
    Location,
    /// A bookable resource other than a location.
    Thing,
    /// Extension or unknown kind.
    Other(String),
}

impl VCardKind {
    /// Parses from kind string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "individual" => Self::Individual,
            "group" => Self::Group,
            "org" | "organization" => Self::Organization,
            "location" => Self::Location,
            "thing" => Self::Thing,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the kind string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Organization => "org",
            Self::Location => "location",
            Self::Thing => "thing",
            Self::Other(s) => s,
        }
    }
}

impl std::str::FromStr for VCardKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for VCardKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for VCardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vCard as an ordered property list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VCard {
    /// All properties in order.
    pub properties: Vec<VCardProperty>,
}

impl VCard {
    /// Creates an empty vCard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a vCard from an existing property list.
    #[must_use]
    pub fn from_properties(properties: Vec<VCardProperty>) -> Self {
        Self { properties }
    }

    /// Adds a property.
    pub fn add_property(&mut self, prop: VCardProperty) {
        self.properties.push(prop);
    }

    /// Returns all properties with the given name.
    #[must_use]
    pub fn get_properties(&self, name: &str) -> Vec<&VCardProperty> {
        self.properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .collect()
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&VCardProperty> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the value of the first property with the given name.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get_property(name).map(|p| p.value.as_str())
    }

    /// Whether any property with the given name is present.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    /// Returns the formatted name (FN property).
    #[must_use]
    pub fn formatted_name(&self) -> Option<&str> {
        self.get_value(names::FN)
    }

    /// Returns the UID.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.get_value(names::UID)
    }

    /// Returns the KIND, defaulting to individual.
    #[must_use]
    pub fn kind(&self) -> VCardKind {
        self.get_value(names::KIND)
            .map(VCardKind::parse)
            .unwrap_or_default()
    }
}
