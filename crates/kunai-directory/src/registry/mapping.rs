use kunai_rfc::rfc::vcard::VCardKind;
use kunai_rfc::rfc::vcard::names;

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMapping {
    Value(ValueMapping),
    Property(PropertyMapping),
}

impl AttributeMapping {
    #[must_use]
    pub fn attribute_id(&self) -> &str {
        match self {
            Self::Value(v) => &v.attribute_id,
            Self::Property(p) => &p.attribute_id,
        }
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&ValueMapping> {
        match self {
            Self::Value(v) => Some(v),
            Self::Property(_) => None,
        }
    }

    #[must_use]
    pub const fn as_property(&self) -> Option<&PropertyMapping> {
        match self {
            Self::Property(p) => Some(p),
            Self::Value(_) => None,
        }
    }
}

/// A literal stamped on every record created in the directory,
/// e.g. `objectClass: inetOrgPerson`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMapping {
    pub attribute_id: String,
    pub value: String,
}

/// Links one directory attribute to one vCard property variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    pub attribute_id: String,
    /// vCard group, e.g. `HOME` for `HOME.TEL`.
    pub group: Option<String>,
    /// Uppercased vCard property name.
    pub property_name: String,
    pub param_name: Option<String>,
    pub param_value: Option<String>,
    /// Creating a record fails when the property is missing.
    pub required: bool,
    /// Kinds this mapping applies to; empty means all.
    pub kinds: Vec<VCardKind>,
}

impl PropertyMapping {
    #[must_use]
    pub fn new(attribute_id: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            group: None,
            property_name: property_name.into().to_ascii_uppercase(),
            param_name: None,
            param_value: None,
            required: false,
            kinds: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.param_name = Some(name.into().to_ascii_uppercase());
        self.param_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn for_kinds(mut self, kinds: impl IntoIterator<Item = VCardKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Neither grouped nor parameterized.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.group.is_none() && self.param_name.is_none()
    }

    #[must_use]
    pub fn applies_to(&self, kind: &VCardKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(kind)
    }

    #[must_use]
    pub fn is_kind(&self) -> bool {
        self.property_name.eq_ignore_ascii_case(names::KIND)
    }

    /// Identity used to reject duplicate registrations.
    pub(crate) fn variant_key(&self) -> (String, Option<String>, Option<String>, Option<String>) {
        (
            self.attribute_id.to_ascii_lowercase(),
            self.group.as_ref().map(|g| g.to_ascii_uppercase()),
            self.param_name.clone(),
            self.param_value.as_ref().map(|v| v.to_ascii_lowercase()),
        )
    }
}
