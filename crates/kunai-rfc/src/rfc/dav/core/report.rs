use kunai_core::constants::DEFAULT_COLLATION;
use serde::{Deserialize, Serialize};

use crate::error::{RfcError, RfcResult};

/// `CardDAV` `addressbook-query` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressbookQuery {
    /// Filter element.
    #[serde(default)]
    pub filter: Option<AddressbookFilter>,
    /// Limit results.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl AddressbookQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: AddressbookFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// `CardDAV` addressbook filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressbookFilter {
    /// Property filters.
    #[serde(default)]
    pub prop_filters: Vec<PropFilter>,
    /// Filter test (anyof/allof).
    #[serde(default)]
    pub test: FilterTest,
}

impl AddressbookFilter {
    /// Creates a new filter with anyof test.
    #[must_use]
    pub fn anyof(filters: Vec<PropFilter>) -> Self {
        Self {
            prop_filters: filters,
            test: FilterTest::AnyOf,
        }
    }

    /// Creates a new filter with allof test.
    #[must_use]
    pub fn allof(filters: Vec<PropFilter>) -> Self {
        Self {
            prop_filters: filters,
            test: FilterTest::AllOf,
        }
    }

    /// Adds a property filter.
    #[must_use]
    pub fn with_prop_filter(mut self, filter: PropFilter) -> Self {
        self.prop_filters.push(filter);
        self
    }

    /// Returns whether the filter restricts nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prop_filters.is_empty()
    }
}

/// Filter test type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTest {
    /// Any filter must match.
    #[default]
    AnyOf,
    /// All filters must match.
    AllOf,
}

impl FilterTest {
    /// Parses the XML `test` attribute value.
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "anyof" => Some(Self::AnyOf),
            "allof" => Some(Self::AllOf),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AnyOf => "anyof",
            Self::AllOf => "allof",
        }
    }
}

/// Property filter for queries.
///
/// The name may carry a vCard group as `GROUP,PROP` (for example `HOME,TEL`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropFilter {
    /// Property name, optionally prefixed by `GROUP,`.
    pub name: String,
    /// Is-not-defined test.
    #[serde(default)]
    pub is_not_defined: bool,
    /// Text match filter.
    #[serde(default)]
    pub text_match: Option<TextMatch>,
    /// Combines the text-match and param-filters of this node.
    #[serde(default)]
    pub test: FilterTest,
    /// Parameter filters.
    #[serde(default)]
    pub param_filters: Vec<ParamFilter>,
}

impl PropFilter {
    /// Creates a property filter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_not_defined: false,
            text_match: None,
            test: FilterTest::AnyOf,
            param_filters: Vec::new(),
        }
    }

    /// Sets is-not-defined test.
    #[must_use]
    pub fn not_defined(mut self) -> Self {
        self.is_not_defined = true;
        self
    }

    /// Sets text match.
    #[must_use]
    pub fn with_text_match(mut self, match_: TextMatch) -> Self {
        self.text_match = Some(match_);
        self
    }

    /// Sets the node-level test.
    #[must_use]
    pub fn with_test(mut self, test: FilterTest) -> Self {
        self.test = test;
        self
    }

    /// Adds a parameter filter.
    #[must_use]
    pub fn with_param_filter(mut self, filter: ParamFilter) -> Self {
        self.param_filters.push(filter);
        self
    }

    /// Splits `GROUP,PROP` into its group and property parts.
    ///
    /// The property part is empty for names like `HOME,`.
    #[must_use]
    pub fn split_name(&self) -> (Option<&str>, &str) {
        match self.name.split_once(',') {
            Some((group, property)) => (Some(group), property),
            None => (None, self.name.as_str()),
        }
    }
}

/// Parameter filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamFilter {
    /// Parameter name.
    pub name: String,
    /// Is-not-defined test.
    #[serde(default)]
    pub is_not_defined: bool,
    /// Text match.
    #[serde(default)]
    pub text_match: Option<TextMatch>,
}

impl ParamFilter {
    /// Creates a parameter filter that tests for presence.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_not_defined: false,
            text_match: None,
        }
    }

    /// Sets is-not-defined test.
    #[must_use]
    pub fn not_defined(mut self) -> Self {
        self.is_not_defined = true;
        self
    }

    /// Sets text match.
    #[must_use]
    pub fn with_text_match(mut self, match_: TextMatch) -> Self {
        self.text_match = Some(match_);
        self
    }
}

/// Text matching criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMatch {
    /// The text to match.
    pub value: String,
    /// Match type.
    #[serde(default)]
    pub match_type: MatchType,
    /// Compare without regard to case (the `i;unicode-casemap` default).
    #[serde(default = "default_caseless")]
    pub caseless: bool,
    /// Negate the match.
    #[serde(default)]
    pub negate: bool,
}

const fn default_caseless() -> bool {
    true
}

impl TextMatch {
    fn with_type(value: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            value: value.into(),
            match_type,
            caseless: true,
            negate: false,
        }
    }

    /// Creates a contains match.
    #[must_use]
    pub fn contains(value: impl Into<String>) -> Self {
        Self::with_type(value, MatchType::Contains)
    }

    /// Creates an equals match.
    #[must_use]
    pub fn equals(value: impl Into<String>) -> Self {
        Self::with_type(value, MatchType::Equals)
    }

    /// Creates a starts-with match.
    #[must_use]
    pub fn starts_with(value: impl Into<String>) -> Self {
        Self::with_type(value, MatchType::StartsWith)
    }

    /// Creates an ends-with match.
    #[must_use]
    pub fn ends_with(value: impl Into<String>) -> Self {
        Self::with_type(value, MatchType::EndsWith)
    }

    /// Negates the match.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Requires an exact-case comparison.
    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        self.caseless = false;
        self
    }

    /// ## Summary
    /// Applies the `collation` attribute of a `text-match` element.
    ///
    /// `i;unicode-casemap` and `i;ascii-casemap` compare caselessly,
    /// `i;octet` compares exact bytes.
    ///
    /// ## Errors
    /// Returns [`RfcError::UnsupportedCollation`] for any other collation; the
    /// caller answers with the `CARDDAV:supported-collation` precondition.
    pub fn with_collation(mut self, collation: &str) -> RfcResult<Self> {
        self.caseless = match collation {
            DEFAULT_COLLATION | "i;ascii-casemap" => true,
            "i;octet" => false,
            other => return Err(RfcError::UnsupportedCollation(other.to_owned())),
        };
        Ok(self)
    }
}

/// Match type for text matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// Contains the text.
    #[default]
    Contains,
    /// Equals the text.
    Equals,
    /// Starts with the text.
    StartsWith,
    /// Ends with the text.
    EndsWith,
}

impl MatchType {
    /// ## Summary
    /// Parses the XML `match-type` attribute value.
    ///
    /// ## Errors
    /// Returns [`RfcError::UnknownMatchType`] for values outside RFC 6352 §10.5.4.
    pub fn from_attr(value: &str) -> RfcResult<Self> {
        match value {
            "equals" => Ok(Self::Equals),
            "contains" => Ok(Self::Contains),
            "starts-with" => Ok(Self::StartsWith),
            "ends-with" => Ok(Self::EndsWith),
            other => Err(RfcError::UnknownMatchType(other.to_owned())),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::StartsWith => "starts-with",
            Self::EndsWith => "ends-with",
        }
    }

    /// Whether a wildcard goes before the value.
    #[must_use]
    pub const fn wildcard_before(self) -> bool {
        matches!(self, Self::Contains | Self::EndsWith)
    }

    /// Whether a wildcard goes after the value.
    #[must_use]
    pub const fn wildcard_after(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith)
    }
}
