//! ## Summary
//! Filter validation for `CardDAV` queries.
//!
//! RFC 6352 §10.5 allows a `prop-filter` or `param-filter` to carry either an
//! `is-not-defined` element or a test, never both. A request violating that
//! is rejected before any backend sees it. Names the backends cannot
//! express, such as a group with no property, are left to the compilers.

use crate::rfc::dav::core::{AddressbookFilter, ParamFilter, PropFilter};

/// ## Summary
/// Result of filter validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValidationResult {
    /// Filter is structurally valid
    Valid,
    /// A prop-filter combines is-not-defined with a text-match or param-filters
    ConflictingPropTest(String),
    /// A param-filter combines is-not-defined with a text-match
    ConflictingParamTest { property: String, parameter: String },
}

impl FilterValidationResult {
    /// Returns true if filter is valid
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns error message if invalid
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::ConflictingPropTest(name) => Some(format!(
                "prop-filter {name} combines is-not-defined with other tests"
            )),
            Self::ConflictingParamTest {
                property,
                parameter,
            } => Some(format!(
                "param-filter {parameter} of {property} combines is-not-defined with text-match"
            )),
        }
    }
}

/// ## Summary
/// Validates an addressbook filter.
///
/// Returns the first problem found, in filter order.
///
/// ## RFC References
/// - RFC 6352 §10.5: CARDDAV:filter XML element
#[must_use]
pub fn validate_addressbook_filter(filter: &AddressbookFilter) -> FilterValidationResult {
    filter
        .prop_filters
        .iter()
        .map(validate_prop_filter)
        .find(|result| !result.is_valid())
        .unwrap_or(FilterValidationResult::Valid)
}

fn validate_prop_filter(prop_filter: &PropFilter) -> FilterValidationResult {
    if prop_filter.is_not_defined
        && (prop_filter.text_match.is_some() || !prop_filter.param_filters.is_empty())
    {
        return FilterValidationResult::ConflictingPropTest(prop_filter.name.clone());
    }

    prop_filter
        .param_filters
        .iter()
        .find(|param| conflicting_param(param))
        .map_or(FilterValidationResult::Valid, |param| {
            FilterValidationResult::ConflictingParamTest {
                property: prop_filter.name.clone(),
                parameter: param.name.clone(),
            }
        })
}

fn conflicting_param(param: &ParamFilter) -> bool {
    param.is_not_defined && param.text_match.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::dav::core::TextMatch;

    #[test]
    fn validate_empty_filter() {
        let filter = AddressbookFilter::default();
        assert_eq!(
            validate_addressbook_filter(&filter),
            FilterValidationResult::Valid
        );
    }

    #[test]
    fn validate_grouped_text_match() {
        let filter = AddressbookFilter::allof(vec![
            PropFilter::new("HOME,TEL").with_text_match(TextMatch::starts_with("555")),
            PropFilter::new("EMAIL").not_defined(),
        ]);
        assert!(validate_addressbook_filter(&filter).is_valid());
    }

    #[test]
    fn reject_not_defined_with_text_match() {
        let mut prop = PropFilter::new("FN").with_text_match(TextMatch::contains("x"));
        prop.is_not_defined = true;
        let filter = AddressbookFilter::anyof(vec![prop]);

        match validate_addressbook_filter(&filter) {
            FilterValidationResult::ConflictingPropTest(name) => assert_eq!(name, "FN"),
            other => panic!("Expected ConflictingPropTest, got {other:?}"),
        }
    }

    #[test]
    fn reject_conflicting_param_filter() {
        let mut param = ParamFilter::new("TYPE").with_text_match(TextMatch::equals("work"));
        param.is_not_defined = true;
        let filter =
            AddressbookFilter::anyof(vec![PropFilter::new("TEL").with_param_filter(param)]);

        let result = validate_addressbook_filter(&filter);
        assert_eq!(
            result,
            FilterValidationResult::ConflictingParamTest {
                property: "TEL".to_owned(),
                parameter: "TYPE".to_owned(),
            }
        );
        assert!(result.error_message().is_some());
    }

    #[test]
    fn dangling_group_prefix_is_left_to_compilers() {
        let filter = AddressbookFilter::anyof(vec![PropFilter::new("WORK,")]);
        assert!(validate_addressbook_filter(&filter).is_valid());
    }
}
