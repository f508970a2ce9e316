//! `CardDAV` filter to RFC 4515 search filter compilation.
//!
//! Terms are combined by left folding: `(&(&T1T2)T3)`. A compiled filter of
//! `None` places no restriction on the search.

use kunai_core::types::FilterMode;
use kunai_rfc::rfc::dav::core::{AddressbookFilter, FilterTest, PropFilter, TextMatch};
use kunai_rfc::rfc::query::{
    Compilation, CompileContext, CompileError, CompileResult, Compiled, Unsupported,
    UnsupportedReason,
};
use tracing::{debug, trace};

use crate::registry::PropertyAttributeRegistry;

/// Compiles addressbook filters against a [`PropertyAttributeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct LdapFilterCompiler<'a> {
    registry: &'a PropertyAttributeRegistry,
    mode: FilterMode,
}

impl<'a> LdapFilterCompiler<'a> {
    #[must_use]
    pub const fn new(registry: &'a PropertyAttributeRegistry, mode: FilterMode) -> Self {
        Self { registry, mode }
    }

    /// ## Summary
    /// Compiles a whole filter.
    ///
    /// ## Errors
    /// Returns [`CompileError::InvalidFilter`] for a node combining
    /// is-not-defined with other tests, and
    /// [`CompileError::UnsupportedFilterShape`] in strict mode.
    #[tracing::instrument(skip_all, fields(mode = %self.mode, prop_filters = filter.prop_filters.len()))]
    pub fn compile(&self, filter: &AddressbookFilter) -> CompileResult<Compilation<String>> {
        let mut ctx = CompileContext::new(self.mode);
        let mut terms = Vec::with_capacity(filter.prop_filters.len());

        for prop_filter in &filter.prop_filters {
            let compiled = self.compile_prop_filter(prop_filter, &mut ctx)?;
            if let Some(term) = ctx.admit(compiled)? {
                terms.push(term);
            }
        }

        let predicate = fold_terms(filter.test, terms);
        debug!(filter = ?predicate, "Compiled LDAP filter");
        Ok(ctx.finish(predicate))
    }

    /// ## Summary
    /// Compiles a filter to its string form; empty means no restriction.
    ///
    /// ## Errors
    /// Same as [`LdapFilterCompiler::compile`].
    pub fn compile_to_string(&self, filter: &AddressbookFilter) -> CompileResult<String> {
        Ok(self.compile(filter)?.predicate.unwrap_or_default())
    }

    fn compile_prop_filter(
        &self,
        prop_filter: &PropFilter,
        ctx: &mut CompileContext,
    ) -> CompileResult<Compiled<String>> {
        if prop_filter.is_not_defined
            && (prop_filter.text_match.is_some() || !prop_filter.param_filters.is_empty())
        {
            return Err(CompileError::invalid(
                &prop_filter.name,
                "is-not-defined cannot be combined with other tests",
            ));
        }

        let (group, property) = prop_filter.split_name();
        if property.trim().is_empty() {
            return Ok(Compiled::Unsupported(Unsupported::new(
                &prop_filter.name,
                UnsupportedReason::EmptyPropertyName,
            )));
        }

        if !prop_filter.param_filters.is_empty() {
            // No parameter storage; fall back to every attribute of the property.
            ctx.relax(Unsupported::new(
                &prop_filter.name,
                UnsupportedReason::ParamFilter,
            ))?;
        }

        let simple = if group.is_none() && prop_filter.param_filters.is_empty() {
            self.registry.lookup_attribute_for_simple_property(property)
        } else {
            None
        };
        let attributes = match simple {
            Some(attribute) => vec![attribute],
            None => self.registry.lookup_attributes_for_property(property),
        };

        if attributes.is_empty() {
            return Ok(Compiled::Unsupported(Unsupported::new(
                &prop_filter.name,
                UnsupportedReason::UnknownProperty,
            )));
        }

        trace!(property, ?attributes, "Resolved filter attributes");

        let (op, atoms): (FilterTest, Vec<String>) = if prop_filter.is_not_defined {
            (
                FilterTest::AllOf,
                attributes.iter().map(|a| format!("(!({a}=*))")).collect(),
            )
        } else if let Some(text_match) = &prop_filter.text_match {
            (
                prop_filter.test,
                attributes
                    .iter()
                    .map(|a| text_match_term(a, text_match))
                    .collect(),
            )
        } else {
            (
                prop_filter.test,
                attributes.iter().map(|a| format!("({a}=*)")).collect(),
            )
        };

        Ok(fold_terms(op, atoms).map_or_else(
            || {
                Compiled::Unsupported(Unsupported::new(
                    &prop_filter.name,
                    UnsupportedReason::UnknownProperty,
                ))
            },
            Compiled::Term,
        ))
    }
}

/// Builds `(attr=value)` with wildcards per match type, wrapped in `(!…)`
/// when negated.
fn text_match_term(attribute: &str, text_match: &TextMatch) -> String {
    let mut term = String::with_capacity(attribute.len() + text_match.value.len() + 6);
    term.push('(');
    term.push_str(attribute);
    term.push('=');
    if text_match.match_type.wildcard_before() {
        term.push('*');
    }
    term.push_str(&escape_filter_value(&text_match.value));
    if text_match.match_type.wildcard_after() {
        term.push('*');
    }
    term.push(')');

    if text_match.negate {
        format!("(!{term})")
    } else {
        term
    }
}

const fn operator(test: FilterTest) -> char {
    match test {
        FilterTest::AnyOf => '|',
        FilterTest::AllOf => '&',
    }
}

/// Left-folds terms: the first term seeds, each further term wraps as
/// `(<op><acc><term>)`.
fn fold_terms(test: FilterTest, terms: Vec<String>) -> Option<String> {
    let op = operator(test);
    terms
        .into_iter()
        .reduce(|acc, term| format!("({op}{acc}{term})"))
}

/// ## Summary
/// Escapes an assertion value per RFC 4515 §3.
///
/// `*`, `(`, `)`, `\` and NUL are replaced by their `\XX` hex forms.
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\\' => escaped.push_str("\\5c"),
            '\0' => escaped.push_str("\\00"),
            _ => escaped.push(c),
        }
    }
    escaped
}
