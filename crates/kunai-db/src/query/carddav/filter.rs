//! `CardDAV` filter to parameterized SQL predicate compilation.
//!
//! `FN`, `KIND` and `UID` compare against promoted `card` columns. Every
//! other property is tested through a correlated `EXISTS` over
//! `card_properties`, which keeps `allof` correct across several EAV
//! properties of the same card. Literals are always bound, never inlined.

use diesel::pg::Pg;
use diesel::query_builder::BoxedSqlQuery;
use diesel::query_builder::SqlQuery;
use diesel::sql_types::Text;
use kunai_core::types::FilterMode;
use kunai_rfc::rfc::dav::core::{AddressbookFilter, FilterTest, PropFilter, TextMatch};
use kunai_rfc::rfc::query::{
    Compilation, CompileContext, CompileError, CompileResult, Compiled, Unsupported,
    UnsupportedReason,
};
use serde::Serialize;
use tracing::{debug, trace};

use crate::constants::{PROPERTY_EXISTS_PREFIX, PROPERTY_VALUE_COLUMN};
use crate::error::{DbError, DbResult};
use crate::query::text_match::{bound_literal, comparison_operator};

/// Properties stored as `card` columns, keyed by uppercased property name.
const PROMOTED_COLUMNS: &[(&str, &str)] = &[
    ("FN", "card.fn"),
    ("KIND", "card.kind"),
    ("UID", "card.uid"),
];

fn promoted_column(property: &str) -> Option<&'static str> {
    PROMOTED_COLUMNS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
        .map(|(_, column)| *column)
}

/// How bound literals are referenced in the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `:P0`, `:P1`, … with a configurable prefix.
    Named { prefix: String },
    /// `$n`, numbered after `offset` placeholders already used by the
    /// surrounding query.
    Positional { offset: usize },
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self::Named {
            prefix: "P".to_owned(),
        }
    }
}

impl PlaceholderStyle {
    fn render(&self, index: usize) -> String {
        match self {
            Self::Named { prefix } => format!(":{prefix}{index}"),
            Self::Positional { offset } => format!("${}", offset + index + 1),
        }
    }
}

/// A WHERE fragment with its bound literals. The Nth placeholder in
/// `fragment` corresponds to `params[N]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationalPredicate {
    pub fragment: String,
    pub params: Vec<String>,
    pub style: PlaceholderStyle,
}

impl RelationalPredicate {
    /// `<base> AND (<fragment>)`
    #[must_use]
    pub fn append_to(&self, base: &str) -> String {
        format!("{base} AND ({})", self.fragment)
    }

    /// ## Summary
    /// Builds a boxed diesel query from `base` and this predicate.
    ///
    /// `base_params` bind the placeholders of `base`; the predicate's own
    /// parameters follow, all as `Text`.
    ///
    /// ## Errors
    /// Returns [`DbError::PlaceholderMismatch`] unless the predicate uses
    /// positional placeholders offset by exactly `base_params.len()`.
    pub fn into_sql_query<'f>(
        self,
        base: &str,
        base_params: &[&str],
    ) -> DbResult<BoxedSqlQuery<'f, Pg, SqlQuery>> {
        match self.style {
            PlaceholderStyle::Positional { offset } if offset == base_params.len() => {}
            ref other => {
                return Err(DbError::PlaceholderMismatch(format!(
                    "{other:?} cannot follow {} base parameters",
                    base_params.len()
                )));
            }
        }

        let mut query = diesel::sql_query(self.append_to(base)).into_boxed::<Pg>();
        for value in base_params {
            query = query.bind::<Text, _>((*value).to_owned());
        }
        for value in self.params {
            query = query.bind::<Text, _>(value);
        }
        Ok(query)
    }
}

/// Compiles addressbook filters into [`RelationalPredicate`]s.
#[derive(Debug, Clone)]
pub struct RelationalPredicateCompiler {
    mode: FilterMode,
    style: PlaceholderStyle,
}

impl RelationalPredicateCompiler {
    #[must_use]
    pub const fn new(mode: FilterMode, style: PlaceholderStyle) -> Self {
        Self { mode, style }
    }

    /// ## Summary
    /// Compiles a whole filter.
    ///
    /// ## Errors
    /// Returns [`CompileError::InvalidFilter`] for a node combining
    /// is-not-defined with other tests, and
    /// [`CompileError::UnsupportedFilterShape`] in strict mode.
    #[tracing::instrument(skip_all, fields(mode = %self.mode, prop_filters = filter.prop_filters.len()))]
    pub fn compile(
        &self,
        filter: &AddressbookFilter,
    ) -> CompileResult<Compilation<RelationalPredicate>> {
        let mut ctx = CompileContext::new(self.mode);
        let mut binder = Binder::new(&self.style);
        let mut terms = Vec::with_capacity(filter.prop_filters.len());

        for prop_filter in &filter.prop_filters {
            let compiled = compile_prop_filter(prop_filter, &mut binder, &mut ctx)?;
            if let Some(term) = ctx.admit(compiled)? {
                terms.push(format!("({term})"));
            }
        }

        let predicate = if terms.is_empty() {
            None
        } else {
            let joiner = match filter.test {
                FilterTest::AnyOf => " OR ",
                FilterTest::AllOf => " AND ",
            };
            Some(RelationalPredicate {
                fragment: terms.join(joiner),
                params: binder.params,
                style: self.style.clone(),
            })
        };

        debug!(
            fragment = predicate.as_ref().map(|p| p.fragment.as_str()),
            "Compiled relational predicate"
        );
        Ok(ctx.finish(predicate))
    }
}

/// Hands out placeholders in order and keeps the matching literals.
struct Binder<'a> {
    style: &'a PlaceholderStyle,
    params: Vec<String>,
}

impl<'a> Binder<'a> {
    const fn new(style: &'a PlaceholderStyle) -> Self {
        Self {
            style,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: String) -> String {
        let placeholder = self.style.render(self.params.len());
        self.params.push(value);
        placeholder
    }
}

fn compile_prop_filter(
    prop_filter: &PropFilter,
    binder: &mut Binder<'_>,
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
    if group.is_some() {
        return Ok(Compiled::Unsupported(Unsupported::new(
            &prop_filter.name,
            UnsupportedReason::GroupedProperty,
        )));
    }
    if !prop_filter.param_filters.is_empty() {
        // Parameters are not indexed; match on the property alone.
        ctx.relax(Unsupported::new(
            &prop_filter.name,
            UnsupportedReason::ParamFilter,
        ))?;
    }

    let term = match promoted_column(property) {
        Some(column) => {
            trace!(property, column, "Filtering on promoted column");
            promoted_term(column, prop_filter, binder)
        }
        None => {
            trace!(property, "Filtering on property rows");
            property_row_term(property, prop_filter, binder)
        }
    };
    Ok(Compiled::Term(term))
}

fn promoted_term(column: &str, prop_filter: &PropFilter, binder: &mut Binder<'_>) -> String {
    match &prop_filter.text_match {
        Some(text_match) => comparison(column, text_match, binder),
        None if prop_filter.is_not_defined => format!("{column} IS NULL"),
        None => format!("{column} IS NOT NULL"),
    }
}

fn property_row_term(property: &str, prop_filter: &PropFilter, binder: &mut Binder<'_>) -> String {
    let name = binder.bind(property.to_ascii_uppercase());
    match &prop_filter.text_match {
        Some(text_match) => format!(
            "{PROPERTY_EXISTS_PREFIX}{name} AND {})",
            comparison(PROPERTY_VALUE_COLUMN, text_match, binder)
        ),
        None if prop_filter.is_not_defined => format!("NOT {PROPERTY_EXISTS_PREFIX}{name})"),
        None => format!("{PROPERTY_EXISTS_PREFIX}{name})"),
    }
}

fn comparison(column: &str, text_match: &TextMatch, binder: &mut Binder<'_>) -> String {
    let placeholder = binder.bind(bound_literal(text_match));
    let op = comparison_operator(text_match);
    if text_match.caseless {
        format!("UPPER({column}) {op} {placeholder}")
    } else {
        format!("{column} {op} {placeholder}")
    }
}
