//! `CardDAV` addressbook-query planning.

//! Turns a parsed query into the backend request that would answer it.

use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::Text;
use kunai_db::constants::CARD_QUERY_BASE;
use kunai_db::query::carddav::RelationalPredicate;
use kunai_directory::query::LdapSearch;
use kunai_rfc::rfc::dav::core::{AddressbookFilter, AddressbookQuery};
use kunai_rfc::rfc::query::{Compilation, Unsupported};
use kunai_rfc::rfc::validation::validate_addressbook_filter;
use serde::Serialize;

use crate::backend::{BackendRegistry, DirectoryBackend};
use crate::error::{ServiceError, ServiceResult};

/// The backend request answering one addressbook-query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum QueryPlan {
    Ldap {
        directory: String,
        search: LdapSearch,
        dropped: Vec<Unsupported>,
        limit: Option<u32>,
    },
    Db {
        directory: String,
        /// `None` selects every card of the addressbook.
        predicate: Option<RelationalPredicate>,
        dropped: Vec<Unsupported>,
        limit: Option<u32>,
    },
}

impl QueryPlan {
    #[must_use]
    pub fn directory(&self) -> &str {
        match self {
            Self::Ldap { directory, .. } | Self::Db { directory, .. } => directory,
        }
    }

    /// Filter nodes left out of the backend request.
    #[must_use]
    pub fn dropped(&self) -> &[Unsupported] {
        match self {
            Self::Ldap { dropped, .. } | Self::Db { dropped, .. } => dropped,
        }
    }

    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        match self {
            Self::Ldap { limit, .. } | Self::Db { limit, .. } => *limit,
        }
    }
}

/// A relational card query ready to load with diesel.
pub struct DbCardQuery<'f> {
    /// Selects `card.id, card.name`.
    pub query: BoxedSqlQuery<'f, Pg, SqlQuery>,
    pub dropped: Vec<Unsupported>,
}

impl std::fmt::Debug for DbCardQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbCardQuery")
            .field("query", &diesel::debug_query::<Pg, _>(&self.query).to_string())
            .field("dropped", &self.dropped)
            .finish()
    }
}

fn checked_filter(query: &AddressbookQuery) -> ServiceResult<Option<&AddressbookFilter>> {
    let Some(filter) = &query.filter else {
        return Ok(None);
    };

    if let Some(message) = validate_addressbook_filter(filter).error_message() {
        return Err(ServiceError::InvalidFilter(message));
    }
    Ok(Some(filter))
}

/// ## Summary
/// Plans an addressbook-query against the addressbook at `path`.
///
/// LDAP plans carry the search base, the class-restricted filter and the
/// attribute fetch list. Relational plans carry the predicate with named
/// placeholders.
///
/// ## Errors
/// Returns [`ServiceError::NotFound`] when no backend serves `path`,
/// [`ServiceError::InvalidFilter`] for a malformed filter, and compile
/// errors in strict mode.
#[tracing::instrument(skip(backends, query), fields(
    has_filter = query.filter.is_some(),
    limit = ?query.limit
))]
pub fn plan_addressbook_query(
    backends: &BackendRegistry,
    path: &str,
    query: &AddressbookQuery,
) -> ServiceResult<QueryPlan> {
    let filter = checked_filter(query)?;
    let backend = backends.resolve(path)?;

    let plan = match backend {
        DirectoryBackend::Ldap(ldap) => {
            let compiled = match filter {
                Some(filter) => backends.ldap_compiler().compile(filter)?,
                None => Compilation {
                    predicate: None,
                    dropped: Vec::new(),
                },
            };
            QueryPlan::Ldap {
                directory: ldap.name.clone(),
                search: LdapSearch::new(
                    &ldap.base_dn,
                    &ldap.entry_object_class,
                    compiled.predicate.as_deref(),
                    backends.registry(),
                    &ldap.extra_attributes,
                ),
                dropped: compiled.dropped,
                limit: query.limit,
            }
        }
        DirectoryBackend::Db(db) => {
            let compiled = match filter {
                Some(filter) => backends.named_compiler(db).compile(filter)?,
                None => Compilation {
                    predicate: None,
                    dropped: Vec::new(),
                },
            };
            QueryPlan::Db {
                directory: db.name.clone(),
                predicate: compiled.predicate,
                dropped: compiled.dropped,
                limit: query.limit,
            }
        }
    };

    tracing::debug!(
        directory = %plan.directory(),
        dropped = plan.dropped().len(),
        "Planned addressbook query"
    );
    Ok(plan)
}

/// ## Summary
/// Builds the diesel query listing the cards at `path` that match `query`.
///
/// The addressbook path binds `$1`; filter literals follow in order.
///
/// ## Errors
/// Returns [`ServiceError::NotFound`] when no backend serves `path`,
/// [`ServiceError::WrongBackend`] when it is not relational,
/// [`ServiceError::InvalidFilter`] for a malformed filter, and compile
/// errors in strict mode.
#[tracing::instrument(skip(backends, query), fields(has_filter = query.filter.is_some()))]
pub fn card_query<'f>(
    backends: &BackendRegistry,
    path: &str,
    query: &AddressbookQuery,
) -> ServiceResult<DbCardQuery<'f>> {
    let filter = checked_filter(query)?;
    let backend = backends.resolve(path)?;
    let DirectoryBackend::Db(_) = backend else {
        return Err(ServiceError::WrongBackend {
            directory: backend.name().to_owned(),
            expected: "relational",
        });
    };

    let compiled = match filter {
        Some(filter) => backends.positional_compiler(1).compile(filter)?,
        None => Compilation {
            predicate: None,
            dropped: Vec::new(),
        },
    };

    tracing::debug!(
        exact = compiled.is_exact(),
        dropped = compiled.dropped.len(),
        "Compiled card query filter"
    );

    let mut sql = match compiled.predicate {
        Some(predicate) => predicate.into_sql_query(CARD_QUERY_BASE, &[path])?,
        None => diesel::sql_query(CARD_QUERY_BASE)
            .into_boxed::<Pg>()
            .bind::<Text, _>(path.to_owned()),
    };
    if let Some(limit) = query.limit {
        sql = sql.sql(format!(" LIMIT {limit}"));
    }

    Ok(DbCardQuery {
        query: sql,
        dropped: compiled.dropped,
    })
}
