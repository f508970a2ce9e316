//! Named addressbook backends resolved from configuration.

use std::sync::Arc;

use kunai_core::config::{DbDirectoryConfig, DirectoryConfig, LdapDirectoryConfig, Settings};
use kunai_core::types::{DirectoryKind, FilterMode};
use kunai_db::query::carddav::{PlaceholderStyle, RelationalPredicateCompiler};
use kunai_directory::map::{MapperOptions, RecordMapper};
use kunai_directory::query::LdapFilterCompiler;
use kunai_directory::registry::PropertyAttributeRegistry;
use kunai_rfc::rfc::vcard::VCardKind;
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};

/// An addressbook tree stored in an LDAP directory.
#[derive(Debug, Clone)]
pub struct LdapBackend {
    pub name: String,
    pub path_prefix: String,
    pub base_dn: String,
    pub entry_object_class: String,
    pub extra_attributes: Vec<String>,
    pub mapper_options: MapperOptions,
}

impl From<&LdapDirectoryConfig> for LdapBackend {
    fn from(config: &LdapDirectoryConfig) -> Self {
        Self {
            name: config.name.clone(),
            path_prefix: normalize_prefix(&config.path_prefix),
            base_dn: config.base_dn.clone(),
            entry_object_class: config.entry_object_class.clone(),
            extra_attributes: config.extra_attributes.clone(),
            mapper_options: MapperOptions {
                entry_id_attribute: config.entry_id_attribute.clone(),
                default_kind: config.default_kind.as_deref().map(VCardKind::parse),
                principal_prefix: config.principal_prefix.clone(),
            },
        }
    }
}

/// An addressbook tree stored in the relational card tables.
#[derive(Debug, Clone)]
pub struct DbBackend {
    pub name: String,
    pub path_prefix: String,
    pub placeholder_prefix: String,
    pub default_kind: Option<VCardKind>,
}

impl From<&DbDirectoryConfig> for DbBackend {
    fn from(config: &DbDirectoryConfig) -> Self {
        Self {
            name: config.name.clone(),
            path_prefix: normalize_prefix(&config.path_prefix),
            placeholder_prefix: config.placeholder_prefix.clone(),
            default_kind: config.default_kind.as_deref().map(VCardKind::parse),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DirectoryBackend {
    Ldap(LdapBackend),
    Db(DbBackend),
}

impl DirectoryBackend {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ldap(ldap) => &ldap.name,
            Self::Db(db) => &db.name,
        }
    }

    #[must_use]
    pub fn path_prefix(&self) -> &str {
        match self {
            Self::Ldap(ldap) => &ldap.path_prefix,
            Self::Db(db) => &db.path_prefix,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> DirectoryKind {
        match self {
            Self::Ldap(_) => DirectoryKind::Ldap,
            Self::Db(_) => DirectoryKind::Db,
        }
    }

    /// Whether `path` lies in this backend's tree, on a segment boundary.
    #[must_use]
    pub fn serves(&self, path: &str) -> bool {
        let prefix = self.path_prefix();
        match path.strip_prefix(prefix) {
            Some(rest) => prefix == "/" || rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl From<&DirectoryConfig> for DirectoryBackend {
    fn from(config: &DirectoryConfig) -> Self {
        match config {
            DirectoryConfig::Ldap(ldap) => Self::Ldap(ldap.into()),
            DirectoryConfig::Db(db) => Self::Db(db.into()),
        }
    }
}

/// `/a/b/` and `/a/b` name the same tree.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Every configured backend plus the shared mapping registry.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    registry: Arc<PropertyAttributeRegistry>,
    mode: FilterMode,
    backends: Vec<DirectoryBackend>,
}

impl BackendRegistry {
    /// ## Summary
    /// Builds the backends named in `settings`.
    ///
    /// ## Errors
    /// Returns [`ServiceError::CoreError`] if the settings fail validation and
    /// [`ServiceError::InvalidConfiguration`] when two backends share a path prefix.
    #[tracing::instrument(skip_all, fields(directories = settings.directories.len(), mode = %settings.filter.mode))]
    pub fn from_settings(
        settings: &Settings,
        registry: Arc<PropertyAttributeRegistry>,
    ) -> ServiceResult<Self> {
        settings.validate()?;

        let mut backends: Vec<DirectoryBackend> = Vec::with_capacity(settings.directories.len());
        for config in &settings.directories {
            let backend = DirectoryBackend::from(config);
            if let Some(existing) = backends
                .iter()
                .find(|b| b.path_prefix() == backend.path_prefix())
            {
                return Err(ServiceError::InvalidConfiguration(format!(
                    "directories {} and {} share path prefix {}",
                    existing.name(),
                    backend.name(),
                    backend.path_prefix()
                )));
            }

            info!(
                name = %backend.name(),
                kind = %backend.kind(),
                path_prefix = %backend.path_prefix(),
                "Registered addressbook directory"
            );
            backends.push(backend);
        }

        Ok(Self {
            registry,
            mode: settings.filter.mode,
            backends,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &PropertyAttributeRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn mode(&self) -> FilterMode {
        self.mode
    }

    #[must_use]
    pub fn backends(&self) -> &[DirectoryBackend] {
        &self.backends
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DirectoryBackend> {
        self.backends.iter().find(|b| b.name() == name)
    }

    /// ## Summary
    /// Finds the backend serving `path`. The longest matching prefix wins.
    ///
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] when no backend serves the path.
    pub fn resolve(&self, path: &str) -> ServiceResult<&DirectoryBackend> {
        let backend = self
            .backends
            .iter()
            .filter(|b| b.serves(path))
            .max_by_key(|b| b.path_prefix().len())
            .ok_or_else(|| ServiceError::NotFound(path.to_owned()))?;

        debug!(path, directory = %backend.name(), "Resolved addressbook directory");
        Ok(backend)
    }

    #[must_use]
    pub fn ldap_compiler(&self) -> LdapFilterCompiler<'_> {
        LdapFilterCompiler::new(&self.registry, self.mode)
    }

    #[must_use]
    pub fn record_mapper<'a>(&'a self, backend: &'a LdapBackend) -> RecordMapper<'a> {
        RecordMapper::new(&self.registry, &backend.mapper_options)
    }

    /// Compiler emitting `:<prefix>N` placeholders, for plans shown to people.
    #[must_use]
    pub fn named_compiler(&self, backend: &DbBackend) -> RelationalPredicateCompiler {
        RelationalPredicateCompiler::new(
            self.mode,
            PlaceholderStyle::Named {
                prefix: backend.placeholder_prefix.clone(),
            },
        )
    }

    /// Compiler emitting `$N` placeholders after `offset` bound parameters.
    #[must_use]
    pub const fn positional_compiler(&self, offset: usize) -> RelationalPredicateCompiler {
        RelationalPredicateCompiler::new(self.mode, PlaceholderStyle::Positional { offset })
    }
}
