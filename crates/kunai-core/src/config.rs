use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{CONFIG_FILE, ENV_PREFIX};
use crate::error::{CoreError, CoreResult};
use crate::types::{DirectoryKind, FilterMode};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub directories: Vec<DirectoryConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub mode: FilterMode,
}

/// One addressbook tree and the backend that stores it.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryConfig {
    Ldap(LdapDirectoryConfig),
    Db(DbDirectoryConfig),
}

impl DirectoryConfig {
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
}

#[derive(Debug, Clone, Deserialize)]
pub struct LdapDirectoryConfig {
    pub name: String,
    pub path_prefix: String,
    pub base_dn: String,
    #[serde(default = "default_entry_object_class")]
    pub entry_object_class: String,
    /// Attribute whose value names the card resource (`<value>.vcf`).
    #[serde(default = "default_entry_id_attribute")]
    pub entry_id_attribute: String,
    /// Fetched in addition to the registry's default attribute list.
    #[serde(default)]
    pub extra_attributes: Vec<String>,
    pub default_kind: Option<String>,
    /// Principal collection the entry-id values live under, e.g. `/principals/users/`.
    pub principal_prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbDirectoryConfig {
    pub name: String,
    pub path_prefix: String,
    #[serde(default = "default_placeholder_prefix")]
    pub placeholder_prefix: String,
    pub default_kind: Option<String>,
}

fn default_entry_object_class() -> String {
    "inetOrgPerson".to_owned()
}

fn default_entry_id_attribute() -> String {
    "cn".to_owned()
}

fn default_placeholder_prefix() -> String {
    "P".to_owned()
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and `config.toml`.
    /// Environment variables (`KUNAI_` prefix) take precedence over file values.
    ///
    /// ## Errors
    /// Returns [`CoreError::LoadError`] if building or deserializing the configuration fails.
    pub fn load() -> CoreResult<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("filter.mode", FilterMode::default().as_str())?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from a TOML document, applying the same defaults as [`Settings::load`].
    ///
    /// ## Errors
    /// Returns [`CoreError::LoadError`] if the document is malformed or does not deserialize.
    pub fn from_toml(source: &str) -> CoreResult<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("filter.mode", FilterMode::default().as_str())?
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Checks cross-entry constraints serde cannot express.
    ///
    /// ## Errors
    /// Returns [`CoreError::ConfigError`] for empty or duplicate directory names
    /// and for path prefixes that are not absolute.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.directories.len());

        for directory in &self.directories {
            let name = directory.name();
            if name.trim().is_empty() {
                return Err(CoreError::ConfigError(
                    "directory name must not be empty".to_owned(),
                ));
            }
            if seen.contains(&name) {
                return Err(CoreError::ConfigError(format!(
                    "duplicate directory name: {name}"
                )));
            }
            if !directory.path_prefix().starts_with('/') {
                return Err(CoreError::ConfigError(format!(
                    "directory {name}: path prefix must start with '/'"
                )));
            }
            seen.push(name);
        }

        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    settings.validate()?;
    tracing::debug!(
        directories = settings.directories.len(),
        mode = %settings.filter.mode,
        "Settings validated"
    );
    Ok(settings)
}
