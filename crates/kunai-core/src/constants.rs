/// Prefix for environment variables read into [`crate::config::Settings`].
pub const ENV_PREFIX: &str = "KUNAI";

/// Optional TOML file consulted after the environment.
pub const CONFIG_FILE: &str = "config.toml";

/// Collation honored by default for `CardDAV` text-match (RFC 6352 §8.3).
pub const DEFAULT_COLLATION: &str = "i;unicode-casemap";
