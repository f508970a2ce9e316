//! `kunai` command line.

use std::io::Read;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use kunai_core::config::Settings;
use kunai_directory::record::DirRecord;
use kunai_directory::registry::PropertyAttributeRegistry;
use kunai_rfc::rfc::dav::core::AddressbookQuery;
use kunai_service::backend::BackendRegistry;
use kunai_service::carddav::service::object::{StoredCard, read_card};
use kunai_service::carddav::service::report::plan_addressbook_query;
use tracing::info;

use crate::error::{AppError, AppResult};

#[derive(Parser, Debug)]
#[command(name = "kunai")]
#[command(about = "CardDAV query translation and attribute mapping", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and list the configured directories (default)
    Check,

    /// Show the backend request an addressbook-query compiles to
    Explain {
        /// Addressbook path, e.g. /public/people
        path: String,

        /// JSON addressbook-query, `-` for stdin
        query: String,
    },

    /// Render a directory record as a vCard
    Render {
        /// Addressbook path served by an LDAP directory
        path: String,

        /// JSON directory record, `-` for stdin
        record: String,
    },
}

impl Cli {
    /// ## Summary
    /// Runs the selected command and returns its output.
    ///
    /// ## Errors
    /// Returns an error if the input cannot be read or parsed, or the
    /// service rejects it.
    pub fn run(&self, backends: &BackendRegistry) -> AppResult<String> {
        match &self.command {
            None | Some(Commands::Check) => Ok(check(backends)),
            Some(Commands::Explain { path, query }) => explain(backends, path, &read_input(query)?),
            Some(Commands::Render { path, record }) => render(backends, path, &read_input(record)?),
        }
    }
}

/// ## Summary
/// Builds the standard registry and the configured backends.
///
/// ## Errors
/// Returns an error if the registry or a backend fails to build.
pub fn build_backends(settings: &Settings) -> AppResult<BackendRegistry> {
    let registry = PropertyAttributeRegistry::standard()?;
    info!(
        mappings = registry.mappings().len(),
        fetch_attributes = registry.default_attributes().len(),
        "Attribute registry built"
    );

    Ok(BackendRegistry::from_settings(settings, Arc::new(registry))?)
}

fn read_input(source: &str) -> AppResult<String> {
    let read = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).map(|_| buffer)
    } else {
        std::fs::read_to_string(source)
    };

    read.map_err(|source_err| AppError::InputError {
        path: source.to_owned(),
        source: source_err,
    })
}

#[must_use]
pub fn check(backends: &BackendRegistry) -> String {
    let mut lines = vec![format!("filter mode: {}", backends.mode())];
    lines.extend(backends.backends().iter().map(|backend| {
        format!(
            "{} ({}) at {}",
            backend.name(),
            backend.kind(),
            backend.path_prefix()
        )
    }));
    lines.join("\n")
}

/// ## Summary
/// Plans `query_json` against the addressbook at `path` and renders the plan as JSON.
///
/// ## Errors
/// Returns an error for malformed JSON or a query the service rejects.
pub fn explain(backends: &BackendRegistry, path: &str, query_json: &str) -> AppResult<String> {
    let query: AddressbookQuery = serde_json::from_str(query_json)?;
    let plan = plan_addressbook_query(backends, path, &query)?;
    Ok(serde_json::to_string_pretty(&plan)?)
}

/// ## Summary
/// Maps the directory record in `record_json` to a vCard and renders it as JSON.
///
/// ## Errors
/// Returns an error for malformed JSON, or when `path` is not served by an
/// LDAP directory.
pub fn render(backends: &BackendRegistry, path: &str, record_json: &str) -> AppResult<String> {
    let record: DirRecord = serde_json::from_str(record_json)?;
    let mapped = read_card(backends, path, &StoredCard::Ldap(record))?;
    Ok(serde_json::to_string_pretty(&mapped)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kunai_service::error::ServiceError;

    const TREES: &str = r#"
[[directories]]
kind = "ldap"
name = "people"
path_prefix = "/public/people"
base_dn = "ou=people,dc=example,dc=org"

[[directories]]
kind = "db"
name = "books"
path_prefix = "/user"
"#;

    fn backends() -> BackendRegistry {
        build_backends(&Settings::from_toml(TREES).unwrap()).unwrap()
    }

    #[test]
    fn check_lists_directories() {
        let output = check(&backends());

        assert_eq!(
            output,
            "filter mode: lenient\npeople (ldap) at /public/people\nbooks (db) at /user"
        );
    }

    #[test_log::test]
    fn explain_renders_ldap_plan() {
        let query = r#"{
            "filter": {
                "test": "anyof",
                "prop_filters": [
                    { "name": "EMAIL", "text_match": { "value": "example" } }
                ]
            }
        }"#;

        let output = explain(&backends(), "/public/people", query).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["backend"], "ldap");
        assert_eq!(json["directory"], "people");
        assert_eq!(
            json["search"]["filter"],
            "(&(objectClass=inetOrgPerson)(mail=*example*))"
        );
        assert_eq!(json["dropped"], serde_json::json!([]));
    }

    #[test_log::test]
    fn explain_renders_relational_plan() {
        let query = r#"{
            "filter": {
                "test": "allof",
                "prop_filters": [
                    { "name": "FN", "text_match": { "value": "smi", "match_type": "starts-with" } },
                    { "name": "X-FOO", "is_not_defined": true }
                ]
            }
        }"#;

        let output = explain(&backends(), "/user/alice", query).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["backend"], "db");
        assert_eq!(json["predicate"]["params"][0], "SMI%");
        assert!(
            json["predicate"]["fragment"]
                .as_str()
                .unwrap()
                .starts_with("(UPPER(card.fn) LIKE :P0) AND (NOT EXISTS")
        );
    }

    #[test]
    fn render_maps_record() {
        let record = r#"{
            "dn": "cn=Ann,ou=people,dc=example,dc=org",
            "attributes": [
                { "name": "cn", "values": ["Ann"] },
                { "name": "mail", "values": ["ann@example.org"] }
            ]
        }"#;

        let output = render(&backends(), "/public/people", record).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["name"], "Ann.vcf");
        assert_eq!(json["kind"], "individual");
    }

    #[test]
    fn render_refuses_relational_path() {
        let err = render(&backends(), "/user/alice", "{}").unwrap_err();

        assert!(matches!(
            err,
            AppError::ServiceError(ServiceError::WrongBackend { .. })
        ));
    }

    #[test]
    fn malformed_query_is_a_json_error() {
        let err = explain(&backends(), "/user/alice", "{ nope").unwrap_err();

        assert!(matches!(err, AppError::JsonError(_)));
    }

    #[test]
    fn missing_input_file_names_path() {
        let err = read_input("/definitely/not/here.json").unwrap_err();

        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
