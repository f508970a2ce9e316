use std::sync::Arc;

use kunai_core::config::Settings;
use kunai_directory::registry::PropertyAttributeRegistry;
use kunai_service::backend::BackendRegistry;

pub const TREES: &str = r#"
[[directories]]
kind = "ldap"
name = "people"
path_prefix = "/public/people"
base_dn = "ou=people,dc=example,dc=org"
extra_attributes = ["jpegPhoto"]
principal_prefix = "/principals/users"

[[directories]]
kind = "db"
name = "books"
path_prefix = "/user"
placeholder_prefix = "Q"
default_kind = "org"
"#;

pub fn backends_with(source: &str) -> BackendRegistry {
    let settings = Settings::from_toml(source).unwrap();
    let registry = Arc::new(PropertyAttributeRegistry::standard().unwrap());
    BackendRegistry::from_settings(&settings, registry).unwrap()
}

pub fn backends() -> BackendRegistry {
    backends_with(TREES)
}

pub fn strict_backends() -> BackendRegistry {
    backends_with(&format!("[filter]\nmode = \"strict\"\n{TREES}"))
}
