//! Table and alias names shared by the schema and generated SQL.

pub const CARD_TABLE: &str = "card";
pub const PROPERTY_TABLE: &str = "card_properties";
pub const PROPERTY_ALIAS: &str = "prop";

/// Correlated sub-select opening an EAV test; the property name placeholder follows.
pub const PROPERTY_EXISTS_PREFIX: &str = const_str::concat!(
    "EXISTS (SELECT 1 FROM ",
    PROPERTY_TABLE,
    " ",
    PROPERTY_ALIAS,
    " WHERE ",
    PROPERTY_ALIAS,
    ".card_id = ",
    CARD_TABLE,
    ".id AND ",
    PROPERTY_ALIAS,
    ".name = "
);

pub const PROPERTY_VALUE_COLUMN: &str = const_str::concat!(PROPERTY_ALIAS, ".value");

/// Cards of one addressbook; `$1` is the addressbook path.
pub const CARD_QUERY_BASE: &str = const_str::concat!(
    "SELECT ",
    CARD_TABLE,
    ".id, ",
    CARD_TABLE,
    ".name FROM ",
    CARD_TABLE,
    " WHERE ",
    CARD_TABLE,
    ".parent_path = $1"
);
