//! `CardDAV` filter translation for directory searches.

mod filter;
mod search;

pub use filter::{LdapFilterCompiler, escape_filter_value};
pub use search::LdapSearch;

#[cfg(test)]
mod filter_tests;
