//! `CardDAV` filter translation for relational card storage.

mod filter;

pub use filter::{PlaceholderStyle, RelationalPredicate, RelationalPredicateCompiler};
