//! `CardDAV` REPORT types.
//!
//! The filter tree an `addressbook-query` REPORT carries (RFC 6352 §10.5),
//! produced by the XML layer and consumed by the backend compilers.

mod report;

pub use report::{
    AddressbookFilter, AddressbookQuery, FilterTest, MatchType, ParamFilter, PropFilter,
    TextMatch,
};
