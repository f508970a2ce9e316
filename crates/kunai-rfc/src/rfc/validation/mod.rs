//! Validation logic for RFC compliance.
//!
//! Structural checks on `CardDAV` filters that hold regardless of which
//! backend later compiles them.

pub mod filter;

pub use filter::{FilterValidationResult, validate_addressbook_filter};
