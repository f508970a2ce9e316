pub mod dn;
pub mod error;
pub mod map;
pub mod query;
pub mod record;
pub mod registry;
