pub mod constants;
pub mod error;
pub mod map;
pub mod model;
pub mod query;
pub mod schema;
