pub mod backend;
pub mod carddav;
pub mod error;
