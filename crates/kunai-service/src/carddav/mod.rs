//! CardDAV services over the configured backends.

pub mod service;
