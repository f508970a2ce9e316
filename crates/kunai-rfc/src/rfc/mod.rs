pub mod dav;
pub mod query;
pub mod validation;
pub mod vcard;
