//! vCard property model (RFC 6350).
//!
//! Only the in-memory shape record mappers produce and consume lives here.
//! Text and JSON vCard serialization belong to the caller.
//!
//! ```rust
//! use kunai_rfc::rfc::vcard::{VCard, VCardKind, VCardProperty};
//!
//! let mut card = VCard::new();
//! card.add_property(VCardProperty::text("FN", "Jane Doe"));
//! card.add_property(VCardProperty::text("KIND", "group"));
//!
//! assert_eq!(card.formatted_name(), Some("Jane Doe"));
//! assert_eq!(card.kind(), VCardKind::Group);
//! ```

pub mod core;

pub use self::core::{VCard, VCardKind, VCardParameter, VCardProperty, names};
