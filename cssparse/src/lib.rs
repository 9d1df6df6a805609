//! Parser for a restricted CSS dialect used to annotate visual/spatial
//! entities (classes, ids, wildcards) with typed key/value declarations.
//!
//! A single UTF-8 buffer ([`CssString`]) is scanned once into a compact,
//! indexed, read-only [`CssKeyArray`] of [`CssKeyField`] entries. Every
//! string the table exposes is a `(offset, length)` slice into the
//! buffer that produced it — nothing is copied during or after parsing.

pub mod css_string;
pub mod error;
mod parser;
pub mod table;
pub mod types;

pub use css_string::CssString;
pub use error::CssError;
pub use table::{flags_to_text, CssKeyArray};
pub use types::{CssFlag, CssKeyField, CssKeyType};

#[cfg(test)]
mod proptests;
