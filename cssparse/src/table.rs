//! The parser's output: a compact, indexed array of [`CssKeyField`]
//! entries borrowing their bytes from the [`CssString`] that produced
//! them. Built once by [`CssKeyArray::parse`]; every method after that
//! is a pure read.

use crate::css_string::CssString;
use crate::error::CssError;
use crate::parser;
use crate::types::{CssFlag, CssKeyField, CssKeyType};

/// The parser's output table. Borrows its input buffer for its entire
/// lifetime, so the buffer cannot be dropped out from under a live
/// table — the borrow checker makes the "destruction after any live
/// table" hazard this format's C ancestor warns about unrepresentable.
pub struct CssKeyArray<'a> {
    buffer: &'a CssString,
    entries: Vec<CssKeyField>,
}

impl<'a> CssKeyArray<'a> {
    /// Parses `buffer` into a key table. Aborts and returns the first
    /// error encountered; there is no partial result on failure.
    pub fn parse(buffer: &'a CssString) -> Result<Self, CssError> {
        let entries = parser::scan(buffer)?;
        Ok(Self { buffer, entries })
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn used(&self) -> usize {
        self.entries.len()
    }

    pub fn node_at(&self, index: usize) -> Option<&CssKeyField> {
        self.entries.get(index)
    }

    /// Bytes `[offset, offset + length)` of the retained input buffer,
    /// for a node already known to have that `(offset, length)` pair.
    pub fn slice(&self, node: &CssKeyField) -> &[u8] {
        let start = node.offset() as usize;
        let end = start + node.length() as usize;
        &self.buffer.payload()[start..end]
    }

    /// Byte range `[offset, offset + length)` of the token that starts
    /// at `offset` — the raw `string_at` primitive from the public API.
    /// Unlike the C ancestor, the buffer is never NUL-normalized in
    /// place (the parser only ever borrows it immutably), so this looks
    /// up the entry that starts at `offset` and bounds the result by its
    /// own recorded length rather than scanning for a sentinel byte that
    /// is never written. Entry offsets are strictly increasing (no two
    /// entries share a start), so the lookup is unambiguous; an `offset`
    /// that doesn't open any entry yields an empty slice.
    pub fn string_at(&self, offset: u32) -> &[u8] {
        match self.entries.iter().find(|e| e.offset() == offset) {
            Some(node) => self.slice(node),
            None => &[],
        }
    }

    fn str_of(&self, node: &CssKeyField) -> &str {
        std::str::from_utf8(self.slice(node)).unwrap_or("")
    }

    /// Declarations belonging to the block opened at sentinel `group`:
    /// pairs of (key bytes, value bytes) in source order, stopping at
    /// the next selector entry, sentinel, or the end of the table.
    fn declarations_in_group(&self, group: usize) -> Vec<(&[u8], &[u8])> {
        let mut out = Vec::new();
        let mut i = group + 1;
        while i + 1 < self.entries.len() && self.entries[i].ty() == CssKeyType::Key {
            out.push((self.slice(&self.entries[i]), self.slice(&self.entries[i + 1])));
            i += 2;
        }
        out
    }

    /// The flags a selector carries once flag-vocabulary declarations
    /// in its block (e.g. `hidden: 1;`) are OR-ed in. This is the
    /// "downstream call" the grammar leaves to consumers: it never
    /// mutates the table, just computes the combined bitset on request.
    pub fn selector_flags(&self, selector_index: usize) -> Option<u16> {
        let selector = self.entries.get(selector_index)?;
        if !selector.is_class() {
            return None;
        }
        let mut flags = selector.flags();
        if let Some(group) = selector.link() {
            for (key, value) in self.declarations_in_group(group) {
                if let Ok(key_str) = std::str::from_utf8(key) {
                    if let Some(bit) = CssFlag::named_bit(key_str) {
                        let value_str = std::str::from_utf8(value).unwrap_or("").trim();
                        if value_str == key_str || value_str == bit.to_string() {
                            flags |= bit;
                        }
                    }
                }
            }
        }
        Some(flags)
    }

    /// Indices of every entry of type `ty` whose bare name (the part
    /// after a leading `.`/`#`, or the whole token for `*`) equals
    /// `name`, in table order, capped at 32 matches.
    pub fn query_class(&self, ty: CssKeyType, name: &str) -> Vec<usize> {
        let mut out = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.ty() != ty {
                continue;
            }
            let raw = self.slice(entry);
            let bare = match ty {
                CssKeyType::Class | CssKeyType::Id | CssKeyType::Asterisk => &raw[1..],
                _ => raw,
            };
            if bare == name.as_bytes() {
                out.push(i);
                if out.len() == 32 {
                    break;
                }
            }
        }
        out
    }

    /// Fixed-capacity form of [`Self::query_class`], kept for callers
    /// that want the `out[32]` convention rather than a growable `Vec`.
    pub fn query_class_into(&self, ty: CssKeyType, name: &str, out: &mut [usize; 32]) -> usize {
        let matches = self.query_class(ty, name);
        let n = matches.len();
        out[..n].copy_from_slice(&matches[..n]);
        n
    }

    fn format_value(value: &str) -> String {
        let has_edge_whitespace = value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace);
        if value.contains(';') || value.contains('}') || has_edge_whitespace {
            format!("\"{}\"", value)
        } else {
            value.to_string()
        }
    }

    /// Writes a canonical reformatted CSS text using only the public
    /// accessors above. Values containing `;` or `}` are re-quoted so
    /// the output reparses to the same sequence of entries.
    pub fn print(&self) -> String {
        let mut out = String::new();
        let n = self.entries.len();
        let mut i = 0;
        while i < n {
            let mut selectors = Vec::new();
            while i < n && self.entries[i].is_class() {
                selectors.push(i);
                i += 1;
            }
            if i >= n {
                break;
            }
            debug_assert_eq!(self.entries[i].ty(), CssKeyType::None);
            let group = i;
            i += 1;

            let names: Vec<&str> = selectors.iter().map(|&idx| self.str_of(&self.entries[idx])).collect();
            out.push_str(&names.join(", "));
            out.push_str(" {\n");

            for (key, value) in self.declarations_in_group(group) {
                let key_str = std::str::from_utf8(key).unwrap_or("");
                let value_str = std::str::from_utf8(value).unwrap_or("");
                out.push_str(&format!("    {}: {};\n", key_str, Self::format_value(value_str)));
            }
            while i < n && self.entries[i].ty() == CssKeyType::Key {
                i += 2;
            }

            out.push_str("}\n\n");
        }
        out
    }
}

/// `|`-separated, low-bit-first text form of a flag bitset (e.g.
/// `"readonly|hidden"`), with any unnamed bits trailing as a decimal
/// number.
pub fn flags_to_text(flags: u16) -> String {
    CssFlag::to_text(flags)
}
