//! The packed key-entry record and the flag vocabulary it carries.
//!
//! The C header this crate is descended from bitpacks `(type, flags,
//! offset, length, link)` into a 64-bit record. We keep the logical
//! record unpacked (plain struct fields) but still *enforce* the bit
//! widths below, since they are contracts other implementations of this
//! format rely on.

use crate::error::CssError;

/// 20-bit offset field: `0 ..= MAX_OFFSET - 1`.
pub const MAX_OFFSET: usize = 0x0010_0000;
/// 8-bit length field: a token is never longer than this.
pub const MAX_LENGTH: usize = 0x0100;
/// 12-bit link field; one slot (`INVALID_LINK`) is reserved.
pub const MAX_ENTRIES: usize = 0x1000;
/// Usable entry indices: `0 ..= USABLE_ENTRIES - 1`.
pub const USABLE_ENTRIES: usize = MAX_ENTRIES - 1;
/// Sentinel `link` value meaning "no associated block".
pub const INVALID_LINK: u16 = 0x0FFF;

/// Named bits of the 16-bit UI-state flag set. Unknown bits are legal
/// and preserved, just unnamed by this grammar.
pub struct CssFlag;

impl CssFlag {
    pub const READONLY: u16 = 1;
    pub const HIDDEN: u16 = 2;
    pub const HILIGHT: u16 = 4;
    pub const PICKUP: u16 = 8;
    pub const DRAGGING: u16 = 16;
    pub const DELETING: u16 = 32;
    pub const FAULT: u16 = 64;
    pub const FLASH: u16 = 128;
    pub const ZOOMIN: u16 = 256;
    pub const ZOOMOUT: u16 = 512;
    pub const PANNING: u16 = 1024;

    const NAMED: &'static [(u16, &'static str)] = &[
        (Self::READONLY, "readonly"),
        (Self::HIDDEN, "hidden"),
        (Self::HILIGHT, "hilight"),
        (Self::PICKUP, "pickup"),
        (Self::DRAGGING, "dragging"),
        (Self::DELETING, "deleting"),
        (Self::FAULT, "fault"),
        (Self::FLASH, "flash"),
        (Self::ZOOMIN, "zoomin"),
        (Self::ZOOMOUT, "zoomout"),
        (Self::PANNING, "panning"),
    ];

    /// Looks up the named bit for a flag-declaration identifier, e.g. `"hidden"`.
    pub fn named_bit(name: &str) -> Option<u16> {
        Self::NAMED
            .iter()
            .find(|&&(_, n)| n == name)
            .map(|&(bit, _)| bit)
    }

    /// `|`-separated, low-bit-first text form. Bits with no name in the
    /// vocabulary are rendered as a trailing decimal number.
    pub fn to_text(flags: u16) -> String {
        let mut parts = Vec::new();
        let mut remaining = flags;
        for &(bit, name) in Self::NAMED {
            if flags & bit != 0 {
                parts.push(name.to_string());
                remaining &= !bit;
            }
        }
        if remaining != 0 {
            parts.push(remaining.to_string());
        }
        parts.join("|")
    }
}

/// The type tag of a [`CssKeyField`]. Discriminants match the source
/// header's encoding (`'.'`, `'#'`, `'*'` as their ASCII values) so that
/// `type as u8` round-trips through the byte that introduced the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssKeyType {
    None = 0,
    Key = 1,
    Value = 2,
    Class = 46,
    Id = 35,
    Asterisk = 42,
}

impl CssKeyType {
    pub fn is_selector(self) -> bool {
        matches!(self, CssKeyType::Class | CssKeyType::Id | CssKeyType::Asterisk)
    }
}

/// One entry of the key table: a tagged slice into the owning input
/// buffer, plus the flag bitset and block-link used by selector entries.
#[derive(Debug, Clone, Copy)]
pub struct CssKeyField {
    pub(crate) ty: CssKeyType,
    pub(crate) flags: u16,
    pub(crate) offset: u32,
    pub(crate) length: u8,
    pub(crate) link: u16,
}

impl CssKeyField {
    pub(crate) fn new(ty: CssKeyType, offset: usize, length: usize) -> Result<Self, CssError> {
        if offset >= MAX_OFFSET {
            return Err(CssError::InputTooLarge { len: offset, max: MAX_OFFSET });
        }
        if length >= MAX_LENGTH {
            return Err(CssError::TokenTooLong { offset });
        }
        Ok(Self {
            ty,
            flags: 0,
            offset: offset as u32,
            length: length as u8,
            link: INVALID_LINK,
        })
    }

    pub(crate) fn sentinel(offset: usize) -> Self {
        Self {
            ty: CssKeyType::None,
            flags: 0,
            offset: offset as u32,
            length: 0,
            link: INVALID_LINK,
        }
    }

    pub fn ty(&self) -> CssKeyType {
        self.ty
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn is_class(&self) -> bool {
        self.ty.is_selector()
    }

    /// The index of this selector's block-group sentinel, or `None` when
    /// the selector has no block (`link == INVALID_LINK`).
    pub fn link(&self) -> Option<usize> {
        if self.link == INVALID_LINK {
            None
        } else {
            Some(self.link as usize)
        }
    }
}
