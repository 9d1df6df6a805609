//! The byte-level scanner. A single pass over the input buffer emits
//! entries in source order; selector `link` fields are resolved at
//! block-open time rather than by patching already-emitted entries, so
//! the entry vector stays append-only for the whole scan (see the
//! "two-pass linkage" note this crate is built against).

use crate::css_string::CssString;
use crate::error::CssError;
use crate::types::{CssKeyField, CssKeyType, MAX_LENGTH, USABLE_ENTRIES};
use nom::bytes::complete::{take_while, take_while_m_n};
use nom::sequence::pair;
use nom::IResult;

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// `[A-Za-z_][A-Za-z0-9_-]*`, recognized with `nom` but driven from the
/// manual cursor the rest of the scanner keeps, the way the donor
/// crate's `nom`-based chunk parsers are invoked from a hand-rolled
/// offset-walking loop.
fn name(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (rest, (head, tail)) = pair(take_while_m_n(1, 1, is_name_start), take_while(is_name_continue))(input)?;
    let len = head.len() + tail.len();
    Ok((rest, &input[..len]))
}

fn scan_name(bytes: &[u8], pos: usize) -> Result<usize, CssError> {
    match name(&bytes[pos..]) {
        Ok((_, matched)) => {
            if matched.len() >= MAX_LENGTH {
                return Err(CssError::TokenTooLong { offset: pos });
            }
            Ok(pos + matched.len())
        }
        Err(_) => Err(CssError::UnexpectedChar { offset: pos }),
    }
}

fn is_plain_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn skip_plain_ws(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && is_plain_ws(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Skips whitespace, `// ...` line comments and `/* ... */` block
/// comments. Used only between structural tokens (selectors, `{`, `}`,
/// keys, `:`, `;`) — never inside a value, where a leading `//` must be
/// read as literal value text, not a comment.
fn skip_trivia(bytes: &[u8], mut pos: usize) -> Result<usize, CssError> {
    loop {
        if pos >= bytes.len() {
            return Ok(pos);
        }
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos += 2;
                while pos < bytes.len() && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                let start = pos;
                pos += 2;
                let mut closed = false;
                while pos + 1 < bytes.len() {
                    if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                        pos += 2;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if !closed {
                    return Err(CssError::UnexpectedChar { offset: start });
                }
            }
            _ => return Ok(pos),
        }
    }
}

fn push(entries: &mut Vec<CssKeyField>, entry: CssKeyField) -> Result<usize, CssError> {
    if entries.len() >= USABLE_ENTRIES {
        return Err(CssError::TooManyKeys);
    }
    entries.push(entry);
    Ok(entries.len() - 1)
}

/// Scans `buffer` end to end, producing the flat entry vector a
/// [`crate::table::CssKeyArray`] wraps. Runs to completion or returns
/// the first error encountered; no partial result is ever handed back.
pub(crate) fn scan(buffer: &CssString) -> Result<Vec<CssKeyField>, CssError> {
    let bytes = buffer.payload();
    let mut entries: Vec<CssKeyField> = Vec::new();
    let mut pending_selectors: Vec<usize> = Vec::new();
    let mut pos = 0usize;

    loop {
        pos = skip_trivia(bytes, pos)?;
        if pos >= bytes.len() {
            break;
        }

        // --- selector list ---
        loop {
            let start = pos;
            match bytes[pos] {
                b'.' => {
                    pos += 1;
                    let name_start = pos;
                    pos = scan_name(bytes, pos)?;
                    let total_len = pos - start;
                    if total_len >= MAX_LENGTH {
                        return Err(CssError::TokenTooLong { offset: start });
                    }
                    debug_assert!(pos > name_start);
                    let idx = push(&mut entries, CssKeyField::new(CssKeyType::Class, start, total_len)?)?;
                    pending_selectors.push(idx);
                }
                b'#' => {
                    pos += 1;
                    let name_start = pos;
                    pos = scan_name(bytes, pos)?;
                    let total_len = pos - start;
                    if total_len >= MAX_LENGTH {
                        return Err(CssError::TokenTooLong { offset: start });
                    }
                    debug_assert!(pos > name_start);
                    let idx = push(&mut entries, CssKeyField::new(CssKeyType::Id, start, total_len)?)?;
                    pending_selectors.push(idx);
                }
                b'*' => {
                    pos += 1;
                    let idx = push(&mut entries, CssKeyField::new(CssKeyType::Asterisk, start, 1)?)?;
                    pending_selectors.push(idx);
                }
                _ => return Err(CssError::UnexpectedChar { offset: pos }),
            }

            pos = skip_trivia(bytes, pos)?;
            if pos >= bytes.len() {
                return Err(CssError::UnterminatedBlock { offset: pos });
            }
            match bytes[pos] {
                b',' => {
                    pos += 1;
                    pos = skip_trivia(bytes, pos)?;
                    if pos >= bytes.len() {
                        return Err(CssError::UnterminatedBlock { offset: pos });
                    }
                    continue;
                }
                b'{' => {
                    pos += 1;
                    break;
                }
                _ => return Err(CssError::ExpectedBraceOpen { offset: pos }),
            }
        }

        // --- block open: emit the sentinel and resolve pending links ---
        let group_idx = push(&mut entries, CssKeyField::sentinel(pos))?;
        for &sidx in &pending_selectors {
            entries[sidx].link = group_idx as u16;
        }
        pending_selectors.clear();

        // --- declarations ---
        loop {
            pos = skip_trivia(bytes, pos)?;
            if pos >= bytes.len() {
                return Err(CssError::UnterminatedBlock { offset: pos });
            }
            if bytes[pos] == b'}' {
                pos += 1;
                break;
            }

            let key_start = pos;
            pos = scan_name(bytes, pos)?;
            let key_len = pos - key_start;
            push(&mut entries, CssKeyField::new(CssKeyType::Key, key_start, key_len)?)?;

            pos = skip_trivia(bytes, pos)?;
            if pos >= bytes.len() || bytes[pos] != b':' {
                return Err(CssError::ExpectedColon { offset: pos.min(bytes.len()) });
            }
            pos += 1;
            pos = skip_plain_ws(bytes, pos);

            let (val_start, val_len);
            if pos < bytes.len() && bytes[pos] == b'"' {
                let quote_start = pos;
                pos += 1;
                let content_start = pos;
                loop {
                    if pos >= bytes.len() {
                        return Err(CssError::UnterminatedString { offset: quote_start });
                    }
                    if bytes[pos] == b'"' {
                        break;
                    }
                    pos += 1;
                }
                let content_len = pos - content_start;
                if content_len >= MAX_LENGTH {
                    return Err(CssError::TokenTooLong { offset: content_start });
                }
                pos += 1; // closing quote
                val_start = content_start;
                val_len = content_len;
                pos = skip_plain_ws(bytes, pos);
            } else {
                let start = pos;
                while pos < bytes.len() && bytes[pos] != b';' && bytes[pos] != b'}' {
                    pos += 1;
                }
                if pos >= bytes.len() || bytes[pos] == b'}' {
                    return Err(CssError::ExpectedSemicolon { offset: pos.min(bytes.len()) });
                }
                let mut end = pos;
                while end > start && is_plain_ws(bytes[end - 1]) {
                    end -= 1;
                }
                let len = end - start;
                if len >= MAX_LENGTH {
                    return Err(CssError::TokenTooLong { offset: start });
                }
                val_start = start;
                val_len = len;
            }

            if pos >= bytes.len() || bytes[pos] != b';' {
                return Err(CssError::ExpectedSemicolon { offset: pos.min(bytes.len()) });
            }
            pos += 1; // consume ';'

            push(&mut entries, CssKeyField::new(CssKeyType::Value, val_start, val_len)?)?;
        }
    }

    Ok(entries)
}
