//! RLP (Recursive Length Prefix) header primitives.
//!
//! The stream decoder never sees a whole item at once, so this module only
//! answers two questions about a partially received prefix: is it complete
//! yet, and what does it declare. Both functions are pure and know nothing
//! about the transaction schema.
//!
//! # Encoding
//!
//! RLP encoding rules:
//! - Single byte [0x00, 0x7f]: itself
//! - String [0x80, 0xb7]: 0x80 + len, then data
//! - String [0xb8, 0xbf]: 0xb7 + len_of_len, then len, then data
//! - List [0xc0, 0xf7]: 0xc0 + len, then items
//! - List [0xf8, 0xff]: 0xf7 + len_of_len, then len, then items
//!
//! # Security
//!
//! - Lengths are limited to four bytes (32 bits)
//! - Long forms with leading zeros or lengths below 56 are rejected

use alloc::vec;
use alloc::vec::Vec;

/// Maximum number of big-endian length bytes in a long-form prefix.
pub const MAX_LENGTH_BYTES: usize = 4;

/// Smallest length that must use the long form.
const LONG_FORM_THRESHOLD: usize = 56;

/// A decoded length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RlpHeader {
    /// Declared payload length in bytes.
    pub length: usize,
    /// Number of header bytes preceding the payload.
    ///
    /// Zero for a self-encoded byte: the byte is the payload.
    pub offset: usize,
    /// True for lists, false for byte strings.
    pub is_list: bool,
}

/// Number of length bytes a long-form tag announces, or None for short forms.
fn long_form_len(tag: u8) -> Option<usize> {
    match tag {
        0xb8..=0xbf => Some((tag - 0xb7) as usize),
        0xf8..=0xff => Some((tag - 0xf7) as usize),
        _ => None,
    }
}

/// Reads a big-endian length of at most [`MAX_LENGTH_BYTES`] bytes.
fn read_length(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .fold(0usize, |len, &byte| len << 8 | byte as usize)
}

/// Checks whether `buffer` holds a complete length prefix.
///
/// Returns `None` while more bytes are needed, `Some(true)` once the prefix
/// is complete and well formed, and `Some(false)` once it is complete but
/// ill-formed.
pub fn can_decode(buffer: &[u8]) -> Option<bool> {
    let (&tag, rest) = buffer.split_first()?;

    let len_of_len = match long_form_len(tag) {
        Some(n) => n,
        None => return Some(true),
    };

    if rest.len() < len_of_len {
        return None;
    }
    if len_of_len > MAX_LENGTH_BYTES {
        return Some(false);
    }

    let len_bytes = &rest[..len_of_len];
    if len_bytes[0] == 0 {
        return Some(false);
    }

    Some(read_length(len_bytes) >= LONG_FORM_THRESHOLD)
}

/// Decodes the length prefix at the start of `buffer`.
///
/// Returns `None` if the prefix is incomplete or announces more than
/// [`MAX_LENGTH_BYTES`] length bytes. Canonical form is not checked here;
/// see [`can_decode`].
pub fn decode_length(buffer: &[u8]) -> Option<RlpHeader> {
    let (&tag, rest) = buffer.split_first()?;

    let header = match tag {
        0x00..=0x7f => RlpHeader {
            length: 1,
            offset: 0,
            is_list: false,
        },
        0x80..=0xb7 => RlpHeader {
            length: (tag - 0x80) as usize,
            offset: 1,
            is_list: false,
        },
        0xc0..=0xf7 => RlpHeader {
            length: (tag - 0xc0) as usize,
            offset: 1,
            is_list: true,
        },
        _ => {
            let len_of_len = long_form_len(tag)?;
            if len_of_len > MAX_LENGTH_BYTES || rest.len() < len_of_len {
                return None;
            }
            RlpHeader {
                length: read_length(&rest[..len_of_len]),
                offset: 1 + len_of_len,
                is_list: tag >= 0xf8,
            }
        }
    };

    Some(header)
}

// =============================================================================
// Encoding (for building transactions to stream)
// =============================================================================

/// Builds a prefix for a payload of `len` bytes.
///
/// `short_base` is 0x80 for strings and 0xc0 for lists.
fn encode_header(len: usize, short_base: u8) -> Vec<u8> {
    if len < LONG_FORM_THRESHOLD {
        return vec![short_base + len as u8];
    }
    let bytes = len.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let len_bytes = &bytes[start..];

    let mut header = vec![short_base + 55 + len_bytes.len() as u8];
    header.extend_from_slice(len_bytes);
    header
}

/// Encodes a byte slice as RLP.
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        return data.to_vec();
    }
    let mut result = encode_header(data.len(), 0x80);
    result.extend_from_slice(data);
    result
}

/// Encodes a u64 as RLP bytes (minimal big-endian, zero is empty).
pub fn encode_u64(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    encode_bytes(&bytes[start..])
}

/// Encodes a list of already-encoded items as RLP.
pub fn encode_list(items: &[u8]) -> Vec<u8> {
    let mut result = encode_header(items.len(), 0xc0);
    result.extend_from_slice(items);
    result
}
