//! Byte-to-text decoding for text-track payloads.
//!
//! Text tracks arrive as raw bytes in UTF-8 or UTF-16 of either endianness,
//! with or without a byte-order mark. [`from_bytes_auto_detect`] picks the
//! encoding from the BOM, or guesses from the first four bytes.

use crate::error::{Error, Result};

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Decode UTF-8, dropping a leading byte-order mark.
pub fn from_utf8(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            tracing::debug!("invalid UTF-8 at byte {}", e.valid_up_to());
            Err(Error::BadEncoding)
        }
    }
}

/// Decode UTF-16 code units of the given endianness.
///
/// Odd-length input and unpaired surrogates are rejected with
/// [`Error::BadEncoding`].
pub fn from_utf16(bytes: &[u8], little_endian: bool) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::BadEncoding);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if little_endian {
                u16::from_le_bytes(pair)
            } else {
                u16::from_be_bytes(pair)
            }
        })
        .collect();
    String::from_utf16(&units).map_err(|_| Error::BadEncoding)
}

/// Decode text whose encoding is not known up front.
///
/// A BOM wins. Without one: zero bytes at offsets 0 and 2 mean UTF-16 BE,
/// zero bytes at offsets 1 and 3 mean UTF-16 LE, and printable ASCII in the
/// first four bytes means UTF-8. Anything else fails with
/// [`Error::UnableToDetectEncoding`].
pub fn from_bytes_auto_detect(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&UTF8_BOM) {
        return from_utf8(bytes);
    }
    if bytes.starts_with(&[0xfe, 0xff]) {
        return from_utf16(&bytes[2..], false);
    }
    if bytes.starts_with(&[0xff, 0xfe]) {
        return from_utf16(&bytes[2..], true);
    }

    let is_zero = |i: usize| bytes.get(i) == Some(&0);
    // Past the end counts as ASCII so short inputs can still be guessed.
    let is_ascii = |i: usize| bytes.get(i).map_or(true, |b| (0x20..=0x7e).contains(b));

    if is_zero(0) && is_zero(2) {
        from_utf16(bytes, false)
    } else if is_zero(1) && is_zero(3) {
        from_utf16(bytes, true)
    } else if (0..4).all(is_ascii) {
        from_utf8(bytes)
    } else {
        Err(Error::UnableToDetectEncoding)
    }
}

/// Encode as UTF-8 without a BOM. [`from_utf8`] is its inverse.
pub fn to_utf8(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}
