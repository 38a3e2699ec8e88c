//! The image host names page files with a site-specific base64 token rather
//! than the page's sequence position. Decoding the token yields the page's
//! canonical ordinal, which becomes the zero-padded on-disk filename and the
//! sole mechanism restoring page order for readers of the output directory.

use thiserror::Error;

/// Fixed ordered alphabet; index in the table is the digit's value.
const ALPHABET: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrdinalError {
    #[error("character {0:?} is not in the ordinal alphabet")]
    InvalidChar(char),

    #[error("ordinal token {0:?} does not fit in 64 bits")]
    Overflow(String),
}

fn digit_value(c: char) -> Option<u64> {
    if !c.is_ascii() {
        return None;
    }
    ALPHABET.iter().position(|&b| b == c as u8).map(|i| i as u64)
}

/// Decode a filename token as a big-endian base-64 numeral.
///
/// Pure function: `acc = acc * 64 + digit`, left to right, no padding.
/// Any character outside the alphabet is an error that propagates to the
/// caller (it is never soft-skipped).
pub fn decode(token: &str) -> Result<u64, OrdinalError> {
    let mut acc: u64 = 0;
    for c in token.chars() {
        let digit = digit_value(c).ok_or(OrdinalError::InvalidChar(c))?;
        acc = acc
            .checked_mul(64)
            .and_then(|a| a.checked_add(digit))
            .ok_or_else(|| OrdinalError::Overflow(token.to_string()))?;
    }
    Ok(acc)
}
