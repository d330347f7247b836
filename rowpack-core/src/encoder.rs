//! Hamming encoding of plain-text lines
//!
//! Each 8-bit character becomes a 12-bit code word carrying four Hamming
//! parity bits plus one overall parity bit, held in the low 13 bits of a
//! `u16`:
//!
//! ```text
//!   1  2  3  4  5  6  7  8  9  10 11 12 13 14 15 16
//!  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!  |0 |0 |0 |P0|P1|P2|a |P4|b |c |d |P8|e |f |g |h |
//!  +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```
//!
//! The parity bits are chosen so that the number of ones in each of the
//! following groups is even:
//!
//! - Group 0 = (P0, a, b, c, d, e, f, g, h)
//! - Group 1 = (P1, a, b, d, e, g)
//! - Group 2 = (P2, a, c, d, f, g)
//! - Group 3 = (P4, b, c, d, h)
//! - Group 4 = (P8, e, f, g, h)
//!
//! A code word never reaches the surrogate range, so an encoded line is an
//! ordinary `String` of one character per source character, and its UTF-8
//! bytes are what ends up on disk.

use crate::constants::{CODE_TABLE, CODE_WORD_MASK, P0_BIT, P1_BIT, P2_BIT, P4_BIT, P8_BIT};
use crate::error::StoreError;

/// Encode one plain-text character into a code word
///
/// Only characters whose scalar value fits in 8 bits can be encoded.
/// Anything wider fails with [`StoreError::InvalidCharacter`].
pub fn encode_char(ch: char) -> Result<u16, StoreError> {
    let code = u32::from(ch);
    if code & !0xFF != 0 {
        return Err(StoreError::InvalidCharacter { ch, code });
    }
    let source = code as u16;

    let mut encoded: u16 = 0;
    let mut p0: u16 = 0;
    let mut p1: u16 = 0;
    let mut p2: u16 = 0;
    let mut p4: u16 = 0;
    let mut p8: u16 = 0;

    for row in &CODE_TABLE {
        if source & row.src != 0 {
            // Transfer the set bit to its target position and toggle every
            // parity group it belongs to
            encoded |= row.tgt;
            p0 ^= 1;
            p1 ^= row.p1;
            p2 ^= row.p2;
            p4 ^= row.p4;
            p8 ^= row.p8;
        }
    }

    if p0 != 0 {
        encoded |= P0_BIT;
    }
    if p1 != 0 {
        encoded |= P1_BIT;
    }
    if p2 != 0 {
        encoded |= P2_BIT;
    }
    if p4 != 0 {
        encoded |= P4_BIT;
    }
    if p8 != 0 {
        encoded |= P8_BIT;
    }

    Ok(encoded)
}

/// Encode a plain-text line into its stored form
///
/// Characters are encoded independently; the first failure aborts the
/// whole line.
pub fn encode_line(line: &str) -> Result<String, StoreError> {
    let mut encoded = String::with_capacity(line.len() * 2);
    for ch in line.chars() {
        let code = encode_char(ch)?;
        // A code word never uses a bit outside CODE_WORD_MASK, which keeps
        // it below the surrogate range; a wider word must never reach the
        // stored line.
        debug_assert_eq!(code & !CODE_WORD_MASK, 0, "oversized code word for {ch:?}");
        let stored = char::from_u32(u32::from(code)).ok_or_else(|| StoreError::InvalidCharacter {
            ch,
            code: u32::from(code),
        })?;
        encoded.push(stored);
    }
    Ok(encoded)
}
