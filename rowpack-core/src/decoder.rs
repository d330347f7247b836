//! Hamming decoding with single-bit correction
//!
//! Decoding recomputes the parity groups over the data bits actually present
//! in a stored code word and compares them against the stored parity bits.
//! The failing group indicators (1, 2, 4, 8) sum to a syndrome that is either
//! zero, the Hamming position of a single flipped bit, or evidence of
//! multi-bit damage:
//!
//! - syndrome 0: clean word, return the data bits as-is
//! - syndrome of 1, 2, 4, or 8 with overall parity holding: a lone parity
//!   bit flipped; the data bits are intact
//! - other non-zero syndrome of at most 12 with overall parity failing: one
//!   data bit flipped; repair it via the flip table
//! - every remaining combination cannot result from a single flip and is
//!   reported as [`StoreError::CorruptedData`]

use crate::constants::{CODE_TABLE, FLIP_BIT, MAX_BAD_BIT, P0_BIT, P1_BIT, P2_BIT, P4_BIT, P8_BIT};
use crate::error::StoreError;

/// Decode one code word back to its plain-text byte
///
/// Corrects a single flipped bit anywhere in the 13 significant positions.
/// Two or more flips fail with [`StoreError::CorruptedData`].
pub fn decode_char(code: u16) -> Result<u8, StoreError> {
    let mut decoded: u16 = 0;

    // Seed the accumulators with the stored parity bits, each holding its
    // group-indicator value
    let mut p0: u16 = if code & P0_BIT != 0 { 1 } else { 0 };
    let mut p1: u16 = if code & P1_BIT != 0 { 1 } else { 0 };
    let mut p2: u16 = if code & P2_BIT != 0 { 2 } else { 0 };
    let mut p4: u16 = if code & P4_BIT != 0 { 4 } else { 0 };
    let mut p8: u16 = if code & P8_BIT != 0 { 8 } else { 0 };

    for row in &CODE_TABLE {
        if code & row.tgt != 0 {
            decoded |= row.src;
            p0 ^= 1;
            p1 ^= row.p1;
            p2 ^= row.p2;
            p4 ^= row.p4;
            p8 ^= row.p8;
        }
    }

    // The syndrome points at the single bit in error; zero means no error
    let bad_bit = p1 + p2 + p4 + p8;
    if matches!(bad_bit, 1 | 2 | 4 | 8) {
        // The syndrome names a parity-bit position. If the overall parity
        // also fails, more than one bit must have flipped.
        if p0 != 0 {
            return Err(StoreError::CorruptedData {
                code: u32::from(code),
                detail: "parity-bit syndrome with overall parity failure",
            });
        }
    } else if bad_bit > 0 {
        // A data-bit position. A lone data-bit flip always breaks the
        // overall parity; an intact P0 means an even number of flips.
        if p0 == 0 {
            return Err(StoreError::CorruptedData {
                code: u32::from(code),
                detail: "non-zero syndrome with intact overall parity",
            });
        }
        if bad_bit > MAX_BAD_BIT {
            return Err(StoreError::CorruptedData {
                code: u32::from(code),
                detail: "syndrome beyond the code word width",
            });
        }
        decoded ^= FLIP_BIT[usize::from(bad_bit) - 1];
    }

    Ok(decoded as u8)
}

/// Decode a stored line back to plain text
///
/// Characters are decoded independently; the first unrecoverable character
/// aborts the whole line.
pub fn decode_line(line: &str) -> Result<String, StoreError> {
    let mut decoded = String::with_capacity(line.len());
    for ch in line.chars() {
        let scalar = u32::from(ch);
        let code = u16::try_from(scalar).map_err(|_| StoreError::CorruptedData {
            code: scalar,
            detail: "character is outside the code word range",
        })?;
        decoded.push(char::from(decode_char(code)?));
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode_char, encode_line};

    /// Every bit position a single flip can land on: the four positional
    /// parity bits, the overall parity bit, and the eight data bits.
    fn significant_bits() -> Vec<u16> {
        let mut bits = vec![P0_BIT, P1_BIT, P2_BIT, P4_BIT, P8_BIT];
        bits.extend(CODE_TABLE.iter().map(|row| row.tgt));
        bits
    }

    #[test]
    fn test_decode_golden_words() {
        assert_eq!(decode_char(0x0000).unwrap(), 0x00);
        assert_eq!(decode_char(0x0EEF).unwrap(), 0xFF);
        assert_eq!(decode_char(0x01A5).unwrap(), 0x55);
        assert_eq!(decode_char(0x17A3).unwrap(), 0xD3);
    }

    #[test]
    fn test_round_trip_every_byte() {
        for byte in 0..=255u8 {
            let word = encode_char(char::from(byte)).unwrap();
            assert_eq!(decode_char(word).unwrap(), byte);
        }
    }

    #[test]
    fn test_single_flip_always_recovers() {
        for byte in 0..=255u8 {
            let word = encode_char(char::from(byte)).unwrap();
            for bit in significant_bits() {
                let damaged = word ^ bit;
                assert_eq!(
                    decode_char(damaged).unwrap(),
                    byte,
                    "flip {bit:#06x} on {word:#06x}"
                );
            }
        }
    }

    #[test]
    fn test_double_data_flip_detected() {
        // Pairs of data bits whose group signatures do not cancel to a
        // parity-bit position; those are the flips the code can see.
        let pairs = [
            (0x200u16, 0x080u16), // a, b
            (0x080, 0x040),       // b, c
            (0x200, 0x008),       // a, e
            (0x008, 0x004),       // e, f
            (0x002, 0x001),       // g, h
            (0x200, 0x001),       // a, h
            (0x020, 0x008),       // d, e
        ];
        for byte in [0x00u8, 0x55, 0xCC, 0xFF] {
            let word = encode_char(char::from(byte)).unwrap();
            for (first, second) in pairs {
                let damaged = word ^ first ^ second;
                assert!(
                    decode_char(damaged).is_err(),
                    "flips {first:#06x}+{second:#06x} on {word:#06x} went unnoticed"
                );
            }
        }
    }

    #[test]
    fn test_overall_parity_plus_data_flip_detected() {
        for byte in 0..=255u8 {
            let word = encode_char(char::from(byte)).unwrap();
            for row in &CODE_TABLE {
                let damaged = word ^ P0_BIT ^ row.tgt;
                assert!(decode_char(damaged).is_err());
            }
        }
    }

    #[test]
    fn test_unused_high_bits_are_ignored() {
        // Bits above the code word proper sit outside every parity group
        let word = encode_char('K').unwrap();
        assert_eq!(decode_char(word | 0xE000).unwrap(), b'K');
    }

    #[test]
    fn test_decode_line_reverses_encode_line() {
        let plain = "Name\tAge";
        let encoded = encode_line(plain).unwrap();
        assert_eq!(decode_line(&encoded).unwrap(), plain);
    }

    #[test]
    fn test_decode_line_rejects_wide_character() {
        let result = decode_line("\u{10000}");
        assert!(matches!(result, Err(StoreError::CorruptedData { .. })));
    }

    #[test]
    fn test_decode_empty_line() {
        assert_eq!(decode_line("").unwrap(), "");
    }
}
