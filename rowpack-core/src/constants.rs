//! Constants and limits for the Rowpack table file format

/// Control marker opening a table file: `##TNH<TAB><table-name>`
pub const TABLE_NAME_HEADER: &str = "##TNH";

/// Control marker starting the field-name section: `##BFL<TAB><field-count>`
pub const BEGIN_FIELD_LIST: &str = "##BFL";

/// Control marker ending the field-name section
pub const END_FIELD_LIST: &str = "##EFL";

/// Control marker starting the data section: `##BDL<TAB><row-count>`
pub const BEGIN_DATA_LIST: &str = "##BDL";

/// Control marker ending the data section (must be the last line of the file)
pub const END_DATA_LIST: &str = "##EDL";

/// Prefix shared by all control markers
pub const MARKER_PREFIX: &str = "##";

/// Prefix carried by every field-name line and every data row line
pub const ROW_PREFIX: &str = "->";

/// The only field delimiter recognized by the format
pub const FIELD_DELIMITER: char = '\t';

/// Maximum number of fields a table may declare
pub const MAX_FIELDS: usize = 100;

/// One row of the fixed Hamming code table: where a source bit lands in the
/// code word and which parity groups it feeds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BitCode {
    /// Bit position in the plain-text byte (source)
    pub src: u16,
    /// Bit position in the encoded code word (target)
    pub tgt: u16,
    /// P1 group contribution (1 when the bit belongs to group 1, else 0)
    pub p1: u16,
    /// P2 group contribution (2 or 0)
    pub p2: u16,
    /// P4 group contribution (4 or 0)
    pub p4: u16,
    /// P8 group contribution (8 or 0)
    pub p8: u16,
}

/// The code table drives both encode and decode. One entry per source bit,
/// MSB first. The parity groups are even-parity over:
/// G1 = (P1, a, b, d, e, g), G2 = (P2, a, c, d, f, g),
/// G3 = (P4, b, c, d, h),    G4 = (P8, e, f, g, h),
/// and the overall group G0 = (P0, a..h).
pub(crate) const CODE_TABLE: [BitCode; 8] = [
    BitCode { src: 0b1000_0000, tgt: 0b0010_0000_0000, p1: 1, p2: 2, p4: 0, p8: 0 }, // a
    BitCode { src: 0b0100_0000, tgt: 0b0000_1000_0000, p1: 1, p2: 0, p4: 4, p8: 0 }, // b
    BitCode { src: 0b0010_0000, tgt: 0b0000_0100_0000, p1: 0, p2: 2, p4: 4, p8: 0 }, // c
    BitCode { src: 0b0001_0000, tgt: 0b0000_0010_0000, p1: 1, p2: 2, p4: 4, p8: 0 }, // d
    BitCode { src: 0b0000_1000, tgt: 0b0000_0000_1000, p1: 1, p2: 0, p4: 0, p8: 8 }, // e
    BitCode { src: 0b0000_0100, tgt: 0b0000_0000_0100, p1: 0, p2: 2, p4: 0, p8: 8 }, // f
    BitCode { src: 0b0000_0010, tgt: 0b0000_0000_0010, p1: 1, p2: 2, p4: 0, p8: 8 }, // g
    BitCode { src: 0b0000_0001, tgt: 0b0000_0000_0001, p1: 0, p2: 0, p4: 4, p8: 8 }, // h
];

/// Overall parity bit position (bit 4 of 16, MSB-first)
pub(crate) const P0_BIT: u16 = 0b0001_0000_0000_0000;

/// P1 parity bit position (bit 5)
pub(crate) const P1_BIT: u16 = 0b0000_1000_0000_0000;

/// P2 parity bit position (bit 6)
pub(crate) const P2_BIT: u16 = 0b0000_0100_0000_0000;

/// P4 parity bit position (bit 8)
pub(crate) const P4_BIT: u16 = 0b0000_0001_0000_0000;

/// P8 parity bit position (bit 12)
pub(crate) const P8_BIT: u16 = 0b0000_0000_0001_0000;

/// Every bit position a code word may occupy: the five parity bits plus
/// the eight data-bit targets. Always below the UTF-16 surrogate range.
pub(crate) const CODE_WORD_MASK: u16 = 0b0001_1111_1111_1111;

/// Source-byte mask to flip when the syndrome points at a single data-bit
/// error. Indexed by `bad_bit - 1`; parity-bit positions hold zero because a
/// parity-bit error leaves the data byte intact.
///
/// ```text
///                --+----+----
///                12 4   8      parity bit positions (Hamming index)
///                  a bcd efgh  code word data bits
///                --+----+----
///                    abcdefgh  plain-text bits
/// ```
pub(crate) const FLIP_BIT: [u16; 12] = [
    0,           //  1: P1 parity bit
    0,           //  2: P2 parity bit
    0b1000_0000, //  3: data bit a / plain-text bit 8
    0,           //  4: P4 parity bit
    0b0100_0000, //  5: data bit b
    0b0010_0000, //  6: data bit c
    0b0001_0000, //  7: data bit d
    0,           //  8: P8 parity bit
    0b0000_1000, //  9: data bit e
    0b0000_0100, // 10: data bit f
    0b0000_0010, // 11: data bit g
    0b0000_0001, // 12: data bit h
];

/// Highest Hamming bit index that can carry a single-bit error; syndromes
/// beyond it indicate multi-bit corruption.
pub(crate) const MAX_BAD_BIT: u16 = 12;
