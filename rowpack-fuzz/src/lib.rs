//! Fuzzing placeholder for rowpack-core codec
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decoder

pub fn fuzz_decode_line(data: &[u8]) {
    use rowpack_core::decoder::decode_line;

    // Try to decode - should never panic
    let line = String::from_utf8_lossy(data);
    let _ = decode_line(&line);
}

pub fn fuzz_encode_line(data: &[u8]) {
    use rowpack_core::encoder::encode_line;

    // Try to encode - should never panic
    let line = String::from_utf8_lossy(data);
    let _ = encode_line(&line);
}

pub fn fuzz_round_trip(data: &[u8]) {
    use rowpack_core::{decoder::decode_line, encoder::encode_line};

    // Latin-1 bytes always encode; the decode must give them back
    let line: String = data.iter().map(|&b| char::from(b)).collect();
    let encoded = encode_line(&line).unwrap();
    let decoded = decode_line(&encoded).unwrap();
    assert_eq!(decoded, line);
}
