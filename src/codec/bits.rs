//! conversions between binary strings, hex strings and field-sized chunks
//!
//! Binary strings are `'0'`/`'1'` text with the most significant bit first.

use crate::error::{Error, Result};

fn check_binary(bits: &str) -> Result<()> {
    match bits.chars().find(|c| *c != '0' && *c != '1') {
        Some(c) => Err(Error::Validation(format!("invalid binary digit {c:?}"))),
        None => Ok(()),
    }
}

/// zero-pad on the left to the next multiple of `width`, leaving aligned input untouched
pub fn pad_to_multiple(bits: &str, width: usize) -> String {
    if width == 0 {
        return bits.to_owned();
    }
    let missing = (width - bits.len() % width) % width;
    let mut out = "0".repeat(missing);
    out.push_str(bits);
    out
}

/// zero-pad on the left to the next multiple of `width`.
///
/// Input that is already aligned still gains one full group of `width`
/// zeros, so the result is always strictly longer than the input. Framing
/// the mnemonic bits with this convention adds a leading zero nibble to an
/// aligned secret, which the receiving side strips again.
pub fn left_pad(bits: &str, width: usize) -> String {
    if width == 0 {
        return bits.to_owned();
    }
    let missing = width - bits.len() % width;
    let mut out = "0".repeat(missing);
    out.push_str(bits);
    out
}

/// drop leading bits until the length is a multiple of `width`
pub fn drop_to_multiple(bits: &str, width: usize) -> &str {
    if width == 0 {
        return bits;
    }
    &bits[bits.len() % width..]
}

/// four bits per hex digit; either case is accepted
pub fn hex_to_bits(hex: &str) -> Result<String> {
    let mut bits = String::with_capacity(hex.len() * 4);
    for c in hex.chars() {
        let nibble = c
            .to_digit(16)
            .ok_or_else(|| Error::Validation(format!("invalid hex digit {c:?}")))?;
        bits.push_str(&format!("{nibble:04b}"));
    }
    Ok(bits)
}

/// Left-pad to whole nibbles and encode as lowercase hex, so
/// `bits_to_hex(hex_to_bits(h))` is `h` lowercased.
pub fn bits_to_hex(bits: &str) -> Result<String> {
    check_binary(bits)?;
    let bits = pad_to_multiple(bits, 4);
    let hex = bits
        .as_bytes()
        .chunks(4)
        .map(|nibble| {
            let value = nibble
                .iter()
                .fold(0u32, |acc, b| (acc << 1) | u32::from(*b - b'0'));
            // value < 16 by construction
            char::from_digit(value, 16).unwrap_or('0')
        })
        .collect();
    Ok(hex)
}

/// parse a binary string of at most 32 digits; the empty string is zero
pub fn bits_to_u32(bits: &str) -> Result<u32> {
    check_binary(bits)?;
    if bits.len() > 32 {
        return Err(Error::Validation(format!(
            "binary value of {} digits does not fit in 32 bits",
            bits.len()
        )));
    }
    Ok(bits
        .bytes()
        .fold(0u32, |acc, b| (acc << 1) | u32::from(b - b'0')))
}

/// Partition `bits` into integers of `size` bits, starting from the least
/// significant end: `chunks[0]` is the rightmost group and the last chunk
/// holds whatever is left over on the left.
pub fn split_into_chunks(bits: &str, size: usize) -> Result<Vec<u32>> {
    if size == 0 || size > 32 {
        return Err(Error::Config(format!("chunk size must be 1 to 32 bits, got {size}")));
    }
    check_binary(bits)?;
    let mut chunks = Vec::with_capacity(bits.len().div_ceil(size));
    let mut end = bits.len();
    while end > size {
        chunks.push(bits_to_u32(&bits[end - size..end])?);
        end -= size;
    }
    if end > 0 {
        chunks.push(bits_to_u32(&bits[..end])?);
    }
    Ok(chunks)
}

/// binary representation of `value` padded to exactly `width` digits
pub fn to_bits(value: u32, width: usize) -> String {
    format!("{value:0width$b}")
}

#[test]
fn test_hex_bits() {
    assert_eq!(hex_to_bits("0f").unwrap(), "00001111");
    assert_eq!(hex_to_bits("A1").unwrap(), "10100001");
    assert_eq!(bits_to_hex("00001111").unwrap(), "0f");
    assert_eq!(bits_to_hex("101").unwrap(), "5");
    assert_eq!(bits_to_hex("").unwrap(), "");
    assert_eq!(bits_to_hex(&hex_to_bits("00ab").unwrap()).unwrap(), "00ab");
    // output is always lowercase
    assert_eq!(bits_to_hex(&hex_to_bits("AB").unwrap()).unwrap(), "ab");
    assert!(matches!(hex_to_bits("xy"), Err(Error::Validation(_))));
    assert!(matches!(bits_to_hex("0120"), Err(Error::Validation(_))));
}

#[test]
fn test_padding_conventions() {
    // aligned input gains a full extra group
    assert_eq!(left_pad("1010", 4), "00001010");
    assert_eq!(left_pad("", 4), "0000");
    assert_eq!(left_pad("101", 4), "0101");
    assert_eq!(left_pad("1", 11).len(), 11);

    assert_eq!(pad_to_multiple("1010", 4), "1010");
    assert_eq!(pad_to_multiple("101", 4), "0101");
    let once = pad_to_multiple("1", 11);
    assert_eq!(pad_to_multiple(&once, 11), once);

    assert_eq!(drop_to_multiple("0001111", 4), "1111");
    assert_eq!(drop_to_multiple("1111", 4), "1111");
}

#[test]
fn test_split_into_chunks() {
    // rightmost chunk first, leftover on the left becomes the last chunk
    let chunks = split_into_chunks("1000000010000000011", 8).unwrap();
    assert_eq!(chunks, vec![0b0000_0011, 0b0000_0100, 0b100]);
    assert_eq!(split_into_chunks("00000001", 8).unwrap(), vec![1]);
    assert!(split_into_chunks("", 8).unwrap().is_empty());
    assert!(matches!(split_into_chunks("1", 0), Err(Error::Config(_))));
    assert_eq!(to_bits(5, 8), "00000101");
    assert_eq!(bits_to_u32("").unwrap(), 0);
}
