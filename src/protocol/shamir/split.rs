//! dealing shares from random polynomials

use super::{Dealt, Point, Share};
use crate::codec::bits::{
    bits_to_hex, bits_to_u32, hex_to_bits, pad_to_multiple, split_into_chunks, to_bits,
};
use crate::error::{Error, Result};
use crate::math::BinaryField;
use crate::protocol::random::{BitSource, Warning};

/// Evaluate the polynomial with `coeffs` (constant term first) at `x`.
///
/// `fx * x + c` runs as `exp(log(fx) + log(x)) ^ c`; a running value of zero
/// has no logarithm, so the next value is just the next coefficient.
pub fn horner(field: &BinaryField, x: u32, coeffs: &[u32]) -> u32 {
    debug_assert!(field.contains(x), "{x} is outside the {}-bit field", field.bits());
    let Some(logx) = field.log(x) else {
        return coeffs.first().copied().unwrap_or(0);
    };
    let mut fx = 0;
    for &coeff in coeffs.iter().rev() {
        fx = match field.log(fx) {
            Some(logfx) => field.add(field.exp(logx + logfx), coeff),
            None => coeff,
        };
    }
    fx
}

fn draw<R: BitSource + ?Sized>(field: &BinaryField, rng: &mut R) -> Result<u32> {
    let bits = rng.random_bits(field.bits());
    if bits.len() != field.bits() as usize {
        return Err(Error::Config(format!(
            "random source returned {} bits, expected {}",
            bits.len(),
            field.bits()
        )));
    }
    bits_to_u32(&bits)
        .map_err(|_| Error::Config("random source returned non-binary output".to_owned()))
}

fn needed_bits(count: u32) -> u32 {
    u32::BITS - count.leading_zeros()
}

fn check_counts(field: &BinaryField, num_shares: u32, threshold: u32) -> Result<()> {
    let max = field.max();
    if num_shares < 2 || num_shares > max {
        return Err(Error::Validation(format!(
            "number of shares must be an integer between 2 and 2^bits-1 ({max}), inclusive; \
             to create {num_shares} shares, use at least {} bits",
            needed_bits(num_shares).max(BinaryField::MIN_BITS)
        )));
    }
    if threshold < 2 || threshold > max {
        return Err(Error::Validation(format!(
            "threshold number of shares must be an integer between 2 and 2^bits-1 ({max}), \
             inclusive; to use a threshold of {threshold}, use at least {} bits",
            needed_bits(threshold).max(BinaryField::MIN_BITS)
        )));
    }
    Ok(())
}

/// Share a single field element: evaluations at `x = 1..=num_shares` of a
/// polynomial of degree `threshold - 1` with `secret` as constant term.
pub fn get_shares<R: BitSource + ?Sized>(
    field: &BinaryField,
    rng: &mut R,
    secret: u32,
    num_shares: u32,
    threshold: u32,
) -> Result<Vec<Point>> {
    if !field.contains(secret) {
        return Err(Error::Validation(format!(
            "secret chunk {secret} does not fit in {} bits",
            field.bits()
        )));
    }
    let mut coeffs = Vec::with_capacity(threshold as usize);
    coeffs.push(secret);
    for _ in 1..threshold {
        coeffs.push(draw(field, rng)?);
    }
    Ok((1..=num_shares)
        .map(|x| Point {
            x,
            y: horner(field, x, &coeffs),
        })
        .collect())
}

/// Split field elements into `num_shares` shares.
///
/// `chunks[0]` is the least significant chunk. Every share concatenates its
/// y values padded to the field width, most significant chunk first.
pub fn split_chunks<R: BitSource + ?Sized>(
    field: &BinaryField,
    rng: &mut R,
    chunks: &[u32],
    num_shares: u32,
    threshold: u32,
) -> Result<Vec<Share>> {
    check_counts(field, num_shares, threshold)?;
    if chunks.is_empty() {
        return Err(Error::Validation("nothing to split".to_owned()));
    }
    let width = field.bits() as usize;
    let columns = chunks
        .iter()
        .map(|&chunk| get_shares(field, &mut *rng, chunk, num_shares, threshold))
        .collect::<Result<Vec<_>>>()?;
    (0..num_shares as usize)
        .map(|j| {
            let mut bits = String::with_capacity(columns.len() * width);
            for column in columns.iter().rev() {
                bits.push_str(&to_bits(column[j].y, width));
            }
            Ok(Share {
                bits: field.bits(),
                id: j as u32 + 1,
                data: bits_to_hex(&bits)?,
            })
        })
        .collect()
}

/// Split a hex secret into `num_shares` shares, any `threshold` of which
/// recover it.
///
/// A `1` bit is prepended before chunking so that leading zero nibbles of
/// the secret survive reconstruction. With `pad_length > 0` the framed bits
/// are first zero-padded to a multiple of `pad_length`.
/// # Example
/// ```
/// use shamir39::math::BinaryField;
/// use shamir39::protocol::random::OsBits;
/// use shamir39::protocol::shamir::{combine, split_secret};
///
/// let field = BinaryField::new(8).unwrap();
/// let dealt = split_secret(&field, &mut OsBits, "00c0ffee", 5, 3, 0).unwrap();
/// assert!(dealt.is_secure());
/// assert_eq!(combine(&field, &dealt.shares[1..4], 3).unwrap(), "00c0ffee");
/// ```
pub fn split_secret<R: BitSource + ?Sized>(
    field: &BinaryField,
    rng: &mut R,
    secret: &str,
    num_shares: u32,
    threshold: u32,
    pad_length: usize,
) -> Result<Dealt<Share>> {
    check_counts(field, num_shares, threshold)?;
    let mut bits = String::from("1");
    bits.push_str(&hex_to_bits(secret)?);
    let bits = pad_to_multiple(&bits, pad_length);
    let chunks = split_into_chunks(&bits, field.bits() as usize)?;

    let mut warnings = Vec::new();
    if !rng.is_secure() {
        log::warn!("{}", Warning::InsecureRandomSource);
        warnings.push(Warning::InsecureRandomSource);
    }
    let shares = split_chunks(field, rng, &chunks, num_shares, threshold)?;
    log::debug!(
        "split {} chunks of {} bits into {num_shares} shares, threshold {threshold}",
        chunks.len(),
        field.bits()
    );
    Ok(Dealt { shares, warnings })
}

#[test]
fn test_horner() {
    let field = BinaryField::new(8).unwrap();
    // zero running values fall through to the next coefficient
    for x in 1..=255 {
        assert_eq!(horner(&field, x, &[5, 0, 0]), 5);
    }
    // f(x) = 7 + 3x + x^2
    for x in [1, 2, 3, 100, 255] {
        let expected = 7 ^ field.mul(3, x) ^ field.mul(x, x);
        assert_eq!(horner(&field, x, &[7, 3, 1]), expected);
    }
    assert_eq!(horner(&field, 0, &[9, 4]), 9);
}

#[test]
fn test_get_shares() {
    use crate::protocol::random::InsecureBits;
    let field = BinaryField::new(8).unwrap();
    let mut rng = InsecureBits::from_seed(3);
    let points = get_shares(&field, &mut rng, 42, 5, 3).unwrap();
    assert_eq!(points.iter().map(|p| p.x).collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    assert!(points.iter().all(|p| field.contains(p.y)));
    assert!(matches!(
        get_shares(&field, &mut rng, 256, 5, 3),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_split_shape() {
    use crate::protocol::random::InsecureBits;
    let field = BinaryField::new(8).unwrap();
    let mut rng = InsecureBits::from_seed(11);
    let dealt = split_secret(&field, &mut rng, "abcd", 4, 2, 0).unwrap();
    assert!(!dealt.is_secure());
    assert_eq!(dealt.warnings, vec![Warning::InsecureRandomSource]);
    assert_eq!(dealt.shares.len(), 4);
    for (share, id) in dealt.shares.iter().zip(1..) {
        assert_eq!(share.id, id);
        assert_eq!(share.bits, 8);
        // sentinel + 16 bits = 17 bits, three chunks of 8 bits
        assert_eq!(share.data.len(), 6);
    }
    let padded = split_secret(&field, &mut rng, "abcd", 4, 2, 64).unwrap();
    assert_eq!(padded.shares[0].data.len(), 16);
}

#[test]
fn test_split_limits() {
    use crate::protocol::random::InsecureBits;
    let field = BinaryField::new(8).unwrap();
    let mut rng = InsecureBits::from_seed(0);
    let err = split_secret(&field, &mut rng, "ab", 256, 2, 0).unwrap_err();
    assert!(matches!(&err, Error::Validation(msg) if msg.contains("at least 9 bits")));
    assert!(split_secret(&field, &mut rng, "ab", 5, 1, 0).is_err());
    assert!(split_secret(&field, &mut rng, "ab", 1, 2, 0).is_err());
    assert!(split_secret(&field, &mut rng, "zz", 5, 2, 0).is_err());
}

#[test]
fn test_malformed_random_source() {
    struct Broken;
    impl BitSource for Broken {
        fn random_bits(&mut self, _bits: u32) -> String {
            "10".to_owned()
        }
        fn is_secure(&self) -> bool {
            true
        }
    }
    let field = BinaryField::new(8).unwrap();
    assert!(matches!(
        split_secret(&field, &mut Broken, "ab", 3, 2, 0),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_non_binary_random_source() {
    struct Garbled;
    impl BitSource for Garbled {
        fn random_bits(&mut self, _bits: u32) -> String {
            "0000000x".to_owned()
        }
        fn is_secure(&self) -> bool {
            true
        }
    }
    let field = BinaryField::new(8).unwrap();
    assert_eq!(
        split_secret(&field, &mut Garbled, "ab", 3, 2, 0).unwrap_err(),
        Error::Config("random source returned non-binary output".to_owned())
    );
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "outside the 8-bit field")]
fn test_horner_rejects_foreign_x() {
    let field = BinaryField::new(8).unwrap();
    horner(&field, 256, &[1, 2]);
}
