//! reconstruction by Lagrange interpolation

use super::Share;
use crate::codec::bits::{bits_to_hex, hex_to_bits, split_into_chunks, to_bits};
use crate::error::{Error, Result};
use crate::math::BinaryField;
use std::collections::BTreeMap;

/// Evaluate at `at` the polynomial through the samples `(xs[i], ys[i])`.
///
/// The `x` values must be distinct. A basis term whose product contains the
/// factor `at - x_j = 0` vanishes and leaves the sum unchanged.
pub fn lagrange(field: &BinaryField, at: u32, xs: &[u32], ys: &[u32]) -> u32 {
    debug_assert!(
        xs.iter().enumerate().all(|(i, x)| !xs[..i].contains(x)),
        "interpolation x values must be distinct"
    );
    let max = field.max();
    let mut sum = 0;
    'terms: for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        let Some(mut product) = field.log(yi) else {
            continue;
        };
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            if at == xj {
                continue 'terms;
            }
            let (Some(num), Some(den)) = (
                field.log(field.sub(at, xj)),
                field.log(field.sub(xi, xj)),
            ) else {
                continue 'terms;
            };
            product = (product + num + max - den) % max;
        }
        sum = field.add(sum, field.exp(product));
    }
    sum
}

/// Interpolate every chunk position of `shares` at `at`, returning the
/// concatenated bits, most significant chunk first.
fn interpolate(field: &BinaryField, shares: &[Share], at: u32, threshold: u32) -> Result<String> {
    if threshold < 2 {
        return Err(Error::Validation(format!(
            "threshold must be at least 2, got {threshold}"
        )));
    }
    let mut points: BTreeMap<u32, &Share> = BTreeMap::new();
    for share in shares {
        if share.bits != field.bits() {
            return Err(Error::Config(format!(
                "mismatched shares: share {} uses {} bits, expected {}",
                share.id,
                share.bits,
                field.bits()
            )));
        }
        if share.id == 0 || !field.contains(share.id) {
            return Err(Error::Validation(format!(
                "share id must be between 1 and {}, got {}",
                field.max(),
                share.id
            )));
        }
        // a repeated id replaces the earlier share
        points.insert(share.id, share);
    }
    if points.len() < threshold as usize {
        return Err(Error::InsufficientShares {
            required: threshold,
            provided: points.len() as u32,
        });
    }
    if !field.contains(at) {
        return Err(Error::Validation(format!(
            "cannot evaluate at {at} in a field of {} bits",
            field.bits()
        )));
    }

    let width = field.bits() as usize;
    let xs: Vec<u32> = points.keys().copied().collect();
    let columns = points
        .values()
        .map(|share| {
            if share.data.is_empty() {
                return Err(Error::Validation(format!("share {} is empty", share.id)));
            }
            split_into_chunks(&hex_to_bits(&share.data)?, width)
        })
        .collect::<Result<Vec<_>>>()?;
    let chunk_count = columns[0].len();
    if columns.iter().any(|column| column.len() != chunk_count) {
        return Err(Error::Validation("shares have different lengths".to_owned()));
    }

    let mut bits = String::with_capacity(chunk_count * width);
    let mut ys = Vec::with_capacity(xs.len());
    for k in (0..chunk_count).rev() {
        ys.clear();
        ys.extend(columns.iter().map(|column| column[k]));
        bits.push_str(&to_bits(lagrange(field, at, &xs, &ys), width));
    }
    Ok(bits)
}

/// Recover the hex secret from at least `threshold` shares.
///
/// Everything up to and including the first `1` bit of the interpolated
/// value is framing added by the splitter and is discarded.
pub fn combine(field: &BinaryField, shares: &[Share], threshold: u32) -> Result<String> {
    let bits = interpolate(field, shares, 0, threshold)?;
    let sentinel = bits.find('1').ok_or_else(|| {
        Error::Validation("shares do not describe a framed secret".to_owned())
    })?;
    log::debug!("combined {} shares, threshold {threshold}", shares.len());
    bits_to_hex(&bits[sentinel + 1..])
}

/// Compute the share with `id` from at least `threshold` existing shares.
pub fn derive_share(
    field: &BinaryField,
    id: u32,
    shares: &[Share],
    threshold: u32,
) -> Result<Share> {
    if id == 0 || !field.contains(id) {
        return Err(Error::Validation(format!(
            "share id must be between 1 and {}, got {id}",
            field.max()
        )));
    }
    let bits = interpolate(field, shares, id, threshold)?;
    Ok(Share {
        bits: field.bits(),
        id,
        data: bits_to_hex(&bits)?,
    })
}

#[test]
fn test_lagrange() {
    let field = BinaryField::new(8).unwrap();
    let coeffs = [99, 17, 200];
    let eval = |x: u32| super::split::horner(&field, x, &coeffs);
    let xs = [2, 5, 9];
    let ys: Vec<u32> = xs.iter().map(|&x| eval(x)).collect();
    assert_eq!(lagrange(&field, 0, &xs, &ys), 99);
    assert_eq!(lagrange(&field, 77, &xs, &ys), eval(77));
    // evaluating at a known x returns its sample unchanged
    assert_eq!(lagrange(&field, 5, &xs, &ys), ys[1]);
    assert_eq!(lagrange(&field, 0, &xs, &[0, 0, 0]), 0);
}

#[test]
fn test_combine_subsets() {
    use crate::protocol::random::InsecureBits;
    use crate::protocol::shamir::split::split_secret;
    let field = BinaryField::new(8).unwrap();
    let mut rng = InsecureBits::from_seed(42);
    for secret in ["00ab", "0", "ffffffff", "1234567890abcdef", ""] {
        let shares = split_secret(&field, &mut rng, secret, 5, 3, 0).unwrap().shares;
        for a in 0..5 {
            for b in a + 1..5 {
                for c in b + 1..5 {
                    let subset = [shares[c].clone(), shares[a].clone(), shares[b].clone()];
                    assert_eq!(combine(&field, &subset, 3).unwrap(), secret);
                }
            }
        }
        assert_eq!(combine(&field, &shares, 3).unwrap(), secret);
    }
}

#[test]
fn test_combine_insufficient() {
    use crate::protocol::random::InsecureBits;
    use crate::protocol::shamir::split::split_secret;
    let field = BinaryField::new(8).unwrap();
    let mut rng = InsecureBits::from_seed(1);
    let shares = split_secret(&field, &mut rng, "c0ffee", 5, 3, 0).unwrap().shares;
    let duplicated = [shares[0].clone(), shares[1].clone(), shares[1].clone()];
    assert_eq!(
        combine(&field, &duplicated, 3).unwrap_err(),
        Error::InsufficientShares {
            required: 3,
            provided: 2
        }
    );
    assert_eq!(
        combine(&field, &[], 3).unwrap_err(),
        Error::InsufficientShares {
            required: 3,
            provided: 0
        }
    );
}

#[test]
fn test_combine_last_duplicate_wins() {
    use crate::protocol::random::InsecureBits;
    use crate::protocol::shamir::split::split_secret;
    let field = BinaryField::new(8).unwrap();
    let mut rng = InsecureBits::from_seed(5);
    let shares = split_secret(&field, &mut rng, "beef", 3, 2, 0).unwrap().shares;
    let mut forged = shares[0].clone();
    forged.data = "000000".to_owned();
    let last_good = [forged.clone(), shares[0].clone(), shares[1].clone()];
    assert_eq!(combine(&field, &last_good, 2).unwrap(), "beef");
    let last_forged = [shares[0].clone(), forged, shares[1].clone()];
    assert_ne!(combine(&field, &last_forged, 2).ok().as_deref(), Some("beef"));
}

#[test]
fn test_derive_share() {
    use crate::protocol::random::InsecureBits;
    use crate::protocol::shamir::split::split_secret;
    let field = BinaryField::new(8).unwrap();
    let mut rng = InsecureBits::from_seed(9);
    let shares = split_secret(&field, &mut rng, "0badcafe", 6, 3, 0).unwrap().shares;
    let known = [shares[0].clone(), shares[3].clone(), shares[5].clone()];
    assert_eq!(derive_share(&field, 3, &known, 3).unwrap(), shares[2]);
    // evaluating at an id that is already present reproduces it
    assert_eq!(derive_share(&field, 4, &known, 3).unwrap(), shares[3]);
    assert!(derive_share(&field, 0, &known, 3).is_err());
    assert!(derive_share(&field, 256, &known, 3).is_err());
}

#[test]
fn test_combine_rejects_mixed_bits() {
    let field = BinaryField::new(8).unwrap();
    let shares = [
        Share {
            bits: 8,
            id: 1,
            data: "abab".to_owned(),
        },
        Share {
            bits: 9,
            id: 2,
            data: "abab".to_owned(),
        },
    ];
    assert!(matches!(combine(&field, &shares, 2), Err(Error::Config(_))));
    let uneven = [
        Share {
            bits: 8,
            id: 1,
            data: "abab".to_owned(),
        },
        Share {
            bits: 8,
            id: 2,
            data: "ababab".to_owned(),
        },
    ];
    assert!(matches!(combine(&field, &uneven, 2), Err(Error::Validation(_))));
}

#[test]
fn test_combine_rejects_bad_ids() {
    let field = BinaryField::new(8).unwrap();
    for id in [0, 256] {
        let shares = [
            Share {
                bits: 8,
                id,
                data: "abab".to_owned(),
            },
            Share {
                bits: 8,
                id: 2,
                data: "abab".to_owned(),
            },
        ];
        assert!(matches!(
            combine(&field, &shares, 2),
            Err(Error::Validation(msg)) if msg.contains("share id")
        ));
    }
}

#[test]
fn test_combine_without_sentinel() {
    let field = BinaryField::new(8).unwrap();
    let zeros: Vec<Share> = (1..=3)
        .map(|id| Share {
            bits: 8,
            id,
            data: "0000".to_owned(),
        })
        .collect();
    assert_eq!(
        combine(&field, &zeros, 3).unwrap_err(),
        Error::Validation("shares do not describe a framed secret".to_owned())
    );
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "must be distinct")]
fn test_lagrange_rejects_repeated_x() {
    let field = BinaryField::new(8).unwrap();
    lagrange(&field, 0, &[3, 3], &[1, 2]);
}
