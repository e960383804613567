//! secret sharing algorithms over GF(2^n)
//!
//! A hex secret is cut into field-sized chunks, every chunk becomes the
//! constant term of a random polynomial, and share `x` collects the
//! evaluations at `x` of all polynomials.

use crate::error::{Error, Result};
use crate::math::BinaryField;
use crate::protocol::random::Warning;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// a sample `(x, y)` of a polynomial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// One share of a secret: the concatenated y values at `x = id` as hex.
///
/// The textual form is the bit-width as one base-36 digit, the id in hex
/// padded to the width of `2^bits - 1`, then the data.
/// # Example
/// ```
/// use shamir39::protocol::shamir::Share;
///
/// let share: Share = "801c0ffee".parse().unwrap();
/// assert_eq!((share.bits, share.id, share.data.as_str()), (8, 1, "c0ffee"));
/// assert_eq!(share.to_string(), "801c0ffee");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Share {
    pub bits: u32,
    pub id: u32,
    pub data: String,
}

impl Share {
    fn id_width(bits: u32) -> usize {
        bits.div_ceil(4) as usize
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = char::from_digit(self.bits, 36).ok_or(fmt::Error)?;
        let width = Self::id_width(self.bits);
        write!(
            f,
            "{}{:0width$x}{}",
            bits.to_ascii_uppercase(),
            self.id,
            self.data
        )
    }
}

impl FromStr for Share {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !s.is_ascii() {
            return Err(Error::Validation(format!("invalid share: {s}")));
        }
        let bits = s
            .chars()
            .next()
            .and_then(|c| c.to_digit(36))
            .ok_or_else(|| Error::Validation("invalid share: missing bit-width".to_owned()))?;
        if !(BinaryField::MIN_BITS..=BinaryField::MAX_BITS).contains(&bits) {
            return Err(Error::Config(format!(
                "share uses {bits} bits, supported are {} to {}",
                BinaryField::MIN_BITS,
                BinaryField::MAX_BITS
            )));
        }
        let width = Self::id_width(bits);
        let rest = &s[1..];
        if rest.len() <= width {
            return Err(Error::Validation("invalid share: zero-length share".to_owned()));
        }
        let (id, data) = rest.split_at(width);
        let id = u32::from_str_radix(id, 16)
            .map_err(|_| Error::Validation(format!("invalid share id: {id}")))?;
        if id == 0 || id >= 1 << bits {
            return Err(Error::Validation(format!(
                "share id must be between 1 and {}, got {id}",
                (1u32 << bits) - 1
            )));
        }
        if !data.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Validation(format!("invalid share data: {data}")));
        }
        Ok(Self {
            bits,
            id,
            data: data.to_owned(),
        })
    }
}

/// the shares produced by one split, with any warnings raised while dealing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dealt<T> {
    pub shares: Vec<T>,
    pub warnings: Vec<Warning>,
}

impl<T> Dealt<T> {
    /// false when the coefficients came from an insecure random source
    pub fn is_secure(&self) -> bool {
        !self.warnings.contains(&Warning::InsecureRandomSource)
    }
}

pub mod combine;
pub mod split;

pub use combine::{combine, derive_share, lagrange};
pub use split::{get_shares, horner, split_chunks, split_secret};

#[test]
fn test_share_text() {
    let share = Share {
        bits: 20,
        id: 1000,
        data: "0a".to_owned(),
    };
    assert_eq!(share.to_string(), "K003e80a");
    assert_eq!("K003e80a".parse::<Share>().unwrap(), share);
    assert_eq!(
        "3701".parse::<Share>().unwrap(),
        Share {
            bits: 3,
            id: 7,
            data: "01".to_owned()
        }
    );
    assert!(matches!("801".parse::<Share>(), Err(Error::Validation(_))));
    assert!(matches!("800ab".parse::<Share>(), Err(Error::Validation(_))));
    assert!(matches!("801xyz".parse::<Share>(), Err(Error::Validation(_))));
    assert!(matches!("201ab".parse::<Share>(), Err(Error::Config(_))));
    assert!(matches!("".parse::<Share>(), Err(Error::Validation(_))));
}
