//! binary field GF(2^n) arithmetics over exp/log tables

use crate::error::{Error, Result};
use crate::math::galois::irreducible;

/// Exp/log tables for GF(2^bits), built once and never mutated afterwards.
///
/// Elements are plain `u32` values in `[0, 2^bits - 1]`. Addition is XOR and
/// multiplication runs in the log domain, so zero (which has no logarithm)
/// is short-circuited everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryField {
    bits: u32,
    max: u32,
    exps: Vec<u32>,
    logs: Vec<u32>,
}

impl BinaryField {
    pub const MIN_BITS: u32 = 3;
    pub const MAX_BITS: u32 = 20;

    /// build the tables for GF(2^bits)
    pub fn new(bits: u32) -> Result<Self> {
        if !(Self::MIN_BITS..=Self::MAX_BITS).contains(&bits) {
            return Err(Error::Config(format!(
                "number of bits must be an integer between {} and {}, inclusive, got {bits}",
                Self::MIN_BITS,
                Self::MAX_BITS
            )));
        }
        let primitive = irreducible::primitive(bits)
            .ok_or_else(|| Error::Config(format!("no primitive polynomial for {bits} bits")))?;
        let size = 1u32 << bits;
        let max = size - 1;
        let mut exps = vec![0; max as usize];
        let mut logs = vec![0; size as usize];
        let mut x = 1u32;
        for i in 0..max {
            exps[i as usize] = x;
            logs[x as usize] = i;
            x <<= 1;
            if x >= size {
                x ^= primitive;
                x &= max;
            }
        }
        Ok(Self {
            bits,
            max,
            exps,
            logs,
        })
    }

    /// bit-width of an element
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// number of elements, 2^bits
    pub fn size(&self) -> u32 {
        self.max + 1
    }

    /// largest element and order of the multiplicative group, 2^bits - 1
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, x: u32) -> bool {
        x <= self.max
    }

    /// generator raised to `i`, reduced modulo the group order
    #[inline]
    pub fn exp(&self, i: u32) -> u32 {
        self.exps[(i % self.max) as usize]
    }

    /// discrete logarithm, `None` for zero or for values outside the field
    #[inline]
    pub fn log(&self, x: u32) -> Option<u32> {
        if x == 0 || x > self.max {
            None
        } else {
            Some(self.logs[x as usize])
        }
    }

    /// field addition, which is also subtraction in characteristic 2
    #[inline]
    pub fn add(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    #[inline]
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        a ^ b
    }

    #[inline]
    pub fn mul(&self, a: u32, b: u32) -> u32 {
        match (self.log(a), self.log(b)) {
            (Some(la), Some(lb)) => self.exp((la + lb) % self.max),
            _ => 0,
        }
    }

    pub fn pow(&self, x: u32, exponent: u32) -> u32 {
        if exponent == 0 {
            return 1;
        }
        match self.log(x) {
            Some(lx) => {
                let e = (u64::from(lx) * u64::from(exponent)) % u64::from(self.max);
                self.exp(e as u32)
            }
            None => 0,
        }
    }
}

#[test]
fn test_gf256_tables() {
    let field = BinaryField::new(8).unwrap();
    assert_eq!(field.size(), 256);
    assert_eq!(field.max(), 255);
    assert_eq!(field.exp(0), 1);
    assert_eq!(field.exp(1), 2);
    assert_eq!(field.exp(8), 29);
    assert_eq!(field.exp(255), 1);
    assert_eq!(field.log(2), Some(1));
    assert_eq!(field.log(3), Some(25));
    assert_eq!(field.log(0), None);
    assert_eq!(field.log(256), None);
}

#[test]
fn test_exp_log_inverse() {
    for bits in BinaryField::MIN_BITS..=12 {
        let field = BinaryField::new(bits).unwrap();
        for x in 1..field.size() {
            assert_eq!(field.exp(field.log(x).unwrap()), x, "bits = {bits}, x = {x}");
        }
    }
}

#[test]
fn test_mul_pow() {
    let field = BinaryField::new(8).unwrap();
    for a in 0..256 {
        assert_eq!(field.mul(a, 0), 0);
        assert_eq!(field.mul(0, a), 0);
        assert_eq!(field.mul(a, 1), a);
        for b in [1, 2, 3, 29, 128, 255] {
            assert_eq!(field.mul(a, b), field.mul(b, a));
        }
    }
    // x^8 reduces by the primitive polynomial
    assert_eq!(field.mul(128, 2), 29);
    assert_eq!(field.pow(2, 8), 29);
    assert_eq!(field.pow(7, 0), 1);
    assert_eq!(field.pow(0, 3), 0);
    assert_eq!(field.pow(3, 3), field.mul(3, field.mul(3, 3)));
    assert_eq!(field.sub(field.add(77, 19), 19), 77);
}

#[test]
fn test_unsupported_bits() {
    assert!(matches!(BinaryField::new(2), Err(Error::Config(_))));
    assert!(matches!(BinaryField::new(21), Err(Error::Config(_))));
    assert_eq!(BinaryField::new(20).unwrap().max(), (1 << 20) - 1);
}
