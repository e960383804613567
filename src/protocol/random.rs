//! random-bit sources for polynomial coefficients

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supplies random coefficients as binary strings.
pub trait BitSource {
    /// exactly `bits` binary digits, most significant first
    fn random_bits(&mut self, bits: u32) -> String;

    /// whether the output is suitable for protecting a secret
    fn is_secure(&self) -> bool;
}

impl<T: BitSource + ?Sized> BitSource for &mut T {
    fn random_bits(&mut self, bits: u32) -> String {
        (**self).random_bits(bits)
    }

    fn is_secure(&self) -> bool {
        (**self).is_secure()
    }
}

/// non-fatal conditions reported alongside a successful split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Warning {
    InsecureRandomSource,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InsecureRandomSource => f.write_str(
                "a secure random number generator was not used; shares are NOT cryptographically strong",
            ),
        }
    }
}

/// Draw 32-bit words until `bits` digits are available, keep the rightmost
/// `bits` of them and retry while they are all zero.
fn construct<R: RngCore + ?Sized>(rng: &mut R, bits: u32) -> String {
    if bits == 0 {
        return String::new();
    }
    let words = bits.div_ceil(u32::BITS);
    loop {
        let mut out = String::with_capacity((words * u32::BITS) as usize);
        for _ in 0..words {
            out.push_str(&format!("{:032b}", rng.next_u32()));
        }
        let tail = &out[out.len() - bits as usize..];
        if tail.contains('1') {
            return tail.to_owned();
        }
    }
}

/// the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsBits;

impl BitSource for OsBits {
    fn random_bits(&mut self, bits: u32) -> String {
        construct(&mut OsRng, bits)
    }

    fn is_secure(&self) -> bool {
        true
    }
}

/// The default fallback source, a fast non-cryptographic PRNG.
///
/// Every split that draws from it reports [`Warning::InsecureRandomSource`].
#[derive(Debug, Clone)]
pub struct InsecureBits(SmallRng);

impl InsecureBits {
    pub fn new() -> Self {
        Self(SmallRng::from_entropy())
    }

    /// reproducible output, for tests and fixtures
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl Default for InsecureBits {
    fn default() -> Self {
        Self::new()
    }
}

impl BitSource for InsecureBits {
    fn random_bits(&mut self, bits: u32) -> String {
        construct(&mut self.0, bits)
    }

    fn is_secure(&self) -> bool {
        false
    }
}

#[test]
fn test_sources() {
    let mut secure = OsBits;
    let mut insecure = InsecureBits::from_seed(7);
    assert!(secure.is_secure());
    assert!(!insecure.is_secure());
    for bits in [1, 3, 8, 20, 32, 33, 70] {
        let sources: [&mut dyn BitSource; 2] = [&mut secure, &mut insecure];
        for source in sources {
            let drawn = source.random_bits(bits);
            assert_eq!(drawn.len(), bits as usize);
            assert!(drawn.chars().all(|c| c == '0' || c == '1'));
            assert!(drawn.contains('1'));
        }
    }
    assert_eq!(
        InsecureBits::from_seed(1).random_bits(64),
        InsecureBits::from_seed(1).random_bits(64)
    );
    assert_eq!(secure.random_bits(0), "");
}
