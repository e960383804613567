//! shamir39: splits a mnemonic into mnemonic shares and recombines them
//!
//! A share mnemonic is `[version, parameter words.., payload words..]`. The
//! parameter words carry the threshold and the 0-based share index, the
//! payload words carry the share's y values over GF(2^8).

use crate::codec::bits::{bits_to_hex, drop_to_multiple, hex_to_bits, left_pad};
use crate::codec::mnemonic::{
    bits_to_words, decode_parameters, encode_parameters, words_to_bits, Wordlist, BITS_PER_WORD,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::math::BinaryField;
use crate::protocol::random::BitSource;
use crate::protocol::shamir::{self, Dealt, Share};
use std::collections::BTreeMap;
use std::sync::Arc;

/// field bit-width of the mnemonic share format
pub const FIELD_BITS: u32 = 8;
pub const MIN_SHARES: u32 = 2;
pub const MAX_SHARES: u32 = 4095;

/// Immutable context for splitting and combining mnemonics.
///
/// Cloning is cheap: the field tables are shared.
/// # Example
/// ```
/// use shamir39::{Config, InsecureBits, Shamir39, Wordlist};
///
/// let wordlist = Wordlist::new((0..2048).map(|i| format!("word{i}"))).unwrap();
/// let shamir = Shamir39::new(Config::default()).unwrap();
/// let secret = ["word1", "word0", "word2047"];
///
/// let dealt = shamir
///     .split(&secret, &wordlist, 2, 3, &mut InsecureBits::new())
///     .unwrap();
/// assert!(!dealt.is_secure());
///
/// let recovered = shamir.combine(&dealt.shares[1..], &wordlist).unwrap();
/// assert_eq!(recovered, secret);
/// ```
#[derive(Debug, Clone)]
pub struct Shamir39 {
    config: Config,
    field: Arc<BinaryField>,
}

/// shares decoded from a set of mnemonics
struct Collected {
    threshold: u32,
    shares: Vec<Share>,
    payload_bits: usize,
}

fn check_range(name: &str, value: u32) -> Result<()> {
    if !(MIN_SHARES..=MAX_SHARES).contains(&value) {
        return Err(Error::Validation(format!(
            "{name} must be between {MIN_SHARES} and {MAX_SHARES}, got {value}"
        )));
    }
    Ok(())
}

impl Shamir39 {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            field: Arc::new(BinaryField::new(FIELD_BITS)?),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn field(&self) -> &BinaryField {
        &self.field
    }

    /// Split `words` into `total_shares` share mnemonics, any `threshold` of
    /// which recover them. No BIP39 checksum validation is done.
    pub fn split<S, R>(
        &self,
        words: &[S],
        wordlist: &Wordlist,
        threshold: u32,
        total_shares: u32,
        rng: &mut R,
    ) -> Result<Dealt<Vec<String>>>
    where
        S: AsRef<str>,
        R: BitSource + ?Sized,
    {
        check_range("threshold", threshold)?;
        check_range("total shares", total_shares)?;
        if threshold > total_shares {
            return Err(Error::Validation(format!(
                "threshold {threshold} exceeds the number of shares {total_shares}"
            )));
        }
        if words.is_empty() {
            return Err(Error::Validation("no mnemonic words provided".to_owned()));
        }
        let bits = words_to_bits(words, wordlist)?;
        let secret = bits_to_hex(&left_pad(&bits, 4))?;
        let dealt = shamir::split_secret(&self.field, rng, &secret, total_shares, threshold, 0)?;

        let shares = dealt
            .shares
            .iter()
            .map(|share| {
                let payload = hex_to_bits(&share.data)?;
                self.encode_share(threshold, share.id - 1, &payload, wordlist)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Dealt {
            shares,
            warnings: dealt.warnings,
        })
    }

    /// Recover the mnemonic from a collection of share mnemonics.
    ///
    /// The order of the shares is irrelevant; if two shares carry the same
    /// index the one that comes later wins.
    pub fn combine<I, W, S>(&self, share_sets: I, wordlist: &Wordlist) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[S]>,
        S: AsRef<str>,
    {
        let collected = self.collect(share_sets, wordlist)?;
        let secret = shamir::combine(&self.field, &collected.shares, collected.threshold)?;
        let bits = hex_to_bits(&secret)?;
        let words = bits_to_words(drop_to_multiple(&bits, BITS_PER_WORD), wordlist)?;
        if words.is_empty() {
            return Err(Error::Validation("recovered secret holds no words".to_owned()));
        }
        Ok(words)
    }

    /// Recompute the share mnemonic with 0-based `index` from existing shares.
    pub fn derive_share<I, W, S>(
        &self,
        share_sets: I,
        wordlist: &Wordlist,
        index: u32,
    ) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[S]>,
        S: AsRef<str>,
    {
        let collected = self.collect(share_sets, wordlist)?;
        let share = shamir::derive_share(
            &self.field,
            index.saturating_add(1),
            &collected.shares,
            collected.threshold,
        )?;
        let bits = hex_to_bits(&share.data)?;
        // interpolation may widen the payload by leading zero bits
        let payload = &bits[bits.len().saturating_sub(collected.payload_bits)..];
        self.encode_share(collected.threshold, index, payload, wordlist)
    }

    fn encode_share(
        &self,
        threshold: u32,
        index: u32,
        payload: &str,
        wordlist: &Wordlist,
    ) -> Result<Vec<String>> {
        let mut mnemonic = vec![self.config.version.clone()];
        mnemonic.extend(bits_to_words(&encode_parameters(threshold, index), wordlist)?);
        mnemonic.extend(bits_to_words(payload, wordlist)?);
        Ok(mnemonic)
    }

    fn collect<I, W, S>(&self, share_sets: I, wordlist: &Wordlist) -> Result<Collected>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut threshold = None;
        let mut payloads: BTreeMap<u32, String> = BTreeMap::new();
        let mut payload_bits = 0;
        for set in share_sets {
            let Some((version, rest)) = set.as_ref().split_first() else {
                return Err(Error::Validation("empty share mnemonic".to_owned()));
            };
            if version.as_ref() != self.config.version {
                return Err(Error::VersionMismatch {
                    expected: self.config.version.clone(),
                    found: version.as_ref().to_owned(),
                });
            }
            let (params, consumed) = decode_parameters(rest, wordlist)?;
            match threshold {
                None => threshold = Some(params.threshold),
                Some(expected) if expected != params.threshold => {
                    return Err(Error::ParameterMismatch {
                        expected,
                        found: params.threshold,
                    })
                }
                Some(_) => {}
            }
            let payload = &rest[consumed..];
            if payload.is_empty() {
                return Err(Error::Validation(format!(
                    "share {} has no payload words",
                    params.index
                )));
            }
            let bits = words_to_bits(payload, wordlist)?;
            payload_bits = payload_bits.max(bits.len());
            let hex = bits_to_hex(drop_to_multiple(&bits, 4))?;
            if payloads.insert(params.index, hex).is_some() {
                log::debug!("share {} supplied again, keeping the later one", params.index);
            }
        }

        let Some(threshold) = threshold else {
            return Err(Error::InsufficientShares {
                required: MIN_SHARES,
                provided: 0,
            });
        };
        check_range("threshold", threshold)?;
        if payloads.len() < threshold as usize {
            return Err(Error::InsufficientShares {
                required: threshold,
                provided: payloads.len() as u32,
            });
        }
        let shares = payloads
            .into_iter()
            .map(|(index, data)| {
                let id = index + 1;
                if !self.field.contains(id) {
                    return Err(Error::Validation(format!(
                        "share index {index} is outside the {FIELD_BITS}-bit field"
                    )));
                }
                Ok(Share {
                    bits: FIELD_BITS,
                    id,
                    data,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Collected {
            threshold,
            shares,
            payload_bits,
        })
    }
}

#[cfg(test)]
fn sample_words() -> Vec<String> {
    [7, 0, 2047, 1024, 3, 512, 99, 1500, 42, 1, 800, 2000]
        .iter()
        .map(|i| format!("w{i:04}"))
        .collect()
}

#[test]
fn test_split_layout() {
    use crate::codec::mnemonic::test_wordlist;
    use crate::protocol::random::InsecureBits;
    let wordlist = test_wordlist();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let words = sample_words();
    let dealt = shamir
        .split(&words, &wordlist, 3, 5, &mut InsecureBits::from_seed(1))
        .unwrap();
    assert_eq!(dealt.shares.len(), 5);
    for (index, share) in dealt.shares.iter().enumerate() {
        assert_eq!(share[0], "shamir39-p1");
        let (params, consumed) = decode_parameters(&share[1..], &wordlist).unwrap();
        assert_eq!(params.threshold, 3);
        assert_eq!(params.index, index as u32);
        assert_eq!(consumed, 1);
        // 132 bits gain a zero nibble and a sentinel bit: 137 bits in 18
        // chunks of 8, carried by 14 words
        assert_eq!(share.len(), 2 + 14);
    }
}

#[test]
fn test_combine_round_trip() {
    use crate::codec::mnemonic::test_wordlist;
    use crate::protocol::random::InsecureBits;
    let wordlist = test_wordlist();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let words = sample_words();
    let shares = shamir
        .split(&words, &wordlist, 3, 5, &mut InsecureBits::from_seed(2))
        .unwrap()
        .shares;
    let subset = vec![shares[4].clone(), shares[0].clone(), shares[2].clone()];
    assert_eq!(shamir.combine(&subset, &wordlist).unwrap(), words);
    assert_eq!(shamir.combine(&shares, &wordlist).unwrap(), words);
    assert_eq!(
        shamir.combine(&shares[..2], &wordlist).unwrap_err(),
        Error::InsufficientShares {
            required: 3,
            provided: 2
        }
    );
}

#[test]
fn test_derive_share_mnemonic() {
    use crate::codec::mnemonic::test_wordlist;
    use crate::protocol::random::InsecureBits;
    let wordlist = test_wordlist();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let all = sample_words();
    for len in [1, 2, 3, 5, 12] {
        let words = &all[..len];
        let shares = shamir
            .split(words, &wordlist, 3, 6, &mut InsecureBits::from_seed(len as u64))
            .unwrap()
            .shares;
        let known = [&shares[5], &shares[0], &shares[3]];
        let derived = shamir.derive_share(known, &wordlist, 2).unwrap();
        assert_eq!(derived, shares[2]);
    }
}

#[test]
fn test_combine_errors() {
    use crate::codec::mnemonic::test_wordlist;
    use crate::protocol::random::InsecureBits;
    let wordlist = test_wordlist();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let words = sample_words();
    let mut rng = InsecureBits::from_seed(3);
    let shares = shamir.split(&words, &wordlist, 2, 3, &mut rng).unwrap().shares;
    let other = shamir.split(&words, &wordlist, 3, 3, &mut rng).unwrap().shares;

    let mismatched = vec![shares[0].clone(), other[1].clone()];
    assert_eq!(
        shamir.combine(&mismatched, &wordlist).unwrap_err(),
        Error::ParameterMismatch {
            expected: 2,
            found: 3
        }
    );
    let empty: Vec<Vec<String>> = vec![vec![]];
    assert!(matches!(
        shamir.combine(&empty, &wordlist),
        Err(Error::Validation(_))
    ));
    let no_payload = vec![shares[0][..2].to_vec(), shares[1].clone()];
    assert!(matches!(
        shamir.combine(&no_payload, &wordlist),
        Err(Error::Validation(_))
    ));
    let mut unknown = shares[0].clone();
    unknown[3] = "zebra".to_owned();
    assert_eq!(
        shamir.combine([unknown, shares[1].clone()], &wordlist).unwrap_err(),
        Error::UnknownWord("zebra".to_owned())
    );
    let none: Vec<Vec<String>> = Vec::new();
    assert_eq!(
        shamir.combine(&none, &wordlist).unwrap_err(),
        Error::InsufficientShares {
            required: 2,
            provided: 0
        }
    );
}

#[test]
fn test_split_validation() {
    use crate::codec::mnemonic::test_wordlist;
    use crate::protocol::random::InsecureBits;
    let wordlist = test_wordlist();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let words = sample_words();
    let mut rng = InsecureBits::from_seed(4);
    for (threshold, total) in [(1, 5), (4096, 4096), (2, 1), (2, 4096), (5, 3)] {
        assert!(matches!(
            shamir.split(&words, &wordlist, threshold, total, &mut rng),
            Err(Error::Validation(_))
        ));
    }
    // within the format limits but beyond what GF(2^8) can index
    assert!(matches!(
        shamir.split(&words, &wordlist, 2, 300, &mut rng),
        Err(Error::Validation(_))
    ));
    let empty: [&str; 0] = [];
    assert!(matches!(
        shamir.split(&empty, &wordlist, 2, 3, &mut rng),
        Err(Error::Validation(_))
    ));
    assert_eq!(
        shamir
            .split(&["w0001", "nope"], &wordlist, 2, 3, &mut rng)
            .unwrap_err(),
        Error::UnknownWord("nope".to_owned())
    );
}

#[test]
fn test_combine_rejects_decoded_threshold() {
    use crate::codec::mnemonic::test_wordlist;
    let wordlist = test_wordlist();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let forged = |index| {
        let mut share = vec!["shamir39-p1".to_owned()];
        share.extend(bits_to_words(&encode_parameters(1, index), &wordlist).unwrap());
        share.push("w0001".to_owned());
        share
    };
    let err = shamir.combine([forged(0), forged(1)], &wordlist).unwrap_err();
    assert_eq!(
        err,
        Error::Validation("threshold must be between 2 and 4095, got 1".to_owned())
    );
}
