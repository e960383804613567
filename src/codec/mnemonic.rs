//! word list handling and the shamir39 parameter block
//!
//! Every word stands for an 11-bit index into a 2048 word list. The parameter
//! block packs the threshold `m` and the 0-based share index `o` into one or
//! more words laid out as `[continuation][5 bits of m][5 bits of o]`.

use super::bits::{bits_to_u32, pad_to_multiple, to_bits};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

pub const WORDLIST_SIZE: usize = 2048;
pub const BITS_PER_WORD: usize = 11;

const PARAM_GROUP_BITS: usize = 5;
/// 6 words carry 30 bits per parameter, far beyond the 4095 share limit
const MAX_PARAM_WORDS: usize = 6;

/// An ordered list of exactly 2048 unique words.
/// # Example
/// ```
/// use shamir39::codec::mnemonic::Wordlist;
///
/// let wordlist = Wordlist::new((0..2048).map(|i| format!("word{i}"))).unwrap();
/// assert_eq!(wordlist.index_of("word42").unwrap(), 42);
/// assert_eq!(wordlist.word(7), Some("word7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wordlist {
    words: Vec<String>,
    index: HashMap<String, u16>,
}

impl Wordlist {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.len() != WORDLIST_SIZE {
            return Err(Error::Validation(format!(
                "wordlist must have {WORDLIST_SIZE} words, got {}",
                words.len()
            )));
        }
        let mut index = HashMap::with_capacity(WORDLIST_SIZE);
        for (i, word) in words.iter().enumerate() {
            if index.insert(word.clone(), i as u16).is_some() {
                return Err(Error::Validation(format!("duplicate word in wordlist: {word}")));
            }
        }
        Ok(Self { words, index })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn index_of(&self, word: &str) -> Result<u16> {
        self.index
            .get(word)
            .copied()
            .ok_or_else(|| Error::UnknownWord(word.to_owned()))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// parses one word per line, ignoring blank lines and surrounding whitespace
impl FromStr for Wordlist {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.lines().map(str::trim).filter(|line| !line.is_empty()))
    }
}

/// threshold and 0-based share index carried by every share mnemonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameters {
    pub threshold: u32,
    pub index: u32,
}

/// concatenate the 11-bit index of every word
pub fn words_to_bits<S: AsRef<str>>(words: &[S], wordlist: &Wordlist) -> Result<String> {
    let mut bits = String::with_capacity(words.len() * BITS_PER_WORD);
    for word in words {
        let index = wordlist.index_of(word.as_ref())?;
        bits.push_str(&to_bits(u32::from(index), BITS_PER_WORD));
    }
    Ok(bits)
}

/// left-pad to a multiple of 11 bits and map every group to its word
pub fn bits_to_words(bits: &str, wordlist: &Wordlist) -> Result<Vec<String>> {
    let bits = pad_to_multiple(bits, BITS_PER_WORD);
    let mut words = Vec::with_capacity(bits.len() / BITS_PER_WORD);
    for group in bits.as_bytes().chunks(BITS_PER_WORD) {
        // chunks of an ASCII-only string are valid UTF-8
        let group = std::str::from_utf8(group)
            .map_err(|_| Error::Validation("bits are not ASCII".to_owned()))?;
        let index = bits_to_u32(group)? as usize;
        let word = wordlist.word(index).ok_or_else(|| {
            Error::Validation(format!("word index {index} outside the wordlist"))
        })?;
        words.push(word.to_owned());
    }
    Ok(words)
}

fn bit_length(value: u32) -> usize {
    (u32::BITS - value.leading_zeros()).max(1) as usize
}

/// Encode `(m, o)` as the binary parameter block, a multiple of 11 bits.
pub fn encode_parameters(m: u32, o: u32) -> String {
    let width = bit_length(m.max(o)).div_ceil(PARAM_GROUP_BITS) * PARAM_GROUP_BITS;
    let m_bits = to_bits(m, width);
    let o_bits = to_bits(o, width);
    let groups = width / PARAM_GROUP_BITS;
    let mut out = String::with_capacity(groups * BITS_PER_WORD);
    for i in 0..groups {
        let range = i * PARAM_GROUP_BITS..(i + 1) * PARAM_GROUP_BITS;
        out.push(if i + 1 == groups { '0' } else { '1' });
        out.push_str(&m_bits[range.clone()]);
        out.push_str(&o_bits[range]);
    }
    out
}

/// Read the parameter block at the start of `words`.
///
/// Returns the decoded parameters and how many words the block occupied.
pub fn decode_parameters<S: AsRef<str>>(
    words: &[S],
    wordlist: &Wordlist,
) -> Result<(Parameters, usize)> {
    let mut m = 0u32;
    let mut o = 0u32;
    for (consumed, word) in words.iter().enumerate() {
        if consumed == MAX_PARAM_WORDS {
            return Err(Error::Validation(format!(
                "parameter block longer than {MAX_PARAM_WORDS} words"
            )));
        }
        let index = u32::from(wordlist.index_of(word.as_ref())?);
        m = (m << PARAM_GROUP_BITS) | ((index >> PARAM_GROUP_BITS) & 0x1f);
        o = (o << PARAM_GROUP_BITS) | (index & 0x1f);
        if index >> (BITS_PER_WORD - 1) == 0 {
            return Ok((
                Parameters {
                    threshold: m,
                    index: o,
                },
                consumed + 1,
            ));
        }
    }
    Err(Error::Validation(
        "parameter block is not terminated".to_owned(),
    ))
}

#[cfg(test)]
pub(crate) fn test_wordlist() -> Wordlist {
    Wordlist::new((0..WORDLIST_SIZE).map(|i| format!("w{i:04}"))).unwrap()
}

#[test]
fn test_wordlist_validation() {
    assert!(matches!(
        Wordlist::new(["abandon", "ability"]),
        Err(Error::Validation(_))
    ));
    let mut words: Vec<String> = (0..WORDLIST_SIZE).map(|i| i.to_string()).collect();
    words[5] = "0".to_owned();
    assert!(matches!(Wordlist::new(words), Err(Error::Validation(_))));

    let text: String = (0..WORDLIST_SIZE).map(|i| format!("  w{i}\n")).collect();
    let wordlist: Wordlist = text.parse().unwrap();
    assert_eq!(wordlist.len(), WORDLIST_SIZE);
    assert_eq!(wordlist.index_of("w2047").unwrap(), 2047);
}

#[test]
fn test_words_bits() {
    let wordlist = test_wordlist();
    let bits = words_to_bits(&["w0000", "w0001", "w2047"], &wordlist).unwrap();
    assert_eq!(bits, "0".repeat(21) + "1" + "11111111111");
    assert_eq!(
        bits_to_words(&bits, &wordlist).unwrap(),
        vec!["w0000", "w0001", "w2047"]
    );
    // short input is left-padded to one word
    assert_eq!(bits_to_words("101", &wordlist).unwrap(), vec!["w0005"]);
    assert_eq!(
        words_to_bits(&["w0000", "nope"], &wordlist).unwrap_err(),
        Error::UnknownWord("nope".to_owned())
    );
}

#[test]
fn test_encode_parameters() {
    assert_eq!(encode_parameters(3, 0), "00001100000");
    assert_eq!(encode_parameters(31, 31), "01111111111");
    assert_eq!(
        encode_parameters(4095, 0),
        "10001100000".to_owned() + "11111100000" + "01111100000"
    );
    // the wider parameter decides the block length
    assert_eq!(encode_parameters(2, 32).len(), 22);
}

#[test]
fn test_decode_parameters() {
    let wordlist = test_wordlist();
    for (m, o) in [(2, 0), (3, 4), (31, 31), (32, 0), (4095, 4094), (200, 1000)] {
        let mut words = bits_to_words(&encode_parameters(m, o), &wordlist).unwrap();
        let block = words.len();
        words.push("w0100".to_owned());
        let (params, consumed) = decode_parameters(&words, &wordlist).unwrap();
        assert_eq!(params, Parameters { threshold: m, index: o });
        assert_eq!(consumed, block);
    }
    // every word carries a continuation bit
    let words = vec!["w1024"; 3];
    assert!(matches!(
        decode_parameters(&words, &wordlist),
        Err(Error::Validation(_))
    ));
    let empty: [&str; 0] = [];
    assert!(decode_parameters(&empty, &wordlist).is_err());
}

#[test]
fn test_decode_parameters_too_long() {
    let wordlist = test_wordlist();
    let mut words = vec!["w1024"; MAX_PARAM_WORDS];
    words.push("w0000");
    assert_eq!(
        decode_parameters(&words, &wordlist).unwrap_err(),
        Error::Validation("parameter block longer than 6 words".to_owned())
    );
    // six words that all continue are unterminated, not too long
    assert_eq!(
        decode_parameters(&words[..MAX_PARAM_WORDS], &wordlist).unwrap_err(),
        Error::Validation("parameter block is not terminated".to_owned())
    );
    // the longest valid block still decodes
    let mut longest = vec!["w1024"; MAX_PARAM_WORDS - 1];
    longest.push("w0000");
    let (params, consumed) = decode_parameters(&longest, &wordlist).unwrap();
    assert_eq!(consumed, MAX_PARAM_WORDS);
    assert_eq!(params, Parameters { threshold: 0, index: 0 });
}
