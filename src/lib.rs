//! Shamir's Secret Sharing for BIP39 mnemonics.
//!
//! A mnemonic is split into share mnemonics (the shamir39 format) over
//! GF(2^8); any `threshold` of them recombine into the original words and
//! fewer reveal nothing about them.

pub mod codec;
pub mod config;
pub mod error;
pub mod math;
pub mod protocol;
pub mod scheme;

pub use codec::Wordlist;
pub use config::Config;
pub use error::{Error, Result};
pub use protocol::random::{BitSource, InsecureBits, OsBits, Warning};
pub use protocol::shamir::{Dealt, Share};
pub use scheme::Shamir39;
