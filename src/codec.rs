//! text codecs between mnemonic words, binary strings and hex

pub mod bits;
pub mod mnemonic;

pub use bits::{bits_to_hex, hex_to_bits, left_pad, split_into_chunks};
pub use mnemonic::{decode_parameters, encode_parameters, Parameters, Wordlist};
