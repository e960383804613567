use proptest::prelude::*;

use shamir39::codec::bits::{bits_to_hex, hex_to_bits, left_pad, pad_to_multiple};
use shamir39::codec::mnemonic::{bits_to_words, decode_parameters, encode_parameters};
use shamir39::codec::Parameters;
use shamir39::{Config, Error, InsecureBits, Shamir39, Wordlist};

fn wordlist() -> Wordlist {
    Wordlist::new((0..2048).map(|i| format!("word{i}"))).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn parameters_roundtrip(m in 2u32..=4095, o in 0u32..4095) {
        let wordlist = wordlist();
        let mut words = bits_to_words(&encode_parameters(m, o), &wordlist).unwrap();
        let block = words.len();
        words.push("word0".to_owned());
        let (params, consumed) = decode_parameters(&words, &wordlist).unwrap();
        prop_assert_eq!(params, Parameters { threshold: m, index: o });
        prop_assert_eq!(consumed, block);
    }

    #[test]
    fn hex_bits_roundtrip(hex in "([0-9a-fA-F]{2}){0,40}") {
        let bits = hex_to_bits(&hex).unwrap();
        prop_assert_eq!(bits.len(), hex.len() * 4);
        prop_assert_eq!(bits_to_hex(&bits).unwrap(), hex.to_lowercase());
    }

    #[test]
    fn padding_is_stable(bits in "[01]{0,64}", width in 1usize..16) {
        let once = pad_to_multiple(&bits, width);
        prop_assert_eq!(once.len() % width, 0);
        prop_assert_eq!(&pad_to_multiple(&once, width), &once);
        prop_assert!(once.ends_with(bits.as_str()));

        let framed = left_pad(&bits, width);
        prop_assert_eq!(framed.len() % width, 0);
        prop_assert!(framed.len() > bits.len());
        prop_assert!(framed.len() <= bits.len() + width);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn split_combine_roundtrip(
        indices in prop::collection::vec(0usize..2048, 1..25),
        threshold in 2u32..=5,
        extra in 0u32..4,
        offset in any::<usize>(),
        seed in any::<u64>(),
    ) {
        let wordlist = wordlist();
        let shamir = Shamir39::new(Config::default()).unwrap();
        let words: Vec<String> = indices.iter().map(|i| format!("word{i}")).collect();
        let total = threshold + extra;
        let shares = shamir
            .split(&words, &wordlist, threshold, total, &mut InsecureBits::from_seed(seed))
            .unwrap()
            .shares;
        prop_assert_eq!(shares.len(), total as usize);

        let mut rotated = shares.clone();
        rotated.rotate_left(offset % shares.len());
        let enough = &rotated[..threshold as usize];
        prop_assert_eq!(shamir.combine(enough, &wordlist).unwrap(), words);

        let short = &rotated[..threshold as usize - 1];
        let is_insufficient = matches!(
            shamir.combine(short, &wordlist),
            Err(Error::InsufficientShares { .. })
        );
        prop_assert!(is_insufficient);
    }
}
