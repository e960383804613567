use bip39::Language;
use shamir39::{BitSource, Config, Error, InsecureBits, OsBits, Shamir39, Warning, Wordlist};

const MNEMONIC: &str = "seek deposit organ vintage absurd daughter trip rabbit simple father \
                        effort welcome fashion bike venture";

fn english() -> Wordlist {
    Wordlist::new(Language::English.word_list().iter().copied()).unwrap()
}

fn mnemonic() -> Vec<String> {
    MNEMONIC.split_whitespace().map(str::to_owned).collect()
}

fn split_3_of_5(rng: &mut dyn BitSource) -> Vec<Vec<String>> {
    let shamir = Shamir39::new(Config::default()).unwrap();
    shamir
        .split(&mnemonic(), &english(), 3, 5, rng)
        .unwrap()
        .shares
}

fn subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 {
        return vec![vec![]];
    }
    if n < k {
        return vec![];
    }
    let mut with_last = subsets(n - 1, k - 1);
    for subset in &mut with_last {
        subset.push(n - 1);
    }
    with_last.extend(subsets(n - 1, k));
    with_last
}

#[test]
fn any_three_of_five_recover_the_mnemonic() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let shares = split_3_of_5(&mut OsBits);
    assert_eq!(shares.len(), 5);
    for share in &shares {
        assert_eq!(share[0], "shamir39-p1");
        assert!(share[1..].iter().all(|word| wordlist.index_of(word).is_ok()));
    }
    let combos = subsets(5, 3);
    assert_eq!(combos.len(), 10);
    for combo in combos {
        let picked: Vec<&Vec<String>> = combo.iter().map(|&i| &shares[i]).collect();
        assert_eq!(shamir.combine(picked, &wordlist).unwrap(), mnemonic());
    }
}

#[test]
fn two_of_five_are_not_enough() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let shares = split_3_of_5(&mut OsBits);
    for combo in subsets(5, 2) {
        let picked: Vec<&Vec<String>> = combo.iter().map(|&i| &shares[i]).collect();
        assert_eq!(
            shamir.combine(picked, &wordlist).unwrap_err(),
            Error::InsufficientShares {
                required: 3,
                provided: 2
            }
        );
    }
    assert!(matches!(
        shamir.combine([&shares[4]], &wordlist),
        Err(Error::InsufficientShares { .. })
    ));
}

#[test]
fn wrong_version_tag_is_rejected() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let mut shares = split_3_of_5(&mut OsBits);
    shares[1][0] = "shamir39-p0".to_owned();
    assert_eq!(
        shamir.combine(&shares[..3], &wordlist).unwrap_err(),
        Error::VersionMismatch {
            expected: "shamir39-p1".to_owned(),
            found: "shamir39-p0".to_owned()
        }
    );
}

#[test]
fn configured_version_tag_is_enforced() {
    let wordlist = english();
    let custom = Shamir39::new(Config::from_json(r#"{"version": "shamir39-x"}"#).unwrap()).unwrap();
    let standard = Shamir39::new(Config::default()).unwrap();
    let shares = custom
        .split(&mnemonic(), &wordlist, 2, 3, &mut OsBits)
        .unwrap()
        .shares;
    assert!(shares.iter().all(|share| share[0] == "shamir39-x"));
    assert_eq!(custom.combine(&shares[1..], &wordlist).unwrap(), mnemonic());
    assert!(matches!(
        standard.combine(&shares[1..], &wordlist),
        Err(Error::VersionMismatch { .. })
    ));
}

#[test]
fn share_order_does_not_matter() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let shares = split_3_of_5(&mut InsecureBits::from_seed(17));
    let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0], [4, 0, 3], [3, 4, 0]];
    for order in orders {
        let picked: Vec<&Vec<String>> = order.iter().map(|&i| &shares[i]).collect();
        assert_eq!(shamir.combine(picked, &wordlist).unwrap(), mnemonic());
    }
}

#[test]
fn duplicate_share_index_counts_once() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let shares = split_3_of_5(&mut OsBits);
    let repeated = [&shares[0], &shares[1], &shares[1]];
    assert_eq!(
        shamir.combine(repeated, &wordlist).unwrap_err(),
        Error::InsufficientShares {
            required: 3,
            provided: 2
        }
    );
    let repeated = [&shares[0], &shares[1], &shares[1], &shares[2]];
    assert_eq!(shamir.combine(repeated, &wordlist).unwrap(), mnemonic());
}

#[test]
fn later_share_with_same_index_wins() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let shares = split_3_of_5(&mut OsBits);
    let mut tampered = shares[1].clone();
    let last = tampered.len() - 1;
    let index = wordlist.index_of(&tampered[last]).unwrap();
    tampered[last] = wordlist.word(usize::from(index ^ 1)).unwrap().to_owned();

    let good_last = [&tampered, &shares[0], &shares[2], &shares[1]];
    assert_eq!(shamir.combine(good_last, &wordlist).unwrap(), mnemonic());

    let tampered_last = [&shares[1], &shares[0], &shares[2], &tampered];
    assert_ne!(shamir.combine(tampered_last, &wordlist).ok(), Some(mnemonic()));
}

#[test]
fn insecure_source_is_reported() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let dealt = shamir
        .split(&mnemonic(), &wordlist, 2, 2, &mut InsecureBits::new())
        .unwrap();
    assert_eq!(dealt.warnings, vec![Warning::InsecureRandomSource]);
    assert!(!dealt.is_secure());

    let dealt = shamir
        .split(&mnemonic(), &wordlist, 2, 2, &mut OsBits)
        .unwrap();
    assert!(dealt.warnings.is_empty());
    assert!(dealt.is_secure());
}

#[test]
fn lost_share_can_be_rebuilt() {
    let wordlist = english();
    let shamir = Shamir39::new(Config::default()).unwrap();
    let shares = split_3_of_5(&mut OsBits);
    let rebuilt = shamir
        .derive_share([&shares[0], &shares[2], &shares[4]], &wordlist, 3)
        .unwrap();
    assert_eq!(rebuilt, shares[3]);
    let mixed = [&shares[1], &rebuilt, &shares[4]];
    assert_eq!(shamir.combine(mixed, &wordlist).unwrap(), mnemonic());
}

#[test]
fn wordlist_must_have_2048_words() {
    let short: Vec<&str> = Language::English.word_list()[..2047].to_vec();
    assert!(matches!(Wordlist::new(short), Err(Error::Validation(_))));
}
