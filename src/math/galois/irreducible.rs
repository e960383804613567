//! primitive polynomials for GF(2^n)

/// Primitive polynomials in decimal form with the leading term dropped,
/// indexed by `n` for 2 <= n <= 30: `PRIMITIVE_POLYNOMIALS[8]` is
/// x^8 + x^4 + x^3 + x^2 + 1.
pub(crate) const PRIMITIVE_POLYNOMIALS: [Option<u32>; 31] = [
    None,
    None,
    Some(1),
    Some(3),
    Some(3),
    Some(5),
    Some(3),
    Some(3),
    Some(29),
    Some(17),
    Some(9),
    Some(5),
    Some(83),
    Some(27),
    Some(43),
    Some(3),
    Some(45),
    Some(9),
    Some(39),
    Some(39),
    Some(9),
    Some(5),
    Some(3),
    Some(33),
    Some(27),
    Some(9),
    Some(71),
    Some(39),
    Some(9),
    Some(5),
    Some(83),
];

/// look up the primitive polynomial for GF(2^n)
pub(crate) fn primitive(bits: u32) -> Option<u32> {
    PRIMITIVE_POLYNOMIALS.get(bits as usize).copied().flatten()
}
