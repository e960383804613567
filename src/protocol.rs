//! secret sharing protocol and the randomness it draws on

pub mod random;
pub mod shamir;
