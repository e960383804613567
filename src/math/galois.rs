//! finite field arithmetic

pub mod binaryfield;
mod irreducible;
