//! provides basic math functions

pub mod galois;

pub use galois::binaryfield::BinaryField;
