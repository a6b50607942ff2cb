//! In-crate test helpers: throwaway chains, signed fixtures, random data.

pub mod test_utils;

pub use test_utils::*;
