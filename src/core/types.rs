use crate::error::{BlockchainError, Result};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte content digest produced by the canonical hash function.
///
/// The all-zero value is the distinguished "unset" sentinel; SHA-256 never
/// returns it in practice, so the sentinel doubles as "not yet computed".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hash([u8; 32]);

impl Hash {
    pub const LEN: usize = 32;

    /// The zero sentinel.
    pub const fn zero() -> Hash {
        Hash([0u8; 32])
    }

    /// SHA-256 over `data`.
    pub fn digest(data: &[u8]) -> Hash {
        let digest = crate::utils::sha256_digest(data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Hash(out)
    }

    /// Build a hash from exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Hash> {
        if bytes.len() != Self::LEN {
            return Err(BlockchainError::InvalidLength {
                what: "hash",
                expected: Self::LEN,
                got: bytes.len(),
            });
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(bytes);
        Ok(Hash(out))
    }

    pub const fn from_array(bytes: [u8; 32]) -> Hash {
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl std::hash::Hash for Hash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HEXLOWER.encode(&self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A 20-byte identifier for a public key.
///
/// Derived only by hashing the marshaled public-key point and keeping the
/// last 20 bytes; never constructed from anything but exactly 20 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    /// Build an address from exactly 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Address> {
        if bytes.len() != Self::LEN {
            return Err(BlockchainError::InvalidLength {
                what: "address",
                expected: Self::LEN,
                got: bytes.len(),
            });
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Address(out))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HEXLOWER.encode(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_from_bytes_rejects_wrong_length() {
        assert!(Hash::from_bytes(&[0u8; 31]).is_err());
        assert!(Hash::from_bytes(&[0u8; 33]).is_err());
        assert!(Hash::from_bytes(&[7u8; 32]).is_ok());
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Hash::zero().is_zero());
        assert!(Hash::default().is_zero());
        assert!(!Hash::digest(b"anything").is_zero());
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = Hash::digest(b"payload");
        let b = Hash::digest(b"payload");
        assert_eq!(a, b);
        assert_ne!(a, Hash::digest(b"payload!"));
    }

    #[test]
    fn test_hex_display() {
        let hash = Hash::from_bytes(&[0xab; 32]).unwrap();
        assert_eq!(hash.to_string(), "ab".repeat(32));

        let addr = Address::from_bytes(&[0x01; 20]).unwrap();
        assert_eq!(addr.to_string(), "01".repeat(20));
    }

    #[test]
    fn test_address_from_bytes_rejects_wrong_length() {
        assert!(Address::from_bytes(&[0u8; 19]).is_err());
        assert!(Address::from_bytes(&[0u8; 21]).is_err());
        assert!(Address::from_bytes(&[0u8; 20]).is_ok());
    }
}
