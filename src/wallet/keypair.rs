use crate::core::types::Address;
use crate::error::{BlockchainError, Result};
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the marshaled P-256 point: 0x04 || x || y.
pub const PUBLIC_KEY_LEN: usize = 65;

/// Length of a fixed-format ECDSA P-256 signature: r || s.
pub const SIGNATURE_LEN: usize = 64;

/// An ECDSA P-256 signing identity.
///
/// Holds the PKCS#8 document ring needs for signing plus the derived public
/// key. The curve is fixed by the wire format; there is no algorithm
/// negotiation anywhere in the system.
#[derive(Clone)]
pub struct PrivateKey {
    pkcs8: Vec<u8>,
    public: PublicKey,
}

impl PrivateKey {
    /// Generate a fresh identity. Fails only if the system RNG fails.
    pub fn generate() -> Result<PrivateKey> {
        let pkcs8 = crate::utils::new_key_pair()?;
        Self::from_pkcs8(pkcs8)
    }

    /// Reconstruct an identity from a stored PKCS#8 document.
    pub fn from_pkcs8(pkcs8: Vec<u8>) -> Result<PrivateKey> {
        let rng = SystemRandom::new();
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref(), &rng)
                .map_err(|e| {
                    BlockchainError::Signing(format!("Failed to create key pair from PKCS8: {e}"))
                })?;
        let public = PublicKey::from_bytes(key_pair.public_key().as_ref())?;
        Ok(PrivateKey { pkcs8, public })
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// The raw PKCS#8 document, for the encrypted keystore.
    pub fn pkcs8(&self) -> &[u8] {
        self.pkcs8.as_slice()
    }

    /// Sign `message`; fails with a signing error on RNG failure.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let raw = crate::utils::ecdsa_p256_sha256_sign_digest(&self.pkcs8, message)?;
        Signature::from_fixed_bytes(&raw)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// A marshaled P-256 public key (uncompressed SEC1 point).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    point: Vec<u8>,
}

impl PublicKey {
    /// Build a public key from a marshaled point; length-checked, never panics.
    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(BlockchainError::InvalidLength {
                what: "public key",
                expected: PUBLIC_KEY_LEN,
                got: bytes.len(),
            });
        }
        Ok(PublicKey {
            point: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.point.as_slice()
    }

    /// The last 20 bytes of SHA-256 over the marshaled point.
    pub fn address(&self) -> Address {
        let digest = crate::utils::sha256_digest(&self.point);
        Address::from_bytes(&digest[digest.len() - Address::LEN..])
            .expect("SHA-256 digest always yields 20 trailing bytes")
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.address())
    }
}

/// An ECDSA signature as its two scalar components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Split a 64-byte fixed-format (r||s) signature into its components.
    pub fn from_fixed_bytes(bytes: &[u8]) -> Result<Signature> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(BlockchainError::InvalidLength {
                what: "signature",
                expected: SIGNATURE_LEN,
                got: bytes.len(),
            });
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(Signature { r, s })
    }

    pub fn to_fixed_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// Check this signature against a public key and message.
    ///
    /// Pure and infallible: malformed keys or tampered payloads simply
    /// verify false.
    pub fn verify(&self, public_key: &PublicKey, message: &[u8]) -> bool {
        crate::utils::ecdsa_p256_sha256_sign_verify(
            public_key.as_bytes(),
            &self.to_fixed_bytes(),
            message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_success() {
        let key = PrivateKey::generate().unwrap();
        let msg = b"hello, ledger";
        let sig = key.sign(msg).unwrap();

        assert!(sig.verify(key.public(), msg), "signature should verify");
    }

    #[test]
    fn test_sign_verify_fail() {
        let key = PrivateKey::generate().unwrap();
        let msg = b"hello, ledger";
        let sig = key.sign(msg).unwrap();

        let attacker = PrivateKey::generate().unwrap();
        assert!(
            !sig.verify(attacker.public(), msg),
            "foreign key must not verify"
        );
        assert!(
            !sig.verify(key.public(), b"tampered message"),
            "tampered payload must not verify"
        );
    }

    #[test]
    fn test_address_is_twenty_bytes_and_stable() {
        let key = PrivateKey::generate().unwrap();
        let a = key.public().address();
        let b = key.public().address();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), 20);
    }

    #[test]
    fn test_pkcs8_round_trip() {
        let key = PrivateKey::generate().unwrap();
        let restored = PrivateKey::from_pkcs8(key.pkcs8().to_vec()).unwrap();
        assert_eq!(key.public(), restored.public());

        let sig = restored.sign(b"payload").unwrap();
        assert!(sig.verify(key.public(), b"payload"));
    }

    #[test]
    fn test_signature_fixed_bytes_round_trip() {
        let key = PrivateKey::generate().unwrap();
        let sig = key.sign(b"abc").unwrap();
        let restored = Signature::from_fixed_bytes(&sig.to_fixed_bytes()).unwrap();
        assert_eq!(sig, restored);

        assert!(Signature::from_fixed_bytes(&[0u8; 63]).is_err());
    }
}
