use crate::error::{BlockchainError, Result};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

/// AES-256-GCM key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes (96-bit).
pub const NONCE_LEN: usize = 12;

/// Result of an encryption operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionResult {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
}

/// Symmetric key wrapper that zeros its memory on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecureKey {
    key: Vec<u8>,
}

impl SecureKey {
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl std::fmt::Debug for SecureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureKey")
            .field("length", &self.key.len())
            .finish()
    }
}

/// AES-256-GCM cipher for protecting key material at rest.
pub struct Aes256GcmCipher {
    cipher: Aes256Gcm,
}

impl Aes256GcmCipher {
    pub fn new(key: SecureKey) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(BlockchainError::Encryption(
                "AES-256-GCM requires a 32-byte key".to_string(),
            ));
        }

        let aes_key = Key::<Aes256Gcm>::from_slice(key.as_bytes());
        let cipher = Aes256Gcm::new(aes_key);

        Ok(Self { cipher })
    }

    /// Encrypt `plaintext` under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptionResult> {
        let nonce_bytes = generate_random_bytes(NONCE_LEN);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self.cipher.encrypt(nonce, plaintext).map_err(|e| {
            BlockchainError::Encryption(format!("AES-256-GCM encryption failed: {e}"))
        })?;

        Ok(EncryptionResult {
            ciphertext,
            nonce: nonce_bytes,
        })
    }

    /// Decrypt with the stored nonce; a wrong key fails authentication.
    pub fn decrypt(&self, ciphertext: &[u8], nonce_bytes: &[u8]) -> Result<Vec<u8>> {
        if nonce_bytes.len() != NONCE_LEN {
            return Err(BlockchainError::Encryption(
                "AES-256-GCM requires a 12-byte nonce".to_string(),
            ));
        }

        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = self.cipher.decrypt(nonce, ciphertext).map_err(|e| {
            BlockchainError::Encryption(format!("AES-256-GCM decryption failed: {e}"))
        })?;

        Ok(plaintext)
    }
}

/// Cryptographically secure random bytes (salts, nonces).
pub fn generate_random_bytes(length: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}
