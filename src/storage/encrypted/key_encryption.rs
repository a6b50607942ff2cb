use crate::error::{BlockchainError, Result};
use crate::storage::encrypted::cipher::{
    generate_random_bytes, Aes256GcmCipher, SecureKey, KEY_LEN,
};
use crate::utils::{current_timestamp, deserialize, serialize};
use crate::wallet::PrivateKey;
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const SALT_LEN: usize = 32;
const MIN_PASSPHRASE_LEN: usize = 8;

/// On-disk container for a node's block-signing key.
///
/// The PKCS#8 document is sealed with AES-256-GCM under a key derived from
/// the operator's passphrase via Argon2; the salt and nonce travel with the
/// ciphertext. The chain itself is public and is stored in the clear — the
/// signing key is the only long-lived secret a node holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedKeystore {
    ciphertext: Vec<u8>,
    nonce: Vec<u8>,
    salt: Vec<u8>,
    created_at: i64,
}

impl EncryptedKeystore {
    /// Seal a signing key under `passphrase`.
    pub fn seal(key: &PrivateKey, passphrase: &str) -> Result<EncryptedKeystore> {
        validate_passphrase(passphrase)?;

        let salt = generate_random_bytes(SALT_LEN);
        let derived = derive_key(passphrase, &salt)?;
        let cipher = Aes256GcmCipher::new(derived)?;
        let sealed = cipher.encrypt(key.pkcs8())?;

        Ok(EncryptedKeystore {
            ciphertext: sealed.ciphertext,
            nonce: sealed.nonce,
            salt,
            created_at: current_timestamp()?,
        })
    }

    /// Recover the signing key; fails if the passphrase is wrong.
    pub fn open(&self, passphrase: &str) -> Result<PrivateKey> {
        let derived = derive_key(passphrase, &self.salt)?;
        let cipher = Aes256GcmCipher::new(derived)?;
        let pkcs8 = cipher.decrypt(&self.ciphertext, &self.nonce)?;
        PrivateKey::from_pkcs8(pkcs8)
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Write the sealed container to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a sealed container from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<EncryptedKeystore> {
        let bytes = fs::read(path)?;
        deserialize(&bytes)
    }
}

fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.len() < MIN_PASSPHRASE_LEN {
        return Err(BlockchainError::Encryption(format!(
            "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters long"
        )));
    }
    Ok(())
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<SecureKey> {
    let mut out = vec![0u8; KEY_LEN];
    Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, &mut out)
        .map_err(|e| BlockchainError::Encryption(format!("Key derivation failed: {e}")))?;
    Ok(SecureKey::new(out))
}
