//! Encrypted storage for the node's signing key
//!
//! Chain data is public and needs no protection; the validator's private
//! key does. The keystore seals the PKCS#8 document with a passphrase.

pub mod cipher;
pub mod key_encryption;

pub use cipher::{Aes256GcmCipher, EncryptionResult, SecureKey};
pub use key_encryption::EncryptedKeystore;
