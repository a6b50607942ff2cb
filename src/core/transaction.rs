use crate::core::hasher::Hasher;
use crate::core::types::Hash;
use crate::error::{BlockchainError, Result};
use crate::wallet::{PrivateKey, PublicKey, Signature};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A signed unit of opaque data.
///
/// The payload is arbitrary bytes; this ledger records and orders it, it
/// does not interpret it. The hash is a function of the payload alone, so
/// the signer is not part of a transaction's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    data: Vec<u8>,
    from: Option<PublicKey>,
    signature: Option<Signature>,

    // Cached payload hash; local only, never on the wire.
    #[serde(skip)]
    hash: OnceLock<Hash>,
    // Local receipt timestamp in milliseconds, assigned once by the pool.
    // The sender's claimed time is never trusted, so this never travels.
    #[serde(skip)]
    first_seen: i64,
}

impl Transaction {
    /// A fresh transaction: hash and first-seen unset, unsigned.
    pub fn new(data: Vec<u8>) -> Transaction {
        Transaction {
            data,
            from: None,
            signature: None,
            hash: OnceLock::new(),
            first_seen: 0,
        }
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn from(&self) -> Option<&PublicKey> {
        self.from.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Sign the payload, recording the signer's public key.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<()> {
        let signature = key.sign(&self.data)?;
        self.from = Some(key.public().clone());
        self.signature = Some(signature);
        Ok(())
    }

    /// Check the signature over the payload.
    pub fn verify(&self) -> Result<()> {
        let signature = self.signature.as_ref().ok_or(BlockchainError::NoSignature)?;
        let from = self.from.as_ref().ok_or(BlockchainError::NoSignature)?;

        if !signature.verify(from, &self.data) {
            return Err(BlockchainError::InvalidSignature);
        }

        Ok(())
    }

    // Used by the wire decoder to restore a received transaction.
    pub(crate) fn set_from(&mut self, from: PublicKey) {
        self.from = Some(from);
    }

    pub(crate) fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    /// The payload hash; computed once and cached.
    pub fn hash<H: Hasher<Transaction>>(&self, hasher: &H) -> Hash {
        *self.hash.get_or_init(|| hasher.hash(self))
    }

    pub fn set_first_seen(&mut self, timestamp: i64) {
        self.first_seen = timestamp;
    }

    pub fn first_seen(&self) -> i64 {
        self.first_seen
    }
}
