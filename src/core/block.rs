use crate::core::encoding::{compute_data_hash, encode_header};
use crate::core::hasher::{BlockHasher, Hasher};
use crate::core::transaction::Transaction;
use crate::core::types::Hash;
use crate::error::{BlockchainError, Result};
use crate::utils::current_timestamp;
use crate::wallet::{PrivateKey, PublicKey, Signature};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Header version written by this node.
pub const BLOCK_VERSION: u32 = 1;

/// Fixed-size block metadata: position in the chain, link to the parent,
/// and the commitment binding the transaction batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    pub prev_hash: Hash,
    pub timestamp: u64,
    pub height: u32,
    pub data_hash: Hash,
}

/// A header plus its committed transaction batch and producer signature.
///
/// The signature covers the canonical header bytes only; because the header
/// carries the batch commitment, it transitively binds the transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    header: Header,
    transactions: Vec<Transaction>,
    validator: Option<PublicKey>,
    signature: Option<Signature>,

    // Cached header hash; local only.
    #[serde(skip)]
    hash: OnceLock<Hash>,
}

impl Block {
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Block {
        Block {
            header,
            transactions,
            validator: None,
            signature: None,
            hash: OnceLock::new(),
        }
    }

    /// The deterministic genesis block every node derives independently:
    /// height 0, zero parent hash, timestamp 0, empty batch, unsigned.
    pub fn genesis() -> Block {
        let header = Header {
            version: BLOCK_VERSION,
            prev_hash: Hash::zero(),
            timestamp: 0,
            height: 0,
            // The empty batch encodes to zero bytes.
            data_hash: Hash::digest(&[]),
        };
        Block::new(header, Vec::new())
    }

    /// Build the next block on top of `prev`: links by hash, bumps the
    /// height, stamps the current time, and commits to the batch.
    pub fn from_previous(prev: &Header, transactions: Vec<Transaction>) -> Result<Block> {
        let data_hash = compute_data_hash(&transactions)?;
        let header = Header {
            version: BLOCK_VERSION,
            prev_hash: BlockHasher.hash(prev),
            timestamp: current_timestamp()? as u64,
            height: prev.height + 1,
            data_hash,
        };
        Ok(Block::new(header, transactions))
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn prev_hash(&self) -> Hash {
        self.header.prev_hash
    }

    pub fn validator(&self) -> Option<&PublicKey> {
        self.validator.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Sign the canonical header bytes, recording the producer's key.
    ///
    /// The stored commitment must already reflect the current batch; a
    /// stale commitment is refused rather than silently recomputed.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<()> {
        let expected = compute_data_hash(&self.transactions)?;
        if self.header.data_hash != expected {
            return Err(BlockchainError::ContentMismatch {
                expected: self.header.data_hash,
                got: expected,
            });
        }

        let signature = key.sign(&encode_header(&self.header))?;
        self.validator = Some(key.public().clone());
        self.signature = Some(signature);
        Ok(())
    }

    /// Structural verification: producer signature over the header, the
    /// batch commitment, then every contained transaction in order.
    pub fn verify(&self) -> Result<()> {
        let signature = self.signature.as_ref().ok_or(BlockchainError::NoSignature)?;
        let validator = self.validator.as_ref().ok_or(BlockchainError::NoSignature)?;

        if !signature.verify(validator, &encode_header(&self.header)) {
            return Err(BlockchainError::InvalidSignature);
        }

        let data_hash = compute_data_hash(&self.transactions)?;
        if data_hash != self.header.data_hash {
            return Err(BlockchainError::ContentMismatch {
                expected: self.header.data_hash,
                got: data_hash,
            });
        }

        for (index, tx) in self.transactions.iter().enumerate() {
            tx.verify()
                .map_err(|e| BlockchainError::InvalidTransaction {
                    index,
                    source: Box::new(e),
                })?;
        }

        Ok(())
    }

    /// The block hash: computed over the header only, once, then cached.
    pub fn hash<H: Hasher<Header>>(&self, hasher: &H) -> Hash {
        *self.hash.get_or_init(|| hasher.hash(&self.header))
    }
}
