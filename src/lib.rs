//! # sigchain - an append-only signed-block ledger
//!
//! A sequence of blocks, each referencing its predecessor by hash, each
//! signed by the node that produced it, each carrying a batch of
//! individually signed transactions. There is no proof-of-work and no
//! multi-party consensus: the validator enforces local structural rules
//! (height continuity, parent linkage, signatures, content commitment)
//! and nothing more.
//!
//! ## Layout
//! - `core/`: blocks, transactions, canonical encodings, hashing, the
//!   validation policy, and the chain state machine
//! - `wallet/`: ECDSA P-256 identities (keys, signatures, addresses)
//! - `storage/`: the mempool, block stores, and the encrypted keystore
//! - `network/`: TCP boundary - wire frames, ingestion, block production
//! - `config/`: explicit node configuration (no globals)
//! - `cli/`: command-line surface for the node binary
//!
//! ## How a transaction becomes ledger state
//! A client signs a payload and submits it; the receiving node verifies
//! the signature, stamps a local first-seen time, and pools it. On each
//! tick a producing node drains the pool into a block, commits to the
//! batch in the header, signs the header, and appends through the
//! validator. Accepted headers are permanent; full blocks go to the
//! block store.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod storage;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{NodeConfig, DEFAULT_BLOCK_TIME_MS};
pub use core::{
    Address, Block, BlockHasher, BlockValidator, Blockchain, Hash, Hasher, Header, HeaderView,
    Transaction, TxHasher, Validator,
};
pub use error::{BlockchainError, Result};
pub use network::{send_transaction, Package, Peers, Server};
pub use storage::{BlockStore, EncryptedKeystore, MemoryBlockStore, MemoryPool, SledBlockStore};
pub use wallet::{PrivateKey, PublicKey, Signature};
