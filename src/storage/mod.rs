//! Data storage and persistence
//!
//! The pending-transaction pool, the accepted-block stores, and the
//! encrypted keystore for the node's signing key.

pub mod block_store;
pub mod encrypted;
pub mod memory_pool;

pub use block_store::{BlockStore, MemoryBlockStore, SledBlockStore};
pub use encrypted::{EncryptedKeystore, SecureKey};
pub use memory_pool::MemoryPool;
