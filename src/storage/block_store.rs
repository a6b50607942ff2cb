use crate::core::hasher::BlockHasher;
use crate::core::types::Hash;
use crate::core::Block;
use crate::error::{BlockchainError, Result};
use crate::utils::serialize;
use sled::Tree;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

const BLOCKS_TREE: &str = "blocks";

/// Persistence contract for accepted blocks.
///
/// The ledger only ever writes: headers stay in memory, and full-block
/// retrieval is a concern of whoever owns the store.
pub trait BlockStore: Send + Sync {
    fn put(&self, block: &Block) -> Result<()>;
}

/// Keeps serialized blocks in a map; the default for tests and for nodes
/// that do not need durability.
pub struct MemoryBlockStore {
    inner: RwLock<HashMap<Hash, Vec<u8>>>,
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlockStore {
    pub fn new() -> MemoryBlockStore {
        MemoryBlockStore {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(blocks) => blocks.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on block store");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        match self.inner.read() {
            Ok(blocks) => blocks.contains_key(hash),
            Err(_) => {
                log::error!("Failed to acquire read lock on block store");
                false
            }
        }
    }
}

impl BlockStore for MemoryBlockStore {
    fn put(&self, block: &Block) -> Result<()> {
        let bytes = serialize(block)?;
        let hash = block.hash(&BlockHasher);
        match self.inner.write() {
            Ok(mut blocks) => {
                blocks.insert(hash, bytes);
                Ok(())
            }
            Err(_) => Err(BlockchainError::Database(
                "Failed to acquire write lock on block store".to_string(),
            )),
        }
    }
}

/// Durable block store backed by a sled tree, keyed by block hash.
pub struct SledBlockStore {
    tree: Tree,
}

impl SledBlockStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SledBlockStore> {
        let db = sled::open(path)
            .map_err(|e| BlockchainError::Database(format!("Failed to open database: {e}")))?;
        let tree = db
            .open_tree(BLOCKS_TREE)
            .map_err(|e| BlockchainError::Database(format!("Failed to open blocks tree: {e}")))?;
        Ok(SledBlockStore { tree })
    }
}

impl BlockStore for SledBlockStore {
    fn put(&self, block: &Block) -> Result<()> {
        let bytes = serialize(block)?;
        let hash = block.hash(&BlockHasher);
        self.tree
            .insert(hash.as_bytes(), bytes)
            .map_err(|e| BlockchainError::Database(format!("Failed to store block: {e}")))?;
        Ok(())
    }
}
