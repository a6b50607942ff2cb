//! Test utilities for ledger testing

use crate::core::{Block, Blockchain, Hash, Transaction};
use crate::storage::{BlockStore, MemoryBlockStore};
use crate::wallet::PrivateKey;
use rand::RngCore;
use std::sync::Arc;

/// Random bytes of the given length.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// A random 32-byte hash value (not a digest of anything).
pub fn random_hash() -> Hash {
    Hash::from_bytes(&random_bytes(32)).expect("random_bytes(32) is 32 bytes")
}

/// A transaction over `data`, signed with `key`.
pub fn signed_tx(key: &PrivateKey, data: &[u8]) -> Transaction {
    let mut tx = Transaction::new(data.to_vec());
    tx.sign(key).expect("signing test transaction");
    tx
}

/// A fresh single-node chain over an in-memory store, seeded with the
/// deterministic genesis block.
pub fn test_blockchain() -> (Blockchain, Arc<MemoryBlockStore>) {
    let store = Arc::new(MemoryBlockStore::new());
    let chain = Blockchain::new(Arc::clone(&store) as Arc<dyn BlockStore>, Block::genesis())
        .expect("creating test blockchain");
    (chain, store)
}

/// A correctly linked, signed block extending the current tip.
pub fn next_signed_block(chain: &Blockchain, key: &PrivateKey, txs: Vec<Transaction>) -> Block {
    let tip = chain.tip_header();
    let mut block = Block::from_previous(&tip, txs).expect("building next block");
    block.sign(key).expect("signing test block");
    block
}
