use crate::core::hasher::TxHasher;
use crate::core::transaction::Transaction;
use crate::core::types::Hash;
use crate::error::Result;
use crate::utils::current_timestamp;
use std::collections::HashMap;
use std::sync::RwLock;

/// Holding area for transactions not yet embedded in an accepted block.
///
/// Keyed by transaction hash, so a payload is held at most once no matter
/// how many peers rebroadcast it. All access is serialized by one lock;
/// `add` is idempotent under that lock, not by racing callers.
pub struct MemoryPool {
    inner: RwLock<HashMap<Hash, Transaction>>,
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPool {
    pub fn new() -> MemoryPool {
        MemoryPool {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a transaction, stamping its first-seen time from the local
    /// clock. Duplicates are expected under gossip and are a no-op success,
    /// never an error. Signature checks happen upstream, before insertion.
    pub fn add(&self, mut tx: Transaction) -> Result<()> {
        let hash = tx.hash(&TxHasher);
        let now = current_timestamp()?;

        match self.inner.write() {
            Ok(mut pool) => {
                if pool.contains_key(&hash) {
                    return Ok(());
                }
                // First-seen is assigned at most once; a locally pre-stamped
                // transaction keeps its timestamp.
                if tx.first_seen() == 0 {
                    tx.set_first_seen(now);
                }
                pool.insert(hash, tx);
                Ok(())
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on memory pool");
                Ok(())
            }
        }
    }

    pub fn has(&self, hash: &Hash) -> bool {
        match self.inner.read() {
            Ok(pool) => pool.contains_key(hash),
            Err(_) => {
                log::error!("Failed to acquire read lock on memory pool");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(pool) => pool.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on memory pool");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically drop every pending transaction; called after a produced
    /// block has consumed the pool's contents.
    pub fn flush(&self) {
        match self.inner.write() {
            Ok(mut pool) => {
                pool.clear();
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on memory pool");
            }
        }
    }

    /// Snapshot of pending transactions, oldest first. Equal timestamps
    /// fall back to hash order so block assembly is reproducible.
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut txs: Vec<Transaction> = match self.inner.read() {
            Ok(pool) => pool.values().cloned().collect(),
            Err(_) => {
                log::error!("Failed to acquire read lock on memory pool");
                return Vec::new();
            }
        };

        txs.sort_by(|a, b| {
            a.first_seen()
                .cmp(&b.first_seen())
                .then_with(|| a.hash(&TxHasher).cmp(&b.hash(&TxHasher)))
        });
        txs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn tx_with_first_seen(data: &[u8], first_seen: i64) -> Transaction {
        let mut tx = Transaction::new(data.to_vec());
        tx.set_first_seen(first_seen);
        tx
    }

    #[test]
    fn test_add_and_len() {
        let pool = MemoryPool::new();
        assert!(pool.is_empty());

        let tx = Transaction::new(b"payload".to_vec());
        let hash = tx.hash(&TxHasher);
        pool.add(tx).unwrap();

        assert_eq!(pool.len(), 1);
        assert!(pool.has(&hash));
    }

    #[test]
    fn test_add_is_idempotent() {
        let pool = MemoryPool::new();

        pool.add(Transaction::new(b"same".to_vec())).unwrap();
        pool.add(Transaction::new(b"same".to_vec())).unwrap();

        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_add_stamps_first_seen() {
        let pool = MemoryPool::new();
        pool.add(Transaction::new(b"fresh".to_vec())).unwrap();

        let txs = pool.transactions();
        assert_eq!(txs.len(), 1);
        assert!(txs[0].first_seen() > 0);
    }

    #[test]
    fn test_transactions_ordered_by_first_seen() {
        let pool = MemoryPool::new();

        // Insert out of arrival-time order on purpose.
        pool.add(tx_with_first_seen(b"third", 300)).unwrap();
        pool.add(tx_with_first_seen(b"first", 100)).unwrap();
        pool.add(tx_with_first_seen(b"second", 200)).unwrap();

        let txs = pool.transactions();
        let order: Vec<&[u8]> = txs.iter().map(|tx| tx.data()).collect();
        assert_eq!(order, vec![&b"first"[..], b"second", b"third"]);
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_hash() {
        let pool = MemoryPool::new();
        pool.add(tx_with_first_seen(b"a", 50)).unwrap();
        pool.add(tx_with_first_seen(b"b", 50)).unwrap();
        pool.add(tx_with_first_seen(b"c", 50)).unwrap();

        let first = pool.transactions();
        let second = pool.transactions();

        let hashes: Vec<Hash> = first.iter().map(|tx| tx.hash(&TxHasher)).collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        assert_eq!(hashes, sorted);

        // Snapshot order is a stable total order.
        let again: Vec<Hash> = second.iter().map(|tx| tx.hash(&TxHasher)).collect();
        assert_eq!(hashes, again);
    }

    #[test]
    fn test_flush_clears_pool() {
        let pool = MemoryPool::new();
        pool.add(Transaction::new(b"a".to_vec())).unwrap();
        pool.add(Transaction::new(b"b".to_vec())).unwrap();
        assert_eq!(pool.len(), 2);

        pool.flush();
        assert!(pool.is_empty());
        assert!(pool.transactions().is_empty());
    }

    #[test]
    fn test_concurrent_duplicate_adds() {
        let pool = Arc::new(MemoryPool::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..100 {
                        pool.add(Transaction::new(b"contended".to_vec())).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(pool.len(), 1);
    }
}
