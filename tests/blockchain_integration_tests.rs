//! Ledger integration tests
//!
//! End-to-end coverage of the chain-growth state machine: growth to depth,
//! rejection paths, content binding, and the mempool-to-block pipeline.

use sigchain::core::{
    compute_data_hash, encode_header, Block, BlockHasher, Blockchain, Hash, Hasher, Header,
    Transaction, TxHasher, BLOCK_VERSION,
};
use sigchain::error::BlockchainError;
use sigchain::storage::{BlockStore, MemoryBlockStore, MemoryPool, SledBlockStore};
use sigchain::wallet::PrivateKey;
use std::sync::Arc;

fn test_chain() -> (Blockchain, Arc<MemoryBlockStore>) {
    let store = Arc::new(MemoryBlockStore::new());
    let chain =
        Blockchain::new(Arc::clone(&store) as Arc<dyn BlockStore>, Block::genesis()).unwrap();
    (chain, store)
}

fn signed_tx(key: &PrivateKey, data: &[u8]) -> Transaction {
    let mut tx = Transaction::new(data.to_vec());
    tx.sign(key).unwrap();
    tx
}

fn next_block(chain: &Blockchain, key: &PrivateKey, txs: Vec<Transaction>) -> Block {
    let tip = chain.tip_header();
    let mut block = Block::from_previous(&tip, txs).unwrap();
    block.sign(key).unwrap();
    block
}

#[test]
fn test_chain_growth_to_height_100() {
    let (chain, store) = test_chain();
    let key = PrivateKey::generate().unwrap();

    for i in 0..100u32 {
        let tx = signed_tx(&key, format!("payload {i}").as_bytes());
        let block = next_block(&chain, &key, vec![tx]);
        chain.add_block(&block).unwrap();
    }

    assert_eq!(chain.height(), 100);
    assert!(chain.get_header(100).is_ok());
    assert!(matches!(
        chain.get_header(101),
        Err(BlockchainError::HeightOutOfRange {
            height: 101,
            best: 100
        })
    ));
    // Genesis plus one block per iteration.
    assert_eq!(store.len(), 101);
}

#[test]
fn test_duplicate_height_leaves_chain_unchanged() {
    let (chain, _store) = test_chain();
    let key = PrivateKey::generate().unwrap();

    let block = next_block(&chain, &key, vec![signed_tx(&key, b"once")]);
    chain.add_block(&block).unwrap();
    assert_eq!(chain.height(), 1);

    // Same block again: occupied height.
    match chain.add_block(&block) {
        Err(BlockchainError::DuplicateHeight { height }) => assert_eq!(height, 1),
        other => panic!("expected DuplicateHeight, got {other:?}"),
    }

    // A different block at the same height fails the same way.
    let rival = {
        let genesis = chain.get_header(0).unwrap();
        let mut b = Block::from_previous(&genesis, vec![signed_tx(&key, b"rival")]).unwrap();
        b.sign(&key).unwrap();
        b
    };
    assert!(matches!(
        chain.add_block(&rival),
        Err(BlockchainError::DuplicateHeight { height: 1 })
    ));
    assert_eq!(chain.height(), 1);
}

#[test]
fn test_linkage_rejection() {
    let (chain, store) = test_chain();
    let key = PrivateKey::generate().unwrap();

    // Correct next height, wrong parent hash.
    let header = Header {
        version: BLOCK_VERSION,
        prev_hash: Hash::digest(b"someone else's parent"),
        timestamp: 1,
        height: 1,
        data_hash: compute_data_hash(&[]).unwrap(),
    };
    let mut block = Block::new(header, Vec::new());
    block.sign(&key).unwrap();

    assert!(matches!(
        chain.add_block(&block),
        Err(BlockchainError::PrevHashMismatch { .. })
    ));
    assert_eq!(chain.height(), 0);
    assert!(!store.contains(&block.hash(&BlockHasher)));
}

#[test]
fn test_height_gap_rejection() {
    let (chain, _store) = test_chain();
    let key = PrivateKey::generate().unwrap();

    let tip_hash = BlockHasher.hash(&chain.tip_header());
    let header = Header {
        version: BLOCK_VERSION,
        prev_hash: tip_hash,
        timestamp: 1,
        height: 5,
        data_hash: compute_data_hash(&[]).unwrap(),
    };
    let mut block = Block::new(header, Vec::new());
    block.sign(&key).unwrap();

    assert!(matches!(
        chain.add_block(&block),
        Err(BlockchainError::HeightMismatch {
            expected: 1,
            got: 5
        })
    ));
    assert_eq!(chain.height(), 0);
}

#[test]
fn test_content_binding_rejects_batch_tampered_in_transit() {
    let (chain, _store) = test_chain();
    let key = PrivateKey::generate().unwrap();

    // A correctly signed block with an empty batch...
    let block = next_block(&chain, &key, Vec::new());

    // ...tampered on the wire: a transaction is spliced into the batch
    // while the header (and its valid signature) stay untouched.
    let mut value = serde_json::to_value(&block).unwrap();
    let injected = serde_json::to_value(signed_tx(&key, b"injected")).unwrap();
    value["transactions"] = serde_json::Value::Array(vec![injected]);
    let tampered: Block = serde_json::from_value(value).unwrap();

    // The producer signature still verifies over the header alone.
    assert!(tampered
        .signature()
        .unwrap()
        .verify(tampered.validator().unwrap(), &encode_header(tampered.header())));

    // But the chain refuses it: the commitment no longer matches.
    assert!(matches!(
        chain.add_block(&tampered),
        Err(BlockchainError::ContentMismatch { .. })
    ));
    assert_eq!(chain.height(), 0);
}

#[test]
fn test_unsigned_block_rejected() {
    let (chain, _store) = test_chain();

    let tip = chain.tip_header();
    let block = Block::from_previous(&tip, Vec::new()).unwrap();

    assert!(matches!(
        chain.add_block(&block),
        Err(BlockchainError::NoSignature)
    ));
    assert_eq!(chain.height(), 0);
}

#[test]
fn test_block_with_invalid_transaction_rejected() {
    let (chain, _store) = test_chain();
    let key = PrivateKey::generate().unwrap();

    let tip = chain.tip_header();
    let unsigned = Transaction::new(b"never signed".to_vec());
    let mut block = Block::from_previous(&tip, vec![signed_tx(&key, b"fine"), unsigned]).unwrap();
    block.sign(&key).unwrap();

    match chain.add_block(&block) {
        Err(BlockchainError::InvalidTransaction { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(*source, BlockchainError::NoSignature));
        }
        other => panic!("expected InvalidTransaction, got {other:?}"),
    }
    assert_eq!(chain.height(), 0);
}

#[test]
fn test_mempool_to_block_pipeline() {
    let (chain, _store) = test_chain();
    let producer = PrivateKey::generate().unwrap();
    let pool = MemoryPool::new();

    // Three clients, one duplicate rebroadcast.
    for (i, payload) in [&b"alpha"[..], b"beta", b"gamma"].iter().enumerate() {
        let client = PrivateKey::generate().unwrap();
        let mut tx = Transaction::new(payload.to_vec());
        tx.sign(&client).unwrap();
        tx.set_first_seen((i as i64 + 1) * 1000);
        pool.add(tx.clone()).unwrap();
        pool.add(tx).unwrap();
    }
    assert_eq!(pool.len(), 3);

    // Drain in first-seen order into a block.
    let pending = pool.transactions();
    let payloads: Vec<&[u8]> = pending.iter().map(|tx| tx.data()).collect();
    assert_eq!(payloads, vec![&b"alpha"[..], b"beta", b"gamma"]);

    let block = next_block(&chain, &producer, pending);
    chain.add_block(&block).unwrap();
    pool.flush();

    assert_eq!(chain.height(), 1);
    assert!(pool.is_empty());
    assert_eq!(block.transactions().len(), 3);

    // Embedded transactions keep their payload-only identity.
    assert_eq!(
        block.transactions()[0].hash(&TxHasher),
        Hash::digest(b"alpha")
    );
}

#[test]
fn test_genesis_is_identical_across_nodes() {
    let (chain_a, _a) = test_chain();
    let (chain_b, _b) = test_chain();

    let tip_a = chain_a.tip_header();
    let tip_b = chain_b.tip_header();
    assert_eq!(tip_a, tip_b);
    assert_eq!(BlockHasher.hash(&tip_a), BlockHasher.hash(&tip_b));

    // A block produced against one node's tip is accepted by the other.
    let key = PrivateKey::generate().unwrap();
    let block = next_block(&chain_a, &key, vec![signed_tx(&key, b"portable")]);
    chain_a.add_block(&block).unwrap();
    chain_b.add_block(&block).unwrap();
    assert_eq!(chain_b.height(), 1);
}

#[test]
fn test_chain_over_durable_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SledBlockStore::open(dir.path().join("blocks")).unwrap());
    let chain = Blockchain::new(store as Arc<dyn BlockStore>, Block::genesis()).unwrap();
    let key = PrivateKey::generate().unwrap();

    for i in 0..10u32 {
        let block = next_block(&chain, &key, vec![signed_tx(&key, &i.to_le_bytes())]);
        chain.add_block(&block).unwrap();
    }

    assert_eq!(chain.height(), 10);
}
