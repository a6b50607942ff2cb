// The ledger is a state machine: its state is the current height, its only
// transition is appending a validated block. Headers live in memory; full
// blocks go to the pluggable store on acceptance.

use crate::core::block::{Block, Header};
use crate::core::hasher::BlockHasher;
use crate::core::validator::{BlockValidator, HeaderView, Validator};
use crate::error::{BlockchainError, Result};
use crate::storage::BlockStore;
use log::info;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Accepted headers, ordered by height. Only ever touched under the
/// ledger's reader/writer lock.
struct ChainState {
    headers: Vec<Header>,
}

impl HeaderView for ChainState {
    fn height(&self) -> u32 {
        // The genesis header is always present.
        self.headers.len() as u32 - 1
    }

    fn has_block(&self, height: u32) -> bool {
        height <= self.height()
    }

    fn header(&self, height: u32) -> Option<&Header> {
        self.headers.get(height as usize)
    }
}

/// The append-only ledger: an ordered header list plus height index, a
/// pluggable validation policy, and a block store for accepted blocks.
///
/// Cloning shares the underlying state; reads run concurrently, writes
/// are exclusive.
#[derive(Clone)]
pub struct Blockchain {
    state: Arc<RwLock<ChainState>>,
    store: Arc<dyn BlockStore>,
    validator: Arc<RwLock<Box<dyn Validator>>>,
}

impl Blockchain {
    /// Create a ledger seeded with `genesis`, which is trusted by
    /// construction and appended without validation.
    pub fn new(store: Arc<dyn BlockStore>, genesis: Block) -> Result<Blockchain> {
        let chain = Blockchain {
            state: Arc::new(RwLock::new(ChainState {
                headers: Vec::new(),
            })),
            store,
            validator: Arc::new(RwLock::new(Box::new(BlockValidator))),
        };

        {
            let mut state = chain
                .state
                .write()
                .expect("Failed to acquire write lock on chain state - this should never happen");
            chain.append_without_validation(&mut state, &genesis)?;
        }

        info!(
            "initialized chain, genesis hash {}",
            genesis.hash(&BlockHasher)
        );
        Ok(chain)
    }

    /// Replace the validation policy.
    pub fn set_validator(&self, validator: Box<dyn Validator>) {
        let mut current = self
            .validator
            .write()
            .expect("Failed to acquire write lock on validator - this should never happen");
        *current = validator;
    }

    /// Validate a candidate and, on success, persist it and append its
    /// header. On any failure the ledger is left untouched.
    pub fn add_block(&self, block: &Block) -> Result<()> {
        let mut state = self
            .state
            .write()
            .expect("Failed to acquire write lock on chain state - this should never happen");

        {
            let validator = self
                .validator
                .read()
                .expect("Failed to acquire read lock on validator - this should never happen");
            validator.validate_block(&*state, block)?;
        }

        // Persist first: a store failure must not leave a header appended
        // without its block.
        self.append_without_validation(&mut state, block)?;

        info!(
            "appended block {} at height {} ({} transaction(s))",
            block.hash(&BlockHasher),
            block.height(),
            block.transactions().len()
        );
        Ok(())
    }

    /// Current tip height.
    pub fn height(&self) -> u32 {
        self.read_state().height()
    }

    /// Whether the chain holds a header at `height`.
    pub fn has_block(&self, height: u32) -> bool {
        self.read_state().has_block(height)
    }

    /// The header at `height`.
    pub fn get_header(&self, height: u32) -> Result<Header> {
        let state = self.read_state();
        state
            .header(height)
            .cloned()
            .ok_or(BlockchainError::HeightOutOfRange {
                height,
                best: state.height(),
            })
    }

    /// The header at the current tip.
    pub fn tip_header(&self) -> Header {
        let state = self.read_state();
        state
            .header(state.height())
            .cloned()
            .expect("Chain always holds at least the genesis header")
    }

    fn append_without_validation(
        &self,
        state: &mut RwLockWriteGuard<'_, ChainState>,
        block: &Block,
    ) -> Result<()> {
        self.store.put(block)?;
        state.headers.push(block.header().clone());
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ChainState> {
        self.state
            .read()
            .expect("Failed to acquire read lock on chain state - this should never happen")
    }
}
