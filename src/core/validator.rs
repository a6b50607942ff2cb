use crate::core::block::{Block, Header};
use crate::core::hasher::{BlockHasher, Hasher};
use crate::error::{BlockchainError, Result};

/// Read-only view of accepted chain state, as seen under the ledger lock.
///
/// Validators receive this instead of the ledger itself so the whole
/// validate-then-append sequence runs under one lock acquisition.
pub trait HeaderView {
    /// Height of the current tip.
    fn height(&self) -> u32;
    /// Whether a header exists at `height`.
    fn has_block(&self, height: u32) -> bool;
    /// The header at `height`, if present.
    fn header(&self, height: u32) -> Option<&Header>;
}

/// Policy deciding whether a candidate block may extend the ledger.
pub trait Validator: Send + Sync {
    fn validate_block(&self, chain: &dyn HeaderView, block: &Block) -> Result<()>;
}

/// The default structural validator. Stateless; checks run in a fixed
/// order and the first failure wins.
pub struct BlockValidator;

impl Validator for BlockValidator {
    fn validate_block(&self, chain: &dyn HeaderView, block: &Block) -> Result<()> {
        if chain.has_block(block.height()) {
            return Err(BlockchainError::DuplicateHeight {
                height: block.height(),
            });
        }

        let expected = chain.height() + 1;
        if block.height() != expected {
            return Err(BlockchainError::HeightMismatch {
                expected,
                got: block.height(),
            });
        }

        let parent_height = block.height() - 1;
        let parent = chain
            .header(parent_height)
            .ok_or(BlockchainError::MissingParent {
                height: parent_height,
            })?;

        let parent_hash = BlockHasher.hash(parent);
        if parent_hash != block.prev_hash() {
            return Err(BlockchainError::PrevHashMismatch {
                expected: parent_hash,
                got: block.prev_hash(),
            });
        }

        block.verify()
    }
}
