use crate::core::block::Header;
use crate::core::encoding::encode_header;
use crate::core::transaction::Transaction;
use crate::core::types::Hash;

/// Capability to hash values of a concrete entity type.
pub trait Hasher<T> {
    fn hash(&self, value: &T) -> Hash;
}

/// Hashes a block by its canonical header bytes.
pub struct BlockHasher;

impl Hasher<Header> for BlockHasher {
    fn hash(&self, header: &Header) -> Hash {
        Hash::digest(&encode_header(header))
    }
}

/// Hashes a transaction by its payload alone; signer and signature do not
/// contribute to a transaction's identity.
pub struct TxHasher;

impl Hasher<Transaction> for TxHasher {
    fn hash(&self, tx: &Transaction) -> Hash {
        Hash::digest(tx.data())
    }
}
