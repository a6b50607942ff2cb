//! Core ledger functionality
//!
//! Blocks, transactions, canonical encodings, hashing, validation policy,
//! and the append-only chain itself.

pub mod block;
pub mod blockchain;
pub mod encoding;
pub mod hasher;
pub mod transaction;
pub mod types;
pub mod validator;

pub use block::{Block, Header, BLOCK_VERSION};
pub use blockchain::Blockchain;
pub use encoding::{
    compute_data_hash, decode_header, decode_transaction, encode_header, encode_transaction,
    BinaryTxDecoder, BinaryTxEncoder, Decoder, Encoder, HEADER_WIRE_LEN,
};
pub use hasher::{BlockHasher, Hasher, TxHasher};
pub use transaction::Transaction;
pub use types::{Address, Hash};
pub use validator::{BlockValidator, HeaderView, Validator};
