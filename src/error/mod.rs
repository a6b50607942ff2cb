//! Error handling for the ledger
//!
//! Every failure mode of the core is a typed variant here; validation
//! failures are local and non-fatal (a rejected block simply is not
//! appended), so callers match on the kind instead of parsing strings.

use crate::core::types::Hash;
use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Error kinds for all ledger operations
#[derive(Debug, Clone)]
pub enum BlockchainError {
    /// A transaction or block carries no signature at all
    NoSignature,
    /// A signature is present but does not verify against the stored key
    InvalidSignature,
    /// The header's content commitment does not match the transaction batch
    ContentMismatch { expected: Hash, got: Hash },
    /// A transaction inside a block failed verification
    InvalidTransaction {
        index: usize,
        source: Box<BlockchainError>,
    },
    /// The chain already holds a header at this height
    DuplicateHeight { height: u32 },
    /// A candidate block does not extend the current tip
    HeightMismatch { expected: u32, got: u32 },
    /// The parent header a candidate links to is absent
    MissingParent { height: u32 },
    /// The candidate's previous-hash does not match the parent header's hash
    PrevHashMismatch { expected: Hash, got: Hash },
    /// A header was requested past the current tip
    HeightOutOfRange { height: u32, best: u32 },
    /// Key generation or signing failed (RNG or key material)
    Signing(String),
    /// A fixed-size value was constructed from a slice of the wrong length
    InvalidLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// Block-store errors
    Database(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Network communication errors
    Network(String),
    /// Configuration errors
    Config(String),
    /// Keystore encryption/decryption errors
    Encryption(String),
    /// Miscellaneous cryptographic failures (e.g. system clock)
    Crypto(String),
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::NoSignature => write!(f, "missing signature"),
            BlockchainError::InvalidSignature => write!(f, "invalid signature"),
            BlockchainError::ContentMismatch { expected, got } => {
                write!(
                    f,
                    "data hash mismatch: header commits to {expected}, batch hashes to {got}"
                )
            }
            BlockchainError::InvalidTransaction { index, source } => {
                write!(f, "invalid transaction at index {index}: {source}")
            }
            BlockchainError::DuplicateHeight { height } => {
                write!(f, "chain already contains a block at height {height}")
            }
            BlockchainError::HeightMismatch { expected, got } => {
                write!(
                    f,
                    "block height {got} does not extend chain tip (expected {expected})"
                )
            }
            BlockchainError::MissingParent { height } => {
                write!(f, "no parent header at height {height}")
            }
            BlockchainError::PrevHashMismatch { expected, got } => {
                write!(
                    f,
                    "previous hash {got} does not match parent hash {expected}"
                )
            }
            BlockchainError::HeightOutOfRange { height, best } => {
                write!(f, "height {height} out of range (best height {best})")
            }
            BlockchainError::Signing(msg) => write!(f, "signing error: {msg}"),
            BlockchainError::InvalidLength {
                what,
                expected,
                got,
            } => {
                write!(f, "{what} must be {expected} bytes, got {got}")
            }
            BlockchainError::Database(msg) => write!(f, "database error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::Network(msg) => write!(f, "network error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "configuration error: {msg}"),
            BlockchainError::Encryption(msg) => write!(f, "encryption error: {msg}"),
            BlockchainError::Crypto(msg) => write!(f, "cryptographic error: {msg}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<sled::Error> for BlockchainError {
    fn from(err: sled::Error) -> Self {
        BlockchainError::Database(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}
