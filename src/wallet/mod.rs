//! Signing identity
//!
//! Key generation, signing, verification, and address derivation. The
//! curve (ECDSA P-256 with SHA-256) is baked into the wire format.

pub mod keypair;

pub use keypair::{PrivateKey, PublicKey, Signature, PUBLIC_KEY_LEN, SIGNATURE_LEN};
