//! Peer-to-peer networking boundary
//!
//! Wire framing, inbound transaction/block handling, and the periodic
//! block-production loop. The core ledger knows nothing about any of this.

pub mod peers;
pub mod server;

pub use peers::Peers;
pub use server::{send_transaction, Package, Server};
