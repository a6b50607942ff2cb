//! Command-line interface
//!
//! Argument parsing for the node binary: key generation, running a node,
//! and submitting transactions.

pub mod commands;

pub use commands::{Command, Opt};
