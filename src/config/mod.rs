//! Configuration management
//!
//! Explicit node configuration: constructed by the caller (defaults, env,
//! or a TOML file) and handed to the server. No hidden globals.

pub mod settings;

pub use settings::{NodeConfig, DEFAULT_BLOCK_TIME_MS};
