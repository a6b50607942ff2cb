use crate::error::{BlockchainError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_NODE_ADDR: &str = "127.0.0.1:2001";

/// Default interval between produced blocks, in milliseconds.
pub const DEFAULT_BLOCK_TIME_MS: u64 = 5000;

/// Node configuration, passed explicitly at construction time.
///
/// There is no global config object: whoever builds a `Server` decides
/// these values, and nothing mutates them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Identifier used in logs; generated when not supplied.
    #[serde(default = "default_node_id")]
    pub node_id: String,
    /// Address the node listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Peer addresses to broadcast to.
    #[serde(default)]
    pub peers: Vec<String>,
    /// Interval between produced blocks when this node holds a signing key.
    #[serde(default = "default_block_time_ms")]
    pub block_time_ms: u64,
    /// Sled database path for the block store; in-memory when absent.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

fn default_node_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_listen_addr() -> String {
    DEFAULT_NODE_ADDR.to_string()
}

fn default_block_time_ms() -> u64 {
    DEFAULT_BLOCK_TIME_MS
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            node_id: default_node_id(),
            listen_addr: default_listen_addr(),
            peers: Vec::new(),
            block_time_ms: default_block_time_ms(),
            db_path: None,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by `NODE_ID`, `NODE_ADDRESS`, and
    /// `BLOCK_TIME_MS` environment variables.
    pub fn from_env() -> Result<NodeConfig> {
        let mut config = NodeConfig::default();

        if let Ok(node_id) = env::var("NODE_ID") {
            config.node_id = node_id;
        }
        if let Ok(addr) = env::var("NODE_ADDRESS") {
            config.listen_addr = addr;
        }
        if let Ok(block_time) = env::var("BLOCK_TIME_MS") {
            config.block_time_ms = block_time.parse().map_err(|e| {
                BlockchainError::Config(format!("Invalid BLOCK_TIME_MS value: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file; missing fields take defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<NodeConfig> {
        let contents = fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<NodeConfig> {
        let config: NodeConfig = toml::from_str(contents)
            .map_err(|e| BlockchainError::Config(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.block_time_ms == 0 {
            return Err(BlockchainError::Config(
                "block_time_ms must be positive".to_string(),
            ));
        }
        if self.listen_addr.is_empty() {
            return Err(BlockchainError::Config(
                "listen_addr must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
