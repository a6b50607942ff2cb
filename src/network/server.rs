use crate::config::NodeConfig;
use crate::core::encoding::{decode_transaction, encode_transaction};
use crate::core::hasher::{BlockHasher, TxHasher};
use crate::core::{Block, Blockchain, Transaction};
use crate::error::{BlockchainError, Result};
use crate::network::peers::Peers;
use crate::storage::MemoryPool;
use crate::utils::{deserialize, serialize};
use crate::wallet::PrivateKey;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Deserializer;
use std::io::BufReader;
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const NODE_VERSION: u32 = 1;
const TCP_WRITE_TIMEOUT_MS: u64 = 5000;

/// P2P message frames, streamed as JSON values over TCP.
#[derive(Debug, Serialize, Deserialize)]
pub enum Package {
    /// A canonical-encoded transaction.
    Tx {
        addr_from: String,
        transaction: Vec<u8>,
    },
    /// A serialized block.
    Block { addr_from: String, block: Vec<u8> },
    /// Handshake: advertise protocol version and chain height.
    Version {
        addr_from: String,
        version: u32,
        best_height: u32,
    },
}

/// Shared state a connection handler or the production loop works against.
#[derive(Clone)]
struct NodeHandle {
    blockchain: Blockchain,
    mem_pool: Arc<MemoryPool>,
    peers: Arc<Peers>,
    listen_addr: String,
}

/// The node's network front end.
///
/// Owns the ledger, the mempool, and (for producing nodes) the signing
/// key. Everything it needs arrives through `NodeConfig` at construction.
pub struct Server {
    config: NodeConfig,
    handle: NodeHandle,
    validator_key: Option<PrivateKey>,
}

impl Server {
    /// A node is a producer exactly when it holds a signing key.
    pub fn new(config: NodeConfig, blockchain: Blockchain, validator_key: Option<PrivateKey>) -> Server {
        let handle = NodeHandle {
            blockchain,
            mem_pool: Arc::new(MemoryPool::new()),
            peers: Arc::new(Peers::new(config.peers.clone())),
            listen_addr: config.listen_addr.clone(),
        };
        Server {
            config,
            handle,
            validator_key,
        }
    }

    pub fn mem_pool(&self) -> Arc<MemoryPool> {
        Arc::clone(&self.handle.mem_pool)
    }

    /// Bind, greet configured peers, start the production loop if this
    /// node is a producer, then serve connections until the process exits.
    pub fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            BlockchainError::Network(format!(
                "Failed to bind to {}: {e}",
                self.config.listen_addr
            ))
        })?;

        info!(
            "node {} listening on {}",
            self.config.node_id, self.config.listen_addr
        );

        self.greet_peers();

        if let Some(key) = &self.validator_key {
            Self::start_production_loop(
                self.handle.clone(),
                key.clone(),
                self.config.block_time_ms,
            );
        }

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let handle = self.handle.clone();
                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(handle, stream) {
                            error!("Error handling connection: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {e}");
                }
            }
        }

        Ok(())
    }

    /// Advertise our height to every configured peer.
    fn greet_peers(&self) {
        let best_height = self.handle.blockchain.height();
        for peer in self.handle.peers.all() {
            let pkg = Package::Version {
                addr_from: self.config.listen_addr.clone(),
                version: NODE_VERSION,
                best_height,
            };
            if let Err(e) = send_package(&peer, &pkg) {
                warn!("Failed to greet peer {peer}: {e}");
            }
        }
    }

    /// Periodic block production: drain the pool, build, sign, append,
    /// then flush and broadcast. Runs only on nodes with a signing key.
    fn start_production_loop(handle: NodeHandle, key: PrivateKey, block_time_ms: u64) {
        info!("starting block production loop, block time {block_time_ms}ms");
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(block_time_ms));
            if let Err(e) = Self::produce_block(&handle, &key) {
                error!("Block production failed: {e}");
            }
        });
    }

    fn produce_block(handle: &NodeHandle, key: &PrivateKey) -> Result<()> {
        let transactions = handle.mem_pool.transactions();
        if transactions.is_empty() {
            return Ok(());
        }

        let tip = handle.blockchain.tip_header();
        let mut block = Block::from_previous(&tip, transactions)?;
        block.sign(key)?;

        handle.blockchain.add_block(&block)?;
        handle.mem_pool.flush();

        info!(
            "produced block {} at height {} ({} transaction(s))",
            block.hash(&BlockHasher),
            block.height(),
            block.transactions().len()
        );

        let pkg = Package::Block {
            addr_from: handle.listen_addr.clone(),
            block: serialize(&block)?,
        };
        broadcast(&handle.peers, &pkg, None);
        Ok(())
    }

    fn handle_connection(handle: NodeHandle, stream: TcpStream) -> Result<()> {
        stream
            .set_read_timeout(Some(Duration::from_secs(60)))
            .map_err(|e| BlockchainError::Network(format!("Failed to set read timeout: {e}")))?;

        let reader = BufReader::new(&stream);
        let pkg_reader = Deserializer::from_reader(reader).into_iter::<Package>();

        for pkg in pkg_reader {
            let pkg = pkg.map_err(|e| {
                BlockchainError::Network(format!("Failed to deserialize package: {e}"))
            })?;

            if let Err(e) = Self::process_message(&handle, pkg) {
                error!("Error processing message: {e}");
            }
        }

        let _ = stream.shutdown(Shutdown::Both);
        Ok(())
    }

    fn process_message(handle: &NodeHandle, pkg: Package) -> Result<()> {
        match pkg {
            Package::Tx {
                addr_from,
                transaction,
            } => Self::handle_tx_message(handle, &addr_from, &transaction),
            Package::Block { addr_from, block } => {
                Self::handle_block_message(handle, &addr_from, &block)
            }
            Package::Version {
                addr_from,
                version,
                best_height,
            } => Self::handle_version_message(handle, addr_from, version, best_height),
        }
    }

    /// Inbound transaction: decode, drop known duplicates, verify the
    /// sender's signature, pool, and pass it along.
    fn handle_tx_message(handle: &NodeHandle, addr_from: &str, tx_bytes: &[u8]) -> Result<()> {
        let tx = decode_transaction(tx_bytes)?;
        let hash = tx.hash(&TxHasher);

        if handle.mem_pool.has(&hash) {
            return Ok(());
        }

        tx.verify()?;
        handle.mem_pool.add(tx)?;

        info!(
            "adding new transaction to mempool, hash {hash}, mempool_length {}",
            handle.mem_pool.len()
        );

        let pkg = Package::Tx {
            addr_from: handle.listen_addr.clone(),
            transaction: tx_bytes.to_vec(),
        };
        broadcast(&handle.peers, &pkg, Some(addr_from));
        Ok(())
    }

    /// Inbound block: the validator decides; rejection is logged, not fatal.
    fn handle_block_message(handle: &NodeHandle, addr_from: &str, block_bytes: &[u8]) -> Result<()> {
        let block: Block = deserialize(block_bytes)?;

        match handle.blockchain.add_block(&block) {
            Ok(()) => {
                info!(
                    "accepted block {} at height {} from {addr_from}",
                    block.hash(&BlockHasher),
                    block.height()
                );
            }
            Err(e) => {
                warn!(
                    "rejected block {} from {addr_from}: {e}",
                    block.hash(&BlockHasher)
                );
            }
        }
        Ok(())
    }

    fn handle_version_message(
        handle: &NodeHandle,
        addr_from: String,
        version: u32,
        best_height: u32,
    ) -> Result<()> {
        info!("version message from {addr_from}: version {version}, best_height {best_height}");
        handle.peers.add(addr_from);
        Ok(())
    }
}

/// Open a connection and write one JSON frame.
fn send_package(addr: &str, pkg: &Package) -> Result<()> {
    let stream = TcpStream::connect(addr)
        .map_err(|e| BlockchainError::Network(format!("Failed to connect to {addr}: {e}")))?;
    stream
        .set_write_timeout(Some(Duration::from_millis(TCP_WRITE_TIMEOUT_MS)))
        .map_err(|e| BlockchainError::Network(format!("Failed to set write timeout: {e}")))?;

    serde_json::to_writer(&stream, pkg)
        .map_err(|e| BlockchainError::Network(format!("Failed to send package: {e}")))?;
    Ok(())
}

/// Best-effort fan-out to every known peer except `skip`.
fn broadcast(peers: &Peers, pkg: &Package, skip: Option<&str>) {
    for peer in peers.all() {
        if skip == Some(peer.as_str()) {
            continue;
        }
        if let Err(e) = send_package(&peer, pkg) {
            warn!("Failed to broadcast to {peer}: {e}");
        }
    }
}

/// Client helper: sign-side submission of one transaction to a node.
pub fn send_transaction(addr: &str, tx: &Transaction) -> Result<()> {
    let pkg = Package::Tx {
        addr_from: String::new(),
        transaction: encode_transaction(tx)?,
    };
    send_package(addr, &pkg)
}
