use clap::Parser;
use data_encoding::HEXLOWER;
use log::{error, LevelFilter};
use sigchain::core::{Block, Blockchain, Transaction, TxHasher};
use sigchain::network::{send_transaction, Server};
use sigchain::storage::{BlockStore, EncryptedKeystore, MemoryBlockStore, SledBlockStore};
use sigchain::wallet::PrivateKey;
use sigchain::{Command, NodeConfig, Opt};
use std::process;
use std::sync::Arc;

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Keygen { path, passphrase } => {
            let key = PrivateKey::generate()?;
            let keystore = EncryptedKeystore::seal(&key, &passphrase)?;
            keystore.save(&path)?;
            println!("Keystore written to {}", path.display());
            println!("Address: {}", key.public().address());
        }
        Command::StartNode {
            config,
            keystore,
            passphrase,
        } => {
            let config = match config {
                Some(path) => NodeConfig::from_toml_file(path)?,
                None => NodeConfig::from_env()?,
            };

            let validator_key = match keystore {
                Some(path) => {
                    let passphrase = passphrase
                        .ok_or("a keystore requires --passphrase to unlock it")?;
                    let key = EncryptedKeystore::load(path)?.open(&passphrase)?;
                    println!("Producing blocks as {}", key.public().address());
                    Some(key)
                }
                None => None,
            };

            let store: Arc<dyn BlockStore> = match &config.db_path {
                Some(path) => Arc::new(SledBlockStore::open(path)?),
                None => Arc::new(MemoryBlockStore::new()),
            };

            let blockchain = Blockchain::new(store, Block::genesis())?;
            let server = Server::new(config, blockchain, validator_key);
            server.run()?;
        }
        Command::Send { addr, payload } => {
            let data = HEXLOWER
                .decode(payload.as_bytes())
                .map_err(|e| format!("invalid hex payload: {e}"))?;

            // One-off sender identity, like a throwaway client key.
            let key = PrivateKey::generate()?;
            let mut tx = Transaction::new(data);
            tx.sign(&key)?;

            send_transaction(&addr, &tx)?;
            println!("Submitted transaction {}", tx.hash(&TxHasher));
        }
    }

    Ok(())
}
