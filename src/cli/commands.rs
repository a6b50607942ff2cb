use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sigchain")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "keygen",
        about = "Generate a signing key and seal it in an encrypted keystore"
    )]
    Keygen {
        #[arg(help = "Keystore output path")]
        path: PathBuf,
        #[arg(long, help = "Keystore passphrase (minimum 8 characters)")]
        passphrase: String,
    },
    #[command(name = "startnode", about = "Start a ledger node")]
    StartNode {
        #[arg(long, help = "TOML configuration file (defaults plus env otherwise)")]
        config: Option<PathBuf>,
        #[arg(
            long,
            help = "Keystore holding the signing key; enables block production"
        )]
        keystore: Option<PathBuf>,
        #[arg(long, help = "Keystore passphrase")]
        passphrase: Option<String>,
    },
    #[command(name = "send", about = "Sign a payload and submit it to a node")]
    Send {
        #[arg(help = "Node address, e.g. 127.0.0.1:2001")]
        addr: String,
        #[arg(help = "Hex-encoded payload")]
        payload: String,
    },
}
