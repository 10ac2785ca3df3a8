//! utxo-cli — run the UTXO validator over JSON epoch files.
//!
//! `process` applies a batch of candidate transactions to a pool and prints
//! the accepted txids, the rejection reasons, and the resulting pool.
//! `keygen` and `sign` help build epoch files by hand.

mod config;
mod epoch;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use utxo_core::crypto::{self, KeyPair};
use utxo_core::types::Transaction;

use crate::config::{init_logging, CliConfig};

/// UTXO transaction validator.
#[derive(Parser, Debug)]
#[command(name = "utxo-cli", version, about = "Validate transaction batches against a UTXO pool")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = config::DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = config::DEFAULT_LOG_FORMAT)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> CliConfig {
        CliConfig {
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process one epoch file.
    Process(ProcessArgs),
    /// Generate a keypair.
    Keygen(KeygenArgs),
    /// Sign one input of a transaction file.
    Sign(SignArgs),
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Epoch file: {"pool": [...], "candidates": [...]}.
    epoch: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct KeygenArgs {
    /// Hex-encoded 32-byte secret. Random when omitted.
    #[arg(long)]
    secret: Option<String>,
}

#[derive(Args, Debug)]
struct SignArgs {
    /// Transaction file (JSON).
    tx: PathBuf,

    /// Index of the input to sign.
    #[arg(short, long)]
    input: usize,

    /// Hex-encoded 32-byte secret of the output owner.
    #[arg(long)]
    secret: String,

    /// Overwrite the transaction file instead of printing to stdout.
    #[arg(long)]
    in_place: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.config());

    match cli.command {
        Commands::Process(args) => process(args),
        Commands::Keygen(args) => keygen(args),
        Commands::Sign(args) => sign(args),
    }
}

fn process(args: ProcessArgs) -> Result<()> {
    let epoch = epoch::load_epoch(&args.epoch)?;
    let out = epoch::run_epoch(epoch);
    info!(
        accepted = out.accepted.len(),
        rejected = out.rejected.len(),
        "epoch complete"
    );
    epoch::write_json(args.output.as_deref(), &out)
}

fn keygen(args: KeygenArgs) -> Result<()> {
    let kp = match args.secret {
        Some(hex_secret) => KeyPair::from_secret_bytes(parse_secret(&hex_secret)?),
        None => KeyPair::generate(),
    };
    println!("secret: {}", hex::encode(kp.secret_bytes()));
    println!("owner:  {}", kp.owner_key());
    Ok(())
}

fn sign(args: SignArgs) -> Result<()> {
    let data = fs::read_to_string(&args.tx)
        .with_context(|| format!("reading transaction {}", args.tx.display()))?;
    let mut tx: Transaction = serde_json::from_str(&data)
        .with_context(|| format!("parsing transaction {}", args.tx.display()))?;

    let kp = KeyPair::from_secret_bytes(parse_secret(&args.secret)?);
    crypto::sign_transaction_input(&mut tx, args.input, &kp)
        .with_context(|| format!("signing input {}", args.input))?;
    info!(input = args.input, owner = %kp.owner_key(), "signed input");

    let target = args.in_place.then_some(args.tx.as_path());
    epoch::write_json(target, &tx)
}

fn parse_secret(s: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(s.trim()).context("secret is not valid hex")?;
    match <[u8; 32]>::try_from(bytes.as_slice()) {
        Ok(secret) => Ok(secret),
        Err(_) => bail!("secret must be 32 bytes, got {}", bytes.len()),
    }
}
