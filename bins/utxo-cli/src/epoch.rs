//! Epoch files: JSON input and output of the `process` subcommand.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use utxo_core::types::{Hash256, Transaction};
use utxo_core::{TxValidator, UtxoPool};

/// Input of one epoch: the pool to start from and the candidate batch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EpochFile {
    pub pool: UtxoPool,
    #[serde(default)]
    pub candidates: Vec<Transaction>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub position: usize,
    pub reason: String,
}

/// Result of one epoch, written as JSON.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EpochOutput {
    pub accepted: Vec<Hash256>,
    pub rejected: Vec<Rejection>,
    pub total_fees: i128,
    /// Pool after the epoch, ready to seed the next one.
    pub pool: UtxoPool,
}

pub fn load_epoch(path: &Path) -> Result<EpochFile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading epoch file {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing epoch file {}", path.display()))
}

/// Run the candidates of `epoch` against its pool.
pub fn run_epoch(epoch: EpochFile) -> EpochOutput {
    info!(
        pool_size = epoch.pool.len(),
        candidates = epoch.candidates.len(),
        "processing epoch"
    );
    let mut validator = TxValidator::new(epoch.pool);
    let report = validator.process_epoch_with_report(epoch.candidates);

    EpochOutput {
        accepted: report.accepted_txids,
        rejected: report
            .rejected
            .into_iter()
            .map(|(position, e)| Rejection {
                position,
                reason: e.to_string(),
            })
            .collect(),
        total_fees: report.total_fees,
        pool: validator.into_pool(),
    }
}

/// Write `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("encoding JSON")?;
    match path {
        Some(p) => fs::write(p, json + "\n").with_context(|| format!("writing {}", p.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
