//! Transaction validation and epoch processing.
//!
//! [`validate_transaction`] checks one transaction against a read-only pool.
//! Rules are applied in a fixed order and the first failure is returned:
//!
//! 1. Every input references a UTXO present in the pool
//! 2. Every input's signature verifies under the owner of the spent output
//! 3. No UTXO is referenced twice by the same transaction
//! 4. No output amount is negative
//! 5. Total input value covers total output value (fee >= 0)
//!
//! [`TxValidator`] owns the pool and applies accepted transactions to it,
//! one batch ("epoch") at a time.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::crypto::{self, Ed25519Verifier};
use crate::error::{PoolError, TransactionError};
use crate::pool::UtxoPool;
use crate::traits::SignatureVerifier;
use crate::types::{Hash256, Transaction, TxOutput};

/// Summary of a successfully validated transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransaction {
    /// Total value of all spent outputs.
    pub total_input: i128,
    /// Total value of all created outputs.
    pub total_output: i128,
    /// `total_input - total_output`.
    pub fee: i128,
}

/// Validate a transaction against `pool` without modifying it.
pub fn validate_transaction<V: SignatureVerifier>(
    tx: &Transaction,
    pool: &UtxoPool,
    verifier: &V,
) -> Result<ValidatedTransaction, TransactionError> {
    // (1) Every referenced UTXO exists.
    let spent: Vec<&TxOutput> = tx
        .inputs
        .iter()
        .map(|input| {
            pool.get(&input.previous_output)
                .map_err(|PoolError::NotFound(utxo)| TransactionError::UnknownUtxo(utxo))
        })
        .collect::<Result<_, _>>()?;

    // (2) Each input is signed by the owner recorded in the spent output.
    for (i, output) in spent.iter().enumerate() {
        crypto::verify_transaction_input(verifier, tx, i, &output.owner)
            .map_err(|_| TransactionError::InvalidSignature { index: i })?;
    }

    // (3) No UTXO claimed twice within this transaction.
    let mut seen = HashSet::with_capacity(tx.inputs.len());
    for input in &tx.inputs {
        if !seen.insert(input.previous_output) {
            return Err(TransactionError::DuplicateInput(input.previous_output));
        }
    }

    // (4) Outputs are non-negative.
    for (index, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 {
            return Err(TransactionError::NegativeOutput {
                index,
                value: output.value,
            });
        }
    }

    // (5) No value is created. Sums are i128: no count of i64 amounts a
    // transaction can hold overflows them.
    let total_input: i128 = spent.iter().map(|out| i128::from(out.value)).sum();
    let total_output = tx.total_output_value();

    if total_input < total_output {
        return Err(TransactionError::InsufficientFunds {
            have: total_input,
            need: total_output,
        });
    }

    Ok(ValidatedTransaction {
        total_input,
        total_output,
        fee: total_input - total_output,
    })
}

/// Outcome of one epoch, including why each rejected candidate failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpochReport {
    /// Accepted transactions in their original relative order.
    pub accepted: Vec<Transaction>,
    /// Content hashes of `accepted`, index-aligned.
    pub accepted_txids: Vec<Hash256>,
    /// `(candidate position, reason)` for every rejected candidate.
    pub rejected: Vec<(usize, TransactionError)>,
    /// Sum of the fees of all accepted transactions.
    pub total_fees: i128,
}

/// Owns the UTXO pool of one ledger and advances it epoch by epoch.
///
/// Not internally synchronized. Drive a validator from a single thread, or
/// wrap it in a `Mutex` if it must be shared.
#[derive(Debug, Clone)]
pub struct TxValidator<V = Ed25519Verifier> {
    pool: UtxoPool,
    verifier: V,
}

impl TxValidator<Ed25519Verifier> {
    /// Create a validator over `pool` using Ed25519 signatures.
    pub fn new(pool: UtxoPool) -> Self {
        Self::with_verifier(pool, Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> TxValidator<V> {
    pub fn with_verifier(pool: UtxoPool, verifier: V) -> Self {
        Self { pool, verifier }
    }

    /// Current pool state.
    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    /// Give up the validator and return its pool.
    pub fn into_pool(self) -> UtxoPool {
        self.pool
    }

    /// Validate `tx` against the current pool, returning the violated rule on
    /// failure. Never mutates the pool.
    pub fn validate(&self, tx: &Transaction) -> Result<ValidatedTransaction, TransactionError> {
        validate_transaction(tx, &self.pool, &self.verifier)
    }

    pub fn is_valid(&self, tx: &Transaction) -> bool {
        self.validate(tx).is_ok()
    }

    /// Process a batch of candidates in the order given, returning the
    /// accepted subset.
    ///
    /// Each candidate is validated against the pool as already updated by the
    /// candidates accepted before it, so a later transaction spending a UTXO
    /// consumed earlier in the batch is rejected. Rejected candidates are not
    /// retried.
    pub fn process_epoch<I>(&mut self, candidates: I) -> Vec<Transaction>
    where
        I: IntoIterator<Item = Transaction>,
    {
        self.process_epoch_with_report(candidates).accepted
    }

    /// Same as [`process_epoch`](Self::process_epoch), additionally reporting
    /// the rejection reason of each skipped candidate.
    pub fn process_epoch_with_report<I>(&mut self, candidates: I) -> EpochReport
    where
        I: IntoIterator<Item = Transaction>,
    {
        let mut report = EpochReport::default();

        for (position, tx) in candidates.into_iter().enumerate() {
            match self.accept(&tx) {
                Ok((txid, validated)) => {
                    debug!(position, %txid, fee = validated.fee, "accepted transaction");
                    report.total_fees += validated.fee;
                    report.accepted_txids.push(txid);
                    report.accepted.push(tx);
                }
                Err(e) => {
                    debug!(position, error = %e, "rejected transaction");
                    report.rejected.push((position, e));
                }
            }
        }

        info!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            fees = %report.total_fees,
            pool_size = self.pool.len(),
            "epoch processed"
        );
        report
    }

    /// Validate and, on success, apply `tx` to the pool.
    ///
    /// The content hash is computed before any mutation so a failure leaves
    /// the pool untouched.
    fn accept(
        &mut self,
        tx: &Transaction,
    ) -> Result<(Hash256, ValidatedTransaction), TransactionError> {
        let validated = self.validate(tx)?;
        let txid = tx.txid()?;

        for input in &tx.inputs {
            self.pool.remove(&input.previous_output);
        }
        for (index, output) in tx.outputs.iter().enumerate() {
            self.pool
                .insert(Transaction::output_utxo(txid, index), output.clone());
        }

        Ok((txid, validated))
    }
}
