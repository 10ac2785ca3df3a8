//! The UTXO pool: authoritative record of currently spendable outputs.
//!
//! The pool does no validation of its own. [`TxValidator`](crate::validation::TxValidator)
//! is the only writer during normal operation and guarantees that removed
//! keys were present and inserted keys are fresh.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::PoolError;
use crate::types::{OwnerKey, TxOutput, Utxo};

/// One `(utxo, output)` pair in the serialized form of a pool.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolEntry {
    pub utxo: Utxo,
    pub output: TxOutput,
}

/// Mapping from UTXO identifier to the output it names.
///
/// Serializes as a list of [`PoolEntry`] sorted by UTXO, since JSON object
/// keys must be strings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(into = "Vec<PoolEntry>", from = "Vec<PoolEntry>")]
pub struct UtxoPool {
    utxos: HashMap<Utxo, TxOutput>,
}

impl UtxoPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from a caller-owned mapping.
    ///
    /// The entries are cloned; later changes to `initial` do not reach the pool.
    pub fn from_entries(initial: &HashMap<Utxo, TxOutput>) -> Self {
        Self {
            utxos: initial.clone(),
        }
    }

    /// Build a pool taking ownership of `utxos`.
    pub fn from_map(utxos: HashMap<Utxo, TxOutput>) -> Self {
        Self { utxos }
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    /// Look up the output named by `utxo`.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotFound`] if the UTXO is not in the pool.
    pub fn get(&self, utxo: &Utxo) -> Result<&TxOutput, PoolError> {
        self.utxos.get(utxo).ok_or(PoolError::NotFound(*utxo))
    }

    /// Add an entry, replacing any existing output under the same key.
    pub fn insert(&mut self, utxo: Utxo, output: TxOutput) {
        trace!(%utxo, value = output.value, "pool insert");
        self.utxos.insert(utxo, output);
    }

    /// Remove an entry. Removing an absent key is a no-op.
    pub fn remove(&mut self, utxo: &Utxo) -> Option<TxOutput> {
        let removed = self.utxos.remove(utxo);
        trace!(%utxo, present = removed.is_some(), "pool remove");
        removed
    }

    /// Snapshot of every UTXO currently in the pool, in no particular order.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        self.utxos.keys().copied().collect()
    }

    /// Iterate over all `(utxo, output)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Utxo, &TxOutput)> {
        self.utxos.iter()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Sum of every output amount in the pool.
    ///
    /// Widened to i128 so that no combination of i64 entries can overflow.
    pub fn total_value(&self) -> i128 {
        self.utxos.values().map(|out| i128::from(out.value)).sum()
    }

    /// Sum of the outputs owned by `owner`.
    pub fn balance_of(&self, owner: &OwnerKey) -> i128 {
        self.utxos
            .values()
            .filter(|out| out.owner == *owner)
            .map(|out| i128::from(out.value))
            .sum()
    }
}

impl From<Vec<PoolEntry>> for UtxoPool {
    fn from(entries: Vec<PoolEntry>) -> Self {
        Self {
            utxos: entries.into_iter().map(|e| (e.utxo, e.output)).collect(),
        }
    }
}

impl From<UtxoPool> for Vec<PoolEntry> {
    fn from(pool: UtxoPool) -> Self {
        let mut entries: Vec<PoolEntry> = pool
            .utxos
            .into_iter()
            .map(|(utxo, output)| PoolEntry { utxo, output })
            .collect();
        entries.sort_by(|a, b| a.utxo.cmp(&b.utxo));
        entries
    }
}

impl FromIterator<(Utxo, TxOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (Utxo, TxOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
