//! Shared test helpers for integration and property tests.

use utxo_core::crypto::{self, KeyPair};
use utxo_core::types::*;
use utxo_core::UtxoPool;

/// Deterministic keypair from a seed byte.
pub fn keypair(seed: u8) -> KeyPair {
    KeyPair::from_secret_bytes([seed; 32])
}

/// A UTXO of a fictitious genesis transaction.
pub fn genesis_utxo(seed: u8, index: u64) -> Utxo {
    Utxo::new(Hash256([seed; 32]), index)
}

/// Pool holding `(utxo, value, owner)` entries.
pub fn make_pool(entries: &[(Utxo, i64, &KeyPair)]) -> UtxoPool {
    entries
        .iter()
        .map(|(utxo, value, kp)| (*utxo, TxOutput::new(*value, kp.owner_key())))
        .collect()
}

/// Build a transaction spending `inputs`, signing input `i` with `signers[i]`.
///
/// Inputs beyond `signers.len()` stay unsigned.
pub fn make_signed_tx(
    inputs: &[Utxo],
    outputs: &[(i64, &KeyPair)],
    signers: &[&KeyPair],
) -> Transaction {
    let mut tx = Transaction::new(
        inputs.iter().copied().map(TxInput::unsigned).collect(),
        outputs
            .iter()
            .map(|(value, kp)| TxOutput::new(*value, kp.owner_key()))
            .collect(),
    );
    for (i, kp) in signers.iter().enumerate() {
        crypto::sign_transaction_input(&mut tx, i, kp).expect("input index in range");
    }
    tx
}

/// UTXO created by output `index` of `tx`.
pub fn output_of(tx: &Transaction, index: usize) -> Utxo {
    Transaction::output_utxo(tx.txid().expect("transaction encodes"), index)
}
