//! Error types for the ledger core.
use thiserror::Error;

use crate::types::Utxo;

/// Why a transaction was rejected. One variant per validation rule, checked
/// in declaration order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("unknown UTXO: {0}")] UnknownUtxo(Utxo),
    #[error("invalid signature on input {index}")] InvalidSignature { index: usize },
    #[error("duplicate input: {0}")] DuplicateInput(Utxo),
    #[error("negative output at index {index}: {value}")] NegativeOutput { index: usize, value: i64 },
    #[error("insufficient funds: have {have}, need {need}")] InsufficientFunds { have: i128, need: i128 },
    #[error("serialization: {0}")] Serialization(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("UTXO not found in pool: {0}")] NotFound(Utxo),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
    #[error("input index out of bounds: {index} >= {len}")] InputIndexOutOfBounds { index: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)] Transaction(#[from] TransactionError),
    #[error(transparent)] Pool(#[from] PoolError),
    #[error(transparent)] Crypto(#[from] CryptoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hash256;

    fn sample_utxo() -> Utxo {
        Utxo {
            txid: Hash256([0xAB; 32]),
            index: 3,
        }
    }

    #[test]
    fn transaction_error_display() {
        let errors = [
            TransactionError::UnknownUtxo(sample_utxo()),
            TransactionError::InvalidSignature { index: 1 },
            TransactionError::DuplicateInput(sample_utxo()),
            TransactionError::NegativeOutput { index: 0, value: -5 },
            TransactionError::InsufficientFunds { have: 1, need: 2 },
            TransactionError::Serialization("boom".into()),
        ];
        for e in &errors {
            assert!(!format!("{e}").is_empty());
        }
    }

    #[test]
    fn not_found_names_the_utxo() {
        let msg = PoolError::NotFound(sample_utxo()).to_string();
        assert!(msg.ends_with(":3"));
        assert!(msg.contains("abab"));
    }

    #[test]
    fn ledger_error_wraps_transparently() {
        let inner = TransactionError::InvalidSignature { index: 4 };
        let outer: LedgerError = inner.clone().into();
        assert_eq!(outer.to_string(), inner.to_string());

        let outer: LedgerError = CryptoError::InvalidPublicKey.into();
        assert!(matches!(outer, LedgerError::Crypto(CryptoError::InvalidPublicKey)));
    }
}
