//! # utxo-core
//! UTXO pool and transaction validator for a single-node ledger.
//!
//! [`pool::UtxoPool`] is the authoritative set of spendable outputs.
//! [`validation::TxValidator`] owns one pool, checks candidate transactions
//! against it and advances it one epoch at a time.

pub mod crypto;
pub mod error;
pub mod pool;
pub mod traits;
pub mod types;
pub mod validation;

pub use crypto::{Ed25519Verifier, KeyPair, PublicKey};
pub use error::{CryptoError, LedgerError, PoolError, TransactionError};
pub use pool::UtxoPool;
pub use traits::SignatureVerifier;
pub use types::{Hash256, OwnerKey, Transaction, TxInput, TxOutput, Utxo};
pub use validation::{EpochReport, TxValidator, ValidatedTransaction};
