//! Integration test suite for utxo-core.
//!
//! Exercises the validator end to end with real Ed25519 signatures, and
//! checks ledger invariants over randomly generated batches.

pub mod helpers;
