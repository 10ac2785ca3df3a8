//! Core ledger types: UTXO identifiers, outputs, inputs, transactions.
//!
//! Amounts are signed 64-bit integers so that a negative output can be
//! represented and rejected by validation rather than by the type system.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::TransactionError;

/// A 32-byte hash value. Used for transaction content hashes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash (32 zero bytes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifies one output of a prior transaction: its content hash and the
/// position of the output within it. The key of the UTXO pool.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    bincode::Encode, bincode::Decode,
)]
pub struct Utxo {
    /// Content hash of the transaction that created the output.
    pub txid: Hash256,
    /// Index of the output within that transaction.
    pub index: u64,
}

impl Utxo {
    pub fn new(txid: Hash256, index: u64) -> Self {
        Self { txid, index }
    }
}

impl fmt::Display for Utxo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// Raw Ed25519 verifying-key bytes of the party allowed to spend an output.
///
/// Kept as plain bytes so outputs stay cheap to copy and hash; parsing into a
/// curve point happens only at verification time.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
    bincode::Encode, bincode::Decode,
)]
pub struct OwnerKey(pub [u8; 32]);

impl OwnerKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for OwnerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for OwnerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&s, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// A transaction input, spending a previous output.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct TxInput {
    /// The UTXO being spent.
    pub previous_output: Utxo,
    /// Ed25519 signature (64 bytes) over the signing hash for this input's
    /// position. Empty until signed.
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl TxInput {
    /// An unsigned input referencing `previous_output`.
    pub fn unsigned(previous_output: Utxo) -> Self {
        Self {
            previous_output,
            signature: Vec::new(),
        }
    }
}

/// A transaction output. Becomes a UTXO once its transaction is accepted.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct TxOutput {
    /// Amount carried by the output. Must be non-negative to be accepted.
    pub value: i64,
    /// Key of the recipient.
    pub owner: OwnerKey,
}

impl TxOutput {
    pub fn new(value: i64, owner: OwnerKey) -> Self {
        Self { value, owner }
    }
}

/// A transaction: ordered inputs consuming UTXOs, ordered outputs creating
/// new ones. Positions are significant on both sides.
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Transaction {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

impl Transaction {
    pub fn new(inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Self {
        Self { inputs, outputs }
    }

    /// Compute the content hash (BLAKE3 of the canonical bincode encoding).
    ///
    /// Signatures are part of the encoding, so the hash is only stable once
    /// every input has been signed.
    pub fn txid(&self) -> Result<Hash256, TransactionError> {
        let encoded = bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| TransactionError::Serialization(e.to_string()))?;
        Ok(Hash256(blake3::hash(&encoded).into()))
    }

    /// The UTXO that output `index` of this transaction becomes once accepted.
    pub fn output_utxo(txid: Hash256, index: usize) -> Utxo {
        Utxo::new(txid, index as u64)
    }

    /// Sum of all output values, widened to i128 so it cannot overflow.
    pub fn total_output_value(&self) -> i128 {
        self.outputs.iter().map(|out| i128::from(out.value)).sum()
    }
}

/// Serde adapter writing byte vectors as hex strings.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
