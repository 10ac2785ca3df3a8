//! Trait interfaces for the capabilities the validator consumes.
//!
//! - [`SignatureVerifier`] — checks a signature under an owner key
//!   ([`Ed25519Verifier`](crate::crypto::Ed25519Verifier) implements)

use crate::types::OwnerKey;

/// Verifies that `signature` was produced over `payload` by the holder of
/// `owner`.
///
/// Implementations must be deterministic. Malformed keys or signatures are
/// reported as `false`, never as a panic.
pub trait SignatureVerifier {
    fn verify(&self, owner: &OwnerKey, payload: &[u8], signature: &[u8]) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, owner: &OwnerKey, payload: &[u8], signature: &[u8]) -> bool {
        (**self).verify(owner, payload, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------
    // Mock: SignatureVerifier
    // ------------------------------------------------------------------

    /// Accepts a signature iff it equals the owner key bytes.
    struct EchoVerifier;

    impl SignatureVerifier for EchoVerifier {
        fn verify(&self, owner: &OwnerKey, _payload: &[u8], signature: &[u8]) -> bool {
            signature == owner.as_bytes()
        }
    }

    #[test]
    fn mock_verifier_accepts_matching() {
        let owner = OwnerKey([7; 32]);
        assert!(EchoVerifier.verify(&owner, b"payload", &[7; 32]));
        assert!(!EchoVerifier.verify(&owner, b"payload", &[8; 32]));
    }

    #[test]
    fn reference_forwards_to_inner() {
        let owner = OwnerKey([3; 32]);
        let by_ref: &dyn SignatureVerifier = &EchoVerifier;
        assert!(by_ref.verify(&owner, b"", &[3; 32]));
        assert!((&EchoVerifier).verify(&owner, b"", &[3; 32]));
    }
}
