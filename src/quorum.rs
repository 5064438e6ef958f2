//! Guardian signature quorum verification.
//!
//! Signatures are secp256k1 ECDSA over the double-keccak body digest, carried with a recovery
//! id so the signer's address can be recovered and compared against the guardian set.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};

use crate::digest::keccak256;
use crate::error::QuorumError;
use crate::guardian::GuardianSet;
use crate::types::{GuardianAddress, Signature};

/// Ethereum-style address of a public key: last 20 bytes of keccak256 of the uncompressed point
/// without its `0x04` prefix.
pub fn public_key_to_address(key: &VerifyingKey) -> GuardianAddress {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Recover the signer address of `sig` over the 32-byte `digest`.
///
/// Returns `None` for malformed signatures: zero or out-of-range scalars, high-S values, or
/// a recovery id outside `0..=3`.
pub fn recover_address(digest: &[u8; 32], sig: &Signature) -> Option<GuardianAddress> {
    let recovery_id = RecoveryId::from_byte(sig.recovery_id)?;
    let signature = EcdsaSignature::from_slice(&sig.rs()).ok()?;
    let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id).ok()?;
    Some(public_key_to_address(&key))
}

/// Check that `signatures` form a quorum of `guardian_set` over `digest`.
///
/// Index ordering is checked for the whole list before any recovery runs, so a list with a
/// duplicated signer is rejected as [`QuorumError::IndicesNotAscending`] even when every
/// signature is individually valid.
///
/// # Errors
/// - [`QuorumError::NoQuorum`] for an empty list or fewer than `floor(2N/3)+1` signatures
/// - [`QuorumError::IndicesNotAscending`] if guardian indices are not strictly increasing
/// - [`QuorumError::InvalidSignature`] naming the first index that is out of range or does not
///   recover to the guardian's address
pub fn verify_quorum(
    digest: &[u8; 32],
    signatures: &[Signature],
    guardian_set: &GuardianSet,
) -> Result<(), QuorumError> {
    if signatures.is_empty() {
        return Err(QuorumError::NoQuorum);
    }
    if signatures
        .windows(2)
        .any(|w| w[1].guardian_index <= w[0].guardian_index)
    {
        return Err(QuorumError::IndicesNotAscending);
    }

    for sig in signatures {
        let expected = guardian_set.address(sig.guardian_index);
        let recovered = recover_address(digest, sig);
        match (expected, recovered) {
            (Some(expected), Some(recovered)) if *expected == recovered => {}
            _ => {
                return Err(QuorumError::InvalidSignature {
                    guardian_index: sig.guardian_index,
                })
            }
        }
    }

    if signatures.len() < guardian_set.quorum() {
        return Err(QuorumError::NoQuorum);
    }
    Ok(())
}
