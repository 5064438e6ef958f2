//! VAA verification pipeline.
//!
//! Decodes the envelope, resolves its guardian set, checks expiry and runs the quorum check.
//! Pure: no I/O, no registry mutation, same input gives the same result.

use crate::codec::{Vaa, VAA_VERSION};
use crate::config::VerifierConfig;
use crate::error::{DecodeError, VerificationError};
use crate::guardian::GuardianSetRegistry;
use crate::quorum::verify_quorum;
use crate::types::VerifiedVaa;

/// Verify a raw VAA with the default decode bounds.
///
/// # Arguments
/// * `raw` - The encoded envelope
/// * `registry` - Source of guardian sets
/// * `now` - Current unix time in seconds, compared against guardian set expiry
///
/// # Returns
/// The decoded VAA bundled with its digest, or the first check that failed.
pub fn verify<R: GuardianSetRegistry + ?Sized>(
    raw: &[u8],
    registry: &R,
    now: u32,
) -> Result<VerifiedVaa, VerificationError> {
    verify_with(&VerifierConfig::default(), raw, registry, now)
}

/// Verify a raw VAA, bounding signature count and payload length by `config`.
pub fn verify_with<R: GuardianSetRegistry + ?Sized>(
    config: &VerifierConfig,
    raw: &[u8],
    registry: &R,
    now: u32,
) -> Result<VerifiedVaa, VerificationError> {
    let vaa = Vaa::decode_with(raw, config)?;
    tracing::trace!(
        guardian_set_index = vaa.guardian_set_index,
        signatures = vaa.signatures.len(),
        payload_len = vaa.payload.len(),
        "decoded envelope"
    );
    verify_vaa(vaa, registry, now)
}

/// Verify an already decoded VAA. The digest is computed over its canonical body encoding.
///
/// A hand-built `vaa` goes through the same version check as decoded input.
pub fn verify_vaa<R: GuardianSetRegistry + ?Sized>(
    vaa: Vaa,
    registry: &R,
    now: u32,
) -> Result<VerifiedVaa, VerificationError> {
    if vaa.version != VAA_VERSION {
        return Err(DecodeError::UnsupportedVersion(vaa.version).into());
    }
    let index = vaa.guardian_set_index;
    let set = registry
        .lookup(index)
        .ok_or(VerificationError::UnknownGuardianSet(index))?;
    if registry.is_expired(&set, now) {
        return Err(VerificationError::GuardianSetExpired(index));
    }

    let digest = vaa.digest();
    verify_quorum(&digest.secp256k_hash, &vaa.signatures, &set)?;
    tracing::debug!(
        guardian_set_index = index,
        signatures = vaa.signatures.len(),
        quorum = set.quorum(),
        emitter_chain = vaa.emitter_chain,
        sequence = vaa.sequence,
        "quorum reached"
    );
    Ok(VerifiedVaa::new(vaa, digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuorumError;
    use crate::guardian::{GuardianSet, GuardianSetLog};
    use alloc::vec;

    fn unsigned() -> Vaa {
        Vaa {
            version: 1,
            guardian_set_index: 0,
            payload: vec![1, 2, 3],
            ..Vaa::default()
        }
    }

    #[test]
    fn test_malformed_input() {
        let log = GuardianSetLog::new(GuardianSet::new(0, vec![[1; 20]]));
        assert!(matches!(
            verify(&[1, 0, 0], &log, 0),
            Err(VerificationError::Malformed(DecodeError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_unknown_set_checked_before_signatures() {
        let log = GuardianSetLog::new(GuardianSet::new(0, vec![[1; 20]]));
        let mut vaa = unsigned();
        vaa.guardian_set_index = 7;
        assert_eq!(
            verify(&vaa.encode().unwrap(), &log, 0),
            Err(VerificationError::UnknownGuardianSet(7))
        );
    }

    #[test]
    fn test_expired_set_checked_before_signatures() {
        let mut set = GuardianSet::new(0, vec![[1; 20]]);
        set.expiration_time = 10;
        let log = GuardianSetLog::new(set);
        assert_eq!(
            verify(&unsigned().encode().unwrap(), &log, 10),
            Err(VerificationError::GuardianSetExpired(0))
        );
        assert_eq!(
            verify(&unsigned().encode().unwrap(), &log, 9),
            Err(VerificationError::QuorumFailed(QuorumError::NoQuorum))
        );
    }

    #[test]
    fn test_config_bounds_apply() {
        let log = GuardianSetLog::new(GuardianSet::new(0, vec![[1; 20]]));
        let config = VerifierConfig {
            max_payload_len: 2,
            ..VerifierConfig::default()
        };
        assert_eq!(
            verify_with(&config, &unsigned().encode().unwrap(), &log, 0),
            Err(VerificationError::Malformed(DecodeError::PayloadTooLarge {
                len: 3,
                max: 2
            }))
        );
    }

    #[test]
    fn test_decoded_vaa_version_rechecked() {
        let log = GuardianSetLog::new(GuardianSet::new(0, vec![[1; 20]]));
        for version in [0, 2] {
            let vaa = Vaa {
                version,
                ..unsigned()
            };
            assert_eq!(
                verify_vaa(vaa, &log, 0),
                Err(VerificationError::Malformed(DecodeError::UnsupportedVersion(
                    version
                )))
            );
        }
    }
}
