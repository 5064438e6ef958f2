//! Governance interpretation of verified VAAs.
//!
//! [`interpret_governance`] never mutates anything. It returns the decoded action; the host
//! marks the claim consumed and, for guardian set upgrades, applies the
//! [`GuardianSetTransition`] against its own state in the same transaction.

use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::codec::{GovernanceAction, Payload, PayloadShape};
use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::guardian::GuardianSet;
use crate::types::VerifiedVaa;

/// Consumed governance VAA hashes, owned by the host.
pub trait ClaimStore {
    fn is_consumed(&self, hash: &[u8; 32]) -> bool;

    /// Record `hash` as executed. Returns `false` if it was already recorded.
    fn mark_consumed(&mut self, hash: [u8; 32]) -> bool;
}

/// Claim store kept in memory, for tests and off-chain relayers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryClaimStore {
    consumed: BTreeSet<[u8; 32]>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}

impl ClaimStore for MemoryClaimStore {
    fn is_consumed(&self, hash: &[u8; 32]) -> bool {
        self.consumed.contains(hash)
    }

    fn mark_consumed(&mut self, hash: [u8; 32]) -> bool {
        self.consumed.insert(hash)
    }
}

/// Install `new_set` and retire `previous_index` at `previous_expires_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianSetTransition {
    pub previous_index: u32,
    pub new_set: GuardianSet,
    pub previous_expires_at: u32,
}

impl GovernanceAction {
    /// The registry change a guardian set upgrade asks for, with the previous set kept valid
    /// for `grace_period` seconds after `now`. `None` for every other action.
    pub fn transition(&self, now: u32, grace_period: u32) -> Option<GuardianSetTransition> {
        let Self::GuardianSetUpgrade {
            new_index,
            new_addresses,
            ..
        } = self
        else {
            return None;
        };
        Some(GuardianSetTransition {
            previous_index: new_index.checked_sub(1)?,
            new_set: GuardianSet::new(*new_index, new_addresses.clone()),
            previous_expires_at: now.saturating_add(grace_period),
        })
    }
}

/// Validate a verified VAA as a governance instruction and decode its action.
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. emitter chain is the governance chain
/// 2. emitter address is the governance contract
/// 3. the VAA was signed by `current_guardian_set_index`
/// 4. its hash has not been consumed in `claims`
/// 5. the payload is a recognised governance action, with no trailing bytes unless
///    `governance.strict_payloads` is off
/// 6. a guardian set upgrade targets `current_guardian_set_index + 1` with a non-empty set
///
/// On success the caller records [`VerifiedVaa::governance_claim_key`] in its claim store.
pub fn interpret_governance<C: ClaimStore + ?Sized>(
    verified: &VerifiedVaa,
    governance: &GovernanceConfig,
    current_guardian_set_index: u32,
    claims: &C,
) -> Result<GovernanceAction, GovernanceError> {
    let vaa = verified.vaa();
    if vaa.emitter_chain != governance.chain {
        return Err(GovernanceError::WrongGovernanceChain);
    }
    if vaa.emitter_address != governance.contract {
        return Err(GovernanceError::WrongGovernanceContract);
    }
    if vaa.guardian_set_index != current_guardian_set_index {
        return Err(GovernanceError::NotCurrentGuardianSet);
    }
    if claims.is_consumed(&verified.governance_claim_key().to_bytes()) {
        return Err(GovernanceError::AlreadyConsumed);
    }

    let strict = governance.strict_payloads;
    let action = match Payload::decode(&vaa.payload, PayloadShape::Governance, strict) {
        Ok(Payload::Governance(action)) => action,
        Ok(_) => return Err(GovernanceError::UnsupportedAction),
        Err(e) => return Err(GovernanceError::MalformedPayload(e)),
    };
    tracing::debug!(
        module = action.module().name(),
        action = action.action_id(),
        target_chain = action.target_chain(),
        "decoded governance action"
    );

    if let GovernanceAction::GuardianSetUpgrade {
        new_index,
        new_addresses,
        ..
    } = &action
    {
        let expected = current_guardian_set_index
            .checked_add(1)
            .ok_or(GovernanceError::GuardianSetIndexExhausted(current_guardian_set_index))?;
        if *new_index != expected {
            return Err(GovernanceError::NonSequentialGuardianSet {
                expected,
                found: *new_index,
            });
        }
        if new_addresses.is_empty() {
            return Err(GovernanceError::EmptyGuardianSet);
        }
    }
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Module, Vaa};
    use crate::config::{GOVERNANCE_CHAIN, GOVERNANCE_EMITTER};
    use crate::error::DecodeError;
    use crate::types::Address;
    use alloc::vec;

    fn verified(payload: alloc::vec::Vec<u8>, guardian_set_index: u32) -> VerifiedVaa {
        let vaa = Vaa {
            version: 1,
            guardian_set_index,
            emitter_chain: GOVERNANCE_CHAIN,
            emitter_address: GOVERNANCE_EMITTER,
            sequence: 1,
            payload,
            ..Vaa::default()
        };
        let digest = vaa.digest();
        VerifiedVaa::new(vaa, digest)
    }

    fn upgrade(new_index: u32, n: usize) -> GovernanceAction {
        GovernanceAction::GuardianSetUpgrade {
            chain: 0,
            new_index,
            new_addresses: vec![[0x42; 20]; n],
        }
    }

    #[test]
    fn test_accepts_guardian_set_upgrade() {
        let vaa = verified(upgrade(1, 2).encode().unwrap(), 0);
        let claims = MemoryClaimStore::new();
        let action =
            interpret_governance(&vaa, &GovernanceConfig::default(), 0, &claims).unwrap();
        let transition = action.transition(1_000, 86_400).unwrap();
        assert_eq!(transition.previous_index, 0);
        assert_eq!(transition.new_set.index, 1);
        assert_eq!(transition.new_set.len(), 2);
        assert_eq!(transition.previous_expires_at, 87_400);
    }

    #[test]
    fn test_rejects_non_sequential_and_empty_upgrades() {
        let claims = MemoryClaimStore::new();
        let config = GovernanceConfig::default();
        let gap = verified(upgrade(3, 1).encode().unwrap(), 1);
        assert_eq!(
            interpret_governance(&gap, &config, 1, &claims),
            Err(GovernanceError::NonSequentialGuardianSet {
                expected: 2,
                found: 3
            })
        );
        let empty = verified(upgrade(2, 0).encode().unwrap(), 1);
        assert_eq!(
            interpret_governance(&empty, &config, 1, &claims),
            Err(GovernanceError::EmptyGuardianSet)
        );
    }

    #[test]
    fn test_check_order() {
        let claims = MemoryClaimStore::new();
        let payload = upgrade(1, 1).encode().unwrap();

        let mut wrong_chain = verified(payload.clone(), 5).into_vaa();
        wrong_chain.emitter_chain = 2;
        wrong_chain.emitter_address = Address([9; 32]);
        let digest = wrong_chain.digest();
        let wrong_chain = VerifiedVaa::new(wrong_chain, digest);
        assert_eq!(
            interpret_governance(&wrong_chain, &GovernanceConfig::default(), 0, &claims),
            Err(GovernanceError::WrongGovernanceChain)
        );

        let stale = verified(payload, 5);
        assert_eq!(
            interpret_governance(&stale, &GovernanceConfig::default(), 0, &claims),
            Err(GovernanceError::NotCurrentGuardianSet)
        );
    }

    #[test]
    fn test_replay_after_mark_consumed() {
        let vaa = verified(upgrade(1, 1).encode().unwrap(), 0);
        let config = GovernanceConfig::default();
        let mut claims = MemoryClaimStore::new();
        interpret_governance(&vaa, &config, 0, &claims).unwrap();
        assert!(claims.mark_consumed(vaa.governance_claim_key().to_bytes()));
        assert!(!claims.mark_consumed(vaa.governance_claim_key().to_bytes()));
        assert_eq!(
            interpret_governance(&vaa, &config, 0, &claims),
            Err(GovernanceError::AlreadyConsumed)
        );
    }

    #[test]
    fn test_unknown_action_is_unsupported() {
        let mut payload = Module::Core.tag().to_vec();
        payload.extend_from_slice(&[0x09, 0x00, 0x00]);
        let claims = MemoryClaimStore::new();
        assert_eq!(
            interpret_governance(
                &verified(payload, 0),
                &GovernanceConfig::default(),
                0,
                &claims
            ),
            Err(GovernanceError::UnsupportedAction)
        );
    }

    #[test]
    fn test_truncated_action_is_malformed() {
        let mut payload = upgrade(1, 1).encode().unwrap();
        payload.pop();
        let claims = MemoryClaimStore::new();
        assert!(matches!(
            interpret_governance(
                &verified(payload, 0),
                &GovernanceConfig::default(),
                0,
                &claims
            ),
            Err(GovernanceError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_transition_only_for_upgrades() {
        let fee = GovernanceAction::SetMessageFee {
            chain: 0,
            fee: Default::default(),
        };
        assert!(fee.transition(0, 0).is_none());
        assert!(upgrade(0, 1).transition(0, 0).is_none());
    }

    #[test]
    fn test_upgrade_from_max_index_does_not_wrap() {
        let claims = MemoryClaimStore::new();
        let vaa = verified(upgrade(u32::MAX, 1).encode().unwrap(), u32::MAX);
        assert_eq!(
            interpret_governance(&vaa, &GovernanceConfig::default(), u32::MAX, &claims),
            Err(GovernanceError::GuardianSetIndexExhausted(u32::MAX))
        );
    }

    #[test]
    fn test_trailing_bytes_follow_strictness() {
        let claims = MemoryClaimStore::new();
        let mut payload = upgrade(1, 1).encode().unwrap();
        payload.push(0);
        let vaa = verified(payload, 0);

        assert_eq!(
            interpret_governance(&vaa, &GovernanceConfig::default(), 0, &claims),
            Err(GovernanceError::MalformedPayload(DecodeError::TrailingBytes(1)))
        );
        let lenient = GovernanceConfig {
            strict_payloads: false,
            ..GovernanceConfig::default()
        };
        assert_eq!(
            interpret_governance(&vaa, &lenient, 0, &claims),
            Ok(upgrade(1, 1))
        );
    }
}
