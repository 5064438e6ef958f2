//! Guardian sets and the registry the verifier reads them from.
//!
//! The registry is a read-only projection of state the host owns. The only mutation path is
//! [`GuardianSetLog::install`], which applies a transition decided by a verified governance VAA.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::governance::GuardianSetTransition;
use crate::types::GuardianAddress;

/// Minimum number of valid signatures for a set of `num_guardians`: `floor(2N/3) + 1`.
///
/// Integer truncation matches the on-chain verifiers (N=2 needs 2, N=4 needs 3).
pub const fn quorum(num_guardians: usize) -> usize {
    num_guardians * 2 / 3 + 1
}

/// An indexed, ordered list of guardian addresses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianSet {
    pub index: u32,
    /// Guardian `i` signs with `addresses[i]`
    pub addresses: Vec<GuardianAddress>,
    /// Unix seconds after which the set stops verifying; 0 while it is current
    pub expiration_time: u32,
}

impl GuardianSet {
    /// A new, non-expiring set.
    pub fn new(index: u32, addresses: Vec<GuardianAddress>) -> Self {
        Self {
            index,
            addresses,
            expiration_time: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn quorum(&self) -> usize {
        quorum(self.addresses.len())
    }

    /// Address at `guardian_index`, if the set is that large.
    pub fn address(&self, guardian_index: u8) -> Option<&GuardianAddress> {
        self.addresses.get(guardian_index as usize)
    }

    pub fn contains(&self, address: &GuardianAddress) -> bool {
        self.addresses.contains(address)
    }

    /// A retired set expires once `at` reaches its expiration time.
    pub fn is_expired(&self, at: u32) -> bool {
        self.expiration_time != 0 && at >= self.expiration_time
    }
}

/// Read access to guardian sets, supplied by the host.
pub trait GuardianSetRegistry {
    fn lookup(&self, index: u32) -> Option<GuardianSet>;

    /// Index of the set that governance VAAs must be signed by.
    fn current_index(&self) -> Option<u32>;

    fn is_current(&self, index: u32) -> bool {
        self.current_index() == Some(index)
    }

    fn is_expired(&self, set: &GuardianSet, at: u32) -> bool {
        set.is_expired(at)
    }
}

impl<R: GuardianSetRegistry + ?Sized> GuardianSetRegistry for &R {
    fn lookup(&self, index: u32) -> Option<GuardianSet> {
        (**self).lookup(index)
    }

    fn current_index(&self) -> Option<u32> {
        (**self).current_index()
    }
}

/// In-memory append-only guardian set history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianSetLog {
    sets: BTreeMap<u32, GuardianSet>,
}

impl GuardianSetLog {
    /// Start a history from an initial set (usually index 0).
    pub fn new(genesis: GuardianSet) -> Self {
        let mut sets = BTreeMap::new();
        sets.insert(genesis.index, genesis);
        Self { sets }
    }

    pub fn current(&self) -> Option<&GuardianSet> {
        self.sets.values().next_back()
    }

    pub fn get(&self, index: u32) -> Option<&GuardianSet> {
        self.sets.get(&index)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Apply a guardian set upgrade: stamp the expiry of the previous set and append the new one.
    ///
    /// # Errors
    /// [`GovernanceError::NonSequentialGuardianSet`] if the transition does not extend the
    /// current set by exactly one, [`GovernanceError::GuardianSetIndexExhausted`] if the current
    /// index is `u32::MAX`, [`GovernanceError::EmptyGuardianSet`] for an empty new set.
    pub fn install(&mut self, transition: GuardianSetTransition) -> Result<(), GovernanceError> {
        let GuardianSetTransition {
            previous_index,
            new_set,
            previous_expires_at,
        } = transition;

        if new_set.is_empty() {
            return Err(GovernanceError::EmptyGuardianSet);
        }
        let current = self.current().map(|s| s.index);
        let expected = match current {
            Some(i) => i
                .checked_add(1)
                .ok_or(GovernanceError::GuardianSetIndexExhausted(i))?,
            None => 0,
        };
        if current != Some(previous_index) || new_set.index != expected {
            return Err(GovernanceError::NonSequentialGuardianSet {
                expected,
                found: new_set.index,
            });
        }

        if let Some(previous) = self.sets.get_mut(&previous_index) {
            previous.expiration_time = previous_expires_at;
        }
        tracing::debug!(
            previous = previous_index,
            new = new_set.index,
            expires_at = previous_expires_at,
            "installed guardian set"
        );
        self.sets.insert(new_set.index, new_set);
        Ok(())
    }
}

impl GuardianSetRegistry for GuardianSetLog {
    fn lookup(&self, index: u32) -> Option<GuardianSet> {
        self.sets.get(&index).cloned()
    }

    fn current_index(&self) -> Option<u32> {
        self.current().map(|s| s.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn set(index: u32, n: usize) -> GuardianSet {
        GuardianSet::new(index, (0..n).map(|i| [i as u8 + 1; 20]).collect())
    }

    #[test]
    fn test_quorum_table() {
        assert_eq!(quorum(1), 1);
        assert_eq!(quorum(2), 2);
        assert_eq!(quorum(3), 3);
        assert_eq!(quorum(4), 3);
        assert_eq!(quorum(19), 13);
        assert_eq!(set(0, 19).quorum(), 13);
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let mut s = set(0, 1);
        assert!(!s.is_expired(u32::MAX));
        s.expiration_time = 100;
        assert!(!s.is_expired(99));
        assert!(s.is_expired(100));
        assert!(s.is_expired(101));
    }

    #[test]
    fn test_membership() {
        let s = set(0, 3);
        assert!(s.contains(&[2; 20]));
        assert!(!s.contains(&[9; 20]));
        assert_eq!(s.address(2), Some(&[3; 20]));
        assert_eq!(s.address(3), None);
    }

    #[test]
    fn test_install_appends_and_expires_previous() {
        let mut log = GuardianSetLog::new(set(0, 1));
        assert!(log.is_current(0));

        log.install(GuardianSetTransition {
            previous_index: 0,
            new_set: set(1, 3),
            previous_expires_at: 86_500,
        })
        .unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.current_index(), Some(1));
        assert!(!log.is_current(0));
        assert_eq!(log.lookup(0).unwrap().expiration_time, 86_500);
        assert_eq!(log.lookup(1).unwrap().expiration_time, 0);
    }

    #[test]
    fn test_install_rejects_gaps_and_empty_sets() {
        let mut log = GuardianSetLog::new(set(0, 1));
        assert_eq!(
            log.install(GuardianSetTransition {
                previous_index: 0,
                new_set: set(2, 1),
                previous_expires_at: 1,
            }),
            Err(GovernanceError::NonSequentialGuardianSet {
                expected: 1,
                found: 2
            })
        );
        assert_eq!(
            log.install(GuardianSetTransition {
                previous_index: 0,
                new_set: GuardianSet::new(1, vec![]),
                previous_expires_at: 1,
            }),
            Err(GovernanceError::EmptyGuardianSet)
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_registry_by_reference() {
        fn current<R: GuardianSetRegistry>(r: R) -> Option<u32> {
            r.current_index()
        }
        let log = GuardianSetLog::new(set(5, 1));
        assert_eq!(current(&log), Some(5));
        assert!(log.lookup(4).is_none());
    }

    #[test]
    fn test_install_at_max_index_does_not_wrap() {
        let mut log = GuardianSetLog::new(set(u32::MAX, 1));
        assert_eq!(
            log.install(GuardianSetTransition {
                previous_index: u32::MAX,
                new_set: set(u32::MAX, 2),
                previous_expires_at: 1,
            }),
            Err(GovernanceError::GuardianSetIndexExhausted(u32::MAX))
        );
        assert_eq!(log.len(), 1);
        assert_eq!(log.lookup(u32::MAX).unwrap().expiration_time, 0);
    }
}
