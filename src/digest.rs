//! Keccak256 digests and replay-claim keys.
//!
//! Guardians sign `keccak256(keccak256(body))`. The inner hash identifies the body; the outer
//! one is the 32-byte message handed to secp256k1 recovery and doubles as the VAA hash used
//! for governance replay protection.

use sha3::{Digest as _, Keccak256};

use crate::types::{Address, ChainId};

/// Keccak256 hash helper.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Both hashes of a VAA body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Digest {
    /// keccak256(body)
    pub hash: [u8; 32],
    /// keccak256(keccak256(body)), the signed message and VAA hash
    pub secp256k_hash: [u8; 32],
}

impl Digest {
    pub fn of(body: &[u8]) -> Self {
        let hash = keccak256(body);
        Self {
            hash,
            secp256k_hash: keccak256(&hash),
        }
    }
}

/// Double keccak256 of the serialized body.
pub fn digest(body: &[u8]) -> [u8; 32] {
    Digest::of(body).secp256k_hash
}

/// Deterministic at-most-once execution key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClaimKey {
    /// Ordinary messages are unique per emitter and sequence.
    Message {
        emitter_chain: ChainId,
        emitter_address: Address,
        sequence: u64,
    },
    /// Governance actions are keyed by the VAA hash.
    Governance([u8; 32]),
}

impl ClaimKey {
    /// Collapse to 32 bytes suitable for a storage key.
    pub fn to_bytes(&self) -> [u8; 32] {
        match self {
            Self::Message {
                emitter_chain,
                emitter_address,
                sequence,
            } => {
                let mut hasher = Keccak256::new();
                hasher.update(emitter_chain.to_be_bytes());
                hasher.update(emitter_address.as_bytes());
                hasher.update(sequence.to_be_bytes());
                hasher.finalize().into()
            }
            Self::Governance(hash) => *hash,
        }
    }
}
