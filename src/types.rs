//! Core value types shared across the codec, quorum verifier and governance interpreter.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{Payload, PayloadShape, Vaa};
use crate::config::VerifierConfig;
use crate::digest::{ClaimKey, Digest};
use crate::error::DecodeError;

/// 20-byte Ethereum-style guardian address (last 20 bytes of keccak256 of the public key).
pub type GuardianAddress = [u8; 20];

/// Wormhole chain identifier.
pub type ChainId = u16;

/// 32-byte universal emitter / contract address.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Left-pad a shorter native address (e.g. a 20-byte EVM address) to 32 bytes.
    pub fn left_padded(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > 32 {
            return None;
        }
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(bytes);
        Some(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// 256-bit unsigned amount carried big-endian on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(pub [u8; 32]);

impl Amount {
    /// Narrow to `u128`, or `None` if the upper 16 bytes are not zero.
    pub fn to_u128(&self) -> Option<u128> {
        let (high, low) = self.0.split_at(16);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(low);
        Some(u128::from_be_bytes(buf))
    }
}

impl From<u128> for Amount {
    fn from(v: u128) -> Self {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&v.to_be_bytes());
        Self(out)
    }
}

/// Guardian signature over a VAA digest.
///
/// Wire layout: `guardian_index (1) || r (32) || s (32) || recovery_id (1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Position of the signer in the guardian set
    pub guardian_index: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Raw recovery id (0 or 1 for canonical signatures)
    pub recovery_id: u8,
}

impl Signature {
    /// Encoded size in bytes.
    pub const LEN: usize = 66;

    /// Build from a 65-byte `r || s || v` compact signature.
    pub fn from_rsv(guardian_index: u8, rsv: &[u8; 65]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&rsv[..32]);
        s.copy_from_slice(&rsv[32..64]);
        Self {
            guardian_index,
            r,
            s,
            recovery_id: rsv[64],
        }
    }

    /// The 64-byte `r || s` part.
    pub fn rs(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

/// A VAA whose guardian signatures reached quorum against a live guardian set.
///
/// Only [`crate::verify`] produces values of this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedVaa {
    vaa: Vaa,
    digest: Digest,
}

impl VerifiedVaa {
    pub(crate) fn new(vaa: Vaa, digest: Digest) -> Self {
        Self { vaa, digest }
    }

    pub fn vaa(&self) -> &Vaa {
        &self.vaa
    }

    pub fn into_vaa(self) -> Vaa {
        self.vaa
    }

    /// The VAA hash: keccak256(keccak256(body)). This is what guardians sign.
    pub fn hash(&self) -> [u8; 32] {
        self.digest.secp256k_hash
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Interpret the payload, rejecting trailing bytes if `config.strict_payloads` is set.
    pub fn decode_payload_with(
        &self,
        config: &VerifierConfig,
        shape: PayloadShape,
    ) -> Result<Payload, DecodeError> {
        self.decode_payload(shape, config.strict_payloads)
    }

    /// Interpret the payload. See [`Payload::decode`].
    pub fn decode_payload(
        &self,
        shape: PayloadShape,
        strict: bool,
    ) -> Result<Payload, DecodeError> {
        Payload::decode(&self.vaa.payload, shape, strict)
    }

    /// Replay-protection key for ordinary messages.
    pub fn message_claim_key(&self) -> ClaimKey {
        ClaimKey::Message {
            emitter_chain: self.vaa.emitter_chain,
            emitter_address: self.vaa.emitter_address,
            sequence: self.vaa.sequence,
        }
    }

    /// Replay-protection key for governance actions.
    pub fn governance_claim_key(&self) -> ClaimKey {
        ClaimKey::Governance(self.hash())
    }
}
