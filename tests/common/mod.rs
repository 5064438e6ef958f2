//! Shared fixtures: deterministic guardian keys and a VAA builder that signs like a guardian.

#![allow(dead_code)]

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey};
use vaa_core::quorum::public_key_to_address;
use vaa_core::{keccak256, Address, GuardianAddress, GuardianSet, Signature, Vaa};

/// Private key of the first signer in the EVM bridge test fixtures.
pub const TEST_SIGNER_1: &str = "cfb12303a19cde580bb4dd771639b0d26bc68353645571a8cff516ab2ee113a0";

pub fn test_signer_1() -> SigningKey {
    let bytes = hex::decode(TEST_SIGNER_1).unwrap();
    SigningKey::from_slice(&bytes).unwrap()
}

/// Deterministic guardian key `i`.
pub fn guardian_key(i: u8) -> SigningKey {
    SigningKey::from_slice(&keccak256(&[b'g', b'u', b'a', b'r', b'd', i])).unwrap()
}

pub fn guardian_keys(n: u8) -> Vec<SigningKey> {
    (0..n).map(guardian_key).collect()
}

pub fn address_of(key: &SigningKey) -> GuardianAddress {
    public_key_to_address(key.verifying_key())
}

pub fn guardian_set(index: u32, keys: &[SigningKey]) -> GuardianSet {
    GuardianSet::new(index, keys.iter().map(address_of).collect())
}

/// Sign the double-keccak `digest` as guardian `guardian_index`.
pub fn sign(key: &SigningKey, guardian_index: u8, digest: &[u8; 32]) -> Signature {
    let (sig, recid): (EcdsaSignature, RecoveryId) = key.sign_prehash(digest).unwrap();
    let mut rsv = [0u8; 65];
    rsv[..64].copy_from_slice(&sig.to_bytes());
    rsv[64] = recid.to_byte();
    Signature::from_rsv(guardian_index, &rsv)
}

/// Builder for VAAs in tests. Defaults to the message used by the EVM bridge tests.
#[derive(Clone, Debug)]
pub struct VaaBuilder {
    vaa: Vaa,
}

impl Default for VaaBuilder {
    fn default() -> Self {
        Self {
            vaa: Vaa {
                version: 1,
                guardian_set_index: 0,
                signatures: Vec::new(),
                timestamp: 1_000,
                nonce: 1_001,
                emitter_chain: 11,
                emitter_address: Address::left_padded(&[0x0e, 0xee]).unwrap(),
                sequence: 1_337,
                consistency_level: 2,
                payload: vec![0xaa, 0xaa, 0xaa],
            },
        }
    }
}

impl VaaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guardian_set_index(mut self, index: u32) -> Self {
        self.vaa.guardian_set_index = index;
        self
    }

    pub fn emitter(mut self, chain: u16, address: Address) -> Self {
        self.vaa.emitter_chain = chain;
        self.vaa.emitter_address = address;
        self
    }

    pub fn sequence(mut self, sequence: u64) -> Self {
        self.vaa.sequence = sequence;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.vaa.payload = payload;
        self
    }

    /// Sign with `(guardian_index, key)` pairs in the given order.
    pub fn signed_by(mut self, signers: &[(u8, &SigningKey)]) -> Vaa {
        let digest = self.vaa.digest().secp256k_hash;
        self.vaa.signatures = signers
            .iter()
            .map(|(index, key)| sign(key, *index, &digest))
            .collect();
        self.vaa
    }

    /// Sign with the first `count` keys at their own indices.
    pub fn signed_by_first(self, keys: &[SigningKey], count: usize) -> Vaa {
        let signers: Vec<_> = keys
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, k)| (i as u8, k))
            .collect();
        self.signed_by(&signers)
    }

    pub fn unsigned(self) -> Vaa {
        self.vaa
    }
}
