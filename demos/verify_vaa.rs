//! Verify a guardian-signed VAA and interpret a guardian set upgrade.
//!
//! Run with: RUST_LOG=debug cargo run --example verify_vaa

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey};
use tracing_subscriber::EnvFilter;
use vaa_core::quorum::public_key_to_address;
use vaa_core::{
    interpret_governance, keccak256, verify, ClaimStore, GovernanceAction, GuardianSet,
    GuardianSetLog, GuardianSetRegistry, MemoryClaimStore, Signature, Vaa, VerifierConfig,
};

fn guardian(i: u8) -> SigningKey {
    // Demo keys only.
    SigningKey::from_slice(&keccak256(&[b'd', b'e', b'm', b'o', i])).expect("valid scalar")
}

fn sign(vaa: &mut Vaa, keys: &[SigningKey]) {
    let hash = vaa.digest().secp256k_hash;
    vaa.signatures = keys
        .iter()
        .enumerate()
        .map(|(i, k)| {
            let (sig, recid): (EcdsaSignature, RecoveryId) =
                k.sign_prehash(&hash).expect("signing succeeds");
            let mut rsv = [0u8; 65];
            rsv[..64].copy_from_slice(&sig.to_bytes());
            rsv[64] = recid.to_byte();
            Signature::from_rsv(i as u8, &rsv)
        })
        .collect();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = VerifierConfig::default();
    let governance = config.governance();

    println!("VAA core v{}", vaa_core::VERSION);
    println!();

    // Step 1: a single-guardian devnet set
    let genesis: Vec<_> = (0..1).map(guardian).collect();
    let mut registry = GuardianSetLog::new(GuardianSet::new(
        0,
        genesis
            .iter()
            .map(|k| public_key_to_address(k.verifying_key()))
            .collect(),
    ));
    println!("Guardian set 0: {} guardian(s)", genesis.len());

    // Step 2: a message VAA
    let mut message = Vaa {
        version: 1,
        timestamp: 1_000,
        nonce: 1_001,
        emitter_chain: 11,
        sequence: 1_337,
        consistency_level: 2,
        payload: vec![0xaa, 0xaa, 0xaa],
        ..Vaa::default()
    };
    sign(&mut message, &genesis);
    let raw = message.encode().expect("one signature");
    match verify(&raw, &registry, 2_000) {
        Ok(verified) => println!("Message verified, hash 0x{}", hex::encode(verified.hash())),
        Err(e) => println!("Message rejected: {e}"),
    }

    // Step 3: upgrade to a 19-guardian set
    let next: Vec<_> = (1..20).map(guardian).collect();
    let upgrade = GovernanceAction::GuardianSetUpgrade {
        chain: 0,
        new_index: 1,
        new_addresses: next
            .iter()
            .map(|k| public_key_to_address(k.verifying_key()))
            .collect(),
    };
    let mut governance_vaa = Vaa {
        version: 1,
        timestamp: 2_000,
        emitter_chain: governance.chain,
        emitter_address: governance.contract,
        sequence: 1,
        payload: upgrade.encode().expect("19 guardians fit a one-byte count"),
        ..Vaa::default()
    };
    sign(&mut governance_vaa, &genesis);

    let mut claims = MemoryClaimStore::new();
    let now = 2_000;
    let raw_governance = governance_vaa.encode().expect("one signature");
    let outcome = verify(&raw_governance, &registry, now)
        .map_err(vaa_core::Error::from)
        .and_then(|verified| {
            let current = registry.current_index().unwrap_or_default();
            let action = interpret_governance(&verified, &governance, current, &claims)?;
            Ok((verified, action))
        });

    match outcome {
        Ok((verified, action)) => {
            if let Some(transition) =
                action.transition(now, config.guardian_set_grace_period_secs)
            {
                let new_index = transition.new_set.index;
                match registry.install(transition) {
                    Ok(()) => println!("Installed guardian set {new_index}"),
                    Err(e) => println!("Install failed: {e}"),
                }
            }
            claims.mark_consumed(verified.governance_claim_key().to_bytes());

            // Replaying the same VAA is refused.
            if let Err(e) = interpret_governance(&verified, &governance, 0, &claims) {
                println!("Replay rejected: {e}");
            }
        }
        Err(e) => println!("Governance rejected: {e}"),
    }

    // Step 4: the old set keeps verifying until the grace period ends
    let expires = registry.lookup(0).map(|s| s.expiration_time).unwrap_or(0);
    println!("Guardian set 0 expires at {expires}");
    for at in [expires.saturating_sub(1), expires] {
        match verify(&raw, &registry, at) {
            Ok(_) => println!("  t={at}: message still valid"),
            Err(e) => println!("  t={at}: {e}"),
        }
    }
}
