//! # VAA Core
//!
//! Envelope codec, digest and guardian quorum verification for VAAs (Verified Action
//! Approvals), the signed cross-chain messages attested by a guardian set.
//!
//! ## Features
//!
//! - **Canonical codec**: big-endian envelope with bounds-checked reads and writes
//! - **Quorum verification**: secp256k1 recovery against `floor(2N/3)+1` of the guardian set
//! - **Governance**: guardian set upgrades and module actions as pure decisions
//! - **`no_std` Compatible**: only `alloc` is required
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vaa_core::{verify, GuardianSet, GuardianSetLog};
//!
//! # let raw: Vec<u8> = Vec::new();
//! # let addresses: Vec<[u8; 20]> = Vec::new();
//! // Guardian sets come from chain state; here a single set at index 0.
//! let registry = GuardianSetLog::new(GuardianSet::new(0, addresses));
//!
//! match verify(&raw, &registry, 1_700_000_000) {
//!     Ok(verified) => println!("verified {}", hex::encode(verified.hash())),
//!     Err(e) => println!("rejected: {e}"),
//! }
//! ```
//!
//! ## Governance
//!
//! A verified VAA from the governance emitter is handed to [`interpret_governance`] together
//! with the host's [`ClaimStore`]. The returned action is applied by the host, which then
//! marks [`VerifiedVaa::governance_claim_key`] consumed.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Module declarations
pub mod codec;
pub mod config;
pub mod digest;
pub mod error;
pub mod governance;
pub mod guardian;
pub mod quorum;
pub mod types;
pub mod verifier;

// Re-export entry points
pub use governance::interpret_governance;
pub use verifier::{verify, verify_vaa, verify_with};

// Re-export supporting API
pub use codec::{GovernanceAction, Module, Payload, PayloadShape, Vaa};
pub use config::{GovernanceConfig, VerifierConfig};
pub use digest::{digest, keccak256, ClaimKey, Digest};
pub use governance::{ClaimStore, GuardianSetTransition, MemoryClaimStore};
pub use guardian::{quorum, GuardianSet, GuardianSetLog, GuardianSetRegistry};
pub use quorum::{recover_address, verify_quorum};

// Re-export types
pub use error::{
    DecodeError, EncodeError, Error, GovernanceError, QuorumError, Result, VerificationError,
};
pub use types::{Address, Amount, ChainId, GuardianAddress, Signature, VerifiedVaa};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
