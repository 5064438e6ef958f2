//! Verifier configuration.
//!
//! The core reads no files or environment variables; hosts hand in a JSON document (or
//! build the struct directly) and pass it down.

use alloc::format;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Address, ChainId};

/// Largest guardian set the protocol allows signatures from.
pub const MAX_GUARDIANS: usize = 19;

/// Default payload bound (30 KiB).
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 30 * 1_024;

/// Grace window during which a replaced guardian set still verifies VAAs (24h).
pub const DEFAULT_GUARDIAN_SET_GRACE_PERIOD: u32 = 86_400;

/// Mainnet governance emitter chain (Solana).
pub const GOVERNANCE_CHAIN: ChainId = 1;

/// Mainnet governance emitter address.
pub const GOVERNANCE_EMITTER: Address = Address([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4,
]);

/// Decode bounds and governance identity used by the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Maximum signatures accepted in an envelope before any allocation
    pub max_signatures: usize,
    /// Maximum payload length in bytes
    pub max_payload_len: usize,
    /// Reject trailing bytes after fixed-layout payloads
    pub strict_payloads: bool,
    /// Seconds an old guardian set stays valid after an upgrade
    pub guardian_set_grace_period_secs: u32,
    pub governance_chain: ChainId,
    pub governance_contract: Address,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_signatures: MAX_GUARDIANS,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            strict_payloads: true,
            guardian_set_grace_period_secs: DEFAULT_GUARDIAN_SET_GRACE_PERIOD,
            governance_chain: GOVERNANCE_CHAIN,
            governance_contract: GOVERNANCE_EMITTER,
        }
    }
}

impl VerifierConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_signatures == 0 || self.max_signatures > u8::MAX as usize {
            return Err(Error::Config(format!(
                "max_signatures must be in 1..=255, got {}",
                self.max_signatures
            )));
        }
        Ok(())
    }

    pub fn governance(&self) -> GovernanceConfig {
        GovernanceConfig {
            chain: self.governance_chain,
            contract: self.governance_contract,
            strict_payloads: self.strict_payloads,
        }
    }
}

/// Well-known governance emitter the interpreter checks against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub chain: ChainId,
    pub contract: Address,
    /// Reject governance actions followed by trailing bytes
    pub strict_payloads: bool,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        VerifierConfig::default().governance()
    }
}
