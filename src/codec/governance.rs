//! Governance packet layouts.
//!
//! Every packet is `module tag (32) || action (1) || target chain (2) || action body`.
//! A target chain of 0 addresses every chain.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{ByteReader, ByteWriter};
use crate::codec::payload::{Discriminator, Module};
use crate::error::{DecodeError, EncodeError};
use crate::types::{Address, Amount, ChainId, GuardianAddress};

/// Target chain value meaning "all chains".
pub const ANY_CHAIN: ChainId = 0;

pub mod action {
    //! Action bytes per module.

    pub const CORE_CONTRACT_UPGRADE: u8 = 1;
    pub const CORE_GUARDIAN_SET_UPGRADE: u8 = 2;
    pub const CORE_SET_MESSAGE_FEE: u8 = 3;
    pub const CORE_TRANSFER_FEES: u8 = 4;

    pub const BRIDGE_REGISTER_CHAIN: u8 = 1;
    pub const BRIDGE_CONTRACT_UPGRADE: u8 = 2;
}

/// A decoded governance instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceAction {
    /// Upgrade the contract of `module` on `chain`.
    ContractUpgrade {
        module: Module,
        chain: ChainId,
        new_contract: Address,
    },
    GuardianSetUpgrade {
        chain: ChainId,
        new_index: u32,
        new_addresses: Vec<GuardianAddress>,
    },
    SetMessageFee {
        chain: ChainId,
        fee: Amount,
    },
    TransferFees {
        chain: ChainId,
        amount: Amount,
        recipient: Address,
    },
    /// Register a foreign bridge emitter with `module` on `chain`.
    RegisterChain {
        module: Module,
        chain: ChainId,
        emitter_chain: ChainId,
        emitter_address: Address,
    },
}

impl GovernanceAction {
    pub fn module(&self) -> Module {
        match self {
            Self::ContractUpgrade { module, .. } | Self::RegisterChain { module, .. } => *module,
            Self::GuardianSetUpgrade { .. }
            | Self::SetMessageFee { .. }
            | Self::TransferFees { .. } => Module::Core,
        }
    }

    pub fn action_id(&self) -> u8 {
        match self {
            Self::ContractUpgrade {
                module: Module::Core,
                ..
            } => action::CORE_CONTRACT_UPGRADE,
            Self::ContractUpgrade { .. } => action::BRIDGE_CONTRACT_UPGRADE,
            Self::GuardianSetUpgrade { .. } => action::CORE_GUARDIAN_SET_UPGRADE,
            Self::SetMessageFee { .. } => action::CORE_SET_MESSAGE_FEE,
            Self::TransferFees { .. } => action::CORE_TRANSFER_FEES,
            Self::RegisterChain { .. } => action::BRIDGE_REGISTER_CHAIN,
        }
    }

    pub fn discriminator(&self) -> Discriminator {
        Discriminator {
            module: self.module(),
            action: self.action_id(),
        }
    }

    /// Chain the action is addressed to.
    pub fn target_chain(&self) -> ChainId {
        match self {
            Self::ContractUpgrade { chain, .. }
            | Self::GuardianSetUpgrade { chain, .. }
            | Self::SetMessageFee { chain, .. }
            | Self::TransferFees { chain, .. }
            | Self::RegisterChain { chain, .. } => *chain,
        }
    }

    /// Whether a contract on `chain_id` should execute this action.
    pub fn applies_to(&self, chain_id: ChainId) -> bool {
        let target = self.target_chain();
        target == ANY_CHAIN || target == chain_id
    }

    /// Read everything after the module tag and action byte.
    pub(crate) fn read_body(d: Discriminator, r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let chain = r.u16()?;
        let parsed = match (d.module, d.action) {
            (Module::Core, action::CORE_CONTRACT_UPGRADE) => Self::ContractUpgrade {
                module: Module::Core,
                chain,
                new_contract: Address(r.array()?),
            },
            (Module::Core, action::CORE_GUARDIAN_SET_UPGRADE) => {
                let new_index = r.u32()?;
                let count = r.u8()? as usize;
                let mut new_addresses = Vec::with_capacity(count);
                for _ in 0..count {
                    new_addresses.push(r.array()?);
                }
                Self::GuardianSetUpgrade {
                    chain,
                    new_index,
                    new_addresses,
                }
            }
            (Module::Core, action::CORE_SET_MESSAGE_FEE) => Self::SetMessageFee {
                chain,
                fee: Amount(r.array()?),
            },
            (Module::Core, action::CORE_TRANSFER_FEES) => Self::TransferFees {
                chain,
                amount: Amount(r.array()?),
                recipient: Address(r.array()?),
            },
            (module, action::BRIDGE_REGISTER_CHAIN) if module != Module::Core => {
                Self::RegisterChain {
                    module,
                    chain,
                    emitter_chain: r.u16()?,
                    emitter_address: Address(r.array()?),
                }
            }
            (module, action::BRIDGE_CONTRACT_UPGRADE) if module != Module::Core => {
                Self::ContractUpgrade {
                    module,
                    chain,
                    new_contract: Address(r.array()?),
                }
            }
            _ => return Err(DecodeError::InvalidModule),
        };
        Ok(parsed)
    }

    /// Encode the action.
    ///
    /// # Errors
    /// [`EncodeError::TooManyEntries`] for a guardian set upgrade with more than 255 addresses.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = ByteWriter::with_capacity(32 + 1 + 2 + 64);
        w.put_bytes(&self.module().tag())
            .put_u8(self.action_id())
            .put_u16(self.target_chain());
        match self {
            Self::ContractUpgrade { new_contract, .. } => {
                w.put_bytes(new_contract.as_bytes());
            }
            Self::GuardianSetUpgrade {
                new_index,
                new_addresses,
                ..
            } => {
                w.put_u32(*new_index)
                    .put_count_u8("guardian addresses", new_addresses.len())?;
                for addr in new_addresses {
                    w.put_bytes(addr);
                }
            }
            Self::SetMessageFee { fee, .. } => {
                w.put_bytes(&fee.0);
            }
            Self::TransferFees {
                amount, recipient, ..
            } => {
                w.put_bytes(&amount.0).put_bytes(recipient.as_bytes());
            }
            Self::RegisterChain {
                emitter_chain,
                emitter_address,
                ..
            } => {
                w.put_u16(*emitter_chain).put_bytes(emitter_address.as_bytes());
            }
        }
        Ok(w.into_bytes())
    }
}
