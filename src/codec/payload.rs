//! Typed payload dispatch.
//!
//! Governance payloads start with a 32-byte left-zero-padded ASCII module tag followed by an
//! action byte. Application payloads (token and NFT transfers) start with a payload id and
//! are only meaningful once the caller knows which module emitted them. Both are resolved
//! through a `(module, action)` table; pairs missing from the table decode to
//! [`Payload::Unknown`], which keeps the raw bytes and re-encodes them unchanged.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::codec::cursor::ByteReader;
use crate::codec::governance::GovernanceAction;
use crate::codec::nft_bridge::NftTransfer;
use crate::codec::token_bridge::TokenBridgePayload;
use crate::error::{DecodeError, EncodeError};

/// Modules that own payload formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Module {
    Core,
    TokenBridge,
    NftBridge,
}

impl Module {
    pub const ALL: [Module; 3] = [Module::Core, Module::TokenBridge, Module::NftBridge];

    pub const fn name(&self) -> &'static str {
        match self {
            Module::Core => "Core",
            Module::TokenBridge => "TokenBridge",
            Module::NftBridge => "NFTBridge",
        }
    }

    /// The 32-byte wire tag: ASCII name left-padded with zeros.
    pub fn tag(&self) -> [u8; 32] {
        let name = self.name().as_bytes();
        let mut tag = [0u8; 32];
        tag[32 - name.len()..].copy_from_slice(name);
        tag
    }

    pub fn from_tag(tag: &[u8; 32]) -> Result<Self, DecodeError> {
        Self::ALL
            .into_iter()
            .find(|m| m.tag() == *tag)
            .ok_or(DecodeError::InvalidModule)
    }
}

/// `(module, action)` pair selecting a payload layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Discriminator {
    pub module: Module,
    pub action: u8,
}

/// How a payload's leading bytes should be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadShape {
    /// Module tag + action byte (governance packets)
    Governance,
    /// Leading payload id, emitted by the given application module
    App(Module),
}

/// Decoded payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Governance(GovernanceAction),
    TokenBridge(TokenBridgePayload),
    NftBridge(NftTransfer),
    /// Unrecognised discriminator; raw bytes verbatim
    Unknown(Vec<u8>),
}

type ParseFn = fn(Discriminator, &mut ByteReader<'_>) -> Result<Payload, DecodeError>;

/// Dispatch table for governance packets.
fn governance_parser(d: Discriminator) -> Option<ParseFn> {
    match (d.module, d.action) {
        (Module::Core, 1..=4) | (Module::TokenBridge, 1..=2) | (Module::NftBridge, 1..=2) => {
            Some(parse_governance)
        }
        _ => None,
    }
}

/// Dispatch table for application payloads.
fn app_parser(d: Discriminator) -> Option<ParseFn> {
    match (d.module, d.action) {
        (Module::TokenBridge, 1..=3) => Some(parse_token_bridge),
        (Module::NftBridge, NftTransfer::PAYLOAD_ID) => Some(parse_nft_transfer),
        _ => None,
    }
}

fn parse_governance(d: Discriminator, r: &mut ByteReader<'_>) -> Result<Payload, DecodeError> {
    GovernanceAction::read_body(d, r).map(Payload::Governance)
}

fn parse_token_bridge(d: Discriminator, r: &mut ByteReader<'_>) -> Result<Payload, DecodeError> {
    TokenBridgePayload::read_body(d.action, r).map(Payload::TokenBridge)
}

fn parse_nft_transfer(_: Discriminator, r: &mut ByteReader<'_>) -> Result<Payload, DecodeError> {
    NftTransfer::read_body(r).map(Payload::NftBridge)
}

impl Payload {
    /// Decode `bytes` read as `shape`. `strict` rejects trailing bytes after fixed layouts.
    ///
    /// Only a recognised discriminator with a malformed body is an error.
    pub fn decode(bytes: &[u8], shape: PayloadShape, strict: bool) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);
        let (discriminator, parser) = match shape {
            PayloadShape::Governance => {
                let Ok(tag) = r.array::<32>() else {
                    return Ok(Self::Unknown(bytes.to_vec()));
                };
                let (Ok(module), Ok(action)) = (Module::from_tag(&tag), r.u8()) else {
                    return Ok(Self::Unknown(bytes.to_vec()));
                };
                let d = Discriminator { module, action };
                (d, governance_parser(d))
            }
            PayloadShape::App(module) => {
                let Ok(action) = r.u8() else {
                    return Ok(Self::Unknown(bytes.to_vec()));
                };
                let d = Discriminator { module, action };
                (d, app_parser(d))
            }
        };
        let Some(parse) = parser else {
            return Ok(Self::Unknown(bytes.to_vec()));
        };
        let payload = parse(discriminator, &mut r)?;
        if strict {
            r.finish()?;
        }
        Ok(payload)
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(match self {
            Self::Governance(action) => action.encode()?,
            Self::TokenBridge(p) => p.encode(),
            Self::NftBridge(p) => p.encode(),
            Self::Unknown(raw) => raw.clone(),
        })
    }

    pub fn discriminator(&self) -> Option<Discriminator> {
        match self {
            Self::Governance(action) => Some(action.discriminator()),
            Self::TokenBridge(p) => Some(Discriminator {
                module: Module::TokenBridge,
                action: p.payload_id(),
            }),
            Self::NftBridge(_) => Some(Discriminator {
                module: Module::NftBridge,
                action: NftTransfer::PAYLOAD_ID,
            }),
            Self::Unknown(_) => None,
        }
    }
}
