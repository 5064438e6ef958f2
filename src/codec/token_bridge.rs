//! Token bridge application payloads, keyed by their leading payload id.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{ByteReader, ByteWriter};
use crate::error::DecodeError;
use crate::types::{Address, Amount, ChainId};

pub const PAYLOAD_TRANSFER: u8 = 1;
pub const PAYLOAD_ASSET_META: u8 = 2;
pub const PAYLOAD_TRANSFER_WITH_PAYLOAD: u8 = 3;

/// Token transfer. Amounts are truncated to 8 decimals on the source chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub amount: Amount,
    pub token_address: Address,
    pub token_chain: ChainId,
    pub recipient: Address,
    pub recipient_chain: ChainId,
    pub fee: Amount,
}

/// Attestation of a token's metadata so it can be wrapped elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMeta {
    pub token_address: Address,
    pub token_chain: ChainId,
    pub decimals: u8,
    /// Left-aligned, zero padded
    pub symbol: [u8; 32],
    pub name: [u8; 32],
}

/// Transfer carrying an arbitrary payload for the recipient contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferWithPayload {
    pub amount: Amount,
    pub token_address: Address,
    pub token_chain: ChainId,
    pub recipient: Address,
    pub recipient_chain: ChainId,
    pub sender: Address,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenBridgePayload {
    Transfer(Transfer),
    AssetMeta(AssetMeta),
    TransferWithPayload(TransferWithPayload),
}

impl TokenBridgePayload {
    pub fn payload_id(&self) -> u8 {
        match self {
            Self::Transfer(_) => PAYLOAD_TRANSFER,
            Self::AssetMeta(_) => PAYLOAD_ASSET_META,
            Self::TransferWithPayload(_) => PAYLOAD_TRANSFER_WITH_PAYLOAD,
        }
    }

    /// Read everything after the payload id.
    pub(crate) fn read_body(payload_id: u8, r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        match payload_id {
            PAYLOAD_TRANSFER => Ok(Self::Transfer(Transfer {
                amount: Amount(r.array()?),
                token_address: Address(r.array()?),
                token_chain: r.u16()?,
                recipient: Address(r.array()?),
                recipient_chain: r.u16()?,
                fee: Amount(r.array()?),
            })),
            PAYLOAD_ASSET_META => Ok(Self::AssetMeta(AssetMeta {
                token_address: Address(r.array()?),
                token_chain: r.u16()?,
                decimals: r.u8()?,
                symbol: r.array()?,
                name: r.array()?,
            })),
            PAYLOAD_TRANSFER_WITH_PAYLOAD => Ok(Self::TransferWithPayload(TransferWithPayload {
                amount: Amount(r.array()?),
                token_address: Address(r.array()?),
                token_chain: r.u16()?,
                recipient: Address(r.array()?),
                recipient_chain: r.u16()?,
                sender: Address(r.array()?),
                payload: r.rest().to_vec(),
            })),
            _ => Err(DecodeError::InvalidModule),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(133);
        w.put_u8(self.payload_id());
        match self {
            Self::Transfer(t) => {
                w.put_bytes(&t.amount.0)
                    .put_bytes(t.token_address.as_bytes())
                    .put_u16(t.token_chain)
                    .put_bytes(t.recipient.as_bytes())
                    .put_u16(t.recipient_chain)
                    .put_bytes(&t.fee.0);
            }
            Self::AssetMeta(m) => {
                w.put_bytes(m.token_address.as_bytes())
                    .put_u16(m.token_chain)
                    .put_u8(m.decimals)
                    .put_bytes(&m.symbol)
                    .put_bytes(&m.name);
            }
            Self::TransferWithPayload(t) => {
                w.put_bytes(&t.amount.0)
                    .put_bytes(t.token_address.as_bytes())
                    .put_u16(t.token_chain)
                    .put_bytes(t.recipient.as_bytes())
                    .put_u16(t.recipient_chain)
                    .put_bytes(t.sender.as_bytes())
                    .put_bytes(&t.payload);
            }
        }
        w.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::payload::{Module, Payload, PayloadShape};
    use alloc::vec;

    fn decode(bytes: &[u8]) -> Result<Payload, DecodeError> {
        Payload::decode(bytes, PayloadShape::App(Module::TokenBridge), true)
    }

    fn transfer() -> Transfer {
        Transfer {
            amount: Amount::from(100_000_000u128),
            token_address: Address([0xaa; 32]),
            token_chain: 2,
            recipient: Address([0xbb; 32]),
            recipient_chain: 1,
            fee: Amount::default(),
        }
    }

    #[test]
    fn test_transfer_is_133_bytes() {
        let payload = TokenBridgePayload::Transfer(transfer());
        let raw = payload.encode();
        assert_eq!(raw.len(), 133);
        assert_eq!(raw[0], PAYLOAD_TRANSFER);
        assert_eq!(decode(&raw).unwrap(), Payload::TokenBridge(payload));
    }

    #[test]
    fn test_asset_meta_is_100_bytes() {
        let mut symbol = [0u8; 32];
        symbol[..4].copy_from_slice(b"WETH");
        let payload = TokenBridgePayload::AssetMeta(AssetMeta {
            token_address: Address([1; 32]),
            token_chain: 2,
            decimals: 18,
            symbol,
            name: [0u8; 32],
        });
        let raw = payload.encode();
        assert_eq!(raw.len(), 100);
        assert_eq!(decode(&raw).unwrap(), Payload::TokenBridge(payload));
    }

    #[test]
    fn test_transfer_with_payload_keeps_tail() {
        let t = transfer();
        let payload = TokenBridgePayload::TransferWithPayload(TransferWithPayload {
            amount: t.amount,
            token_address: t.token_address,
            token_chain: t.token_chain,
            recipient: t.recipient,
            recipient_chain: t.recipient_chain,
            sender: Address([0xcc; 32]),
            payload: vec![1, 2, 3, 4],
        });
        let raw = payload.encode();
        assert_eq!(&raw[raw.len() - 4..], &[1, 2, 3, 4]);
        assert_eq!(decode(&raw).unwrap(), Payload::TokenBridge(payload));
    }

    #[test]
    fn test_transfer_trailing_bytes_rejected_in_strict_mode() {
        let mut raw = TokenBridgePayload::Transfer(transfer()).encode();
        raw.extend_from_slice(&[0, 0]);
        assert_eq!(decode(&raw), Err(DecodeError::TrailingBytes(2)));
    }

    #[test]
    fn test_unknown_payload_id_is_unknown() {
        let raw = vec![9u8, 1, 2, 3];
        assert_eq!(decode(&raw).unwrap(), Payload::Unknown(raw));
    }
}
