//! NFT bridge transfer payload.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{ByteReader, ByteWriter};
use crate::error::DecodeError;
use crate::types::{Address, Amount, ChainId};

/// Maximum URI length carried on the wire.
pub const MAX_URI_LEN: usize = 200;

/// Token URI bounded to [`MAX_URI_LEN`] bytes of UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NftUri(String);

impl NftUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NftUri {
    type Error = DecodeError;

    fn try_from(uri: String) -> Result<Self, Self::Error> {
        if uri.len() > MAX_URI_LEN {
            return Err(DecodeError::InvalidUri);
        }
        Ok(Self(uri))
    }
}

impl TryFrom<&str> for NftUri {
    type Error = DecodeError;

    fn try_from(uri: &str) -> Result<Self, Self::Error> {
        Self::try_from(String::from(uri))
    }
}

impl From<NftUri> for String {
    fn from(uri: NftUri) -> Self {
        uri.0
    }
}

impl fmt::Display for NftUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    pub nft_address: Address,
    pub nft_chain: ChainId,
    pub symbol: [u8; 32],
    pub name: [u8; 32],
    pub token_id: Amount,
    pub uri: NftUri,
    pub recipient: Address,
    pub recipient_chain: ChainId,
}

impl NftTransfer {
    pub const PAYLOAD_ID: u8 = 1;

    pub(crate) fn read_body(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let nft_address = Address(r.array()?);
        let nft_chain = r.u16()?;
        let symbol = r.array()?;
        let name = r.array()?;
        let token_id = Amount(r.array()?);
        let uri_len = r.u8()? as usize;
        let uri = String::from_utf8(r.take(uri_len)?.to_vec())
            .map_err(|_| DecodeError::InvalidUri)?;
        Ok(Self {
            nft_address,
            nft_chain,
            symbol,
            name,
            token_id,
            uri: NftUri::try_from(uri)?,
            recipient: Address(r.array()?),
            recipient_chain: r.u16()?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let uri = self.uri.as_str().as_bytes();
        let mut w = ByteWriter::with_capacity(1 + 32 + 2 + 32 + 32 + 32 + 1 + uri.len() + 32 + 2);
        w.put_u8(Self::PAYLOAD_ID)
            .put_bytes(self.nft_address.as_bytes())
            .put_u16(self.nft_chain)
            .put_bytes(&self.symbol)
            .put_bytes(&self.name)
            .put_bytes(&self.token_id.0)
            .put_u8(uri.len() as u8)
            .put_bytes(uri)
            .put_bytes(self.recipient.as_bytes())
            .put_u16(self.recipient_chain);
        w.into_bytes()
    }
}
