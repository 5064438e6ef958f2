//! Canonical big-endian wire formats.
//!
//! [`Vaa`] is the signed envelope; [`Payload`] interprets the opaque payload it carries.

pub mod cursor;
pub mod envelope;
pub mod governance;
pub mod nft_bridge;
pub mod payload;
pub mod token_bridge;

pub use cursor::{ByteReader, ByteWriter};
pub use envelope::{Body, Header, Vaa, BODY_FIXED_LEN, HEADER_FIXED_LEN, VAA_VERSION};
pub use governance::{GovernanceAction, ANY_CHAIN};
pub use nft_bridge::{NftTransfer, NftUri};
pub use payload::{Discriminator, Module, Payload, PayloadShape};
pub use token_bridge::{AssetMeta, TokenBridgePayload, Transfer, TransferWithPayload};
