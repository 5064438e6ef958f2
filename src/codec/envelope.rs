//! The VAA envelope: header (version, guardian set, signatures) followed by the signed body.
//!
//! ```text
//! u8   version
//! u32  guardian_set_index
//! u8   signature_count
//! [u8 guardian_index, [u8; 32] r, [u8; 32] s, u8 recovery_id] * signature_count
//! ---- body ----
//! u32  timestamp
//! u32  nonce
//! u16  emitter_chain
//! [u8; 32] emitter_address
//! u64  sequence
//! u8   consistency_level
//! ..   payload (rest of input)
//! ```

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::codec::cursor::{ByteReader, ByteWriter};
use crate::config::VerifierConfig;
use crate::digest::Digest;
use crate::error::{DecodeError, EncodeError};
use crate::types::{Address, ChainId, Signature};

/// The only envelope version in use.
pub const VAA_VERSION: u8 = 1;

/// Size of the header without signatures.
pub const HEADER_FIXED_LEN: usize = 1 + 4 + 1;

/// Size of the body without payload.
pub const BODY_FIXED_LEN: usize = 4 + 4 + 2 + 32 + 8 + 1;

/// Fully decoded VAA. Equal values always encode to equal bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vaa {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<Signature>,
    /// Seconds since UNIX epoch
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: ChainId,
    pub emitter_address: Address,
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: Vec<u8>,
}

/// Envelope part carrying the guardian attestation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<Signature>,
}

/// Envelope part that is hashed and signed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Body {
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: ChainId,
    pub emitter_address: Address,
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: Vec<u8>,
}

/// Borrowed header fields. The single serializer for the header region.
struct HeaderFields<'a> {
    version: u8,
    guardian_set_index: u32,
    signatures: &'a [Signature],
}

impl HeaderFields<'_> {
    fn encoded_len(&self) -> usize {
        HEADER_FIXED_LEN + self.signatures.len() * Signature::LEN
    }

    fn write(&self, w: &mut ByteWriter) -> Result<(), EncodeError> {
        w.put_u8(self.version)
            .put_u32(self.guardian_set_index)
            .put_count_u8("signatures", self.signatures.len())?;
        for sig in self.signatures {
            w.put_u8(sig.guardian_index)
                .put_bytes(&sig.r)
                .put_bytes(&sig.s)
                .put_u8(sig.recovery_id);
        }
        Ok(())
    }
}

/// Borrowed body fields. The single serializer for the signed region.
struct BodyFields<'a> {
    timestamp: u32,
    nonce: u32,
    emitter_chain: ChainId,
    emitter_address: &'a Address,
    sequence: u64,
    consistency_level: u8,
    payload: &'a [u8],
}

impl BodyFields<'_> {
    fn encoded_len(&self) -> usize {
        BODY_FIXED_LEN + self.payload.len()
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put_u32(self.timestamp)
            .put_u32(self.nonce)
            .put_u16(self.emitter_chain)
            .put_bytes(self.emitter_address.as_bytes())
            .put_u64(self.sequence)
            .put_u8(self.consistency_level)
            .put_bytes(self.payload);
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.encoded_len());
        self.write(&mut w);
        w.into_bytes()
    }
}

impl Header {
    fn fields(&self) -> HeaderFields<'_> {
        HeaderFields {
            version: self.version,
            guardian_set_index: self.guardian_set_index,
            signatures: &self.signatures,
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.fields().encoded_len()
    }

    /// Fails if there are more signatures than the one-byte count can express.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let fields = self.fields();
        let mut w = ByteWriter::with_capacity(fields.encoded_len());
        fields.write(&mut w)?;
        Ok(w.into_bytes())
    }

    fn read(r: &mut ByteReader<'_>, max_signatures: usize) -> Result<Self, DecodeError> {
        let version = r.u8()?;
        if version != VAA_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let guardian_set_index = r.u32()?;
        let count = r.u8()? as usize;
        if count > max_signatures {
            return Err(DecodeError::TooManySignatures {
                count,
                max: max_signatures,
            });
        }
        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            signatures.push(Signature {
                guardian_index: r.u8()?,
                r: r.array()?,
                s: r.array()?,
                recovery_id: r.u8()?,
            });
        }
        Ok(Self {
            version,
            guardian_set_index,
            signatures,
        })
    }
}

impl Body {
    fn fields(&self) -> BodyFields<'_> {
        BodyFields {
            timestamp: self.timestamp,
            nonce: self.nonce,
            emitter_chain: self.emitter_chain,
            emitter_address: &self.emitter_address,
            sequence: self.sequence,
            consistency_level: self.consistency_level,
            payload: &self.payload,
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.fields().encoded_len()
    }

    /// Canonical body serialization; this is exactly what guardians hash.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.fields().to_bytes()
    }

    pub fn digest(&self) -> Digest {
        Digest::of(&self.to_bytes())
    }

    fn read(r: &mut ByteReader<'_>, max_payload_len: usize) -> Result<Self, DecodeError> {
        let timestamp = r.u32()?;
        let nonce = r.u32()?;
        let emitter_chain = r.u16()?;
        let emitter_address = Address(r.array()?);
        let sequence = r.u64()?;
        let consistency_level = r.u8()?;
        if r.remaining() > max_payload_len {
            return Err(DecodeError::PayloadTooLarge {
                len: r.remaining(),
                max: max_payload_len,
            });
        }
        Ok(Self {
            timestamp,
            nonce,
            emitter_chain,
            emitter_address,
            sequence,
            consistency_level,
            payload: r.rest().to_vec(),
        })
    }

    /// Decode a standalone body, e.g. an observation before guardians sign it.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::read(&mut ByteReader::new(bytes), usize::MAX)
    }
}

impl Vaa {
    /// Decode with the default bounds (19 signatures, 30 KiB payload).
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(bytes, &VerifierConfig::default())
    }

    /// Decode, enforcing the signature-count and payload bounds in `config` before allocating.
    pub fn decode_with(bytes: &[u8], config: &VerifierConfig) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);
        let header = Header::read(&mut r, config.max_signatures)?;
        let body = Body::read(&mut r, config.max_payload_len)?;
        Ok((header, body).into())
    }

    fn header_fields(&self) -> HeaderFields<'_> {
        HeaderFields {
            version: self.version,
            guardian_set_index: self.guardian_set_index,
            signatures: &self.signatures,
        }
    }

    fn body_fields(&self) -> BodyFields<'_> {
        BodyFields {
            timestamp: self.timestamp,
            nonce: self.nonce,
            emitter_chain: self.emitter_chain,
            emitter_address: &self.emitter_address,
            sequence: self.sequence,
            consistency_level: self.consistency_level,
            payload: &self.payload,
        }
    }

    /// Encode the full envelope.
    ///
    /// # Errors
    /// [`EncodeError::TooManyEntries`] if there are more than 255 signatures.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let (header, body) = (self.header_fields(), self.body_fields());
        let mut w = ByteWriter::with_capacity(header.encoded_len() + body.encoded_len());
        header.write(&mut w)?;
        body.write(&mut w);
        Ok(w.into_bytes())
    }

    /// Serialized header region (version through the last signature).
    pub fn header_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let header = self.header_fields();
        let mut w = ByteWriter::with_capacity(header.encoded_len());
        header.write(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Serialized body region (timestamp through payload).
    pub fn body_bytes(&self) -> Vec<u8> {
        self.body_fields().to_bytes()
    }

    pub fn digest(&self) -> Digest {
        Digest::of(&self.body_bytes())
    }

    pub fn split(self) -> (Header, Body) {
        (
            Header {
                version: self.version,
                guardian_set_index: self.guardian_set_index,
                signatures: self.signatures,
            },
            Body {
                timestamp: self.timestamp,
                nonce: self.nonce,
                emitter_chain: self.emitter_chain,
                emitter_address: self.emitter_address,
                sequence: self.sequence,
                consistency_level: self.consistency_level,
                payload: self.payload,
            },
        )
    }
}

impl From<(Header, Body)> for Vaa {
    fn from((header, body): (Header, Body)) -> Self {
        Self {
            version: header.version,
            guardian_set_index: header.guardian_set_index,
            signatures: header.signatures,
            timestamp: body.timestamp,
            nonce: body.nonce,
            emitter_chain: body.emitter_chain,
            emitter_address: body.emitter_address,
            sequence: body.sequence,
            consistency_level: body.consistency_level,
            payload: body.payload,
        }
    }
}
