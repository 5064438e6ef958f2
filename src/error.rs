//! Error types for VAA decoding, verification and governance.
//!
//! Every failure is a local validation outcome returned to the caller. The `Display`
//! strings of the quorum and governance errors match the revert strings used by the
//! on-chain verifier contracts so hosts can surface them unchanged.

use alloc::string::String;
use thiserror::Error;

/// Failures while decoding the binary envelope or a payload sub-format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before a fixed-width field could be read.
    #[error("input too short: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    TooShort {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("VM version incompatible: {0}")]
    UnsupportedVersion(u8),
    /// Strict decoding found bytes after a fixed-layout structure.
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
    #[error("too many signatures: {count} (max {max})")]
    TooManySignatures { count: usize, max: usize },
    #[error("payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },
    /// Module tag is not left-zero-padded ASCII or does not match the expected module.
    #[error("invalid Module")]
    InvalidModule,
    #[error("invalid NFT uri")]
    InvalidUri,
}

/// Values whose list lengths do not fit the wire format's count prefixes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{field} has {len} entries, at most {max} can be encoded")]
    TooManyEntries {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Failures of the guardian signature quorum check.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuorumError {
    #[error("no quorum")]
    NoQuorum,
    #[error("signature indices must be ascending")]
    IndicesNotAscending,
    /// Signature at this guardian index did not recover to the guardian's address.
    #[error("VM signature invalid")]
    InvalidSignature { guardian_index: u8 },
}

/// Failures of the top-level verification pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("malformed VAA: {0}")]
    Malformed(DecodeError),
    #[error("invalid guardian set")]
    UnknownGuardianSet(u32),
    #[error("guardian set has expired")]
    GuardianSetExpired(u32),
    #[error("{0}")]
    QuorumFailed(QuorumError),
}

impl From<DecodeError> for VerificationError {
    fn from(e: DecodeError) -> Self {
        Self::Malformed(e)
    }
}

impl From<QuorumError> for VerificationError {
    fn from(e: QuorumError) -> Self {
        Self::QuorumFailed(e)
    }
}

/// Rejections specific to governance VAAs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("wrong governance chain")]
    WrongGovernanceChain,
    #[error("wrong governance contract")]
    WrongGovernanceContract,
    #[error("not signed by current guardian set")]
    NotCurrentGuardianSet,
    #[error("governance action already consumed")]
    AlreadyConsumed,
    #[error("invalid governance action")]
    UnsupportedAction,
    #[error("invalid governance payload: {0}")]
    MalformedPayload(DecodeError),
    #[error("index must increase in steps of 1")]
    NonSequentialGuardianSet { expected: u32, found: u32 },
    /// The current set already has the largest representable index.
    #[error("guardian set index {0} has no successor")]
    GuardianSetIndexExhausted(u32),
    #[error("new guardian set is empty")]
    EmptyGuardianSet,
}

/// Any error produced by this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Quorum(#[from] QuorumError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Governance(#[from] GovernanceError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for VAA core operations.
pub type Result<T> = core::result::Result<T, Error>;
