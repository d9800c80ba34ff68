use crate::{
    abe::AbeError,
    crypto::{hash_scheme::UnsupportedScheme, signed::SigningError},
    keyring::Keyring,
};
use derive_where::derive_where;
use thiserror::Error;

#[derive(Error)]
#[derive_where(Debug)]
pub enum EncryptError<K: Keyring> {
    #[error("Partition label has {actual} slots, the destination domain has {expected}")]
    MalformedPartitionLabel { expected: usize, actual: usize },

    #[error("Failed to fetch destination parameters: {0}")]
    ParameterFetchFailed(K::Error),

    #[error("Content source is not the keyring's signing identity")]
    SourceMismatch,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(#[from] AbeError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("Configured hash scheme is not supported")]
    UnsupportedScheme(#[from] UnsupportedScheme),
}

#[derive(Error)]
#[derive_where(Debug)]
pub enum DecryptError<K: Keyring> {
    /// None of the keys on offer opens the envelope.
    #[error("No usable key")]
    NoUsableKey,

    /// A key opened the envelope but its parts don't agree. Never trust this DOT.
    #[error("Tampered envelope: {0}")]
    TamperedEnvelope(TamperReason),

    #[error("Decryption was cancelled")]
    Cancelled,

    #[error("Keyring error: {0}")]
    Keyring(K::Error),
}

impl<K: Keyring> DecryptError<K> {
    /// The reader definitely lacks the rights to this DOT.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, DecryptError::NoUsableKey)
    }

    pub fn is_tampered(&self) -> bool {
        matches!(self, DecryptError::TamperedEnvelope(_))
    }
}

/// Which consistency check an opened envelope failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TamperReason {
    #[error("content signature does not verify")]
    BadSignature,

    #[error("content is not signed by its source")]
    SourceMismatch,

    #[error("header destination differs from content destination")]
    DestinationMismatch,

    #[error("sealed label has {label} slots, envelope declares {envelope}")]
    SlotCountMismatch { envelope: usize, label: usize },

    #[error("sealed inheritance map differs from the public one")]
    InheritanceMismatch,

    #[error("label disclosure contradicts the sealed label")]
    DisclosureMismatch,

    #[error("authenticated payload does not decode")]
    MalformedPayload,
}

#[derive(Error)]
#[derive_where(Debug)]
pub enum DelegationError<K: Keyring> {
    #[error("Depth {depth} is not a prefix of a {slot_count}-slot label")]
    DepthOutOfRange { depth: usize, slot_count: usize },

    #[error("Keyring error: {0}")]
    Keyring(K::Error),

    #[error("Keyring returned a key for different attributes")]
    UnexpectedAttributes,
}
