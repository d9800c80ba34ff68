use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbeError {
    #[error("Attribute domain must have at least one slot")]
    NoSlots,

    #[error("Attribute index {index} is out of range for a domain with {slot_count} slots")]
    SlotOutOfRange { index: usize, slot_count: usize },

    #[error("Key attributes do not extend to the requested attributes")]
    IncompatibleAttributes,

    #[error("Key is missing the delegation component for slot {0}")]
    MissingDelegationComponent(usize),

    #[error("Deriving nonce failed: {0}")]
    DeriveNonce(#[from] std::io::Error),

    #[error("Encryption failed: {0}")]
    Encryption(chacha20poly1305::Error),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] bincode::Error),
}

/// Why a ciphertext could not be opened with a given key.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The key's attributes don't match the ciphertext's. This is the expected outcome
    /// for most candidate keys.
    #[error("Key does not match the ciphertext attributes")]
    Mismatch,

    /// The AEAD tag checked out but the plaintext didn't decode.
    #[error("Decrypted payload is malformed: {0}")]
    Malformed(#[from] bincode::Error),
}
