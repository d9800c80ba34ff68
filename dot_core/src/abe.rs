//! Hierarchical attribute-based key encapsulation.
//!
//! Each identity owns a domain ([`Params`] + [`MasterKey`]). Keys are bound to sparse
//! attribute vectors; a key for a vector can derive keys for any vector that extends it.
//! Ciphertexts are hybrid: the KEM yields a [`SymmetricKey`][crate::crypto::symmetric_key::SymmetricKey]
//! which seals the payload with XChaCha20-Poly1305.

pub mod attributes;
pub mod ciphertext;
pub mod encapsulation;
pub mod error;
pub mod params;
pub mod point;
pub mod private_key;

pub use attributes::Attributes;
pub use ciphertext::Ciphertext;
pub use error::{AbeError, OpenError};
pub use params::{MasterKey, Params, DEFAULT_SLOT_COUNT};
pub use private_key::PrivateKey;
