//! Nonce-misuse resistant initialization vector.

use super::{domain_separator::SEPARATOR, symmetric_key::SymmetricKey};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Nonce-misuse resistant initialization vector.
///
/// Note that ChaCha having a very different foundation, this is not the well-known SIV mode from AES.
///
/// The nonce is derived deterministically from the key, the plaintext, and a caller-chosen
/// context (for DOTs: the role of the ciphertext inside the envelope). Keys coming out of
/// the attribute-based KEM are single-use, so this mostly guards against a broken RNG.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Siv([u8; 24]);

impl Siv {
    pub fn new(key: &SymmetricKey, plaintext: &[u8], context: &[u8]) -> Result<Self, std::io::Error> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(SEPARATOR);
        hasher.update(context);
        hasher.update(key.as_slice());
        hasher.update(plaintext);

        let mut buf = [0; 24];
        hasher.finalize_xof().read_exact(&mut buf)?;

        Ok(Siv(buf))
    }

    /// Convert to a [`chacha20poly1305::XNonce`].
    pub fn as_xnonce(&self) -> &chacha20poly1305::XNonce {
        chacha20poly1305::XNonce::from_slice(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 24] {
        &self.0
    }
}

impl From<Siv> for [u8; 24] {
    fn from(siv: Siv) -> Self {
        siv.0
    }
}

impl From<[u8; 24]> for Siv {
    fn from(arr: [u8; 24]) -> Self {
        Siv(arr)
    }
}
