//! Wrap data in signatures.

use crate::entity::EntityId;
use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::instrument;

/// A wrapper to add a signature and signer information to an arbitrary payload.
///
/// The signature covers the canonical (`bincode`) encoding of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signed<T: Serialize + Debug> {
    /// The data that was signed.
    pub(crate) payload: T,

    /// The verifying key of the signer (for verifying the signature).
    pub(crate) issuer: ed25519_dalek::VerifyingKey,

    /// The signature of the payload, which can be verified by the `issuer`.
    pub(crate) signature: ed25519_dalek::Signature,
}

impl<T: Serialize + Debug> Signed<T> {
    /// Sign a payload.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dot_core::crypto::signed::Signed;
    /// let sk = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
    /// let signed = Signed::try_sign(&sk, "Hello, world!".to_string()).unwrap();
    /// assert!(signed.try_verify().is_ok());
    /// ```
    #[instrument(skip_all)]
    pub fn try_sign(
        signing_key: &ed25519_dalek::SigningKey,
        payload: T,
    ) -> Result<Self, SigningError> {
        let buf: Vec<u8> = bincode::serialize(&payload)?;
        let signature = signing_key.try_sign(buf.as_slice())?;
        Ok(Signed {
            payload,
            issuer: signing_key.verifying_key(),
            signature,
        })
    }

    /// Getter for the payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Getter for the [`EntityId`] of the signer.
    pub fn id(&self) -> EntityId {
        self.issuer.into()
    }

    /// Getter for the verifying key of the signer.
    pub fn issuer(&self) -> &ed25519_dalek::VerifyingKey {
        &self.issuer
    }

    pub fn signature(&self) -> &ed25519_dalek::Signature {
        &self.signature
    }

    /// Verify the payload and signature against the issuer's verifying key.
    #[instrument(skip_all)]
    pub fn try_verify(&self) -> Result<(), VerificationError> {
        let buf: Vec<u8> = bincode::serialize(&self.payload)?;
        Ok(self.issuer.verify(buf.as_slice(), &self.signature)?)
    }

    pub(crate) fn into_payload(self) -> T {
        self.payload
    }
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(#[from] signature::Error),

    #[error("Payload deserialization failed: {0}")]
    SerializationFailed(#[from] bincode::Error),
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Signing failed: {0}")]
    SigningFailed(#[from] ed25519_dalek::SignatureError),

    #[error("Payload serialization failed: {0}")]
    SerializationFailed(#[from] bincode::Error),
}
