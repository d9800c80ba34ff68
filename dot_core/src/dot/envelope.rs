//! The stored and transmitted form of an encrypted DOT.

use super::{
    header::PlaintextHeader,
    inheritance::{DisclosedLabel, InheritanceMap},
    sealed::SealedDot,
};
use crate::{
    abe::Ciphertext,
    crypto::hash_scheme::{HashScheme, HashSchemeInstance, SchemeId, TaggedDigest, UnsupportedScheme},
    entity::EntityId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// An encrypted DOT.
///
/// Only the header, the slot count, and the inheritance policy are public. The label
/// values live inside the content ciphertext, and (subject to the policy) inside one
/// disclosure per proper prefix, each sealed under that prefix's attributes.
///
/// The envelope's identity is the digest of its canonical (`bincode`) bytes under
/// [`hash_scheme`][Envelope::hash_scheme].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub(crate) header: PlaintextHeader,
    pub(crate) hash_scheme: SchemeId,
    pub(crate) slot_count: usize,
    pub(crate) content: Ciphertext<SealedDot>,
    pub(crate) disclosures: BTreeMap<usize, Ciphertext<DisclosedLabel>>,
    pub(crate) inheritance: InheritanceMap,
    pub(crate) extensions: Vec<Extension>,
}

/// A self-delimiting record for fields this version doesn't know. Readers skip them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extension {
    pub id: SchemeId,

    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn header(&self) -> &PlaintextHeader {
        &self.header
    }

    pub fn dst(&self) -> EntityId {
        self.header.dst
    }

    pub fn hash_scheme(&self) -> &SchemeId {
        &self.hash_scheme
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn inheritance(&self) -> &InheritanceMap {
        &self.inheritance
    }

    /// Depths at which a prefix-key holder can learn (part of) the label.
    pub fn disclosure_depths(&self) -> impl Iterator<Item = usize> + '_ {
        self.disclosures.keys().copied()
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn push_extension(&mut self, extension: Extension) {
        self.extensions.push(extension);
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Digest of the canonical bytes under the declared scheme.
    pub fn hash(&self) -> Result<HashSchemeInstance, EnvelopeError> {
        let bytes = self.to_bytes()?;
        Ok(HashScheme::for_id(&self.hash_scheme).digest(&bytes)?)
    }

    /// [`hash`][Envelope::hash] in its tagged wire form.
    pub fn tagged_hash(&self) -> Result<TaggedDigest, EnvelopeError> {
        Ok(self.hash()?.canonical_form()?)
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub fn header_mut(&mut self) -> &mut PlaintextHeader {
        &mut self.header
    }
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Envelope encoding failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Envelope declares a hash scheme this build does not support")]
    UnsupportedScheme(#[from] UnsupportedScheme),
}
