//! The public identity of a principal that can mint or receive DOTs.

use dupe::Dupe;
use serde::{Deserialize, Serialize};

#[cfg(any(feature = "test_utils", test))]
use tracing::instrument;

/// A principal's identity.
///
/// This is a newtype for a [`VerifyingKey`](ed25519_dalek::VerifyingKey). Outside of
/// signature checks it is only used as an address: it names the attribute-based
/// domain that a DOT is encrypted into.
#[derive(Copy, Serialize, Deserialize)]
pub struct EntityId(pub ed25519_dalek::VerifyingKey);

impl EntityId {
    #[cfg(any(feature = "test_utils", test))]
    #[instrument(skip_all)]
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(csprng: &mut R) -> Self {
        ed25519_dalek::SigningKey::generate(csprng)
            .verifying_key()
            .into()
    }

    /// Lower the [`EntityId`] to an owned binary representation.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Lower the [`EntityId`] to a borrowed binary representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.0
    }
}

impl Clone for EntityId {
    fn clone(&self) -> Self {
        *self
    }
}

impl Dupe for EntityId {
    fn dupe(&self) -> Self {
        *self
    }
}

impl std::hash::Hash for EntityId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.as_bytes().hash(state)
    }
}

impl std::fmt::LowerHex for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        crate::util::hex::bytes_as_hex(self.0.as_bytes().iter(), f)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#x}", self)
    }
}

impl std::fmt::Debug for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "EntityId({})", self)
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for EntityId {}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl From<ed25519_dalek::VerifyingKey> for EntityId {
    fn from(verifying_key: ed25519_dalek::VerifyingKey) -> Self {
        Self(verifying_key)
    }
}

impl From<&ed25519_dalek::VerifyingKey> for EntityId {
    fn from(verifying_key: &ed25519_dalek::VerifyingKey) -> Self {
        Self(*verifying_key)
    }
}

impl From<EntityId> for ed25519_dalek::VerifyingKey {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<&ed25519_dalek::SigningKey> for EntityId {
    fn from(sk: &ed25519_dalek::SigningKey) -> Self {
        sk.verifying_key().into()
    }
}
