//! Registry of published envelopes.
//!
//! Implementations are byte-in/byte-out: an envelope goes in, and its registration
//! (hash, per-destination position, raw bytes) comes back out by hash or by
//! `(destination, index)`. How the registry is backed is up to the implementation.

pub mod memory;

use crate::{crypto::hash_scheme::TaggedDigest, dot::envelope::Envelope, entity::EntityId};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display},
    future::Future,
};

/// A snapshot of the registry's head. Opaque to the protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateInformation {
    pub current_block: i64,
    pub current_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DotRegistration {
    pub hash: TaggedDigest,
    pub dst: EntityId,

    /// Position in `dst`'s append log.
    pub index: usize,

    /// Highest index in `dst`'s log when this registration was read.
    pub max_index: usize,

    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl DotRegistration {
    pub fn envelope(&self) -> Result<Envelope, crate::dot::envelope::EnvelopeError> {
        Envelope::from_bytes(&self.data)
    }
}

pub trait DotStore {
    type Error: Debug + Display;

    fn state_information(&self) -> impl Future<Output = Result<StateInformation, Self::Error>>;

    /// Register `envelope` under its hash and append it to its destination's log.
    ///
    /// Inserting the same envelope twice returns the original registration.
    fn insert_dot(
        &mut self,
        envelope: &Envelope,
    ) -> impl Future<Output = Result<DotRegistration, Self::Error>>;

    fn retrieve_dot_by_hash(
        &self,
        hash: &TaggedDigest,
    ) -> impl Future<Output = Result<(Option<DotRegistration>, StateInformation), Self::Error>>;

    fn retrieve_dot_by_vk_index(
        &self,
        dst: &EntityId,
        index: usize,
    ) -> impl Future<Output = Result<(Option<DotRegistration>, StateInformation), Self::Error>>;
}
