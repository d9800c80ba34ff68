//! An in-memory [`Keyring`] for tests.

use crate::{
    abe::{AbeError, MasterKey, Params, PrivateKey},
    entity::EntityId,
    keyring::{KeyVisitor, Keyring},
    partition::PartitionLabel,
};
use std::{cell::Cell, collections::HashMap, future::Future};
use thiserror::Error;

/// One identity's keys plus whatever it has been granted by others.
#[derive(Debug)]
pub struct MemoryKeyring {
    signing_key: ed25519_dalek::SigningKey,
    params: Params,
    master_key: MasterKey,
    directory: HashMap<EntityId, Params>,
    partition_keys: HashMap<EntityId, Vec<PrivateKey>>,
    label_keys: HashMap<EntityId, Vec<PrivateKey>>,
    content_keys: HashMap<EntityId, Vec<PrivateKey>>,
    namespace_hints: Vec<Vec<u8>>,
    visited: Cell<usize>,
}

impl MemoryKeyring {
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(
        csprng: &mut R,
        slot_count: usize,
    ) -> Result<Self, AbeError> {
        let signing_key = ed25519_dalek::SigningKey::generate(csprng);
        let (params, master_key) = Params::setup(csprng, slot_count)?;

        Ok(MemoryKeyring {
            signing_key,
            params,
            master_key,
            directory: HashMap::new(),
            partition_keys: HashMap::new(),
            label_keys: HashMap::new(),
            content_keys: HashMap::new(),
            namespace_hints: Vec::new(),
            visited: Cell::new(0),
        })
    }

    pub fn id(&self) -> EntityId {
        self.signing_key.verifying_key().into()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Let `other` look up our parameters.
    pub fn publish_to(&self, other: &mut MemoryKeyring) {
        other.directory.insert(self.id(), self.params.clone());
    }

    /// Issue a key for `label` in our own domain.
    pub fn grant_key<R: rand::CryptoRng + rand::RngCore>(
        &self,
        csprng: &mut R,
        label: &PartitionLabel,
    ) -> Result<PrivateKey, AbeError> {
        PrivateKey::generate(csprng, &self.params, &self.master_key, &label.attributes())
    }

    /// Returned in bulk by [`Keyring::oaque_partition_keys_for`].
    pub fn add_partition_key(&mut self, dst: EntityId, key: PrivateKey) {
        self.partition_keys.entry(dst).or_default().push(key);
    }

    /// Enumerated by [`Keyring::oaque_keys_for_partition_label`].
    pub fn add_label_key(&mut self, dst: EntityId, key: PrivateKey) {
        self.label_keys.entry(dst).or_default().push(key);
    }

    /// Enumerated by [`Keyring::oaque_keys_for_content`].
    pub fn add_content_key(&mut self, dst: EntityId, key: PrivateKey) {
        self.content_keys.entry(dst).or_default().push(key);
    }

    pub fn set_namespace_hints(&mut self, hints: Vec<Vec<u8>>) {
        self.namespace_hints = hints;
    }

    /// How many keys have been handed to visitors so far.
    pub fn visited(&self) -> usize {
        self.visited.get()
    }

    fn params_for(&self, dst: &EntityId) -> Result<&Params, MemoryKeyringError> {
        if *dst == self.id() {
            return Ok(&self.params);
        }
        self.directory
            .get(dst)
            .ok_or(MemoryKeyringError::UnknownEntity(*dst))
    }

    fn enumerate(
        &self,
        keys: Option<&Vec<PrivateKey>>,
        label: &PartitionLabel,
        visit: &mut KeyVisitor<'_>,
    ) {
        let query = label.attributes();
        for key in keys.into_iter().flatten() {
            if !key.attributes().is_compatible_with(&query) {
                continue;
            }
            self.visited.set(self.visited.get() + 1);
            if visit(key).is_break() {
                break;
            }
        }
    }

    fn delegation_key(
        &self,
        dst: &EntityId,
        prefix: &PartitionLabel,
    ) -> Result<PrivateKey, MemoryKeyringError> {
        let csprng = &mut rand::thread_rng();
        let attributes = prefix.attributes();

        if *dst == self.id() {
            return Ok(PrivateKey::generate(
                csprng,
                &self.params,
                &self.master_key,
                &attributes,
            )?);
        }

        let params = self.params_for(dst)?;
        let held = [&self.partition_keys, &self.label_keys, &self.content_keys]
            .into_iter()
            .filter_map(|keys| keys.get(dst))
            .flatten()
            .find(|key| key.attributes().is_subset_of(&attributes))
            .ok_or(MemoryKeyringError::NoDelegableKey)?;

        Ok(held.delegate(csprng, params, &attributes)?)
    }
}

impl Keyring for MemoryKeyring {
    type Error = MemoryKeyringError;

    fn source_keys(&self) -> &ed25519_dalek::SigningKey {
        &self.signing_key
    }

    fn destination_oaque_params(
        &self,
        destination: &EntityId,
    ) -> impl Future<Output = Result<Params, Self::Error>> {
        let result = self.params_for(destination).cloned();
        async move { result }
    }

    fn source_oaque_params(&self) -> impl Future<Output = Result<(Params, MasterKey), Self::Error>> {
        let result = Ok((self.params.clone(), self.master_key));
        async move { result }
    }

    fn oaque_keys_for_partition_label(
        &self,
        destination: &EntityId,
        label: &PartitionLabel,
        visit: &mut KeyVisitor<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        self.enumerate(self.label_keys.get(destination), label, visit);
        async move { Ok(()) }
    }

    fn oaque_keys_for_content(
        &self,
        destination: &EntityId,
        label: &PartitionLabel,
        visit: &mut KeyVisitor<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>> {
        self.enumerate(self.content_keys.get(destination), label, visit);
        async move { Ok(()) }
    }

    fn oaque_partition_keys_for(
        &self,
        destination: &EntityId,
    ) -> impl Future<Output = Result<Vec<PrivateKey>, Self::Error>> {
        let keys = self
            .partition_keys
            .get(destination)
            .cloned()
            .unwrap_or_default();
        async move { Ok(keys) }
    }

    fn oaque_delegation_key_for(
        &self,
        destination: &EntityId,
        prefix: &PartitionLabel,
    ) -> impl Future<Output = Result<PrivateKey, Self::Error>> {
        let result = self.delegation_key(destination, prefix);
        async move { result }
    }

    fn namespace_hints(&self) -> Vec<Vec<u8>> {
        self.namespace_hints.clone()
    }
}

#[derive(Debug, Error)]
pub enum MemoryKeyringError {
    #[error("Unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("No held key can be delegated to the requested prefix")]
    NoDelegableKey,

    #[error(transparent)]
    Abe(#[from] AbeError),
}

