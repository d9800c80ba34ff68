use super::{DotRegistration, DotStore, StateInformation};
use crate::{
    crypto::hash_scheme::{HashScheme, TaggedDigest},
    dot::envelope::{Envelope, EnvelopeError},
    entity::EntityId,
};
use dupe::Dupe;
use std::{cell::RefCell, collections::HashMap, future::Future, rc::Rc};
use thiserror::Error;
use tracing::instrument;

/// An in-memory [`DotStore`]. Clones share the same registry.
#[derive(Debug, Clone, Dupe, Default)]
pub struct MemoryDotStore(Rc<RefCell<Inner>>);

impl MemoryDotStore {
    pub fn new() -> Self {
        MemoryDotStore(Rc::new(RefCell::new(Inner::default())))
    }

    /// Move the head forward.
    pub fn advance(&self, current_block: i64, current_time: i64) {
        self.0.borrow_mut().state = StateInformation {
            current_block,
            current_time,
        };
    }

    pub fn len(&self) -> usize {
        self.0.borrow().by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().by_hash.is_empty()
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: StateInformation,
    by_hash: HashMap<TaggedDigest, Entry>,
    logs: HashMap<EntityId, Vec<TaggedDigest>>,
}

#[derive(Debug)]
struct Entry {
    dst: EntityId,
    index: usize,
    data: Vec<u8>,
}

impl Inner {
    fn registration(&self, hash: &TaggedDigest) -> Option<DotRegistration> {
        let entry = self.by_hash.get(hash)?;
        let max_index = self.logs.get(&entry.dst).map_or(0, |log| log.len() - 1);

        Some(DotRegistration {
            hash: hash.clone(),
            dst: entry.dst,
            index: entry.index,
            max_index,
            data: entry.data.clone(),
        })
    }
}

impl DotStore for MemoryDotStore {
    type Error = MemoryStoreError;

    fn state_information(&self) -> impl Future<Output = Result<StateInformation, Self::Error>> {
        let state = self.0.borrow().state;
        async move { Ok(state) }
    }

    #[instrument(skip_all, fields(dst = %envelope.dst()))]
    fn insert_dot(
        &mut self,
        envelope: &Envelope,
    ) -> impl Future<Output = Result<DotRegistration, Self::Error>> {
        let result = self.insert_now(envelope);
        async move { result }
    }

    fn retrieve_dot_by_hash(
        &self,
        hash: &TaggedDigest,
    ) -> impl Future<Output = Result<(Option<DotRegistration>, StateInformation), Self::Error>>
    {
        let inner = self.0.borrow();
        let found = (inner.registration(hash), inner.state);
        async move { Ok(found) }
    }

    fn retrieve_dot_by_vk_index(
        &self,
        dst: &EntityId,
        index: usize,
    ) -> impl Future<Output = Result<(Option<DotRegistration>, StateInformation), Self::Error>>
    {
        let inner = self.0.borrow();
        let registration = inner
            .logs
            .get(dst)
            .and_then(|log| log.get(index))
            .and_then(|hash| inner.registration(hash));
        let found = (registration, inner.state);
        async move { Ok(found) }
    }
}

impl MemoryDotStore {
    fn insert_now(&self, envelope: &Envelope) -> Result<DotRegistration, MemoryStoreError> {
        let data = envelope.to_bytes()?;
        let hash = HashScheme::for_id(envelope.hash_scheme())
            .digest(&data)
            .and_then(|digest| digest.canonical_form())
            .map_err(EnvelopeError::from)?;

        let mut inner = self.0.borrow_mut();
        if !inner.by_hash.contains_key(&hash) {
            let dst = envelope.dst();
            let log = inner.logs.entry(dst).or_default();
            let index = log.len();
            log.push(hash.clone());
            inner.by_hash.insert(hash.clone(), Entry { dst, index, data });
        }

        inner
            .registration(&hash)
            .ok_or(MemoryStoreError::Inconsistent)
    }
}

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Registry index is inconsistent")]
    Inconsistent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abe::DEFAULT_SLOT_COUNT,
        config::DotConfig,
        crypto::hash_scheme::SchemeId,
        dot::{encrypt_dot, Dot, DotContent, Extension},
        partition::namespace_partition,
        test_utils::MemoryKeyring,
    };
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    async fn envelopes(count: usize) -> TestResult<(EntityId, Vec<Envelope>)> {
        let csprng = &mut rand::thread_rng();
        let mut alice = MemoryKeyring::generate(csprng, DEFAULT_SLOT_COUNT)?;
        let bob = MemoryKeyring::generate(csprng, DEFAULT_SLOT_COUNT)?;
        bob.publish_to(&mut alice);

        let mut out = Vec::new();
        for n in 0..count {
            let content = DotContent::new(alice.id(), bob.id(), format!("res/{n}"), ["read"]);
            let dot = Dot::new(content, namespace_partition(b"ns").padded(DEFAULT_SLOT_COUNT));
            out.push(encrypt_dot(&dot, &alice, &DotConfig::default(), csprng).await?);
        }
        Ok((bob.id(), out))
    }

    #[tokio::test]
    async fn test_insert_and_retrieve() -> TestResult {
        let (bob, envelopes) = envelopes(2).await?;
        let mut store = MemoryDotStore::new();

        let first = store.insert_dot(&envelopes[0]).await?;
        let second = store.insert_dot(&envelopes[1]).await?;
        assert_eq!(first.index, 0);
        assert_eq!(second.index, 1);
        assert_eq!(first.hash, envelopes[0].tagged_hash()?);

        let (by_hash, _) = store.retrieve_dot_by_hash(&second.hash).await?;
        assert_eq!(by_hash.map(|reg| reg.envelope()).transpose()?, Some(envelopes[1].clone()));

        let (by_index, _) = store.retrieve_dot_by_vk_index(&bob, 0).await?;
        let by_index = by_index.expect("registration at index 0");
        assert_eq!(by_index.hash, first.hash);
        assert_eq!(by_index.max_index, 1);

        let (missing, _) = store.retrieve_dot_by_vk_index(&bob, 2).await?;
        assert_eq!(missing, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_inserting_twice_is_idempotent() -> TestResult {
        let (_, envelopes) = envelopes(1).await?;
        let mut store = MemoryDotStore::new();

        let first = store.insert_dot(&envelopes[0]).await?;
        let again = store.insert_dot(&envelopes[0]).await?;
        assert_eq!(first, again);
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_any_change_is_a_new_dot() -> TestResult {
        let (bob, envelopes) = envelopes(1).await?;
        let mut store = MemoryDotStore::new();

        let mut extended = envelopes[0].clone();
        extended.push_extension(Extension {
            id: SchemeId::new(vec![1, 2, 3]),
            payload: vec![0],
        });

        let original = store.insert_dot(&envelopes[0]).await?;
        let changed = store.insert_dot(&extended).await?;
        assert_ne!(original.hash, changed.hash);

        let (latest, _) = store.retrieve_dot_by_vk_index(&bob, 1).await?;
        assert_eq!(latest.map(|reg| reg.hash), Some(changed.hash));
        Ok(())
    }

    #[tokio::test]
    async fn test_state_snapshot_follows_the_head() -> TestResult {
        let store = MemoryDotStore::new();
        assert_eq!(store.state_information().await?, StateInformation::default());

        store.advance(42, 1_700_000_000);
        let (_, state) = store
            .retrieve_dot_by_hash(&TaggedDigest {
                scheme: SchemeId::keccak_256(),
                content: vec![0; 32],
            })
            .await?;
        assert_eq!(state.current_block, 42);
        assert_eq!(state.current_time, 1_700_000_000);
        Ok(())
    }
}
