//! The key material a caller lends to the DOT protocol.

use crate::{
    abe::{MasterKey, Params, PrivateKey},
    entity::EntityId,
    partition::PartitionLabel,
};
use std::{
    fmt::{Debug, Display},
    future::Future,
    ops::ControlFlow,
};

/// Receives candidate keys one at a time. Returning [`ControlFlow::Break`] asks the
/// keyring to stop enumerating.
pub type KeyVisitor<'a> = dyn FnMut(&PrivateKey) -> ControlFlow<()> + 'a;

/// Identity and attribute-based key material, supplied by the caller.
///
/// The protocol never generates or stores long-term keys itself. Caching of fetched
/// parameters is the implementation's business.
///
/// Enumerating methods must stop as soon as the visitor breaks: the protocol relies on
/// this to keep the common case down to one or two pairing evaluations.
pub trait Keyring {
    type Error: Debug + Display;

    /// The signing identity minting DOTs.
    fn source_keys(&self) -> &ed25519_dalek::SigningKey;

    /// Public attribute-based parameters for `destination`.
    ///
    /// An unknown destination is a usage error; implementations report it however they like.
    fn destination_oaque_params(
        &self,
        destination: &EntityId,
    ) -> impl Future<Output = Result<Params, Self::Error>>;

    /// The source's own domain.
    fn source_oaque_params(&self) -> impl Future<Output = Result<(Params, MasterKey), Self::Error>>;

    /// Enumerate partition-level keys under `destination`'s domain that can serve `label`.
    fn oaque_keys_for_partition_label(
        &self,
        destination: &EntityId,
        label: &PartitionLabel,
        visit: &mut KeyVisitor<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Enumerate content-level keys under `destination`'s domain that can serve `label`.
    ///
    /// Kept apart from partition keys because the two are derived and revoked independently.
    fn oaque_keys_for_content(
        &self,
        destination: &EntityId,
        label: &PartitionLabel,
        visit: &mut KeyVisitor<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// The partition keys (global and namespace) currently held for `destination`.
    fn oaque_partition_keys_for(
        &self,
        destination: &EntityId,
    ) -> impl Future<Output = Result<Vec<PrivateKey>, Self::Error>>;

    /// A key for exactly `prefix`, for handing on to a third party.
    fn oaque_delegation_key_for(
        &self,
        destination: &EntityId,
        prefix: &PartitionLabel,
    ) -> impl Future<Output = Result<PrivateKey, Self::Error>>;

    /// Namespaces worth trying during the partition-key search. Empty means no hint.
    fn namespace_hints(&self) -> Vec<Vec<u8>>;
}
