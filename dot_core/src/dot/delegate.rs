use super::{error::DelegationError, Dot};
use crate::{abe::PrivateKey, keyring::Keyring, partition::PartitionLabel};
use tracing::instrument;

/// Fetch a key for the first `depth` slots of `dot`'s label, to extend delegation of
/// that part of the hierarchy to a third party.
#[instrument(skip_all, fields(depth = depth))]
pub async fn delegation_key_for<K: Keyring>(
    dot: &Dot,
    depth: usize,
    keyring: &K,
) -> Result<PrivateKey, DelegationError<K>> {
    let slot_count = dot.partition_label.len();
    if depth == 0 || depth > slot_count {
        return Err(DelegationError::DepthOutOfRange { depth, slot_count });
    }

    let prefix = PartitionLabel::new(dot.partition_label.slots()[..depth].to_vec());
    let key = keyring
        .oaque_delegation_key_for(&dot.header.dst, &prefix)
        .await
        .map_err(DelegationError::Keyring)?;

    if key.attributes() != &prefix.attributes() {
        return Err(DelegationError::UnexpectedAttributes);
    }

    Ok(key)
}
