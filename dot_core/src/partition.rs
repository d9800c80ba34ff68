//! Partition labels and their mapping onto attribute vectors.

use crate::abe::Attributes;
use derive_more::{From, Into};
use serde::{Deserialize, Serialize};

/// Slot 0 value of every meta/global partition.
pub const META_SLOT_SENTINEL: &[u8] = b"dot:meta-partition";

/// An ordered list of byte-string slots: global/meta marker, namespace, sub-path, content.
///
/// An empty slot is a wildcard. Labels attached to a DOT must have exactly as many
/// slots as the destination's domain; query labels (for example
/// [`global_partition`]) may be shorter, the missing tail being wildcards too.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Serialize, Deserialize,
)]
pub struct PartitionLabel(Vec<Vec<u8>>);

impl PartitionLabel {
    pub fn new(slots: Vec<Vec<u8>>) -> Self {
        PartitionLabel(slots)
    }

    /// A label of `slot_count` wildcards.
    pub fn with_slot_count(slot_count: usize) -> Self {
        PartitionLabel(vec![Vec::new(); slot_count])
    }

    /// Set slot `index`, growing the label with wildcards if needed.
    pub fn with_slot(mut self, index: usize, value: impl Into<Vec<u8>>) -> Self {
        if self.0.len() <= index {
            self.0.resize(index + 1, Vec::new());
        }
        self.0[index] = value.into();
        self
    }

    pub fn slots(&self) -> &[Vec<u8>] {
        &self.0
    }

    pub fn slot(&self, index: usize) -> Option<&[u8]> {
        self.0
            .get(index)
            .map(Vec::as_slice)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn attributes(&self) -> Attributes {
        slots_to_attributes(&self.0)
    }

    /// One past the last non-wildcard slot.
    pub fn depth(&self) -> usize {
        self.attributes().depth()
    }

    /// The attributes of the first `depth` slots.
    pub fn prefix(&self, depth: usize) -> Attributes {
        slots_to_attributes(&self.0[..depth.min(self.0.len())])
    }

    /// Slot-by-slot agreement wherever both labels are fixed.
    pub fn is_compatible_with(&self, other: &PartitionLabel) -> bool {
        self.attributes().is_compatible_with(&other.attributes())
    }

    /// Extend with wildcards to `slot_count` slots. Longer labels are left as they are.
    pub fn padded(&self, slot_count: usize) -> Self {
        let mut slots = self.0.clone();
        if slots.len() < slot_count {
            slots.resize(slot_count, Vec::new());
        }
        PartitionLabel(slots)
    }
}

/// Slot `i` becomes attribute index `i`; empty slots are left out.
pub fn slots_to_attributes(slots: &[Vec<u8>]) -> Attributes {
    slots
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.is_empty())
        .map(|(index, value)| (index, value.clone()))
        .collect()
}

/// The meta/global partition: the sentinel, everything else open.
pub fn global_partition() -> PartitionLabel {
    PartitionLabel(vec![META_SLOT_SENTINEL.to_vec()])
}

/// The partition for one namespace.
pub fn namespace_partition(namespace: &[u8]) -> PartitionLabel {
    PartitionLabel(vec![META_SLOT_SENTINEL.to_vec(), namespace.to_vec()])
}
