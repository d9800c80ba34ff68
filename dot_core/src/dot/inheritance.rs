//! What holders of a prefix key get to learn about the rest of a label.

use crate::partition::PartitionLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-slot disclosure policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disclosure {
    /// Prefix-key holders learn the slot value and can qualify their key with it.
    #[default]
    Revealed,

    /// The value is only readable with a key that already fixes it.
    Concealed,
}

/// Slot index → [`Disclosure`]. Slots without an entry are [`Disclosure::Revealed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InheritanceMap(BTreeMap<usize, Disclosure>);

impl InheritanceMap {
    pub fn new() -> Self {
        InheritanceMap(BTreeMap::new())
    }

    pub fn conceal(mut self, index: usize) -> Self {
        self.0.insert(index, Disclosure::Concealed);
        self
    }

    pub fn set(&mut self, index: usize, disclosure: Disclosure) {
        self.0.insert(index, disclosure);
    }

    pub fn get(&self, index: usize) -> Disclosure {
        self.0.get(&index).copied().unwrap_or_default()
    }

    pub fn is_concealed(&self, index: usize) -> bool {
        self.get(index) == Disclosure::Concealed
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Disclosure)> + '_ {
        self.0.iter().map(|(index, disclosure)| (*index, *disclosure))
    }
}

impl FromIterator<(usize, Disclosure)> for InheritanceMap {
    fn from_iter<I: IntoIterator<Item = (usize, Disclosure)>>(iter: I) -> Self {
        InheritanceMap(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisclosedSlot {
    Wildcard,
    Revealed(#[serde(with = "serde_bytes")] Vec<u8>),
    Concealed,
}

/// A partition label as seen by the holder of a prefix key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisclosedLabel(Vec<DisclosedSlot>);

impl DisclosedLabel {
    /// What a holder of the depth-`depth` prefix of `label` may see.
    ///
    /// Slots inside the prefix are always shown: the key already fixes them.
    pub fn at_depth(label: &PartitionLabel, inheritance: &InheritanceMap, depth: usize) -> Self {
        DisclosedLabel(
            label
                .slots()
                .iter()
                .enumerate()
                .map(|(index, value)| match value {
                    value if value.is_empty() => DisclosedSlot::Wildcard,
                    _ if index >= depth && inheritance.is_concealed(index) => {
                        DisclosedSlot::Concealed
                    }
                    value => DisclosedSlot::Revealed(value.clone()),
                })
                .collect(),
        )
    }

    pub fn slots(&self) -> &[DisclosedSlot] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nothing is concealed.
    pub fn is_complete(&self) -> bool {
        !self.0.iter().any(|slot| matches!(slot, DisclosedSlot::Concealed))
    }

    pub fn revealed_count(&self) -> usize {
        self.0
            .iter()
            .filter(|slot| matches!(slot, DisclosedSlot::Revealed(_)))
            .count()
    }

    /// The known part of the label. Concealed slots become wildcards.
    pub fn partition_label(&self) -> PartitionLabel {
        PartitionLabel::new(
            self.0
                .iter()
                .map(|slot| match slot {
                    DisclosedSlot::Revealed(value) => value.clone(),
                    DisclosedSlot::Wildcard | DisclosedSlot::Concealed => Vec::new(),
                })
                .collect(),
        )
    }

    /// Same length as `label`, and every slot matches (concealed slots match any value).
    pub fn agrees_with(&self, label: &PartitionLabel) -> bool {
        self.0.len() == label.len()
            && self
                .0
                .iter()
                .zip(label.slots())
                .all(|(slot, value)| match slot {
                    DisclosedSlot::Wildcard => value.is_empty(),
                    DisclosedSlot::Revealed(revealed) => revealed == value,
                    DisclosedSlot::Concealed => !value.is_empty(),
                })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::namespace_partition;
    use pretty_assertions::assert_eq;

    fn label() -> PartitionLabel {
        namespace_partition(b"ns")
            .padded(4)
            .with_slot(2, "path")
            .with_slot(3, "secret")
    }

    #[test]
    fn test_concealed_slots_are_hidden_beyond_the_prefix() {
        let inheritance = InheritanceMap::new().conceal(3);
        let disclosed = DisclosedLabel::at_depth(&label(), &inheritance, 2);

        assert!(!disclosed.is_complete());
        assert_eq!(disclosed.slots()[3], DisclosedSlot::Concealed);
        assert_eq!(
            disclosed.partition_label(),
            namespace_partition(b"ns").padded(4).with_slot(2, "path")
        );
        assert!(disclosed.agrees_with(&label()));
    }

    #[test]
    fn test_concealment_inside_the_prefix_is_moot() {
        let inheritance = InheritanceMap::new().conceal(1);
        let disclosed = DisclosedLabel::at_depth(&label(), &inheritance, 2);

        assert!(disclosed.is_complete());
        assert_eq!(disclosed.partition_label(), label());
    }

    #[test]
    fn test_disagreement_is_detected() {
        let disclosed = DisclosedLabel::at_depth(&label(), &InheritanceMap::new(), 1);
        let other = label().with_slot(2, "elsewhere");

        assert!(!disclosed.agrees_with(&other));
        assert!(!disclosed.agrees_with(&label().padded(5)));
    }
}
