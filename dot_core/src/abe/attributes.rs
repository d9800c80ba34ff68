//! Positional attribute vectors.

use crate::crypto::domain_separator::ATTRIBUTE_CONTEXT;
use bls12_381_plus::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sparse attribute vector: attribute index → value.
///
/// Absent indices are wildcards. A key for `A` can be used on a ciphertext for `B`
/// when `A` [is a subset of][Attributes::is_subset_of] `B`, after the key has been
/// qualified with the values `B` fixes and `A` leaves open.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Attributes(BTreeMap<usize, Vec<u8>>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(BTreeMap::new())
    }

    pub fn insert(&mut self, index: usize, value: Vec<u8>) -> Option<Vec<u8>> {
        self.0.insert(index, value)
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(&index).map(Vec::as_slice)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains_key(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[u8])> {
        self.0.iter().map(|(index, value)| (*index, value.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One past the highest fixed index, or zero when nothing is fixed.
    pub fn depth(&self) -> usize {
        self.0.keys().next_back().map_or(0, |index| index + 1)
    }

    /// Every attribute fixed here is fixed to the same value in `other`.
    pub fn is_subset_of(&self, other: &Attributes) -> bool {
        self.0
            .iter()
            .all(|(index, value)| other.0.get(index) == Some(value))
    }

    /// The two vectors do not disagree on any index they both fix.
    pub fn is_compatible_with(&self, other: &Attributes) -> bool {
        self.0.iter().all(|(index, value)| {
            other
                .0
                .get(index)
                .map_or(true, |other_value| other_value == value)
        })
    }

    pub(crate) fn max_index(&self) -> Option<usize> {
        self.0.keys().next_back().copied()
    }
}

impl FromIterator<(usize, Vec<u8>)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (usize, Vec<u8>)>>(iter: I) -> Self {
        Attributes(iter.into_iter().collect())
    }
}

/// Map an attribute value at a given index onto the scalar field.
pub(crate) fn attribute_scalar(index: usize, value: &[u8]) -> Scalar {
    let mut hasher = blake3::Hasher::new_derive_key(ATTRIBUTE_CONTEXT);
    hasher.update(&(index as u64).to_le_bytes());
    hasher.update(value);

    let mut wide = [0u8; 64];
    hasher.finalize_xof().fill(&mut wide);
    Scalar::from_bytes_wide(&wide)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(usize, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(index, value)| (*index, value.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn test_subset() {
        let prefix = attrs(&[(0, "meta"), (1, "ns")]);
        let full = attrs(&[(0, "meta"), (1, "ns"), (2, "leaf")]);

        assert!(prefix.is_subset_of(&full));
        assert!(!full.is_subset_of(&prefix));
        assert!(Attributes::new().is_subset_of(&prefix));
    }

    #[test]
    fn test_compatibility_ignores_open_slots() {
        let left = attrs(&[(0, "meta"), (2, "x")]);
        let right = attrs(&[(0, "meta"), (1, "y")]);
        let clash = attrs(&[(0, "other")]);

        assert!(left.is_compatible_with(&right));
        assert!(!left.is_compatible_with(&clash));
    }

    #[test]
    fn test_depth() {
        assert_eq!(Attributes::new().depth(), 0);
        assert_eq!(attrs(&[(0, "a")]).depth(), 1);
        assert_eq!(attrs(&[(0, "a"), (3, "b")]).depth(), 4);
    }

    #[test]
    fn test_scalars_are_position_bound() {
        assert_ne!(attribute_scalar(0, b"a"), attribute_scalar(1, b"a"));
        assert_eq!(attribute_scalar(2, b"a"), attribute_scalar(2, b"a"));
    }
}
