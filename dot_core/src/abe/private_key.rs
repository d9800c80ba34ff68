//! Attribute-bound private keys.

use super::{
    attributes::{attribute_scalar, Attributes},
    encapsulation::Encapsulation,
    error::AbeError,
    params::{MasterKey, Params},
    point::{G1Point, G2Point},
};
use crate::crypto::{
    domain_separator::KEM_CONTEXT, separable::Separable, symmetric_key::SymmetricKey,
};
use bls12_381_plus::{pairing, G1Projective, Scalar};
use ff::Field;
use group::Group;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// A private key for an attribute vector.
///
/// Slots the vector leaves open keep a delegation component, so the holder can
/// [`delegate`][PrivateKey::delegate] a key for any more specific vector without
/// involving the domain owner.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    attributes: Attributes,
    d0: G2Point,
    d1: G1Point,
    open: BTreeMap<usize, G2Point>,
}

impl PrivateKey {
    /// Generate a key from the domain's master key.
    #[instrument(skip(csprng, params, master_key))]
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(
        csprng: &mut R,
        params: &Params,
        master_key: &MasterKey,
        attributes: &Attributes,
    ) -> Result<Self, AbeError> {
        let r = Scalar::random(&mut *csprng);
        let blinded = params.attribute_point(attributes)? * r;

        Ok(PrivateKey {
            attributes: attributes.clone(),
            d0: (master_key.0.projective() + blinded).into(),
            d1: (G1Projective::generator() * r).into(),
            open: (0..params.slot_count())
                .filter(|index| !attributes.contains(*index))
                .map(|index| (index, (params.h[index].projective() * r).into()))
                .collect(),
        })
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Derive a re-randomized key for a more specific attribute vector.
    ///
    /// The result is safe to hand to a third party: it is unlinkable to `self`.
    #[instrument(skip(self, csprng, params))]
    pub fn delegate<R: rand::CryptoRng + rand::RngCore>(
        &self,
        csprng: &mut R,
        params: &Params,
        attributes: &Attributes,
    ) -> Result<Self, AbeError> {
        let qualified = self.qualify(attributes)?;
        let t = Scalar::random(&mut *csprng);
        let blinded = params.attribute_point(attributes)? * t;

        Ok(PrivateKey {
            attributes: qualified.attributes,
            d0: (qualified.d0.projective() + blinded).into(),
            d1: (qualified.d1.projective() + G1Projective::generator() * t).into(),
            open: qualified
                .open
                .into_iter()
                .map(|(index, point)| {
                    let rerandomized = point.projective() + params.h[index].projective() * t;
                    (index, rerandomized.into())
                })
                .collect(),
        })
    }

    /// Fix the open slots that `attributes` sets, without re-randomizing.
    ///
    /// Only for local use (trial decryption): the result shares randomness with `self`.
    pub(crate) fn qualify(&self, attributes: &Attributes) -> Result<Self, AbeError> {
        if !self.attributes.is_subset_of(attributes) {
            return Err(AbeError::IncompatibleAttributes);
        }

        let mut d0 = self.d0.projective();
        let mut open = self.open.clone();
        for (index, value) in attributes.iter() {
            if self.attributes.contains(index) {
                continue;
            }
            let component = open
                .remove(&index)
                .ok_or(AbeError::MissingDelegationComponent(index))?;
            d0 += component.projective() * attribute_scalar(index, value);
        }

        Ok(PrivateKey {
            attributes: attributes.clone(),
            d0: d0.into(),
            d1: self.d1,
            open,
        })
    }

    /// Recover the symmetric key from an encapsulation.
    ///
    /// This always produces *a* key; it is only the right one when the encapsulation
    /// was made for exactly this key's attributes. Callers find out via the AEAD tag.
    pub fn decapsulate(&self, encapsulation: &Encapsulation) -> SymmetricKey {
        let shared = pairing(&encapsulation.b.0, &self.d0.0) - pairing(&self.d1.0, &encapsulation.c.0);
        SymmetricKey::derive_in_context(KEM_CONTEXT, &shared.to_bytes())
    }

    /// Drop every delegation component, leaving a key that can only open its own attributes.
    #[cfg(test)]
    pub(crate) fn without_delegation(mut self) -> Self {
        self.open.clear();
        self
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("attributes", &self.attributes)
            .field("open_slots", &self.open.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
