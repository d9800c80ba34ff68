//! Domain parameters and the master key.

use super::{
    attributes::{attribute_scalar, Attributes},
    error::AbeError,
    point::{G1Point, G2Point},
};
use bls12_381_plus::{G1Projective, G2Projective, Scalar};
use ff::Field;
use group::Group;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The slot count of the reference setup.
pub const DEFAULT_SLOT_COUNT: usize = 4;

/// Public parameters of one identity's attribute-based domain.
///
/// `g1 = g^α` lives in G1 (with `g` the standard generator); `g2`, `g3`, and one
/// `h_i` per slot live in G2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub(crate) g1: G1Point,
    pub(crate) g2: G2Point,
    pub(crate) g3: G2Point,
    pub(crate) h: Vec<G2Point>,
}

/// `g2^α`. Held only by the domain owner.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterKey(pub(crate) G2Point);

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        "<MasterKey>".fmt(f)
    }
}

impl Params {
    /// Generate a fresh domain with `slot_count` attribute slots.
    #[instrument(skip(csprng))]
    pub fn setup<R: rand::CryptoRng + rand::RngCore>(
        csprng: &mut R,
        slot_count: usize,
    ) -> Result<(Params, MasterKey), AbeError> {
        if slot_count == 0 {
            return Err(AbeError::NoSlots);
        }

        let alpha = Scalar::random(&mut *csprng);
        let g2 = G2Projective::random(&mut *csprng);

        let params = Params {
            g1: (G1Projective::generator() * alpha).into(),
            g2: g2.into(),
            g3: G2Projective::random(&mut *csprng).into(),
            h: (0..slot_count)
                .map(|_| G2Projective::random(&mut *csprng).into())
                .collect(),
        };

        Ok((params, MasterKey((g2 * alpha).into())))
    }

    pub fn slot_count(&self) -> usize {
        self.h.len()
    }

    pub(crate) fn check_range(&self, attributes: &Attributes) -> Result<(), AbeError> {
        match attributes.max_index() {
            Some(index) if index >= self.slot_count() => Err(AbeError::SlotOutOfRange {
                index,
                slot_count: self.slot_count(),
            }),
            _ => Ok(()),
        }
    }

    /// `g3 · ∏ h_i^{I_i}` over the fixed attributes.
    pub(crate) fn attribute_point(&self, attributes: &Attributes) -> Result<G2Projective, AbeError> {
        self.check_range(attributes)?;
        Ok(attributes
            .iter()
            .fold(self.g3.projective(), |acc, (index, value)| {
                acc + self.h[index].projective() * attribute_scalar(index, value)
            }))
    }
}
