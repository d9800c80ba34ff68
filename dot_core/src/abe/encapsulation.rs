use super::{
    attributes::Attributes,
    error::AbeError,
    params::Params,
    point::{G1Point, G2Point},
};
use crate::crypto::{
    domain_separator::KEM_CONTEXT, separable::Separable, symmetric_key::SymmetricKey,
};
use bls12_381_plus::{pairing, G1Projective, Scalar};
use ff::Field;
use group::Group;
use serde::{Deserialize, Serialize};

/// The public half of a key encapsulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encapsulation {
    pub(crate) b: G1Point,
    pub(crate) c: G2Point,
}

impl Encapsulation {
    /// Encapsulate a fresh symmetric key for the given attribute vector.
    pub fn encapsulate<R: rand::CryptoRng + rand::RngCore>(
        csprng: &mut R,
        params: &Params,
        attributes: &Attributes,
    ) -> Result<(Self, SymmetricKey), AbeError> {
        let s = Scalar::random(&mut *csprng);
        let c = params.attribute_point(attributes)? * s;
        let shared = pairing(&params.g1.0, &params.g2.0) * s;

        let encapsulation = Encapsulation {
            b: (G1Projective::generator() * s).into(),
            c: c.into(),
        };

        Ok((
            encapsulation,
            SymmetricKey::derive_in_context(KEM_CONTEXT, &shared.to_bytes()),
        ))
    }
}
