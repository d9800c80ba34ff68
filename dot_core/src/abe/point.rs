//! Serializable wrappers around curve points.
//!
//! Points travel in compressed form and are validated (on-curve, in the prime-order
//! subgroup) when decoded.

use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

macro_rules! compressed_point {
    ($name:ident, $affine:ty, $projective:ty, $len:literal, $label:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub(crate) $affine);

        impl $name {
            pub fn to_compressed(&self) -> [u8; $len] {
                self.0.to_compressed()
            }

            pub fn from_compressed(bytes: &[u8; $len]) -> Option<Self> {
                Option::<$affine>::from(<$affine>::from_compressed(bytes)).map($name)
            }

            pub(crate) fn projective(&self) -> $projective {
                <$projective>::from(self.0)
            }
        }

        impl From<$projective> for $name {
            fn from(point: $projective) -> Self {
                $name(<$affine>::from(point))
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    concat!($label, "({})"),
                    crate::util::hex::fingerprint(&self.0.to_compressed())
                )
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bytes(&self.0.to_compressed())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
                let array = <[u8; $len]>::try_from(bytes.as_slice())
                    .map_err(|_| D::Error::invalid_length(bytes.len(), &concat!($len, " bytes")))?;
                $name::from_compressed(&array)
                    .ok_or_else(|| D::Error::custom(concat!("invalid ", $label, " point")))
            }
        }
    };
}

compressed_point!(G1Point, G1Affine, G1Projective, 48, "G1");
compressed_point!(G2Point, G2Affine, G2Projective, 96, "G2");
